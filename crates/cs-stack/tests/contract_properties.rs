//! Contract properties of `ContractedStack` checked over random call
//! sequences.
//!
//! Each test uses a fixed seed so failures are reproducible.

use cs_core::PropertyChecker;
use cs_stack::{ContractedStack, StackError, TrackedStack};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEQUENCES_COUNT: u64 = 200;
const SEQUENCE_LENGTH_MAX: usize = 64;

/// Apply a random push/pop sequence, calling `after_each` after every call.
fn random_sequence(seed: u64, mut after_each: impl FnMut(&ContractedStack<u32>)) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stack = ContractedStack::new();
    let length = rng.gen_range(1..=SEQUENCE_LENGTH_MAX);

    for _ in 0..length {
        if rng.gen_bool(0.55) {
            stack.push(rng.gen());
        } else {
            let _ = stack.pop();
        }
        after_each(&stack);
    }
}

#[test]
fn test_invariant_preservation() {
    for seed in 0..SEQUENCES_COUNT {
        random_sequence(seed, |stack| {
            assert!(stack.check_invariants().is_ok(), "seed {}", seed);
            assert_eq!(stack.head().is_some(), stack.entries() > 0, "seed {}", seed);
        });
    }
}

#[test]
fn test_push_pop_identity() {
    for seed in 0..SEQUENCES_COUNT {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stack = ContractedStack::new();
        for _ in 0..rng.gen_range(0..16) {
            stack.push(rng.gen::<u32>());
        }

        let before = stack.clone();
        let x: u32 = rng.gen();
        stack.push(x);

        assert_eq!(stack.pop(), Ok(x));
        assert_eq!(stack, before);
        assert_eq!(stack.entries(), before.entries());
        assert_eq!(stack.head(), before.head());
    }
}

#[test]
fn test_count_conservation() {
    for seed in 0..SEQUENCES_COUNT {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = rng.gen_range(0..32usize);
        let m = rng.gen_range(0..=n);

        let mut stack = ContractedStack::new();
        for i in 0..n {
            stack.push(i);
        }
        for _ in 0..m {
            assert!(stack.pop().is_ok());
        }

        assert_eq!(stack.entries(), n - m);
    }
}

#[test]
fn test_lifo_ordering() {
    let mut stack = ContractedStack::new();
    stack.push('a');
    stack.push('b');
    stack.push('c');

    assert_eq!(stack.pop(), Ok('c'));
    assert_eq!(stack.pop(), Ok('b'));
    assert_eq!(stack.pop(), Ok('a'));
}

#[test]
fn test_lifo_ordering_interleaved() {
    for seed in 0..SEQUENCES_COUNT {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stack = ContractedStack::new();
        let mut reference: Vec<u64> = Vec::new();

        for _ in 0..SEQUENCE_LENGTH_MAX {
            if rng.gen_bool(0.5) {
                let x = rng.gen();
                stack.push(x);
                reference.push(x);
            } else {
                assert_eq!(stack.pop().ok(), reference.pop(), "seed {}", seed);
            }
        }
    }
}

#[test]
fn test_underflow_determinism() {
    for _ in 0..10 {
        let mut stack: ContractedStack<u8> = ContractedStack::new();
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.peek(), Err(StackError::Underflow));
        assert_eq!(stack, ContractedStack::new());
    }
}

#[test]
fn test_underflow_after_draining() {
    let mut stack = ContractedStack::new();
    stack.push(1);
    assert_eq!(stack.pop(), Ok(1));

    let drained = stack.clone();
    assert_eq!(stack.pop(), Err(StackError::Underflow));
    assert_eq!(stack, drained);
}

#[test]
fn test_peek_non_destructiveness() {
    for seed in 0..SEQUENCES_COUNT {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stack = ContractedStack::new();
        for _ in 0..rng.gen_range(1..16) {
            stack.push(rng.gen::<u16>());
        }

        let entries = stack.entries();
        let first = stack.peek().copied();
        for _ in 0..rng.gen_range(1..8) {
            assert_eq!(stack.peek().copied(), first);
            assert_eq!(stack.entries(), entries);
        }
    }
}

#[test]
fn test_tracked_history_satisfies_checker() {
    for seed in 0..SEQUENCES_COUNT {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stack = TrackedStack::new();

        for _ in 0..SEQUENCE_LENGTH_MAX {
            match rng.gen_range(0..3) {
                0 => stack.push(rng.gen_range(0..8u8)),
                1 => {
                    let _ = stack.pop();
                }
                _ => {
                    let _ = stack.peek();
                }
            }
        }

        let checker = stack.checker().with_seed(seed + 1);
        if let Err(failure) = checker.verify_all() {
            panic!("{}", failure.format_status());
        }
    }
}
