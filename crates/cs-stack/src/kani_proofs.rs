//! Kani proof harnesses for the contracted stack.
//!
//! These harnesses check each operation contract for every value of a
//! small element type, up to a bounded stack depth.
//!
//! # Running the proofs
//!
//! ```bash
//! cargo kani -p cs-stack
//! cargo kani -p cs-stack --harness proof_pop_returns_old_head
//! ```

use crate::error::StackError;
use crate::stack::ContractedStack;

/// Build a stack of up to three arbitrary elements.
fn any_stack() -> ContractedStack<u8> {
    let mut stack = ContractedStack::new();
    let depth: u8 = kani::any();
    kani::assume(depth <= 3);
    for _ in 0..depth {
        stack.push(kani::any());
    }
    stack
}

#[kani::proof]
#[kani::unwind(5)]
fn proof_push_contract() {
    let mut stack = any_stack();
    let entries_old = stack.entries();
    let x: u8 = kani::any();

    stack.push(x);

    kani::assert(stack.entries() == entries_old + 1, "entries == old(entries) + 1");
    kani::assert(stack.head() == Some(&x), "head == x");
}

#[kani::proof]
#[kani::unwind(5)]
fn proof_pop_returns_old_head() {
    let mut stack = any_stack();
    kani::assume(stack.entries() > 0);
    let entries_old = stack.entries();
    let head_old = stack.head().copied();

    let result = stack.pop();

    kani::assert(result.ok() == head_old, "result == old(head)");
    kani::assert(stack.entries() == entries_old - 1, "entries == old(entries) - 1");
}

#[kani::proof]
#[kani::unwind(5)]
fn proof_push_pop_identity() {
    let mut stack = any_stack();
    let before = stack.clone();
    let x: u8 = kani::any();

    stack.push(x);
    let popped = stack.pop();

    kani::assert(popped == Ok(x), "pop returns the value just pushed");
    kani::assert(stack == before, "push then pop leaves the stack unchanged");
}

#[kani::proof]
#[kani::unwind(5)]
fn proof_underflow_on_empty() {
    let mut stack: ContractedStack<u8> = ContractedStack::new();

    kani::assert(stack.peek() == Err(StackError::Underflow), "peek on empty underflows");
    kani::assert(stack.pop() == Err(StackError::Underflow), "pop on empty underflows");
    kani::assert(stack.is_empty(), "underflow has no effect");
}

#[kani::proof]
#[kani::unwind(5)]
fn proof_invariants_hold() {
    let mut stack = any_stack();
    kani::assert(stack.check_invariants().is_ok(), "invariants hold on entry");

    if kani::any() {
        stack.push(kani::any());
    } else {
        let _ = stack.pop();
    }

    kani::assert(stack.check_invariants().is_ok(), "invariants hold on exit");
}
