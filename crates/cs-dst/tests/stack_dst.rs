//! DST runs of the contracted stack.
//!
//! Reproduce a failure with `DST_SEED=<seed> cargo test -p cs-dst`.

use cs_dst::{
    get_iterations, get_or_generate_seed, simulate, simulate_many, DstEnv, SimulationConfig,
    WorkloadConfig,
};

#[test]
fn test_stack_contracts_hold_under_random_workload() {
    let seed = get_or_generate_seed();
    let iterations = get_iterations(20);

    let reports = simulate_many(seed, iterations, DstEnv::new, &SimulationConfig::default())
        .unwrap_or_else(|e| panic!("{}", e));

    assert_eq!(reports.len() as u64, iterations);
    for report in &reports {
        assert!(report.summary.all_hold(), "{}", report.summary.format_report());
        println!("{}", report.stats);
    }
}

#[test]
fn test_every_workload_preset() {
    let seed = get_or_generate_seed();

    for workload in [
        WorkloadConfig::default(),
        WorkloadConfig::balanced(),
        WorkloadConfig::push_heavy(),
        WorkloadConfig::pop_heavy(),
    ] {
        let mut env = DstEnv::with_workload(seed, workload.clone()).unwrap();
        let report = simulate(&mut env, &SimulationConfig::fast())
            .unwrap_or_else(|e| panic!("{:?}: {}", workload, e));
        assert_eq!(report.summary.failed, 0);
    }
}

#[test]
fn test_underflow_heavy_run_checks_precondition_path() {
    let mut env = DstEnv::with_workload(31337, WorkloadConfig::pop_heavy()).unwrap();
    let report = simulate(&mut env, &SimulationConfig::default()).unwrap();

    assert!(report.underflows_count > 0);
    assert!(report.summary.all_hold());
}

#[test]
fn test_report_serializes() {
    let mut env = DstEnv::new(2024);
    let report = simulate(&mut env, &SimulationConfig::fast()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["seed"], 2024);
    assert_eq!(json["summary"]["failed"], 0);
    assert_eq!(json["summary"]["results"].as_array().unwrap().len(), 5);
}

#[test]
#[ignore] // Long run, use --ignored
fn test_stack_contracts_thorough() {
    let seed = get_or_generate_seed();
    let iterations = get_iterations(200);

    simulate_many(seed, iterations, DstEnv::new, &SimulationConfig::thorough())
        .unwrap_or_else(|e| panic!("{}", e));
}
