use folio_algorithms::portfolio::{
    compare, run_solver, solver_by_name, BruteForceSolver, DynamicSolver, Solver, SOLVER_NAMES,
};
use folio_challenges::{
    portfolio::{Challenge, Item, Track},
    ErrorCategory, PortfolioError,
};
use folio_structs::config::RunConfig;

fn abc() -> Vec<Item> {
    vec![
        Item::new("A", 2000.0, 0.30),
        Item::new("B", 3500.0, 0.15),
        Item::new("C", 1000.0, 0.50),
    ]
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.name()).collect()
}

fn random_challenge(seed: u8, num_items: usize) -> Challenge {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    Challenge::generate_instance(
        &bytes,
        &Track {
            num_items,
            budget: 5000.0,
            max_cost: 2000,
        },
    )
    .unwrap()
}

#[test]
fn test_abc_scenario() {
    let items = abc();

    let mut bf = BruteForceSolver::new();
    let bf_selection = bf.solve(&items, 4000.0);
    assert_eq!(names(bf_selection.items()), vec!["A", "C"]);
    assert_eq!(bf_selection.indices(), &[0, 2]);
    assert_eq!(bf_selection.total_cost(), 3000.0);
    assert!((bf_selection.total_profit() - 1100.0).abs() < 0.01);

    let mut dp = DynamicSolver::new();
    let dp_selection = dp.solve(&items, 4000).unwrap();
    assert_eq!(names(dp_selection.items()), vec!["A", "C"]);
    assert_eq!(dp_selection.total_cost(), 3000.0);
    assert!((dp_selection.total_profit() - 1100.0).abs() < 0.01);
}

#[test]
fn test_zero_budget_selects_nothing() {
    let items = abc();
    let mut bf = BruteForceSolver::new();
    let selection = bf.solve(&items, 0.0);
    assert!(selection.is_empty());
    assert_eq!(selection.total_cost(), 0.0);
    assert_eq!(selection.total_profit(), 0.0);
    assert_eq!(bf.iterations(), 8);

    let selection = DynamicSolver::new().solve(&items, 0).unwrap();
    assert!(selection.is_empty());
    assert_eq!(selection.total_profit(), 0.0);
}

#[test]
fn test_single_item_over_budget() {
    let items = vec![Item::new("Big", 5000.0, 0.4)];
    assert!(BruteForceSolver::new().solve(&items, 4999.0).is_empty());
    assert!(DynamicSolver::new().solve(&items, 4999).unwrap().is_empty());
}

#[test]
fn test_iteration_count_is_two_to_the_n() {
    for n in 0..=12usize {
        let items: Vec<Item> = (0..n)
            .map(|i| Item::new(format!("I{}", i), 10.0 + i as f64, 0.1))
            .collect();
        let mut bf = BruteForceSolver::new();
        bf.solve(&items, 50.0);
        assert_eq!(bf.iterations(), 1u64 << n, "n = {}", n);
    }
}

#[test]
fn test_iteration_count_resets_between_solves() {
    let items = abc();
    let mut bf = BruteForceSolver::new();
    bf.solve(&items, 4000.0);
    bf.solve(&items, 4000.0);
    assert_eq!(bf.iterations(), 8);
}

#[test]
fn test_solvers_agree_on_random_instances() {
    for seed in 0..24u8 {
        let challenge = random_challenge(seed, 12);
        let bf = BruteForceSolver::new().solve_challenge(&challenge).unwrap();
        let dp = DynamicSolver::new().solve_challenge(&challenge).unwrap();

        assert!(
            (bf.total_profit() - dp.total_profit()).abs() <= 0.01,
            "seed {}: {} vs {}",
            seed,
            bf.total_profit(),
            dp.total_profit()
        );
        assert!(bf.is_valid(challenge.budget()));
        assert!(dp.is_valid(challenge.budget()));
        if bf.indices() == dp.indices() {
            assert_eq!(bf.total_cost(), dp.total_cost(), "seed {}", seed);
        }
    }
}

#[test]
fn test_solvers_agree_on_cost_without_ties() {
    // Costs are distinct powers of two at one rate, so every subset has its own profit.
    let items: Vec<Item> = (0..10)
        .map(|i| Item::new(format!("P{}", i), (1u32 << i) as f64, 0.25))
        .collect();
    let bf = BruteForceSolver::new().solve(&items, 700.0);
    let dp = DynamicSolver::new().solve(&items, 700).unwrap();

    assert_eq!(bf.indices(), &[2, 3, 4, 5, 7, 9]);
    assert_eq!(bf, dp);
    assert_eq!(bf.total_cost(), 700.0);
    assert_eq!(dp.total_cost(), 700.0);
    assert_eq!(bf.total_profit(), 175.0);
    assert_eq!(dp.total_profit(), 175.0);
}

#[test]
fn test_selection_is_subset_without_duplicates() {
    let challenge = random_challenge(99, 14);
    for selection in [
        BruteForceSolver::new().solve_challenge(&challenge).unwrap(),
        DynamicSolver::new().solve_challenge(&challenge).unwrap(),
    ] {
        let mut indices = selection.indices().to_vec();
        indices.sort();
        indices.dedup();
        assert_eq!(indices.len(), selection.len());
        for (&i, item) in selection.indices().iter().zip(selection.items()) {
            assert_eq!(&challenge.items()[i], item);
        }
        assert!(challenge.verify_solution(&selection.to_solution()).is_ok());
    }
}

#[test]
fn test_solve_is_deterministic() {
    let challenge = random_challenge(3, 13);

    let mut bf = BruteForceSolver::new();
    let first = bf.solve_challenge(&challenge).unwrap();
    let second = bf.solve_challenge(&challenge).unwrap();
    assert_eq!(first, second);

    let mut dp = DynamicSolver::new();
    let first = dp.solve_challenge(&challenge).unwrap();
    let second = dp.solve_challenge(&challenge).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ties_keep_first_found_and_exclude_later_items() {
    // {X} and {Y, Z} both earn 20 for a cost of 100.
    let items = vec![
        Item::new("X", 100.0, 0.2),
        Item::new("Y", 50.0, 0.2),
        Item::new("Z", 50.0, 0.2),
    ];
    let bf = BruteForceSolver::new().solve(&items, 100.0);
    let dp = DynamicSolver::new().solve(&items, 100).unwrap();
    assert_eq!(names(bf.items()), vec!["X"]);
    assert_eq!(names(dp.items()), vec!["X"]);
}

#[test]
fn test_non_positive_profit_items_are_never_chosen() {
    let items = vec![
        Item::new("Flat", 100.0, 0.0),
        Item::new("Loss", 100.0, -0.1),
    ];
    assert!(BruteForceSolver::new().solve(&items, 1000.0).is_empty());
    assert!(DynamicSolver::new().solve(&items, 1000).unwrap().is_empty());
}

#[test]
fn test_fractional_costs_are_truncated_by_dynamic_programming() {
    let items = vec![Item::new("Frac", 1500.7, 0.1)];
    assert!(BruteForceSolver::new().solve(&items, 1500.0).is_empty());
    let dp = DynamicSolver::new().solve(&items, 1500).unwrap();
    assert_eq!(dp.len(), 1);
    assert!(!dp.is_valid(1500.0));
}

#[test]
fn test_oversized_table_is_rejected() {
    let items = abc();
    let mut dp = DynamicSolver::new();
    let err = dp.solve(&items, u64::MAX).unwrap_err();
    assert!(matches!(
        err,
        PortfolioError::TableTooLarge {
            num_items: 3,
            budget: u64::MAX
        }
    ));
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(dp.table().is_none());
    assert!(dp.stats().is_none());

    // An f64 budget past u64::MAX saturates on the way into the table.
    let challenge = Challenge::new(abc(), 1e300).unwrap();
    assert!(matches!(
        DynamicSolver::new().solve_challenge(&challenge),
        Err(PortfolioError::TableTooLarge { .. })
    ));
    assert!(compare(&challenge, &RunConfig::default()).is_err());
}

#[test]
fn test_dp_table_is_retained() {
    let items = abc();
    let mut dp = DynamicSolver::new();
    assert!(dp.table().is_none());
    let selection = dp.solve(&items, 4000).unwrap();

    let table = dp.table().unwrap();
    assert_eq!(table.num_rows(), 4);
    assert_eq!(table.capacity(), 4000);
    assert_eq!(table.get(0, 4000), 0.0);
    assert_eq!(table.get(1, 1999), 0.0);
    assert!((table.get(1, 2000) - 600.0).abs() < 1e-9);
    assert!((table.best_profit() - selection.total_profit()).abs() < 1e-9);
}

#[test]
fn test_stats_capture() {
    let challenge = Challenge::new(abc(), 4000.0).unwrap();

    let mut bf = BruteForceSolver::new();
    assert!(bf.stats().is_none());
    bf.solve_challenge(&challenge).unwrap();
    let stats = bf.stats().unwrap();
    assert_eq!(stats.algorithm, "Brute Force");
    assert_eq!(stats.iterations, Some(8));
    assert_eq!(stats.total_cost, 3000.0);
    assert_eq!(stats.num_items, 2);
    assert!((stats.profit_ratio - 1100.0 / 3000.0).abs() < 1e-9);

    let mut dp = DynamicSolver::new();
    assert!(dp.stats().is_none());
    dp.solve_challenge(&challenge).unwrap();
    let stats = dp.stats().unwrap();
    assert_eq!(stats.algorithm, "Dynamic Programming");
    assert_eq!(stats.iterations, None);
    assert_eq!(stats.total_cost, 3000.0);
}

#[test]
fn test_compare() {
    let challenge = Challenge::new(abc(), 4000.0).unwrap();
    let comparison = compare(&challenge, &RunConfig::default()).unwrap();
    assert_eq!(comparison.brute_force, comparison.dynamic_programming);

    let report = comparison.report.unwrap();
    assert!(report.same_solution());
    assert_eq!(report.brute_force.iterations, Some(8));
    assert_eq!(report.dynamic_programming.iterations, None);
    assert!(report.comparison.profit_delta <= 0.01);
    assert_eq!(report.comparison.cost_delta, 0.0);
}

#[test]
fn test_run_solver_by_name() {
    let challenge = Challenge::new(abc(), 4000.0).unwrap();
    let config = RunConfig {
        exhaustive_warn_items: 1,
        table_warn_cells: 1,
        ..RunConfig::default()
    };
    for name in SOLVER_NAMES {
        let mut solver = solver_by_name(name).unwrap();
        assert!(solver.scale_warning(&challenge, &config).is_some());
        let selection = run_solver(solver.as_mut(), &challenge, &config).unwrap();
        assert_eq!(selection.total_cost(), 3000.0);
        assert!(solver.stats().is_some());
    }
    assert!(solver_by_name("greedy").is_none());
}
