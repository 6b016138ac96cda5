use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{arg, ArgAction, Command};
use folio_algorithms::portfolio::{compare, run_solver, solver_by_name, SOLVER_NAMES};
use folio_challenges::portfolio::{loader::load_items, Challenge, Solution, Track};
use folio_structs::{
    config::RunConfig,
    core::{ReportRecord, SolveStats},
};
use folio_runtime::files::{load_settings, load_solution, output_path, write_output};
use folio_utils::table::write_table;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("folio-runtime")
        .about("Selects the most profitable portfolio within a budget")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Solves an item table with one algorithm")
                .arg(
                    arg!(<ITEMS> "Path to a delimited item table")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--algorithm [ALGORITHM] "Solver to run")
                        .default_value("dynamic")
                        .value_parser(SOLVER_NAMES),
                )
                .args(run_args()),
        )
        .subcommand(
            Command::new("compare")
                .about("Runs both solvers on an item table and compares them")
                .arg(
                    arg!(<ITEMS> "Path to a delimited item table")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .args(run_args()),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a solution against an item table")
                .arg(
                    arg!(<ITEMS> "Path to a delimited item table")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json or zlib file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--budget [BUDGET] "Overrides the budget from settings")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--settings [SETTINGS] "Settings json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generates a random item table")
                .arg(
                    arg!(<NUM_ITEMS> "Number of items")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for a reproducible table (random if unset)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"max-cost" [MAX_COST] "Largest item cost in whole units")
                        .default_value("1000")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--budget [BUDGET] "Budget the table is generated for")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the table will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn run_args() -> Vec<clap::Arg> {
    vec![
        arg!(--budget [BUDGET] "Overrides the budget from settings")
            .value_parser(clap::value_parser!(f64)),
        arg!(--settings [SETTINGS] "Settings json string or path to json file")
            .value_parser(clap::value_parser!(String)),
        arg!(--output [OUTPUT_FILE] "If set, results will be saved to this path (default json)")
            .value_parser(clap::value_parser!(PathBuf)),
        arg!(--compress [COMPRESS] "If output is set, results will be compressed as zlib (.zlib suffix)")
            .action(ArgAction::SetTrue),
    ]
}

fn main() {
    init_logging();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("ITEMS").cloned(),
            sub_m.get_one::<String>("algorithm").cloned(),
            RunArgs::from_matches(sub_m),
        ),
        Some(("compare", sub_m)) => compare_solvers(
            sub_m.get_one::<PathBuf>("ITEMS").cloned(),
            RunArgs::from_matches(sub_m),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<PathBuf>("ITEMS").cloned(),
            sub_m.get_one::<String>("SOLUTION").cloned(),
            sub_m.get_one::<String>("settings").cloned(),
            sub_m.get_one::<f64>("budget").copied(),
        ),
        Some(("generate", sub_m)) => generate(
            sub_m.get_one::<usize>("NUM_ITEMS").copied(),
            sub_m.get_one::<u64>("seed").copied(),
            sub_m.get_one::<u32>("max-cost").copied(),
            sub_m.get_one::<f64>("budget").copied(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr, filtered by `RUST_LOG`.
fn init_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info,warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .with(env_filter)
        .init();
}

struct RunArgs {
    settings: Option<String>,
    budget: Option<f64>,
    output: Option<PathBuf>,
    compress: bool,
}

impl RunArgs {
    fn from_matches(sub_m: &clap::ArgMatches) -> Self {
        Self {
            settings: sub_m.get_one::<String>("settings").cloned(),
            budget: sub_m.get_one::<f64>("budget").copied(),
            output: sub_m.get_one::<PathBuf>("output").cloned(),
            compress: sub_m.get_flag("compress"),
        }
    }
}

#[derive(Serialize)]
struct SolveOutput {
    stats: SolveStats,
    solution: Solution,
}

fn solve(
    items_path: Option<PathBuf>,
    algorithm: Option<String>,
    args: RunArgs,
) -> Result<()> {
    let items_path = items_path.ok_or_else(|| anyhow!("ITEMS is required"))?;
    let algorithm = algorithm.unwrap_or_else(|| "dynamic".to_string());
    let config = load_settings(args.settings.as_deref())?.with_budget(args.budget);
    let challenge = load_challenge(&items_path, &config)?;

    let mut solver =
        solver_by_name(&algorithm).ok_or_else(|| anyhow!("Unknown algorithm: {}", algorithm))?;
    let selection = run_solver(solver.as_mut(), &challenge, &config)?;
    let stats = solver
        .stats()
        .ok_or_else(|| anyhow!("{} produced no stats", solver.label()))?;

    println!("{}", selection);
    println!();
    println!("{}", stats);

    if let Some(path) = args.output {
        let path = output_path(&path, args.compress, Utc::now());
        let output = SolveOutput {
            stats,
            solution: selection.to_solution(),
        };
        write_output(&path, &output, args.compress)?;
        println!("results written to: {:?}", path);
    }
    Ok(())
}

fn compare_solvers(items_path: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let items_path = items_path.ok_or_else(|| anyhow!("ITEMS is required"))?;
    let config = load_settings(args.settings.as_deref())?.with_budget(args.budget);
    let challenge = load_challenge(&items_path, &config)?;

    let comparison = compare(&challenge, &config)?;
    let report = comparison
        .report
        .ok_or_else(|| anyhow!("comparison did not produce a report"))?;

    println!("Brute Force selection:");
    println!("{}", comparison.brute_force);
    println!();
    println!("Dynamic Programming selection:");
    println!("{}", comparison.dynamic_programming);
    println!();
    println!("{}", report);

    if let Some(path) = args.output {
        let now = Utc::now();
        let path = output_path(&path, args.compress, now);
        let record = ReportRecord::new(
            report,
            challenge.budget(),
            Some(items_path.display().to_string()),
            now,
        );
        write_output(&path, &record, args.compress)?;
        println!("results written to: {:?}", path);
    }
    Ok(())
}

fn verify_solution(
    items_path: Option<PathBuf>,
    solution: Option<String>,
    settings: Option<String>,
    budget: Option<f64>,
) -> Result<()> {
    let items_path = items_path.ok_or_else(|| anyhow!("ITEMS is required"))?;
    let solution = solution.ok_or_else(|| anyhow!("SOLUTION is required"))?;
    let config = load_settings(settings.as_deref())?.with_budget(budget);
    let challenge = load_challenge(&items_path, &config)?;
    let solution = load_solution(&solution)?;

    let selection = challenge
        .verify_solution(&solution)
        .map_err(|e| anyhow!("Invalid solution: {}", e))?;
    println!("{}", selection);
    println!();
    println!("Solution is valid");
    Ok(())
}

fn generate(
    num_items: Option<usize>,
    seed: Option<u64>,
    max_cost: Option<u32>,
    budget: Option<f64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let num_items = num_items.ok_or_else(|| anyhow!("NUM_ITEMS is required"))?;
    let seed_bytes = match seed {
        Some(seed) => {
            let mut bytes = [0u8; 32];
            bytes[..8].copy_from_slice(&seed.to_le_bytes());
            bytes
        }
        None => rand::random(),
    };
    let track = Track {
        num_items,
        budget: budget.unwrap_or(RunConfig::default().budget),
        max_cost: max_cost.unwrap_or(1000),
    };
    let challenge = Challenge::generate_instance(&seed_bytes, &track)?;

    let rows: Vec<Vec<String>> = challenge
        .items()
        .iter()
        .map(|item| {
            vec![
                item.name().to_string(),
                format!("{}", item.cost()),
                format!("{:.2}", item.profit_rate()),
            ]
        })
        .collect();
    let table = write_table(';', &["name", "price", "profit_rate"], &rows);

    match output {
        Some(path) => {
            fs::write(&path, table)?;
            info!("generated {} items into {}", num_items, path.display());
        }
        None => print!("{}", table),
    }
    Ok(())
}

fn load_challenge(items_path: &Path, config: &RunConfig) -> Result<Challenge> {
    let report = load_items(items_path)?;
    if !report.rejected.is_empty() {
        warn!(
            "{} of {} rows were rejected",
            report.rejected.len(),
            report.rejected.len() + report.items.len()
        );
    }
    Ok(Challenge::new(report.items, config.budget)?)
}
