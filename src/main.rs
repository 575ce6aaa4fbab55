//! capital-optimizer CLI
//!
//! Run greedy capital maximization from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Optimize a catalog from a JSON file
//! capital-optimizer optimize --input projects.json
//!
//! # Override the file's limits and print JSON
//! capital-optimizer optimize --input projects.json --max-projects 5 --capital 1000 --format json
//!
//! # Generate a random catalog for testing
//! capital-optimizer generate --projects 200 --output projects.json
//! ```

use capital_optimizer::config::OptimizerConfig;
use capital_optimizer::core::project::ProjectInput;
use capital_optimizer::core::query::{OptimizationQuery, QueryRequest};
use capital_optimizer::core::validation::{messages, require_non_negative_count};
use capital_optimizer::optimization::analysis::CapitalAnalysis;
use capital_optimizer::runtime::pool::OptimizerPool;
use capital_optimizer::simulation::catalog_gen::{generate_random_catalog, CatalogConfig};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::fs;
use std::process;
use std::time::Duration;

fn print_usage() {
    eprintln!(
        r#"capital-optimizer — greedy capital maximization over candidate projects

USAGE:
    capital-optimizer <COMMAND> [OPTIONS]

COMMANDS:
    optimize    Select projects to maximize final capital
    generate    Generate a random project catalog (for testing)
    help        Show this message

OPTIONS (optimize):
    --input <FILE>          Path to JSON catalog file
    --max-projects <N>      Maximum number of projects to select (overrides file)
    --capital <AMOUNT>      Initial capital (overrides file)
    --format <FORMAT>       Output format: text (default) or json
    --config <FILE>         JSON worker pool settings
    --workers <N>           Worker threads (overrides config and environment)
    --timeout-ms <MS>       Give up and cancel after MS milliseconds

OPTIONS (generate):
    --projects <N>          Number of projects (default: 100)
    --max-capital <AMOUNT>  Largest required capital (default: 1000000)
    --max-profit <AMOUNT>   Largest profit (default: 100000)
    --max-selections <N>    max_projects written to the file (default: 10)
    --capital <AMOUNT>      initial_capital written to the file (default: 0)
    --output <FILE>         Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG                    Log verbosity (e.g. info, debug)
    CAPITAL_OPTIMIZER_WORKERS   Worker threads

EXAMPLES:
    capital-optimizer optimize --input projects.json
    capital-optimizer optimize --input projects.json --max-projects 3 --capital 0 --format json
    capital-optimizer generate --projects 50 --max-selections 5 --output projects.json"#
    );
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Value following a flag, or exit with a usage hint.
fn flag_value(args: &[String], i: &mut usize, hint: &str) -> String {
    *i += 1;
    args.get(*i).cloned().unwrap_or_else(|| fail(hint))
}

fn parse_or_exit<T: std::str::FromStr>(value: &str, what: &str) -> T
where
    T::Err: Display,
{
    value
        .parse()
        .unwrap_or_else(|e| fail(format!("invalid {} '{}': {}", what, value, e)))
}

/// Parse a selection limit, rejecting negative values up front.
fn parse_selection_limit(value: &str) -> Result<i64, String> {
    let limit: i64 = value
        .parse()
        .map_err(|e| format!("invalid selection limit '{}': {}", value, e))?;
    require_non_negative_count(limit, messages::MAX_PROJECTS).map_err(|e| e.to_string())?;
    Ok(limit)
}

#[derive(serde::Serialize)]
struct SelectedOutput {
    order: usize,
    name: String,
    required_capital: String,
    profit: String,
}

#[derive(serde::Serialize)]
struct OptimizeOutput {
    selected: Vec<SelectedOutput>,
    initial_capital: String,
    final_capital: String,
    total_profit: String,
}

fn load_request(path: &str) -> QueryRequest {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read file '{}': {}", path, e)));

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "projects": [
    {{ "name": "Solar Farm", "required_capital": "0", "profit": "1500" }}
  ],
  "max_projects": 3,
  "initial_capital": "0"
}}"#
        );
        process::exit(1);
    })
}

fn cmd_optimize(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut max_projects: Option<i64> = None;
    let mut capital: Option<Decimal> = None;
    let mut config_path: Option<String> = None;
    let mut workers: Option<usize> = None;
    let mut timeout: Option<Duration> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                input_path = Some(flag_value(args, &mut i, "--input requires a file path"));
            }
            "--format" => {
                format = flag_value(args, &mut i, "--format requires 'text' or 'json'");
            }
            "--max-projects" => {
                let v = flag_value(args, &mut i, "--max-projects requires a number");
                max_projects = Some(parse_selection_limit(&v).unwrap_or_else(|e| fail(e)));
            }
            "--capital" => {
                let v = flag_value(args, &mut i, "--capital requires an amount");
                capital = Some(parse_or_exit(&v, "capital"));
            }
            "--config" => {
                config_path = Some(flag_value(args, &mut i, "--config requires a file path"));
            }
            "--workers" => {
                let v = flag_value(args, &mut i, "--workers requires a number");
                workers = Some(parse_or_exit(&v, "worker count"));
            }
            "--timeout-ms" => {
                let v = flag_value(args, &mut i, "--timeout-ms requires a number");
                timeout = Some(Duration::from_millis(parse_or_exit(&v, "timeout")));
            }
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    if format != "text" && format != "json" {
        fail(format!("unknown format '{}', expected text or json", format));
    }

    let mut request = load_request(&path);
    if max_projects.is_some() {
        request.max_projects = max_projects;
    }
    if capital.is_some() {
        request.initial_capital = capital;
    }
    let query = OptimizationQuery::try_from(request).unwrap_or_else(|e| fail(e));

    let mut config = match config_path {
        Some(p) => OptimizerConfig::from_json_file(&p),
        None => Ok(OptimizerConfig::default()),
    }
    .and_then(OptimizerConfig::with_env_overrides)
    .unwrap_or_else(|e| fail(e));
    if let Some(n) = workers {
        config.worker_threads = n;
    }

    let pool = OptimizerPool::new(&config).unwrap_or_else(|e| fail(e));
    let pending = pool.submit(Some(query.clone())).unwrap_or_else(|e| fail(e));
    let outcome = match timeout {
        Some(t) => pending.wait_timeout(t),
        None => pending.wait(),
    };
    let result = outcome.unwrap_or_else(|e| fail(e));

    if format == "json" {
        let output = OptimizeOutput {
            selected: result
                .selected_projects()
                .iter()
                .enumerate()
                .map(|(i, p)| SelectedOutput {
                    order: i + 1,
                    name: p.name().to_string(),
                    required_capital: p.required_capital().to_string(),
                    profit: p.profit().to_string(),
                })
                .collect(),
            initial_capital: query.initial_capital().to_string(),
            final_capital: result.final_capital().to_string(),
            total_profit: result.total_profit().to_string(),
        };
        let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));
        println!("{}", json);
    } else {
        println!("{}", result);

        let analysis = CapitalAnalysis::from_result(&query, &result);
        println!("{}", analysis);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = CatalogConfig::default();
    let mut max_selections = 10i64;
    let mut initial_capital = Decimal::ZERO;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--projects" => {
                let v = flag_value(args, &mut i, "--projects requires a number");
                config.project_count = parse_or_exit(&v, "project count");
            }
            "--max-capital" => {
                let v = flag_value(args, &mut i, "--max-capital requires an amount");
                config.max_required_capital = parse_or_exit(&v, "max capital");
            }
            "--max-profit" => {
                let v = flag_value(args, &mut i, "--max-profit requires an amount");
                config.max_profit = parse_or_exit(&v, "max profit");
            }
            "--max-selections" => {
                let v = flag_value(args, &mut i, "--max-selections requires a number");
                max_selections = parse_selection_limit(&v).unwrap_or_else(|e| fail(e));
            }
            "--capital" => {
                let v = flag_value(args, &mut i, "--capital requires an amount");
                initial_capital = parse_or_exit(&v, "capital");
            }
            "--output" => {
                output_path = Some(flag_value(args, &mut i, "--output requires a file path"));
            }
            _ => fail(format!("unknown option: {}", args[i])),
        }
        i += 1;
    }

    let projects = generate_random_catalog(&config).unwrap_or_else(|e| fail(e));
    let request = QueryRequest {
        available_projects: Some(projects.iter().map(|p| Some(ProjectInput::from(p))).collect()),
        max_projects: Some(max_selections),
        initial_capital: Some(initial_capital),
    };

    let json = serde_json::to_string_pretty(&request).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("cannot write to '{}': {}", path, e)));
        eprintln!("Generated {} projects → {}", projects.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "optimize" => cmd_optimize(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
