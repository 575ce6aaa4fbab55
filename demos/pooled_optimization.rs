//! Worker pool example: batch runs, timeouts and cancellation.
//!
//! Generates a large random catalog and optimizes it for several
//! selection limits on a dedicated thread pool.

use capital_optimizer::config::OptimizerConfig;
use capital_optimizer::core::query::OptimizationQuery;
use capital_optimizer::error::OptimizerError;
use capital_optimizer::optimization::analysis::CapitalAnalysis;
use capital_optimizer::runtime::pool::OptimizerPool;
use capital_optimizer::simulation::catalog_gen::{generate_random_catalog, CatalogConfig};
use rust_decimal_macros::dec;
use std::time::{Duration, Instant};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("╔════════════════════════════════════════════════╗");
    println!("║  capital-optimizer: Pooled Optimization Demo   ║");
    println!("╚════════════════════════════════════════════════╝\n");

    let config = OptimizerConfig {
        log_rounds: false,
        ..Default::default()
    }
    .with_env_overrides()
    .unwrap();
    let pool = OptimizerPool::new(&config).unwrap();
    println!("Worker threads: {}\n", pool.worker_threads());

    let catalog = generate_random_catalog(&CatalogConfig {
        project_count: 20_000,
        free_start_ratio: 0.02,
        ..Default::default()
    })
    .unwrap();
    println!("Generated {} random projects\n", catalog.len());

    // --- Scenario 1: One catalog, several selection limits ---
    println!("━━━ Scenario 1: Batch over selection limits ━━━\n");

    let limits = [1usize, 10, 100, 1_000, 10_000];
    let queries: Vec<OptimizationQuery> = limits
        .iter()
        .map(|&k| OptimizationQuery::new(catalog.clone(), k, dec!(5_000)).unwrap())
        .collect();

    let start = Instant::now();
    let results = pool.run_batch(&queries);
    println!("Batch finished in {:?}\n", start.elapsed());

    println!("{:>8} {:>10} {:>22}", "limit", "selected", "final capital");
    for (query, result) in queries.iter().zip(&results) {
        println!(
            "{:>8} {:>10} {:>22}",
            query.max_projects(),
            result.selected_count(),
            result.final_capital()
        );
    }
    println!();

    if let (Some(query), Some(result)) = (queries.last(), results.last()) {
        println!("{}", CapitalAnalysis::from_result(query, result));
    }

    // --- Scenario 2: Deadline ---
    println!("━━━ Scenario 2: Run with a deadline ━━━\n");

    let query = OptimizationQuery::new(catalog.clone(), catalog.len(), dec!(5_000)).unwrap();
    let pending = pool.submit(Some(query)).unwrap();
    match pending.wait_timeout(Duration::from_secs(5)) {
        Ok(result) => println!(
            "Finished within deadline: {} projects, final capital ${}\n",
            result.selected_count(),
            result.final_capital()
        ),
        Err(OptimizerError::TimedOut) => println!("Deadline passed; run cancelled\n"),
        Err(e) => println!("Run failed: {}\n", e),
    }

    // --- Scenario 3: Explicit cancellation ---
    println!("━━━ Scenario 3: Cancel before completion ━━━\n");

    let query = OptimizationQuery::new(catalog, 20_000, dec!(5_000)).unwrap();
    let pending = pool.submit(Some(query)).unwrap();
    pending.cancel();
    match pending.wait() {
        Ok(result) => println!(
            "Run finished before the cancel landed: {} projects",
            result.selected_count()
        ),
        Err(OptimizerError::Cancelled { completed_rounds }) => {
            println!("Cancelled after {} completed rounds", completed_rounds)
        }
        Err(e) => println!("Run failed: {}", e),
    }
}
