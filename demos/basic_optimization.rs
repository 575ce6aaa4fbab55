//! Basic capital maximization example.
//!
//! Shows how greedy selection compounds capital: each finished project
//! unlocks projects that were out of reach at the start.

use capital_optimizer::core::catalog::ProjectCatalog;
use capital_optimizer::core::project::Project;
use capital_optimizer::core::query::OptimizationQuery;
use capital_optimizer::optimization::analysis::CapitalAnalysis;
use capital_optimizer::optimization::capital::{
    CapitalOptimizer, SelectionEvent, SelectionObserver,
};
use rust_decimal_macros::dec;

/// Prints every round as it happens.
struct Narrator;

impl SelectionObserver for Narrator {
    fn on_event(&mut self, event: &SelectionEvent<'_>) {
        match event {
            SelectionEvent::RoundStarted { round, capital } => {
                println!("Round {}: capital ${}", round + 1, capital);
            }
            SelectionEvent::ProjectAdmitted { project, .. } => {
                println!("    now affordable: {}", project);
            }
            SelectionEvent::ProjectSelected { project, capital, .. } => {
                println!("  → selected {} (capital now ${})", project.name(), capital);
            }
            SelectionEvent::Exhausted { capital, .. } => {
                println!("  nothing affordable left at ${}", capital);
            }
        }
    }
}

fn main() {
    println!("╔════════════════════════════════════════════════╗");
    println!("║  capital-optimizer: Basic Optimization Example ║");
    println!("╚════════════════════════════════════════════════╝\n");

    // --- Scenario 1: Small catalog ---
    println!("━━━ Scenario 1: Three projects, two rounds ━━━\n");

    let query = OptimizationQuery::new(
        vec![
            Project::new("Project A", dec!(0), dec!(1)).unwrap(),
            Project::new("Project B", dec!(1), dec!(2)).unwrap(),
            Project::new("Project C", dec!(1), dec!(3)).unwrap(),
        ],
        2,
        dec!(0),
    )
    .unwrap();

    let result = CapitalOptimizer::maximize_observed(&query, &mut Narrator);
    println!();
    println!("{}", result);

    // --- Scenario 2: Growing a business from a catalog ---
    println!("━━━ Scenario 2: Venture portfolio (catalog-backed) ━━━\n");

    let mut catalog = ProjectCatalog::new();
    catalog
        .add_all(vec![
            Project::new("Lemonade Stand", dec!(0), dec!(150)).unwrap(),
            Project::new("Bike Repair", dec!(100), dec!(400)).unwrap(),
            Project::new("Print Shop", dec!(500), dec!(1_200)).unwrap(),
            Project::new("Coffee Cart", dec!(600), dec!(900)).unwrap(),
            Project::new("Café", dec!(2_000), dec!(5_500)).unwrap(),
            Project::new("Roastery", dec!(10_000), dec!(25_000)).unwrap(),
        ])
        .unwrap();

    for record in catalog.records() {
        println!("  [{}] {}", record.id(), record.project());
    }
    println!();

    let query = OptimizationQuery::from_source(&catalog, 4, dec!(50)).unwrap();
    let result = CapitalOptimizer::maximize_observed(&query, &mut Narrator);
    println!();
    println!("{}", result);

    let analysis = CapitalAnalysis::from_result(&query, &result);
    println!("{}", analysis);
}
