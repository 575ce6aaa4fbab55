//! # capital-optimizer
//!
//! Greedy capital maximization over a catalog of candidate projects.
//!
//! Given projects that each need some starting capital and return a profit,
//! a starting capital, and a cap on how many projects may be undertaken, the
//! optimizer picks projects one at a time, always the most profitable one
//! that is currently affordable, to maximize final capital.
//!
//! ## Architecture
//!
//! - **core** — Value types: projects, queries, results, catalog records, validation
//! - **optimization** — The greedy selection algorithm and post-run analysis
//! - **runtime** — Dedicated worker pool with cancellation and timeouts
//! - **simulation** — Random catalog generation for stress tests and benchmarks
//! - **config** — Worker pool settings

pub mod config;
pub mod core;
pub mod error;
pub mod optimization;
pub mod runtime;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::OptimizerConfig;
    pub use crate::core::catalog::{ProjectCatalog, ProjectRecord, ProjectSource};
    pub use crate::core::project::Project;
    pub use crate::core::query::{OptimizationQuery, QueryRequest};
    pub use crate::core::result::OptimizationResult;
    pub use crate::error::OptimizerError;
    pub use crate::optimization::analysis::CapitalAnalysis;
    pub use crate::optimization::capital::{
        CancellationFlag, CapitalOptimizer, SelectionEvent, SelectionObserver,
    };
    pub use crate::runtime::pool::{OptimizerPool, PendingOptimization};
}
