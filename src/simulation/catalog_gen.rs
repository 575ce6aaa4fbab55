//! Random project catalogs for stress testing and benchmarks.
//!
//! Generated catalogs mix cheap starter projects with expensive ones so that
//! runs exercise both the admission cursor and the profit heap.

use crate::core::project::Project;
use crate::error::OptimizerError;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random project catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Number of projects to generate.
    pub project_count: usize,
    /// Upper bound for required capital (inclusive lower bound is zero).
    pub max_required_capital: Decimal,
    /// Upper bound for profit.
    pub max_profit: Decimal,
    /// Share of projects that need no starting capital, in `[0, 1]`.
    pub free_start_ratio: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            project_count: 100,
            max_required_capital: Decimal::from(1_000_000),
            max_profit: Decimal::from(100_000),
            free_start_ratio: 0.05,
        }
    }
}

fn random_amount<R: Rng>(rng: &mut R, max: Decimal) -> Decimal {
    let max_cents: i64 = max
        .max(Decimal::ZERO)
        .checked_mul(Decimal::from(100))
        .and_then(|cents| cents.trunc().try_into().ok())
        .unwrap_or(i64::MAX);
    Decimal::new(rng.gen_range(0..=max_cents), 2)
}

/// Generate a random catalog of valid projects named `PROJECT-0000`, `PROJECT-0001`, ...
///
/// The catalog always holds exactly `project_count` projects; a project that
/// fails validation aborts generation with its error.
pub fn generate_random_catalog(config: &CatalogConfig) -> Result<Vec<Project>, OptimizerError> {
    let mut rng = rand::thread_rng();
    generate_with_rng(config, &mut rng)
}

/// Generate a catalog from a caller-supplied RNG (seeded runs are reproducible).
pub fn generate_with_rng<R: Rng>(
    config: &CatalogConfig,
    rng: &mut R,
) -> Result<Vec<Project>, OptimizerError> {
    let free_ratio = if config.free_start_ratio.is_nan() {
        0.0
    } else {
        config.free_start_ratio.clamp(0.0, 1.0)
    };

    (0..config.project_count)
        .map(|i| {
            let required_capital = if rng.gen_bool(free_ratio) {
                Decimal::ZERO
            } else {
                random_amount(rng, config.max_required_capital)
            };
            let profit = random_amount(rng, config.max_profit);
            Project::new(format!("PROJECT-{:04}", i), required_capital, profit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::OptimizationQuery;
    use crate::optimization::capital::CapitalOptimizer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_catalog_generation() {
        let config = CatalogConfig {
            project_count: 50,
            ..Default::default()
        };

        let projects = generate_random_catalog(&config).unwrap();
        assert_eq!(projects.len(), 50);
        for p in &projects {
            assert!(p.required_capital() <= config.max_required_capital);
            assert!(p.profit() <= config.max_profit);
            assert!(p.profit() >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = CatalogConfig::default();
        let a = generate_with_rng(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_with_rng(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_free_catalog_is_fully_selectable() {
        let config = CatalogConfig {
            project_count: 20,
            free_start_ratio: 1.0,
            ..Default::default()
        };
        let projects = generate_random_catalog(&config).unwrap();
        let query = OptimizationQuery::new(projects, 20, Decimal::ZERO).unwrap();
        let result = CapitalOptimizer::maximize(&query);
        assert_eq!(result.selected_count(), 20);
    }

    #[test]
    fn test_degenerate_bounds_keep_full_count() {
        let config = CatalogConfig {
            project_count: 64,
            max_required_capital: Decimal::NEGATIVE_ONE,
            max_profit: Decimal::MAX,
            free_start_ratio: f64::NAN,
        };
        let projects = generate_with_rng(&config, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(projects.len(), 64);
        assert!(projects.iter().all(|p| p.required_capital() == Decimal::ZERO));
        assert_eq!(projects[63].name(), "PROJECT-0063");
    }
}
