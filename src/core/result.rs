use crate::core::project::Project;
use crate::core::validation::{messages, require_non_negative_decimal};
use crate::error::OptimizerError;
use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of a capital maximization run.
///
/// `selected_projects` is in the order the projects were chosen, which is
/// generally not the input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationResult {
    selected_projects: Vec<Project>,
    final_capital: Decimal,
}

impl OptimizationResult {
    pub fn new(
        selected_projects: Vec<Project>,
        final_capital: Decimal,
    ) -> Result<Self, OptimizerError> {
        let final_capital =
            require_non_negative_decimal(Some(final_capital), messages::FINAL_CAPITAL)?;
        Ok(Self {
            selected_projects,
            final_capital,
        })
    }

    /// The result of selecting nothing: capital is returned unchanged.
    pub(crate) fn unchanged(initial_capital: Decimal) -> Self {
        Self {
            selected_projects: Vec::new(),
            final_capital: initial_capital,
        }
    }

    pub(crate) fn from_selection(selected_projects: Vec<Project>, final_capital: Decimal) -> Self {
        Self {
            selected_projects,
            final_capital,
        }
    }

    pub fn selected_projects(&self) -> &[Project] {
        &self.selected_projects
    }

    pub fn final_capital(&self) -> Decimal {
        self.final_capital
    }

    pub fn selected_count(&self) -> usize {
        self.selected_projects.len()
    }

    /// Sum of the profits of every selected project.
    pub fn total_profit(&self) -> Decimal {
        self.selected_projects.iter().map(|p| p.profit()).sum()
    }

    /// Names of the selected projects, in selection order.
    pub fn selected_names(&self) -> Vec<&str> {
        self.selected_projects.iter().map(|p| p.name()).collect()
    }
}

impl std::fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Capital Maximization Result ===")?;
        writeln!(f, "Selected:       {}", self.selected_count())?;
        writeln!(f, "Total Profit:   {}", self.total_profit())?;
        writeln!(f, "Final Capital:  {}", self.final_capital)?;

        if !self.selected_projects.is_empty() {
            writeln!(f, "\nSelection Order:")?;
            for (i, project) in self.selected_projects.iter().enumerate() {
                writeln!(f, "  {:>3}. {}", i + 1, project)?;
            }
        }
        Ok(())
    }
}
