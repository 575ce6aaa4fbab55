use crate::core::query::OptimizationQuery;
use crate::core::result::OptimizationResult;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Summary of how much a run grew the starting capital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalAnalysis {
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    /// Capital gained across every selected project.
    pub total_profit: Decimal,
    pub selected_count: usize,
    pub candidate_count: usize,
    /// Candidates never undertaken, whether unaffordable or crowded out.
    pub unselected_count: usize,
    pub max_projects: usize,
}

impl CapitalAnalysis {
    pub fn from_result(query: &OptimizationQuery, result: &OptimizationResult) -> Self {
        let candidate_count = query.available_projects().len();
        let selected_count = result.selected_count();
        CapitalAnalysis {
            initial_capital: query.initial_capital(),
            final_capital: result.final_capital(),
            total_profit: result.final_capital() - query.initial_capital(),
            selected_count,
            candidate_count,
            unselected_count: candidate_count.saturating_sub(selected_count),
            max_projects: query.max_projects(),
        }
    }

    /// Fraction of the allowed selections actually used.
    pub fn round_utilisation(&self) -> f64 {
        if self.max_projects == 0 {
            return 0.0;
        }
        self.selected_count as f64 / self.max_projects as f64
    }

    /// Profit relative to the starting capital; `None` when starting from zero.
    pub fn growth_ratio(&self) -> Option<Decimal> {
        if self.initial_capital == Decimal::ZERO {
            return None;
        }
        self.total_profit.checked_div(self.initial_capital)
    }

    /// Growth ratio as a percentage, for display.
    pub fn growth_percent(&self) -> Option<f64> {
        self.growth_ratio()
            .and_then(|r| (r * Decimal::from(100)).to_f64())
    }
}

impl std::fmt::Display for CapitalAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Capital Analysis ===")?;
        writeln!(f, "Initial Capital:  {}", self.initial_capital)?;
        writeln!(f, "Final Capital:    {}", self.final_capital)?;
        writeln!(f, "Total Profit:     {}", self.total_profit)?;
        match self.growth_percent() {
            Some(pct) => writeln!(f, "Growth:           {:.1}%", pct)?,
            None => writeln!(f, "Growth:           n/a (zero initial capital)")?,
        }
        writeln!(
            f,
            "Selections:       {} of {} allowed ({:.1}%)",
            self.selected_count,
            self.max_projects,
            self.round_utilisation() * 100.0
        )?;
        writeln!(
            f,
            "Candidates:       {} ({} not undertaken)",
            self.candidate_count, self.unselected_count
        )?;
        Ok(())
    }
}
