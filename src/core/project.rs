use crate::core::validation::{
    messages, require_non_blank, require_non_negative_decimal,
};
use crate::error::OptimizerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate project: the capital needed to start it and the profit it yields.
///
/// Projects are immutable once created and carry no identity beyond their
/// fields. Every constructor validates, so a `Project` value always has a
/// non-blank name and non-negative amounts.
///
/// # Examples
///
/// ```
/// use capital_optimizer::core::project::Project;
/// use rust_decimal_macros::dec;
///
/// let project = Project::new("Solar Farm", dec!(250_000), dec!(40_000)).unwrap();
/// assert_eq!(project.required_capital(), dec!(250_000));
///
/// assert!(Project::new("  ", dec!(1), dec!(1)).is_err());
/// assert!(Project::new("Refit", dec!(-1), dec!(1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProjectInput")]
pub struct Project {
    name: String,
    required_capital: Decimal,
    profit: Decimal,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        required_capital: Decimal,
        profit: Decimal,
    ) -> Result<Self, OptimizerError> {
        Self::try_from(ProjectInput {
            name: Some(name.into()),
            required_capital: Some(required_capital),
            profit: Some(profit),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_capital(&self) -> Decimal {
        self.required_capital
    }

    pub fn profit(&self) -> Decimal {
        self.profit
    }

    /// True when `capital` is enough to start this project.
    pub fn is_affordable(&self, capital: Decimal) -> bool {
        self.required_capital <= capital
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (capital: {}, profit: {})",
            self.name, self.required_capital, self.profit
        )
    }
}

/// Unvalidated project as it arrives from JSON or another producer.
///
/// Fields are optional so that missing values surface as
/// [`OptimizerError::InvalidInput`] instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: Option<String>,
    #[serde(alias = "requiredCapital")]
    pub required_capital: Option<Decimal>,
    pub profit: Option<Decimal>,
}

impl TryFrom<ProjectInput> for Project {
    type Error = OptimizerError;

    fn try_from(input: ProjectInput) -> Result<Self, Self::Error> {
        let name = require_non_blank(input.name, messages::PROJECT_NAME)?;
        let required_capital =
            require_non_negative_decimal(input.required_capital, messages::REQUIRED_CAPITAL)?;
        let profit = require_non_negative_decimal(input.profit, messages::PROFIT)?;
        Ok(Self {
            name,
            required_capital,
            profit,
        })
    }
}

impl From<&Project> for ProjectInput {
    fn from(project: &Project) -> Self {
        Self {
            name: Some(project.name.clone()),
            required_capital: Some(project.required_capital),
            profit: Some(project.profit),
        }
    }
}
