use crate::core::catalog::ProjectSource;
use crate::core::project::{Project, ProjectInput};
use crate::core::validation::{
    messages, require_no_absent_elements, require_non_negative_count,
    require_non_negative_decimal, require_present, require_summable,
};
use crate::error::OptimizerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to maximize capital over a set of candidate projects.
///
/// Holds the materialized candidate list, the maximum number of projects
/// that may be selected, and the starting capital. A query can only be
/// built through validating constructors, so the optimizer never sees a
/// malformed one.
///
/// # Examples
///
/// ```
/// use capital_optimizer::core::project::Project;
/// use capital_optimizer::core::query::OptimizationQuery;
/// use rust_decimal_macros::dec;
///
/// let projects = vec![Project::new("A", dec!(0), dec!(1)).unwrap()];
/// let query = OptimizationQuery::new(projects, 2, dec!(0)).unwrap();
/// assert_eq!(query.max_projects(), 2);
///
/// assert!(OptimizationQuery::new(vec![], 1, dec!(-1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QueryRequest", into = "QueryRequest")]
pub struct OptimizationQuery {
    available_projects: Vec<Project>,
    max_projects: usize,
    initial_capital: Decimal,
}

impl OptimizationQuery {
    pub fn new(
        available_projects: Vec<Project>,
        max_projects: usize,
        initial_capital: Decimal,
    ) -> Result<Self, OptimizerError> {
        let initial_capital =
            require_non_negative_decimal(Some(initial_capital), messages::INITIAL_CAPITAL)?;
        require_summable(
            initial_capital,
            available_projects.iter().map(|p| p.profit()),
            messages::CAPITAL_RANGE,
        )?;
        Ok(Self {
            available_projects,
            max_projects,
            initial_capital,
        })
    }

    /// Build a query from any input producer. The source is fully
    /// materialized before the query exists.
    pub fn from_source<S: ProjectSource + ?Sized>(
        source: &S,
        max_projects: usize,
        initial_capital: Decimal,
    ) -> Result<Self, OptimizerError> {
        let projects = source.load_projects()?;
        Self::new(projects, max_projects, initial_capital)
    }

    pub fn available_projects(&self) -> &[Project] {
        &self.available_projects
    }

    pub fn max_projects(&self) -> usize {
        self.max_projects
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    /// Upper bound on the number of selection rounds that can pick a project.
    pub fn selection_bound(&self) -> usize {
        self.max_projects.min(self.available_projects.len())
    }
}

/// Unvalidated query as supplied by a caller (JSON, CLI flags, RPC payload).
///
/// Absent and negative values are representable here so that they can be
/// rejected with a stable message when converted into an [`OptimizationQuery`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(alias = "projects", alias = "availableProjects")]
    pub available_projects: Option<Vec<Option<ProjectInput>>>,
    #[serde(alias = "maxProjects")]
    pub max_projects: Option<i64>,
    #[serde(alias = "initialCapital")]
    pub initial_capital: Option<Decimal>,
}

impl TryFrom<QueryRequest> for OptimizationQuery {
    type Error = OptimizerError;

    fn try_from(request: QueryRequest) -> Result<Self, Self::Error> {
        let inputs =
            require_no_absent_elements(request.available_projects, messages::AVAILABLE_PROJECTS)?;
        let max_projects = require_non_negative_count(
            require_present(request.max_projects, messages::MAX_PROJECTS)?,
            messages::MAX_PROJECTS,
        )?;
        let initial_capital =
            require_non_negative_decimal(request.initial_capital, messages::INITIAL_CAPITAL)?;
        let available_projects = inputs
            .into_iter()
            .map(Project::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(available_projects, max_projects, initial_capital)
    }
}

impl From<&OptimizationQuery> for QueryRequest {
    fn from(query: &OptimizationQuery) -> Self {
        Self {
            available_projects: Some(
                query
                    .available_projects
                    .iter()
                    .map(|p| Some(ProjectInput::from(p)))
                    .collect(),
            ),
            // Limits past `i64::MAX` already exceed any catalog length.
            max_projects: Some(i64::try_from(query.max_projects).unwrap_or(i64::MAX)),
            initial_capital: Some(query.initial_capital),
        }
    }
}

impl From<OptimizationQuery> for QueryRequest {
    fn from(query: OptimizationQuery) -> Self {
        Self::from(&query)
    }
}
