use crate::core::project::Project;
use crate::core::query::OptimizationQuery;
use crate::core::result::OptimizationResult;
use crate::core::validation::messages;
use crate::error::OptimizerError;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::convert::Infallible;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;

/// Shared flag used to stop a run between selection rounds.
///
/// Clones observe the same flag, so one clone can be handed to the worker
/// running the optimization while the caller keeps another.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, atomic::Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(atomic::Ordering::Acquire)
    }
}

/// Checked before every selection round; an error ends the run.
trait RoundGuard {
    type Error;

    fn check(&self, completed_rounds: usize) -> Result<(), Self::Error>;
}

struct Unguarded;

impl RoundGuard for Unguarded {
    type Error = Infallible;

    fn check(&self, _completed_rounds: usize) -> Result<(), Infallible> {
        Ok(())
    }
}

impl RoundGuard for CancellationFlag {
    type Error = OptimizerError;

    fn check(&self, completed_rounds: usize) -> Result<(), OptimizerError> {
        if self.is_cancelled() {
            log::warn!(
                "Capital maximization cancelled after {} rounds",
                completed_rounds
            );
            return Err(OptimizerError::Cancelled { completed_rounds });
        }
        Ok(())
    }
}

/// Diagnostic record emitted at selection-round boundaries.
///
/// Events are informational only; observers cannot influence the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent<'a> {
    RoundStarted {
        round: usize,
        capital: Decimal,
    },
    ProjectAdmitted {
        round: usize,
        project: &'a Project,
    },
    ProjectSelected {
        round: usize,
        project: &'a Project,
        capital: Decimal,
    },
    /// Nothing affordable is left; the run ends early.
    Exhausted {
        round: usize,
        capital: Decimal,
    },
}

pub trait SelectionObserver {
    fn on_event(&mut self, event: &SelectionEvent<'_>);
}

/// Forwards selection events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SelectionObserver for LogObserver {
    fn on_event(&mut self, event: &SelectionEvent<'_>) {
        match event {
            SelectionEvent::RoundStarted { round, capital } => {
                log::debug!("Round {}: current capital {}", round, capital);
            }
            SelectionEvent::ProjectAdmitted { round, project } => {
                log::debug!(
                    "Round {}: project {} (profit: {}) is affordable",
                    round,
                    project.name(),
                    project.profit()
                );
            }
            SelectionEvent::ProjectSelected {
                round,
                project,
                capital,
            } => {
                log::info!(
                    "Round {}: selected project {}, capital now {}",
                    round,
                    project.name(),
                    capital
                );
            }
            SelectionEvent::Exhausted { round, capital } => {
                log::info!(
                    "Round {}: no further projects affordable with capital {}",
                    round,
                    capital
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {
    fn on_event(&mut self, _event: &SelectionEvent<'_>) {}
}

/// Heap entry: an affordable project identified by its input position.
///
/// Orders by profit, then by earlier input position, so the max-heap pops
/// the most profitable project and resolves equal profits to the one listed
/// first by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    profit: Decimal,
    position: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.profit
            .cmp(&other.profit)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Greedy capital maximization.
///
/// Repeatedly admits every project whose required capital is covered by the
/// current capital, then undertakes the admitted project with the highest
/// profit. Because profits are non-negative, capital never shrinks and an
/// admitted project stays affordable for the rest of the run, which makes the
/// local choice globally optimal.
pub struct CapitalOptimizer;

impl CapitalOptimizer {
    /// Run the optimization with logging through [`LogObserver`].
    ///
    /// # Algorithm
    ///
    /// 1. Stable-sort the candidates ascending by required capital.
    /// 2. Each round, advance a cursor over the sorted candidates, pushing
    ///    every affordable one onto a max-heap keyed by profit.
    /// 3. Stop if the heap is empty; otherwise pop the top project and add
    ///    its profit to the current capital.
    /// 4. Repeat for at most `max_projects` rounds.
    ///
    /// Runs in O(n log n) for n candidates.
    ///
    /// # Examples
    ///
    /// ```
    /// use capital_optimizer::prelude::*;
    /// use rust_decimal_macros::dec;
    ///
    /// let projects = vec![
    ///     Project::new("A", dec!(0), dec!(1)).unwrap(),
    ///     Project::new("B", dec!(1), dec!(2)).unwrap(),
    ///     Project::new("C", dec!(1), dec!(3)).unwrap(),
    /// ];
    /// let query = OptimizationQuery::new(projects, 2, dec!(0)).unwrap();
    ///
    /// let result = CapitalOptimizer::maximize(&query);
    /// assert_eq!(result.selected_names(), vec!["A", "C"]);
    /// assert_eq!(result.final_capital(), dec!(4));
    /// ```
    pub fn maximize(query: &OptimizationQuery) -> OptimizationResult {
        Self::maximize_observed(query, &mut LogObserver)
    }

    /// Run the optimization, reporting progress to `observer`.
    pub fn maximize_observed<O>(query: &OptimizationQuery, observer: &mut O) -> OptimizationResult
    where
        O: SelectionObserver + ?Sized,
    {
        match Self::select(query, observer, &Unguarded) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Run the optimization, checking `cancel` once before every round.
    pub fn maximize_with<O>(
        query: &OptimizationQuery,
        observer: &mut O,
        cancel: Option<&CancellationFlag>,
    ) -> Result<OptimizationResult, OptimizerError>
    where
        O: SelectionObserver + ?Sized,
    {
        match cancel {
            Some(flag) => Self::select(query, observer, flag),
            None => Ok(Self::maximize_observed(query, observer)),
        }
    }

    /// Entry point for callers holding a possibly absent query.
    pub fn maximize_capital(
        query: Option<&OptimizationQuery>,
    ) -> Result<OptimizationResult, OptimizerError> {
        let query = query.ok_or_else(|| {
            log::error!("Received null capital maximization query");
            OptimizerError::invalid_input(messages::NULL_QUERY)
        })?;

        log::info!(
            "Starting capital maximization with initial capital: {}",
            query.initial_capital()
        );
        let result = Self::maximize(query);
        log::info!(
            "Capital maximization complete. Final capital: {}",
            result.final_capital()
        );
        Ok(result)
    }

    fn select<O, G>(
        query: &OptimizationQuery,
        observer: &mut O,
        guard: &G,
    ) -> Result<OptimizationResult, G::Error>
    where
        O: SelectionObserver + ?Sized,
        G: RoundGuard,
    {
        let projects = query.available_projects();
        if query.max_projects() == 0 || projects.is_empty() {
            return Ok(OptimizationResult::unchanged(query.initial_capital()));
        }
        log::debug!("Number of available projects: {}", projects.len());

        // `sort_by_key` is stable, so equal capitals keep their input order.
        let mut by_capital: Vec<usize> = (0..projects.len()).collect();
        by_capital.sort_by_key(|&i| projects[i].required_capital());

        let mut affordable: BinaryHeap<Candidate> = BinaryHeap::new();
        let mut selected = Vec::with_capacity(query.selection_bound());
        let mut capital = query.initial_capital();
        let mut cursor = 0;

        for round in 0..query.max_projects() {
            guard.check(round)?;
            observer.on_event(&SelectionEvent::RoundStarted { round, capital });

            while let Some(&position) = by_capital.get(cursor) {
                let project = &projects[position];
                if !project.is_affordable(capital) {
                    break;
                }
                affordable.push(Candidate {
                    profit: project.profit(),
                    position,
                });
                observer.on_event(&SelectionEvent::ProjectAdmitted { round, project });
                cursor += 1;
            }

            let Some(chosen) = affordable.pop() else {
                observer.on_event(&SelectionEvent::Exhausted { round, capital });
                break;
            };

            let project = &projects[chosen.position];
            // Exact: the query guarantees initial capital plus all profits
            // is representable without rounding.
            capital += project.profit();
            selected.push(project.clone());
            observer.on_event(&SelectionEvent::ProjectSelected {
                round,
                project,
                capital,
            });
        }

        Ok(OptimizationResult::from_selection(selected, capital))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn project(name: &str, capital: Decimal, profit: Decimal) -> Project {
        Project::new(name, capital, profit).unwrap()
    }

    fn query(projects: Vec<Project>, k: usize, w: Decimal) -> OptimizationQuery {
        OptimizationQuery::new(projects, k, w).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        admitted: Vec<(usize, String)>,
        selected: Vec<(usize, String, Decimal)>,
        rounds: usize,
        exhausted_at: Option<usize>,
    }

    impl SelectionObserver for Recorder {
        fn on_event(&mut self, event: &SelectionEvent<'_>) {
            match event {
                SelectionEvent::RoundStarted { .. } => self.rounds += 1,
                SelectionEvent::ProjectAdmitted { round, project } => {
                    self.admitted.push((*round, project.name().to_string()))
                }
                SelectionEvent::ProjectSelected {
                    round,
                    project,
                    capital,
                } => self
                    .selected
                    .push((*round, project.name().to_string(), *capital)),
                SelectionEvent::Exhausted { round, .. } => self.exhausted_at = Some(*round),
            }
        }
    }

    #[test]
    fn test_greedy_selection() {
        let q = query(
            vec![
                project("Project A", dec!(0), dec!(1)),
                project("Project B", dec!(1), dec!(2)),
                project("Project C", dec!(1), dec!(3)),
            ],
            2,
            dec!(0),
        );
        let result = CapitalOptimizer::maximize(&q);
        assert_eq!(result.selected_names(), vec!["Project A", "Project C"]);
        assert_eq!(result.final_capital(), dec!(4));
    }

    #[test]
    fn test_nothing_affordable() {
        let q = query(
            vec![
                project("Project X", dec!(10), dec!(5)),
                project("Project Y", dec!(20), dec!(10)),
            ],
            3,
            dec!(0),
        );
        let result = CapitalOptimizer::maximize(&q);
        assert!(result.selected_projects().is_empty());
        assert_eq!(result.final_capital(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_max_projects() {
        let q = query(vec![project("A", dec!(0), dec!(100))], 0, dec!(7));
        let result = CapitalOptimizer::maximize(&q);
        assert!(result.selected_projects().is_empty());
        assert_eq!(result.final_capital(), dec!(7));
    }

    #[test]
    fn test_empty_catalog() {
        let q = query(vec![], 5, dec!(3.5));
        let result = CapitalOptimizer::maximize(&q);
        assert!(result.selected_projects().is_empty());
        assert_eq!(result.final_capital(), dec!(3.5));
    }

    #[test]
    fn test_all_projects_taken_when_limit_is_large() {
        let q = query(
            vec![
                project("A", dec!(0), dec!(1)),
                project("B", dec!(1), dec!(1)),
                project("C", dec!(2), dec!(1)),
            ],
            usize::MAX,
            dec!(0),
        );
        let result = CapitalOptimizer::maximize(&q);
        assert_eq!(result.selected_names(), vec!["A", "B", "C"]);
        assert_eq!(result.final_capital(), dec!(3));
    }

    #[test]
    fn test_profit_ties_prefer_input_order() {
        let q = query(
            vec![
                project("Late", dec!(5), dec!(10)),
                project("First", dec!(0), dec!(10)),
                project("Second", dec!(0), dec!(10)),
            ],
            3,
            dec!(5),
        );
        let result = CapitalOptimizer::maximize(&q);
        // All three are affordable in round 0 and tie on profit.
        assert_eq!(result.selected_names(), vec!["Late", "First", "Second"]);
    }

    #[test]
    fn test_exact_decimal_affordability() {
        // 0.1 + 0.2 must equal 0.3 exactly for C to become affordable.
        let q = query(
            vec![
                project("A", dec!(0), dec!(0.1)),
                project("B", dec!(0.1), dec!(0.2)),
                project("C", dec!(0.3), dec!(1)),
            ],
            3,
            dec!(0),
        );
        let result = CapitalOptimizer::maximize(&q);
        assert_eq!(result.selected_names(), vec!["A", "B", "C"]);
        assert_eq!(result.final_capital(), dec!(1.3));
    }

    #[test]
    fn test_admitted_projects_stay_affordable() {
        let q = query(
            vec![
                project("Cheap", dec!(0), dec!(1)),
                project("Big", dec!(0), dec!(50)),
                project("Gate", dec!(50), dec!(5)),
            ],
            3,
            dec!(0),
        );
        let mut recorder = Recorder::default();
        let result = CapitalOptimizer::maximize_observed(&q, &mut recorder);

        assert_eq!(result.selected_names(), vec!["Big", "Gate", "Cheap"]);
        // Cheap is admitted once in round 0 and never re-admitted.
        let cheap: Vec<_> = recorder.admitted.iter().filter(|(_, n)| n == "Cheap").collect();
        assert_eq!(cheap, vec![&(0, "Cheap".to_string())]);
        assert_eq!(recorder.admitted.len(), 3);
    }

    #[test]
    fn test_equal_capital_admitted_in_input_order() {
        let q = query(
            vec![
                project("Mid-1", dec!(5), dec!(1)),
                project("Free-1", dec!(0), dec!(1)),
                project("Mid-2", dec!(5), dec!(1)),
                project("Free-2", dec!(0), dec!(1)),
                project("Late-1", dec!(20), dec!(1)),
                project("Mid-3", dec!(5), dec!(1)),
                project("Free-3", dec!(0), dec!(1)),
                project("Late-2", dec!(20), dec!(1)),
            ],
            8,
            dec!(5),
        );
        let mut recorder = Recorder::default();
        CapitalOptimizer::maximize_observed(&q, &mut recorder);

        let admitted: Vec<&str> = recorder.admitted.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(
            admitted,
            vec!["Free-1", "Free-2", "Free-3", "Mid-1", "Mid-2", "Mid-3"]
        );
        // Late projects never become affordable: 5 + 6 < 20.
        assert_eq!(recorder.exhausted_at, Some(6));
    }

    #[test]
    fn test_capital_stays_exact_at_high_magnitude() {
        let ten_pow_28 = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        let q = query(
            vec![
                project("Gate", ten_pow_28 + Decimal::ONE, dec!(1000)),
                project("Step", dec!(0), dec!(1)),
            ],
            2,
            ten_pow_28,
        );
        let result = CapitalOptimizer::maximize(&q);
        assert_eq!(result.selected_names(), vec!["Step", "Gate"]);
        assert_eq!(result.final_capital(), ten_pow_28 + dec!(1001));
    }

    #[test]
    fn test_observer_sees_early_exhaustion() {
        let q = query(
            vec![
                project("A", dec!(0), dec!(1)),
                project("Far", dec!(100), dec!(1)),
            ],
            5,
            dec!(0),
        );
        let mut recorder = Recorder::default();
        let result = CapitalOptimizer::maximize_observed(&q, &mut recorder);

        assert_eq!(result.selected_count(), 1);
        assert_eq!(recorder.rounds, 2);
        assert_eq!(recorder.exhausted_at, Some(1));
        assert_eq!(recorder.selected, vec![(0, "A".to_string(), dec!(1))]);
    }

    #[test]
    fn test_cancelled_before_first_round() {
        let q = query(vec![project("A", dec!(0), dec!(1))], 1, dec!(0));
        let flag = CancellationFlag::new();
        flag.cancel();
        let err = CapitalOptimizer::maximize_with(&q, &mut NoopObserver, Some(&flag)).unwrap_err();
        assert_eq!(err, OptimizerError::Cancelled { completed_rounds: 0 });
    }

    #[test]
    fn test_uncancelled_flag_matches_plain_run() {
        let q = query(
            vec![
                project("A", dec!(0), dec!(2)),
                project("B", dec!(2), dec!(3)),
            ],
            2,
            dec!(0),
        );
        let flag = CancellationFlag::new();
        let flagged = CapitalOptimizer::maximize_with(&q, &mut NoopObserver, Some(&flag)).unwrap();
        assert_eq!(flagged, CapitalOptimizer::maximize(&q));
    }

    #[test]
    fn test_cancel_mid_run() {
        struct CancelAfterFirst(CancellationFlag);
        impl SelectionObserver for CancelAfterFirst {
            fn on_event(&mut self, event: &SelectionEvent<'_>) {
                if matches!(event, SelectionEvent::ProjectSelected { .. }) {
                    self.0.cancel();
                }
            }
        }

        let q = query(
            vec![
                project("A", dec!(0), dec!(1)),
                project("B", dec!(0), dec!(1)),
            ],
            2,
            dec!(0),
        );
        let flag = CancellationFlag::new();
        let mut observer = CancelAfterFirst(flag.clone());
        let err = CapitalOptimizer::maximize_with(&q, &mut observer, Some(&flag)).unwrap_err();
        assert_eq!(err, OptimizerError::Cancelled { completed_rounds: 1 });
    }

    #[test]
    fn test_null_query() {
        let err = CapitalOptimizer::maximize_capital(None).unwrap_err();
        assert_eq!(err, OptimizerError::invalid_input(messages::NULL_QUERY));
        assert_eq!(err.to_string(), "Capital maximization query must not be null");
    }

    #[test]
    fn test_candidate_ordering() {
        let high = Candidate {
            profit: dec!(5),
            position: 9,
        };
        let low = Candidate {
            profit: dec!(4),
            position: 0,
        };
        let early = Candidate {
            profit: dec!(5),
            position: 1,
        };
        assert!(high > low);
        assert!(early > high);
    }
}
