//! Reusable input checks shared by the project, query and result constructors.
//!
//! Every check takes the value as it arrives at the boundary (possibly absent)
//! and returns the validated value, or [`OptimizerError::InvalidInput`] carrying
//! one of the fixed messages in [`messages`].

use crate::error::OptimizerError;
use rust_decimal::Decimal;

/// Stable, documented failure messages.
pub mod messages {
    pub const NULL_QUERY: &str = "Capital maximization query must not be null";
    pub const AVAILABLE_PROJECTS: &str =
        "Available projects list must not be null nor contain null elements";
    pub const MAX_PROJECTS: &str = "Max projects must be non-negative";
    pub const INITIAL_CAPITAL: &str = "Initial capital must not be null and must be non-negative";
    pub const PROJECT_NAME: &str = "Project name must not be null or blank";
    pub const REQUIRED_CAPITAL: &str =
        "Required capital must not be null and must be non-negative";
    pub const PROFIT: &str = "Profit must not be null and must be non-negative";
    pub const FINAL_CAPITAL: &str = "Final capital must be non-negative";
    pub const EMPTY_BATCH: &str = "Projects cannot be null or empty";
    pub const CAPITAL_RANGE: &str =
        "Initial capital plus total profit cannot be represented exactly";
}

fn invalid(message: &str) -> OptimizerError {
    OptimizerError::invalid_input(message)
}

/// The value must be present.
pub fn require_present<T>(value: Option<T>, message: &str) -> Result<T, OptimizerError> {
    value.ok_or_else(|| invalid(message))
}

/// The string must be present and contain at least one non-whitespace character.
pub fn require_non_blank(value: Option<String>, message: &str) -> Result<String, OptimizerError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(invalid(message)),
    }
}

/// The decimal must be present and `>= 0`.
pub fn require_non_negative_decimal(
    value: Option<Decimal>,
    message: &str,
) -> Result<Decimal, OptimizerError> {
    match value {
        Some(d) if d >= Decimal::ZERO => Ok(d),
        _ => Err(invalid(message)),
    }
}

/// The signed count must be `>= 0`; returned as a `usize`.
pub fn require_non_negative_count(value: i64, message: &str) -> Result<usize, OptimizerError> {
    usize::try_from(value).map_err(|_| invalid(message))
}

/// Exact sum of two non-negative decimals, or `None` if the result would
/// overflow or lose digits.
///
/// `Decimal` addition rounds instead of failing when the exact result needs
/// more than 28 significant digits; it does so by lowering the scale below
/// that of the more precise operand.
fn exact_add(acc: Decimal, amount: Decimal) -> Option<Decimal> {
    let sum = acc.checked_add(amount)?;
    (sum.scale() >= acc.scale().max(amount.scale())).then_some(sum)
}

/// `initial` plus every amount must be representable exactly.
///
/// With non-negative amounts, any partial sum taken in any order is bounded
/// by the total and needs no finer scale, so it is exact too.
pub fn require_summable<I>(
    initial: Decimal,
    amounts: I,
    message: &str,
) -> Result<Decimal, OptimizerError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(initial, exact_add)
        .ok_or_else(|| invalid(message))
}

/// The sequence must be present and contain no absent elements.
pub fn require_no_absent_elements<T>(
    values: Option<Vec<Option<T>>>,
    message: &str,
) -> Result<Vec<T>, OptimizerError> {
    values
        .ok_or_else(|| invalid(message))?
        .into_iter()
        .map(|v| v.ok_or_else(|| invalid(message)))
        .collect()
}
