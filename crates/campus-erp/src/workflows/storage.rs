//! Shared storage primitives used by every workflow: the error taxonomy and
//! the serial counter seam behind the human-readable record numbers.

use chrono::{Datelike, NaiveDate};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Atomic increment-and-read over a named series.
///
/// Each call must return a value strictly greater than every previous value
/// for the same series, including under concurrent callers. A record serial
/// is only as unique as this guarantee, so implementations must not derive
/// the next value from a separate read-then-write count.
pub trait SerialCounter: Send + Sync {
    fn next(&self, series: &str) -> Result<u64, RepositoryError>;
}

/// Format a year-scoped serial such as `ADM-26-0001`.
///
/// The series key embeds the prefix and two-digit year, so numbering restarts
/// each calendar year.
pub fn yearly_serial(
    counter: &dyn SerialCounter,
    prefix: &str,
    date: NaiveDate,
) -> Result<String, RepositoryError> {
    let series = format!("{prefix}-{:02}", date.year() % 100);
    let number = counter.next(&series)?;
    Ok(format!("{series}-{number:04}"))
}

/// Format a month-scoped serial such as `FEE-2608-0001`.
pub fn monthly_serial(
    counter: &dyn SerialCounter,
    prefix: &str,
    date: NaiveDate,
) -> Result<String, RepositoryError> {
    let series = format!("{prefix}-{:02}{:02}", date.year() % 100, date.month());
    let number = counter.next(&series)?;
    Ok(format!("{series}-{number:04}"))
}
