//! Execution gateway contract.
//!
//! The assembler never talks to a database. A [`Gateway`] receives an assembled
//! [`Statement`] plus a [`FetchMode`] and reports an [`Outcome`]. The outcome keeps
//! "no rows" and "failed" apart; [`FailurePolicy`] decides whether a failure reaches
//! the caller or is flattened into an empty result.

mod config;
mod postgres;

pub use config::GatewayConfig;
pub use postgres::PgGateway;

use crate::assemble::Statement;
use crate::error::{QolaError, QolaResult};
use crate::row::Row;

/// How many rows the caller wants back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// No rows; report the affected row count.
    #[default]
    None,
    /// The first row, if any.
    One,
    /// Every row.
    All,
}

/// What to do with [`Outcome::Failed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Treat the failure as an empty result (no rows, `None`, zero affected).
    ///
    /// The gateway has already logged and rolled back by the time this applies.
    Swallow,
}

/// Result of running one statement.
#[derive(Debug)]
pub enum Outcome {
    /// One or more rows (`FetchMode::All`).
    Rows(Vec<Row>),
    /// The first row (`FetchMode::One`).
    Row(Row),
    /// The statement ran and produced no rows.
    NoRows,
    /// The statement ran; `affected` rows were changed (`FetchMode::None`).
    Done { affected: u64 },
    /// The statement failed and its transaction was rolled back.
    Failed(QolaError),
}

impl Outcome {
    /// `Rows` for a non-empty list, `NoRows` otherwise.
    pub fn rows(rows: Vec<Row>) -> Self {
        if rows.is_empty() {
            Outcome::NoRows
        } else {
            Outcome::Rows(rows)
        }
    }

    /// `Row` for `Some`, `NoRows` for `None`.
    pub fn row(row: Option<Row>) -> Self {
        row.map_or(Outcome::NoRows, Outcome::Row)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn into_result(self) -> QolaResult<Outcome> {
        match self {
            Outcome::Failed(err) => Err(err),
            other => Ok(other),
        }
    }

    /// Apply `policy` to a failed outcome.
    pub fn resolve(self, policy: FailurePolicy) -> QolaResult<Outcome> {
        match (self, policy) {
            (Outcome::Failed(err), FailurePolicy::Propagate) => Err(err),
            (Outcome::Failed(err), FailurePolicy::Swallow) => {
                tracing::debug!(target: "qola.sql", error = %err, "failure swallowed by policy");
                Ok(Outcome::NoRows)
            }
            (other, _) => Ok(other),
        }
    }

    /// Rows carried by the outcome; empty for anything but `Rows`/`Row`.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Outcome::Rows(rows) => rows,
            Outcome::Row(row) => vec![row],
            _ => Vec::new(),
        }
    }

    /// First row carried by the outcome.
    pub fn into_row(self) -> Option<Row> {
        self.into_rows().into_iter().next()
    }

    /// Affected row count; `0` for anything but `Done`.
    pub fn affected(&self) -> u64 {
        match self {
            Outcome::Done { affected } => *affected,
            _ => 0,
        }
    }
}

/// A database execution layer.
///
/// Implementations own the connection and transaction boundaries: commit on
/// success, roll back and log on failure.
pub trait Gateway: Send + Sync {
    /// Run `statement` and collect rows according to `fetch`.
    fn execute(
        &self,
        statement: &Statement,
        fetch: FetchMode,
    ) -> impl std::future::Future<Output = Outcome> + Send;

    /// Policy callers should apply to failed outcomes.
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Propagate
    }
}

/// Cut `sql` to at most `max` bytes on a char boundary.
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while !sql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sql[..end])
        }
        _ => sql.to_string(),
    }
}
