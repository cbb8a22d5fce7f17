//! WHERE clause accumulator.

use crate::value::{IntoParams, Value};

/// Boolean connector placed between two WHERE clauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn keyword(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// Accumulates WHERE clauses and their bound parameters.
///
/// Connectors live in `clauses` only; `params` holds bound values exclusively.
/// The `?` count across all clauses is expected to equal `params.len()`; this is
/// not checked here (see [`Statement::validate`](crate::Statement::validate)).
#[derive(Clone, Debug, Default)]
pub struct Clauser {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Clauser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, clause: impl Into<String>, params: impl IntoParams, connector: Connector) {
        if !self.clauses.is_empty() {
            self.clauses.push(connector.keyword().to_string());
        }
        self.clauses.push(clause.into());
        self.params.extend(params.into_params());
    }

    /// Clauses with their connectors interleaved.
    pub fn render(&self) -> &[String] {
        &self.clauses
    }

    /// Bound parameters in clause order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
