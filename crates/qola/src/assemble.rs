//! Translation of accumulated query state into SQL text and parameters.
//!
//! [`assemble`] is a pure function: it reads a [`Query`] and never mutates it, so
//! the same query can be assembled repeatedly, for the same or different modes.

use crate::error::{QolaError, QolaResult};
use crate::fragment::{Clauser, Joiner};
use crate::placeholder;
use crate::query::Query;
use crate::table::Table;
use crate::value::{Value, null_empty_text};
use std::fmt;
use std::str::FromStr;

/// Statement kind to assemble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Select,
    Insert,
    Update,
    Delete,
}

type Handler = fn(&Query) -> Statement;

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Select, Mode::Insert, Mode::Update, Mode::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Select => "select",
            Mode::Insert => "insert",
            Mode::Update => "update",
            Mode::Delete => "delete",
        }
    }

    fn handler(self) -> Handler {
        match self {
            Mode::Select => build_select,
            Mode::Insert => build_insert,
            Mode::Update => build_update,
            Mode::Delete => build_delete,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = QolaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| QolaError::UnsupportedMode(s.to_string()))
    }
}

/// Which parameters have empty text rewritten into `NULL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Values written by INSERT and UPDATE SET; WHERE parameters are left alone.
    #[default]
    AssignedValues,
    /// INSERT values and UPDATE WHERE parameters, UPDATE SET values are left alone.
    Legacy,
    /// Never rewrite.
    Never,
}

impl NullPolicy {
    fn assigned(self, mode: Mode) -> bool {
        match self {
            NullPolicy::AssignedValues => matches!(mode, Mode::Insert | Mode::Update),
            NullPolicy::Legacy => mode == Mode::Insert,
            NullPolicy::Never => false,
        }
    }

    fn filters(self, mode: Mode) -> bool {
        self == NullPolicy::Legacy && mode == Mode::Update
    }
}

/// Assembled SQL text with `?` placeholders and the parameters they bind, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        placeholder::count(&self.sql)
    }

    /// Check that the placeholder count matches the parameter count.
    ///
    /// Assembly itself never checks this: clause placeholders are the caller's
    /// responsibility.
    pub fn validate(&self) -> QolaResult<()> {
        let placeholders = self.placeholder_count();
        if placeholders != self.params.len() {
            return Err(QolaError::ParamMismatch {
                placeholders,
                params: self.params.len(),
            });
        }
        Ok(())
    }

    /// Validated SQL text with numbered (`$n`) placeholders.
    pub fn to_numbered(&self) -> QolaResult<String> {
        self.validate()?;
        Ok(placeholder::to_numbered(&self.sql))
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Assemble `query` for `mode`.
pub fn assemble(query: &Query, mode: Mode) -> Statement {
    (mode.handler())(query)
}

fn push_from(parts: &mut Vec<String>, table: &Table) {
    parts.push("FROM".to_string());
    parts.push(table.identifier());
}

fn push_joins(parts: &mut Vec<String>, joiner: &Joiner) {
    parts.extend(joiner.render().iter().cloned());
}

fn push_where(parts: &mut Vec<String>, clauser: &Clauser) {
    if !clauser.is_empty() {
        parts.push("WHERE".to_string());
        parts.push(clauser.render().join(" "));
    }
}

fn push_list(parts: &mut Vec<String>, keyword: &str, items: &[String]) {
    if !items.is_empty() {
        parts.push(keyword.to_string());
        parts.push(items.join(","));
    }
}

fn build_select(query: &Query) -> Statement {
    let mut parts = vec!["SELECT".to_string(), query.selector().render().join(",")];
    push_from(&mut parts, query.table());
    push_joins(&mut parts, query.joiner());
    push_where(&mut parts, query.clauser());
    push_list(&mut parts, "ORDER BY", query.orderer().render());
    push_list(&mut parts, "LIMIT", query.limiter().render());

    Statement::new(parts.join(" "), query.clauser().params().to_vec())
}

fn build_insert(query: &Query) -> Statement {
    let policy = query.null_policy();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    let mut params = Vec::new();
    for (col, expr) in query.setter().render() {
        cols.push(col.as_str());
        vals.push(expr.sql());
        params.extend(expr.params().iter().cloned());
    }

    if policy.assigned(Mode::Insert) {
        params = null_empty_text(params);
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        query.table().name,
        cols.join(","),
        vals.join(",")
    );
    Statement::new(sql, params)
}

fn build_update(query: &Query) -> Statement {
    let policy = query.null_policy();
    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (col, expr) in query.setter().render() {
        assignments.push(format!("{} = {}", col, expr.sql()));
        params.extend(expr.params().iter().cloned());
    }

    if policy.assigned(Mode::Update) {
        params = null_empty_text(params);
    }

    let mut parts = vec!["UPDATE".to_string(), query.table().identifier()];
    parts.push("SET".to_string());
    parts.push(assignments.join(","));
    push_joins(&mut parts, query.joiner());
    push_where(&mut parts, query.clauser());

    let filter_params = query.clauser().params().to_vec();
    if policy.filters(Mode::Update) {
        params.extend(null_empty_text(filter_params));
    } else {
        params.extend(filter_params);
    }

    Statement::new(parts.join(" "), params)
}

fn build_delete(query: &Query) -> Statement {
    let mut parts = vec!["DELETE".to_string()];
    push_from(&mut parts, query.table());
    push_joins(&mut parts, query.joiner());
    push_where(&mut parts, query.clauser());

    Statement::new(parts.join(" "), query.clauser().params().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_known_names() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn mode_names_must_match_exactly() {
        for input in ["SELECT", " delete ", "Insert\n", "update;", ""] {
            let err = input.parse::<Mode>().unwrap_err();
            assert!(err.is_unsupported_mode(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn unknown_mode_fails_fast() {
        let err = "upsert".parse::<Mode>().unwrap_err();
        assert!(err.is_unsupported_mode());
    }

    #[test]
    fn statement_validate_detects_mismatch() {
        let ok = Statement::new("a = ? AND b = ?", vec![Value::Int(1), Value::Int(2)]);
        assert!(ok.validate().is_ok());

        let bad = Statement::new("a = ?", vec![]);
        assert!(matches!(
            bad.validate(),
            Err(QolaError::ParamMismatch {
                placeholders: 1,
                params: 0
            })
        ));
        assert!(bad.to_numbered().is_err());
    }

    #[test]
    fn null_policy_matrix() {
        assert!(NullPolicy::AssignedValues.assigned(Mode::Update));
        assert!(!NullPolicy::AssignedValues.filters(Mode::Update));
        assert!(!NullPolicy::Legacy.assigned(Mode::Update));
        assert!(NullPolicy::Legacy.filters(Mode::Update));
        assert!(!NullPolicy::Never.assigned(Mode::Insert));
    }
}
