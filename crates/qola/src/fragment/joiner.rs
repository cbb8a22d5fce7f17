//! JOIN accumulator.
//!
//! Joins render as a flat token list, spliced after the table identifier in
//! SELECT, UPDATE and DELETE.

use crate::table::Table;

/// Join flavour, rendered as the keyword before `JOIN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Outer,
    Left,
    Right,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Outer => "OUTER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        }
    }
}

impl From<bool> for JoinKind {
    /// `true` selects an outer join.
    fn from(outer: bool) -> Self {
        if outer { JoinKind::Outer } else { JoinKind::Inner }
    }
}

/// Accumulates join tokens as a flat list.
///
/// Each join appends `<KIND> JOIN <identifier>` and, when a condition is given,
/// `ON <condition>`.
#[derive(Clone, Debug, Default)]
pub struct Joiner {
    tokens: Vec<String>,
}

impl Joiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, table: &Table, on: &str, kind: JoinKind) {
        self.tokens.push(kind.keyword().to_string());
        self.tokens.push("JOIN".to_string());
        self.tokens.push(table.identifier());

        let on = on.trim();
        if !on.is_empty() {
            self.tokens.push("ON".to_string());
            self.tokens.push(on.to_string());
        }
    }

    pub fn render(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
