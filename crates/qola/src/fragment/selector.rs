//! Selected columns.

use super::IntoFragments;

/// Accumulates selected column expressions.
#[derive(Clone, Debug, Default)]
pub struct Selector {
    cols: Vec<String>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append columns, qualifying each with `alias.` when an alias is given.
    pub fn add(&mut self, cols: impl IntoFragments, alias: Option<&str>) {
        let cols = cols.into_fragments();
        match alias.filter(|a| !a.is_empty()) {
            Some(alias) => self
                .cols
                .extend(cols.into_iter().map(|c| format!("{}.{}", alias, c))),
            None => self.cols.extend(cols),
        }
    }

    /// Selected columns, or the single wildcard when nothing was selected.
    pub fn render(&self) -> Vec<&str> {
        if self.cols.is_empty() {
            vec!["*"]
        } else {
            self.cols.iter().map(String::as_str).collect()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}
