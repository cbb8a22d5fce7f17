//! LIMIT values.

use crate::value::IntoParams;

/// Holds the LIMIT values, stored as text.
///
/// Every `add` replaces the previous values.
#[derive(Clone, Debug, Default)]
pub struct Limiter {
    limits: Vec<String>,
}

impl Limiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, limits: impl IntoParams) {
        self.limits = limits
            .into_params()
            .iter()
            .map(ToString::to_string)
            .collect();
    }

    pub fn render(&self) -> &[String] {
        &self.limits
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_call_wins() {
        let mut l = Limiter::new();
        l.add([5, 10]);
        l.add(20);
        assert_eq!(l.render(), &["20"]);
    }

    #[test]
    fn values_are_stringified() {
        let mut l = Limiter::new();
        l.add([10i64, 30]);
        assert_eq!(l.render(), &["10", "30"]);
    }
}
