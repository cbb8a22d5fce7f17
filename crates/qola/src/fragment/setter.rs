//! Column assignments for INSERT and UPDATE.

use crate::expr::Expr;
use crate::value::Value;

/// Column assignments for INSERT/UPDATE.
///
/// Keys are unique. Setting an existing key replaces its value but keeps the
/// position it was first set at, so columns and values stay aligned in a stable
/// order.
#[derive(Clone, Debug, Default)]
pub struct Setter {
    items: Vec<(String, Expr)>,
}

impl Setter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Expr>) {
        let key = key.into();
        let value = value.into();
        match self.items.iter().position(|(k, _)| *k == key) {
            Some(idx) => self.items[idx].1 = value,
            None => self.items.push((key, value)),
        }
    }

    pub fn render(&self) -> &[(String, Expr)] {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.items.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Parameters of every assignment, in column order.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().flat_map(|(_, e)| e.params())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_wrapped_as_bound() {
        let mut s = Setter::new();
        s.add("name", "Alice");
        assert_eq!(s.get("name"), Some(&Expr::Bound(Value::from("Alice"))));
    }

    #[test]
    fn reset_keeps_first_position() {
        let mut s = Setter::new();
        s.add("a", 1);
        s.add("b", 2);
        s.add("a", 3);
        let keys: Vec<&str> = s.render().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(s.get("a"), Some(&Expr::from(3i32)));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn expr_is_stored_as_is() {
        let mut s = Setter::new();
        s.add("views", Expr::raw("views + ?", 1));
        s.add("title", "x");
        let params: Vec<&Value> = s.params().collect();
        assert_eq!(params, vec![&Value::Int(1), &Value::from("x")]);
    }
}
