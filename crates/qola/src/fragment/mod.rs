//! Fragment accumulators.
//!
//! Each accumulator collects the ordered pieces of one SQL clause. They share no
//! state; a [`Query`](crate::Query) owns one of each and the translator reads them
//! through their `render()` methods, which never mutate.

mod clauser;
mod joiner;
mod limiter;
mod orderer;
mod selector;
mod setter;

pub use clauser::{Clauser, Connector};
pub use joiner::{JoinKind, Joiner};
pub use limiter::Limiter;
pub use orderer::Orderer;
pub use selector::Selector;
pub use setter::Setter;

/// Normalize a bare SQL fragment or a list of fragments into a list.
pub trait IntoFragments {
    fn into_fragments(self) -> Vec<String>;
}

impl IntoFragments for &str {
    fn into_fragments(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoFragments for String {
    fn into_fragments(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoFragments for &String {
    fn into_fragments(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: Into<String>> IntoFragments for Vec<S> {
    fn into_fragments(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<String>, const N: usize> IntoFragments for [S; N] {
    fn into_fragments(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl IntoFragments for &[&str] {
    fn into_fragments(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_fragment_becomes_single_element() {
        assert_eq!("name".into_fragments(), vec!["name".to_string()]);
    }

    #[test]
    fn lists_keep_order() {
        assert_eq!(["b", "a"].into_fragments(), vec!["b", "a"]);
        assert_eq!(vec![String::from("x")].into_fragments(), vec!["x"]);
        let cols: &[&str] = &["id", "email"];
        assert_eq!(cols.into_fragments(), vec!["id", "email"]);
    }
}
