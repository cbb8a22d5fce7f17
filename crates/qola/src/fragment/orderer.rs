//! ORDER BY accumulator.

use super::IntoFragments;

/// Accumulates ORDER BY expressions.
#[derive(Clone, Debug, Default)]
pub struct Orderer {
    orders: Vec<String>,
}

impl Orderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, orders: impl IntoFragments) {
        self.orders.extend(orders.into_fragments());
    }

    pub fn render(&self) -> &[String] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_call_order() {
        let mut o = Orderer::new();
        o.add("name");
        o.add(["created_at DESC", "id"]);
        assert_eq!(o.render(), &["name", "created_at DESC", "id"]);
    }
}
