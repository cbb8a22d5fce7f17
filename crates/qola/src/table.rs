//! Table descriptors.

/// Database table metadata: name, primary key column and an optional alias.
///
/// The alias only decorates [`Table::identifier`]; `name` is never touched by it.
///
/// # Example
///
/// ```rust
/// use qola::Table;
///
/// const USERS: Table = Table::new("users", "id");
///
/// assert_eq!(USERS.identifier(), "users");
/// assert_eq!(USERS.with_alias("u").identifier(), "users u");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub alias: Option<&'static str>,
}

impl Table {
    pub const fn new(name: &'static str, primary_key: &'static str) -> Self {
        Self {
            name,
            primary_key,
            alias: None,
        }
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Name used in FROM/JOIN/UPDATE clauses: `name` or `name alias`.
    pub fn identifier(&self) -> String {
        match self.alias.map(str::trim) {
            Some(alias) if !alias.is_empty() => format!("{} {}", self.name, alias),
            _ => self.name.to_string(),
        }
    }
}

/// Registers a Rust type as a table.
///
/// ```rust
/// use qola::{Query, Table, TableDef};
///
/// struct Users;
///
/// impl TableDef for Users {
///     const TABLE: Table = Table::new("users", "id");
/// }
///
/// let q = Query::of::<Users>();
/// assert_eq!(q.table().name, "users");
/// ```
pub trait TableDef {
    const TABLE: Table;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: Table = Table::new("orders", "order_id");

    #[test]
    fn identifier_without_alias_is_the_name() {
        assert_eq!(ORDERS.identifier(), "orders");
    }

    #[test]
    fn identifier_trims_the_alias() {
        assert_eq!(ORDERS.with_alias("  o ").identifier(), "orders o");
    }

    #[test]
    fn blank_alias_is_ignored() {
        let t = ORDERS.with_alias("   ");
        assert_eq!(t.identifier(), "orders");
        assert_eq!(t.name, "orders");
    }
}
