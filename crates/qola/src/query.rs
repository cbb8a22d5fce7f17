//! The query builder.

use crate::assemble::{Mode, NullPolicy, Statement, assemble};
use crate::error::{QolaError, QolaResult};
use crate::expr::Expr;
use crate::fragment::{
    Clauser, Connector, IntoFragments, JoinKind, Joiner, Limiter, Orderer, Selector, Setter,
};
use crate::gateway::{FetchMode, Gateway, Outcome};
use crate::row::Row;
use crate::table::{Table, TableDef};
use crate::value::{IntoParams, Value};

/// A query under construction.
///
/// Owns one [`Table`] and one of each fragment accumulator. Builder methods consume
/// and return the query; assembly only borrows it, so one query can be assembled
/// for several modes.
///
/// ```rust
/// use qola::{Mode, Query, Table, Value};
///
/// const USERS: Table = Table::new("users", "id");
///
/// let q = Query::new(USERS)
///     .select(["id", "name"])
///     .and_where("age > ?", 18)
///     .order("name")
///     .limit(10);
///
/// let stmt = q.assemble(Mode::Select);
/// assert_eq!(stmt.sql, "SELECT id,name FROM users WHERE age > ? ORDER BY name LIMIT 10");
/// assert_eq!(stmt.params, vec![Value::Int(18)]);
/// ```
#[derive(Clone, Debug)]
pub struct Query {
    table: Table,
    selector: Selector,
    joiner: Joiner,
    clauser: Clauser,
    orderer: Orderer,
    limiter: Limiter,
    setter: Setter,
    null_policy: NullPolicy,
}

impl Query {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            selector: Selector::new(),
            joiner: Joiner::new(),
            clauser: Clauser::new(),
            orderer: Orderer::new(),
            limiter: Limiter::new(),
            setter: Setter::new(),
            null_policy: NullPolicy::default(),
        }
    }

    /// Start a query on a registered table type.
    pub fn of<T: TableDef>() -> Self {
        Self::new(T::TABLE)
    }

    // ==================== Columns ====================

    /// Add selected columns (one or many).
    pub fn select(mut self, cols: impl IntoFragments) -> Self {
        self.selector.add(cols, None);
        self
    }

    /// Add selected columns qualified with `alias.`.
    pub fn select_as(mut self, alias: &str, cols: impl IntoFragments) -> Self {
        self.selector.add(cols, Some(alias));
        self
    }

    // ==================== JOIN ====================

    /// Join `table` on `on`; `outer` picks an OUTER join instead of INNER.
    pub fn join(self, table: Table, on: &str, outer: bool) -> Self {
        self.join_kind(table, on, JoinKind::from(outer))
    }

    pub fn join_kind(mut self, table: Table, on: &str, kind: JoinKind) -> Self {
        self.joiner.add(&table, on, kind);
        self
    }

    // ==================== WHERE ====================

    /// Filter on the primary key: `<pk> = ?`.
    pub fn key(self, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        let clause = format!("{} = ?", self.table.primary_key);
        self.and_where(clause, value)
    }

    /// Add a clause joined with AND. `params` may be a scalar, a list or `()`.
    pub fn and_where(mut self, clause: impl Into<String>, params: impl IntoParams) -> Self {
        self.clauser.add(clause, params, Connector::And);
        self
    }

    /// Add a clause joined with OR.
    pub fn or_where(mut self, clause: impl Into<String>, params: impl IntoParams) -> Self {
        self.clauser.add(clause, params, Connector::Or);
        self
    }

    // ==================== ORDER BY / LIMIT ====================

    pub fn order(mut self, order: impl IntoFragments) -> Self {
        self.orderer.add(order);
        self
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.order(format!("{} DESC", column))
    }

    /// Replace the LIMIT values (`10`, or `[offset, count]`-style lists).
    pub fn limit(mut self, limits: impl IntoParams) -> Self {
        self.limiter.add(limits);
        self
    }

    // ==================== SET ====================

    /// Assign a column for INSERT/UPDATE; scalars bind as `?`, an [`Expr`] is kept as is.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.setter.add(column, value);
        self
    }

    /// Assign several columns in iteration order.
    pub fn values<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Expr>,
    {
        for (column, value) in values {
            self.setter.add(column, value);
        }
        self
    }

    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    // ==================== Accessors ====================

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn joiner(&self) -> &Joiner {
        &self.joiner
    }

    pub fn clauser(&self) -> &Clauser {
        &self.clauser
    }

    pub fn orderer(&self) -> &Orderer {
        &self.orderer
    }

    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    pub fn setter(&self) -> &Setter {
        &self.setter
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    // ==================== Build ====================

    pub fn assemble(&self, mode: Mode) -> Statement {
        assemble(self, mode)
    }

    /// Get the SQL text for `mode` (for debugging).
    pub fn to_sql(&self, mode: Mode) -> String {
        self.assemble(mode).sql
    }

    /// Validate builder state before execution.
    pub fn validate(&self, mode: Mode) -> QolaResult<()> {
        if matches!(mode, Mode::Insert | Mode::Update) && self.setter.is_empty() {
            return Err(QolaError::validation(format!(
                "{}: no columns set on {}",
                mode, self.table.name
            )));
        }
        Ok(())
    }

    // ==================== Execute ====================

    /// Run the SELECT and return every row.
    pub async fn fetch(&self, gateway: &impl Gateway) -> QolaResult<Vec<Row>> {
        Ok(self.run(gateway, Mode::Select, FetchMode::All).await?.into_rows())
    }

    /// Run the SELECT and return the first row, if any.
    pub async fn fetch_one(&self, gateway: &impl Gateway) -> QolaResult<Option<Row>> {
        Ok(self.run(gateway, Mode::Select, FetchMode::One).await?.into_row())
    }

    /// Run the SELECT and return the first row; no row is [`QolaError::NotFound`].
    pub async fn fetch_one_strict(&self, gateway: &impl Gateway) -> QolaResult<Row> {
        self.fetch_one(gateway).await?.ok_or_else(|| {
            QolaError::not_found(format!(
                "no row in {} matching {}",
                self.table.name,
                self.clauser.render().join(" ")
            ))
        })
    }

    /// Run the INSERT and return the affected row count.
    pub async fn insert(&self, gateway: &impl Gateway) -> QolaResult<u64> {
        Ok(self.run(gateway, Mode::Insert, FetchMode::None).await?.affected())
    }

    /// Run the UPDATE and return the affected row count.
    pub async fn update(&self, gateway: &impl Gateway) -> QolaResult<u64> {
        Ok(self.run(gateway, Mode::Update, FetchMode::None).await?.affected())
    }

    /// Run the DELETE and return the affected row count.
    pub async fn delete(&self, gateway: &impl Gateway) -> QolaResult<u64> {
        Ok(self.run(gateway, Mode::Delete, FetchMode::None).await?.affected())
    }

    async fn run(
        &self,
        gateway: &impl Gateway,
        mode: Mode,
        fetch: FetchMode,
    ) -> QolaResult<Outcome> {
        self.validate(mode)?;
        let statement = self.assemble(mode);
        gateway
            .execute(&statement, fetch)
            .await
            .resolve(gateway.failure_policy())
    }
}

/// Run hand-written SQL through `gateway`, applying its failure policy.
pub async fn execute(
    gateway: &impl Gateway,
    sql: impl Into<String>,
    params: impl IntoParams,
    fetch: FetchMode,
) -> QolaResult<Outcome> {
    let statement = Statement::new(sql, params.into_params());
    gateway
        .execute(&statement, fetch)
        .await
        .resolve(gateway.failure_policy())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: Table = Table::new("users", "id");

    #[test]
    fn key_uses_primary_key_column() {
        let q = Query::new(Table::new("accounts", "account_id")).key(3);
        assert_eq!(q.clauser().render(), &["account_id = ?"]);
        assert_eq!(q.clauser().params(), &[Value::Int(3)]);
    }

    #[test]
    fn values_sets_in_order() {
        let q = Query::new(USERS).values([("name", "Ann"), ("email", "a@x.io")]);
        let cols: Vec<&str> = q.setter().render().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cols, vec!["name", "email"]);
    }

    #[test]
    fn validate_requires_columns_for_writes() {
        let q = Query::new(USERS);
        assert!(q.validate(Mode::Insert).is_err());
        assert!(q.validate(Mode::Update).is_err());
        assert!(q.validate(Mode::Select).is_ok());
        assert!(q.validate(Mode::Delete).is_ok());
    }

    #[test]
    fn select_as_qualifies_columns() {
        let q = Query::new(USERS.with_alias("u")).select_as("u", ["id", "name"]);
        assert_eq!(
            q.to_sql(Mode::Select),
            "SELECT u.id,u.name FROM users u"
        );
    }

    #[test]
    fn order_desc_appends_direction() {
        let q = Query::new(USERS).order("name").order_desc("created_at");
        assert_eq!(
            q.to_sql(Mode::Select),
            "SELECT * FROM users ORDER BY name,created_at DESC"
        );
    }
}
