//! # qola
//!
//! A small SQL statement assembler.
//!
//! Queries are built by attaching fragments (columns, joins, WHERE clauses, ordering,
//! limits, column assignments) to a [`Query`], then assembled for one of four
//! [`Mode`]s into a [`Statement`]: SQL text with `?` placeholders plus the parameters
//! they bind, in placeholder order.
//!
//! - **Pure assembly**: [`Query::assemble`] never mutates the query and never does I/O
//! - **Explicit gateways**: execution goes through a [`Gateway`] passed by the caller;
//!   there is no global "current database"
//! - **Failures are not empty results**: [`Outcome`] keeps "no rows" and "failed" apart,
//!   and a [`FailurePolicy`] decides whether failures reach the caller
//!
//! ```ignore
//! use qola::{GatewayConfig, PgGateway, Query, Table};
//!
//! const USERS: Table = Table::new("users", "id");
//!
//! let gateway = PgGateway::new(GatewayConfig::from_env()?)?;
//!
//! let adults = Query::new(USERS)
//!     .select(["id", "name"])
//!     .and_where("age > ?", 18)
//!     .order("name")
//!     .fetch(&gateway)
//!     .await?;
//!
//! Query::new(USERS).set("status", "active").key(5).update(&gateway).await?;
//! Query::new(USERS).key(7).delete(&gateway).await?;
//! ```

pub mod assemble;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod gateway;
pub mod placeholder;
pub mod query;
pub mod row;
pub mod table;
pub mod value;

pub use assemble::{Mode, NullPolicy, Statement, assemble};
pub use error::{QolaError, QolaResult};
pub use expr::Expr;
pub use fragment::{
    Clauser, Connector, IntoFragments, JoinKind, Joiner, Limiter, Orderer, Selector, Setter,
};
pub use gateway::{FailurePolicy, FetchMode, Gateway, GatewayConfig, Outcome, PgGateway};
pub use query::{Query, execute};
pub use row::Row;
pub use table::{Table, TableDef};
pub use value::{IntoParams, Value};
