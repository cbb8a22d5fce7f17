//! Assignment values for INSERT/UPDATE.

use crate::value::{IntoParams, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

/// Placeholder token rendered for a bound value.
pub const PLACEHOLDER: &str = "?";

/// The right-hand side of a `column = ...` assignment.
///
/// Either a single bound value (rendered as `?`) or a raw SQL expression carrying
/// its own bound sub-parameters.
///
/// ```rust
/// use qola::{Expr, Value};
///
/// let bump = Expr::raw("views + ?", 1);
/// assert_eq!(bump.sql(), "views + ?");
/// assert_eq!(bump.params(), &[Value::Int(1)]);
///
/// let bound = Expr::from("alice");
/// assert_eq!(bound.sql(), "?");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Parameterized value
    Bound(Value),
    /// Raw SQL expression with its own parameters
    Raw { sql: String, params: Vec<Value> },
}

impl Expr {
    /// A raw SQL expression binding `params` (a scalar or a list).
    pub fn raw(sql: impl Into<String>, params: impl IntoParams) -> Self {
        Expr::Raw {
            sql: sql.into(),
            params: params.into_params(),
        }
    }

    /// A raw SQL expression with no parameters, e.g. `NOW()`.
    pub fn literal(sql: impl Into<String>) -> Self {
        Expr::Raw {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// SQL text placed on the value side.
    pub fn sql(&self) -> &str {
        match self {
            Expr::Bound(_) => PLACEHOLDER,
            Expr::Raw { sql, .. } => sql,
        }
    }

    /// Parameters bound by this expression, in placeholder order.
    pub fn params(&self) -> &[Value] {
        match self {
            Expr::Bound(value) => std::slice::from_ref(value),
            Expr::Raw { params, .. } => params,
        }
    }
}

macro_rules! bound_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Bound(Value::from(v))
                }
            }
        )*
    };
}

bound_from!(
    bool,
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    &str,
    String,
    Vec<u8>,
    serde_json::Value,
    Uuid,
    NaiveDate,
    NaiveDateTime,
    DateTime<Utc>,
);

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Bound(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Expr {
    fn from(v: Option<T>) -> Self {
        Expr::Bound(Value::from(v))
    }
}
