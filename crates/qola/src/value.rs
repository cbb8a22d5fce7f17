//! Scalar parameter values.
//!
//! Every bound parameter travels through the assembler as a [`Value`]. Keeping
//! parameters as plain data (instead of `dyn ToSql`) lets the translator inspect
//! them, e.g. to rewrite empty text into `NULL`, and lets two assemblies of the same
//! query compare equal.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type};
use uuid::Uuid;

/// A single bound parameter (or decoded column value).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`; also the marker that empty text is normalized into.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for a text value with no characters.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Rewrite empty text into `NULL`, leaving everything else untouched.
    pub fn null_if_empty(self) -> Value {
        if self.is_empty_text() {
            Value::Null
        } else {
            self
        }
    }

    /// Borrow the inner string of a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// Rewrite every empty-text value in `params` into `NULL`.
pub(crate) fn null_empty_text(params: Vec<Value>) -> Vec<Value> {
    params.into_iter().map(Value::null_if_empty).collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Json(v) => write!(f, "{}", v),
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v),
            Value::TimestampTz(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Normalize a bare scalar or a collection of scalars into a parameter list.
///
/// A single value becomes a one-element list, `()` becomes an empty one.
pub trait IntoParams {
    fn into_params(self) -> Vec<Value>;
}

macro_rules! impl_scalar {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl IntoParams for $ty {
                fn into_params(self) -> Vec<Value> {
                    vec![Value::from(self)]
                }
            }
        )*
    };
}

impl_scalar! {
    bool => |v| Value::Bool(v),
    i16 => |v| Value::Int(i64::from(v)),
    i32 => |v| Value::Int(i64::from(v)),
    i64 => |v| Value::Int(v),
    u32 => |v| Value::Int(i64::from(v)),
    f32 => |v| Value::Float(f64::from(v)),
    f64 => |v| Value::Float(v),
    &str => |v| Value::Text(v.to_string()),
    String => |v| Value::Text(v),
    serde_json::Value => |v| Value::Json(v),
    Uuid => |v| Value::Uuid(v),
    NaiveDate => |v| Value::Date(v),
    NaiveDateTime => |v| Value::Timestamp(v),
    DateTime<Utc> => |v| Value::TimestampTz(v),
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl IntoParams for Value {
    fn into_params(self) -> Vec<Value> {
        vec![self]
    }
}

impl<T: Into<Value>> IntoParams for Option<T> {
    fn into_params(self) -> Vec<Value> {
        vec![Value::from(self)]
    }
}

impl<T: Into<Value>> IntoParams for Vec<T> {
    fn into_params(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Value>, const N: usize> IntoParams for [T; N] {
    fn into_params(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Value> + Clone> IntoParams for &[T] {
    fn into_params(self) -> Vec<Value> {
        self.iter().cloned().map(Into::into).collect()
    }
}

impl IntoParams for () {
    fn into_params(self) -> Vec<Value> {
        Vec::new()
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
            Value::TimestampTz(v) => v.to_sql_checked(ty, out),
        }
    }

    // The concrete variant decides; mismatches surface from the inner `to_sql_checked`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}
