//! Result rows as ordered column name -> value mappings.

use crate::error::{QolaError, QolaResult};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio_postgres::types::{FromSql, Type};

/// A single result row. Column order follows the statement's result columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, value)| value)
    }

    /// Like [`Row::get`], but a missing column is an error.
    pub fn try_get(&self, name: &str) -> QolaResult<&Value> {
        self.get(name)
            .ok_or_else(|| QolaError::decode(name, "column not present in row"))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(col, _)| col.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(col, value)| (col.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Decode a tokio-postgres row column by column.
    ///
    /// Supported column types: `BOOL`, `INT2`, `INT4`, `INT8`, `OID`, `FLOAT4`,
    /// `FLOAT8`, `BYTEA`, `JSON`, `JSONB`, `UUID`, `DATE`, `TIMESTAMP`, `TIMESTAMPTZ`
    /// and every type tokio-postgres decodes as text (`TEXT`, `VARCHAR`, `BPCHAR`,
    /// `NAME`, `citext`, ...). Any other column (`NUMERIC`, arrays, ...) fails the
    /// whole row with [`QolaError::Decode`]; cast it in the select list
    /// (`total::text`, `to_json(tags)`) to read it.
    pub fn from_pg(row: &tokio_postgres::Row) -> QolaResult<Self> {
        let mut columns = Vec::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let value = decode_column(row, idx, column.name(), column.type_())?;
            columns.push((column.name().to_string(), value));
        }
        Ok(Self { columns })
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (col, value) in &self.columns {
            map.serialize_entry(col, value)?;
        }
        map.end()
    }
}

fn get<'a, T: FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    idx: usize,
    name: &str,
) -> QolaResult<Option<T>> {
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| QolaError::decode(name, e.to_string()))
}

fn decode_column(
    row: &tokio_postgres::Row,
    idx: usize,
    name: &str,
    ty: &Type,
) -> QolaResult<Value> {
    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx, name)?.map(Value::Bool),
        Type::INT2 => get::<i16>(row, idx, name)?.map(Value::from),
        Type::INT4 => get::<i32>(row, idx, name)?.map(Value::from),
        Type::INT8 => get::<i64>(row, idx, name)?.map(Value::Int),
        Type::OID => get::<u32>(row, idx, name)?.map(Value::from),
        Type::FLOAT4 => get::<f32>(row, idx, name)?.map(Value::from),
        Type::FLOAT8 => get::<f64>(row, idx, name)?.map(Value::Float),
        Type::BYTEA => get::<Vec<u8>>(row, idx, name)?.map(Value::Bytes),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx, name)?.map(Value::Json),
        Type::UUID => get::<uuid::Uuid>(row, idx, name)?.map(Value::Uuid),
        Type::DATE => get::<chrono::NaiveDate>(row, idx, name)?.map(Value::Date),
        Type::TIMESTAMP => get::<chrono::NaiveDateTime>(row, idx, name)?.map(Value::Timestamp),
        Type::TIMESTAMPTZ => {
            get::<chrono::DateTime<chrono::Utc>>(row, idx, name)?.map(Value::TimestampTz)
        }
        _ if <String as FromSql<'_>>::accepts(ty) => {
            get::<String>(row, idx, name)?.map(Value::Text)
        }
        _ => return Err(unsupported(name, ty)),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Whether [`Row::from_pg`] can decode a column of type `ty`.
pub fn decodable(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::BOOL
            | Type::INT2
            | Type::INT4
            | Type::INT8
            | Type::OID
            | Type::FLOAT4
            | Type::FLOAT8
            | Type::BYTEA
            | Type::JSON
            | Type::JSONB
            | Type::UUID
            | Type::DATE
            | Type::TIMESTAMP
            | Type::TIMESTAMPTZ
    ) || <String as FromSql<'_>>::accepts(ty)
}

fn unsupported(name: &str, ty: &Type) -> QolaError {
    QolaError::decode(
        name,
        format!("unsupported column type {}; cast it to text or json in the query", ty),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new().with("id", 1i64).with("name", "Alice").with("email", Value::Null)
    }

    #[test]
    fn lookup_by_name() {
        let row = sample();
        assert_eq!(row.get("name"), Some(&Value::from("Alice")));
        assert_eq!(row.get("missing"), None);
        assert!(row.try_get("missing").is_err());
    }

    #[test]
    fn keeps_column_order() {
        let row = sample();
        let cols: Vec<&str> = row.columns().collect();
        assert_eq!(cols, vec!["id", "name", "email"]);
    }

    #[test]
    fn text_like_types_are_decodable() {
        for ty in [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::UNKNOWN] {
            assert!(decodable(&ty), "{ty}");
        }
        let citext = Type::new(
            "citext".to_string(),
            16_385,
            tokio_postgres::types::Kind::Simple,
            "public".to_string(),
        );
        assert!(decodable(&citext));
    }

    #[test]
    fn numeric_and_arrays_are_reported() {
        assert!(decodable(&Type::INT4));
        assert!(decodable(&Type::JSONB));
        assert!(!decodable(&Type::NUMERIC));
        assert!(!decodable(&Type::INT4_ARRAY));

        let err = unsupported("total", &Type::NUMERIC);
        assert!(matches!(&err, QolaError::Decode { column, .. } if column == "total"));
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn serializes_as_json_object() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Alice", "email": null})
        );
    }
}
