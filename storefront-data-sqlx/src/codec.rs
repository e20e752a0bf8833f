//! Column encodings shared by the SQLite schema and entity row mappings.
//!
//! | Domain type       | Column type | Encoding                                  |
//! |-------------------|-------------|-------------------------------------------|
//! | `Decimal`         | `INTEGER`   | minor units (cents), see [`MONEY_SCALE`]  |
//! | `DateTime<Utc>`   | `TEXT`      | fixed-width RFC 3339 with microseconds    |
//! | `Vec<String>`     | `TEXT`      | JSON array                                |
//!
//! The timestamp format is fixed-width so that `ORDER BY created_at` sorts
//! chronologically. Decimals are stored exactly; a value with more than
//! [`MONEY_SCALE`] decimal places, or beyond `i64` minor units, is refused
//! rather than rounded.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};
use storefront_data::{DataError, Value};

/// The current time, truncated to the precision timestamp columns keep, so a
/// record compares equal to itself after a round trip.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn timestamp_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn timestamp_from_sql(raw: &str) -> Result<DateTime<Utc>, DataError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DataError::Other(format!("invalid timestamp '{raw}': {e}")))
}

/// Decimal places kept by decimal columns.
pub const MONEY_SCALE: u32 = 2;

fn minor_units(d: &Decimal) -> Option<i64> {
    let d = d.normalize();
    if d.scale() > MONEY_SCALE {
        return None;
    }
    d.checked_mul(Decimal::from(10_i64.pow(MONEY_SCALE)))?.to_i64()
}

/// Whether `d` can be written to a decimal column without loss.
pub fn is_storable_decimal(d: &Decimal) -> bool {
    minor_units(d).is_some()
}

/// Largest amount a decimal column holds.
pub fn max_storable_decimal() -> Decimal {
    Decimal::new(i64::MAX, MONEY_SCALE)
}

pub fn decimal_to_sql(d: &Decimal) -> Result<i64, DataError> {
    minor_units(d).ok_or_else(|| {
        DataError::Other(format!(
            "decimal {d} needs more than {MONEY_SCALE} places or exceeds the column range"
        ))
    })
}

pub fn decimal_from_sql(units: i64) -> Decimal {
    Decimal::new(units, MONEY_SCALE).normalize()
}

pub fn list_to_sql(items: &[String]) -> Result<String, DataError> {
    serde_json::to_string(items).map_err(DataError::database)
}

pub fn list_from_sql(raw: &str) -> Result<Vec<String>, DataError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(DataError::database)
}

/// Convert a [`DataError`] raised while decoding a row into the error type
/// `sqlx::FromRow` implementations must return.
pub fn decode_error(column: &str, err: DataError) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    }
}

/// Push a [`Value`] onto an argument list with the encodings above.
pub(crate) fn bind_value<'q>(
    args: &mut SqliteArguments<'q>,
    value: Value,
) -> Result<(), DataError> {
    use sqlx::Arguments;
    let pushed = match value {
        Value::Null => args.add(Option::<String>::None),
        Value::Bool(b) => args.add(b),
        Value::Int(i) => args.add(i),
        Value::Decimal(d) => args.add(decimal_to_sql(&d)?),
        Value::Text(s) => args.add(s),
        Value::Timestamp(ts) => args.add(timestamp_to_sql(&ts)),
        Value::List(items) => args.add(list_to_sql(&items)?),
    };
    pushed.map_err(|e| DataError::Other(format!("failed to bind parameter: {e}")))
}

pub(crate) fn arguments<'q>(values: Vec<Value>) -> Result<SqliteArguments<'q>, DataError> {
    let mut args = SqliteArguments::default();
    for value in values {
        bind_value(&mut args, value)?;
    }
    Ok(args)
}

/// Read the first column of a row without knowing its type up front.
pub(crate) fn first_column(row: &SqliteRow) -> Result<Value, DataError> {
    let raw = row.try_get_raw(0).map_err(DataError::database)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_ascii_uppercase();
    let value = match type_name.as_str() {
        "INTEGER" | "INT" | "BIGINT" => {
            Value::Int(row.try_get::<i64, _>(0).map_err(DataError::database)?)
        }
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(0).map_err(DataError::database)?),
        "REAL" | "NUMERIC" | "DOUBLE" => {
            let f = row.try_get::<f64, _>(0).map_err(DataError::database)?;
            Decimal::from_f64(f)
                .map(Value::Decimal)
                .ok_or_else(|| DataError::Other(format!("invalid decimal value {f}")))?
        }
        _ => Value::Text(row.try_get::<String, _>(0).map_err(DataError::database)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn current_time_survives_a_round_trip() {
        let now = timestamp_now();
        assert_eq!(timestamp_from_sql(&timestamp_to_sql(&now)).unwrap(), now);
    }

    #[test]
    fn timestamps_are_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let b = a + chrono::Duration::milliseconds(500);
        let (sa, sb) = (timestamp_to_sql(&a), timestamp_to_sql(&b));
        assert_eq!(sa.len(), sb.len());
        assert!(sa < sb);
        assert_eq!(timestamp_from_sql(&sa).unwrap(), a);
    }

    #[test]
    fn decimals_are_stored_as_exact_minor_units() {
        let price = Decimal::new(1999, 2);
        assert_eq!(decimal_to_sql(&price).unwrap(), 1999);
        assert_eq!(decimal_from_sql(1999), price);

        let large = Decimal::from_str_exact("123456789012345678.25").unwrap();
        assert!(!is_storable_decimal(&large));
        let edge = max_storable_decimal();
        assert_eq!(decimal_from_sql(decimal_to_sql(&edge).unwrap()), edge);
        assert!(decimal_to_sql(&(edge + Decimal::new(1, 2))).is_err());
    }

    #[test]
    fn extra_decimal_places_are_refused_not_rounded() {
        assert!(decimal_to_sql(&Decimal::from_str_exact("10.0000004").unwrap()).is_err());
        assert_eq!(decimal_to_sql(&Decimal::from_str_exact("10.500").unwrap()).unwrap(), 1050);
        assert_eq!(decimal_to_sql(&Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn empty_list_column_decodes_to_empty_vec() {
        assert!(list_from_sql("").unwrap().is_empty());
        assert_eq!(list_from_sql("[\"a\"]").unwrap(), vec!["a".to_string()]);
    }
}
