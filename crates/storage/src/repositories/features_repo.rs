use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use common::models::{FeatureRow, PricePoint};

/// Column every feature table is ordered by.
const TIMESTAMP_COLUMN: &str = "date";

pub struct FeaturesRepository;

impl FeaturesRepository {
    pub async fn latest_for_symbol(
        pool: &SqlitePool,
        table: &str,
        symbol: &str,
        limit: i64,
    ) -> Result<Vec<FeatureRow>, sqlx::Error> {
        let sql = format!(
            r#"SELECT * FROM "{table}" WHERE symbol = ? ORDER BY "{TIMESTAMP_COLUMN}" DESC LIMIT ?"#
        );

        let rows = sqlx::query(&sql)
            .bind(symbol)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        rows.iter().map(to_feature_row).collect()
    }

    /// Returns the newest `limit` closes, reordered oldest first.
    pub async fn close_history(
        pool: &SqlitePool,
        table: &str,
        symbol: &str,
        limit: i64,
    ) -> Result<Vec<PricePoint>, sqlx::Error> {
        let sql = format!(
            r#"
                SELECT "{TIMESTAMP_COLUMN}" AS date, close FROM "{table}"
                WHERE symbol = ?
                ORDER BY "{TIMESTAMP_COLUMN}" DESC
                LIMIT ?
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(symbol)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let mut points = rows
            .iter()
            .map(|row| {
                Ok(PricePoint::new(
                    column_value(row, 0)?,
                    row.try_get::<Option<f64>, _>(1)?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        points.reverse();
        Ok(points)
    }
}

fn to_feature_row(row: &SqliteRow) -> Result<FeatureRow, sqlx::Error> {
    let mut values = Map::with_capacity(row.len());
    for column in row.columns() {
        values.insert(column.name().to_string(), column_value(row, column.ordinal())?);
    }
    Ok(FeatureRow::from(values))
}

fn column_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    // Storage class of the value itself, not the declared column type.
    let storage_class = raw.type_info().name().to_string();
    let value = match storage_class.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => Number::from_f64(row.try_get::<f64, _>(idx)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => Value::String(String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(idx)?).into()),
        _ => Value::String(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}
