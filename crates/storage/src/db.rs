use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("invalid feature table name '{0}': only ASCII letters, digits and '_' are allowed")]
    InvalidTableName(String),
    #[error("failed to open warehouse: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Opens a read-only pool on the warehouse database at `url`.
pub async fn connect_pool(url: &str, acquire_timeout: Duration) -> Result<SqlitePool, SetupError> {
    let options = SqliteConnectOptions::from_str(url)?
        .read_only(true)
        .busy_timeout(Duration::from_secs(30))
        .statement_cache_capacity(100);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;

    info!("Connected to warehouse at {}", url);
    Ok(pool)
}

/// Table names are interpolated into SQL, so they are restricted to plain
/// identifiers.
pub fn validate_table_name(name: &str) -> Result<(), SetupError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(SetupError::InvalidTableName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("features").is_ok());
        assert!(validate_table_name("_fx_features_v2").is_ok());

        for bad in ["", "2features", "features; DROP TABLE x", "fx-features", "f\"x"] {
            assert!(
                matches!(validate_table_name(bad), Err(SetupError::InvalidTableName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_database_fails() {
        let result = connect_pool(
            "sqlite:/nonexistent-dir/warehouse.db",
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(SetupError::Connect(_))));
    }
}
