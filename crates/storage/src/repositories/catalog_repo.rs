use sqlx::sqlite::SqlitePool;

pub struct CatalogRepository;

impl CatalogRepository {
    pub async fn distinct_symbols(pool: &SqlitePool, table: &str) -> Result<Vec<String>, sqlx::Error> {
        let sql = format!(
            r#"SELECT DISTINCT symbol FROM "{table}" WHERE symbol IS NOT NULL ORDER BY symbol"#
        );
        sqlx::query_scalar::<_, String>(&sql).fetch_all(pool).await
    }

    /// Column names in declaration order. Empty when the table does not exist.
    pub async fn column_names(pool: &SqlitePool, table: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?) ORDER BY cid")
            .bind(table)
            .fetch_all(pool)
            .await
    }
}
