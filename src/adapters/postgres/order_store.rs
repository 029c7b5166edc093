//! PostgreSQL implementation of OrderStore.
//!
//! Expects a table with at least:
//!
//! ```sql
//! checkout_session_id TEXT UNIQUE NOT NULL,
//! paid                BOOLEAN NOT NULL DEFAULT FALSE
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use crate::ports::{CollaboratorError, OrderStore};

/// PostgreSQL implementation of the OrderStore port.
pub struct PostgresOrderStore {
    pool: PgPool,
    update_sql: String,
}

impl PostgresOrderStore {
    /// Creates a store writing to `table`.
    ///
    /// `table` is interpolated into SQL and must already be a validated
    /// identifier (see `CollaboratorsConfig::validate`).
    pub fn new(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            update_sql: update_statement(table),
        }
    }
}

fn update_statement(table: &str) -> String {
    format!(
        "UPDATE {} SET paid = $2 WHERE checkout_session_id = $1",
        table
    )
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn mark_paid(
        &self,
        checkout_session_id: &str,
        paid: bool,
    ) -> Result<u64, CollaboratorError> {
        let result = sqlx::query(&self.update_sql)
            .bind(checkout_session_id)
            .bind(paid)
            .execute(&self.pool)
            .await
            .map_err(|e| CollaboratorError::Database(format!("Failed to update order: {}", e)))?;

        Ok(result.rows_affected())
    }
}
