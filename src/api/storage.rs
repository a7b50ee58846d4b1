//! Database helpers for the booklet read and schema management.

use anyhow::{Context, Result};
use sqlx::{FromRow, PgPool, Row, postgres::PgRow};
use tracing::{Instrument, info_span};

use super::types::Booklet;

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));
pub const RESET_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/reset.sql"));

/// Every booklet row, unfiltered and unpaginated.
///
/// Not scoped to any caller; see the crate docs.
pub async fn list_booklets(pool: &PgPool) -> Result<Vec<Booklet>> {
    let query = r#"SELECT id, name, owner_id, created_at FROM "booklet""#;
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_as::<_, Booklet>(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list booklets")
}

impl<'r> FromRow<'r, PgRow> for Booklet {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            owner_id: row.try_get("owner_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Create every table the app and the auth delegate rely on.
pub async fn apply_schema(pool: &PgPool) -> Result<usize> {
    execute_script(pool, SCHEMA_SQL, "schema").await
}

/// Drop every table, including the migration bookkeeping table.
pub async fn reset(pool: &PgPool) -> Result<usize> {
    execute_script(pool, RESET_SQL, "reset").await
}

async fn execute_script(pool: &PgPool, sql: &str, name: &str) -> Result<usize> {
    let statements = split_sql_statements(sql);
    let mut tx = pool
        .begin()
        .await
        .with_context(|| format!("begin {name} transaction"))?;

    for (index, statement) in statements.iter().enumerate() {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "DDL");
        sqlx::query(statement)
            .execute(&mut *tx)
            .instrument(span)
            .await
            .with_context(|| format!("failed to execute {name} statement {}", index + 1))?;
    }

    tx.commit()
        .await
        .with_context(|| format!("commit {name} transaction"))?;

    Ok(statements.len())
}

/// Split a script on statement-terminating semicolons, skipping comment lines.
pub(crate) fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}
