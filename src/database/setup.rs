use anyhow::{Context, Result};

use super::connection::DbConn;

const DROP_SQL: &str = "
    DROP TABLE IF EXISTS series_predictions;
    DROP TABLE IF EXISTS predictions;
    DROP TABLE IF EXISTS games;
    DROP TABLE IF EXISTS weeks;
    DROP TABLE IF EXISTS bowlers;
";

/// Creates any missing tables; existing data is left alone.
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    run_statements(conn, include_str!("schema.sql"))?;
    log::info!("Database schema ready");
    Ok(())
}

pub fn reset_database(conn: &mut DbConn) -> Result<()> {
    run_statements(conn, DROP_SQL)?;
    run_statements(conn, include_str!("schema.sql"))?;
    log::info!("Database schema reset successfully");
    Ok(())
}

fn run_statements(conn: &mut DbConn, sql: &str) -> Result<()> {
    let statements = split_sql_statements(sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
