use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::NewWeek;
use crate::domain::Week;
use crate::scoring::types::WeekId;

const WEEK_COLUMNS: &str = "id, week_number, bowling_date, is_complete, predictions_locked, created_at";

pub fn insert_week(conn: &mut DbConn, week: &NewWeek) -> Result<Week> {
    let sql = format!(
        "INSERT INTO weeks (week_number, bowling_date) VALUES (?1, ?2) RETURNING {}",
        WEEK_COLUMNS
    );

    conn.query_row(&sql, params![week.week_number, week.bowling_date], parse_week_row)
        .with_context(|| format!("Failed to insert week {}", week.week_number))
}

fn parse_week_row(row: &rusqlite::Row) -> rusqlite::Result<Week> {
    Ok(Week {
        id: row.get(0)?,
        week_number: row.get(1)?,
        bowling_date: row.get(2)?,
        is_complete: row.get(3)?,
        predictions_locked: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: WeekId) -> Result<Option<Week>> {
    let sql = format!("SELECT {} FROM weeks WHERE id = ?1", WEEK_COLUMNS);

    conn.query_row(&sql, params![id], parse_week_row)
        .optional()
        .context("Failed to query week by id")
}

pub fn find_by_number(conn: &mut DbConn, week_number: i32) -> Result<Option<Week>> {
    let sql = format!("SELECT {} FROM weeks WHERE week_number = ?1", WEEK_COLUMNS);

    conn.query_row(&sql, params![week_number], parse_week_row)
        .optional()
        .context("Failed to query week by number")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Week>> {
    let sql = format!("SELECT {} FROM weeks ORDER BY week_number", WEEK_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_week_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_predictions_locked(conn: &mut DbConn, id: WeekId, locked: bool) -> Result<Option<Week>> {
    let sql = format!(
        "UPDATE weeks SET predictions_locked = ?1 WHERE id = ?2 RETURNING {}",
        WEEK_COLUMNS
    );

    conn.query_row(&sql, params![locked, id], parse_week_row)
        .optional()
        .context("Failed to update predictions lock")
}

pub fn set_complete(conn: &mut DbConn, id: WeekId, complete: bool) -> Result<Option<Week>> {
    let sql = format!(
        "UPDATE weeks SET is_complete = ?1 WHERE id = ?2 RETURNING {}",
        WEEK_COLUMNS
    );

    conn.query_row(&sql, params![complete, id], parse_week_row)
        .optional()
        .context("Failed to update week completion")
}
