use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{BowlerUpdate, NewBowler};
use crate::domain::Bowler;
use crate::scoring::types::BowlerId;

const BOWLER_COLUMNS: &str = "id, name, nickname, pin_code, avatar_color, created_at";

pub fn insert_bowler(conn: &mut DbConn, bowler: &NewBowler) -> Result<Bowler> {
    let sql = format!(
        "INSERT INTO bowlers (name, nickname, pin_code, avatar_color) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        BOWLER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            bowler.name,
            bowler.nickname,
            bowler.pin_code,
            bowler.avatar_color
        ],
        parse_bowler_row,
    )
    .context("Failed to insert bowler")
}

pub fn update_bowler(conn: &mut DbConn, id: BowlerId, update: &BowlerUpdate) -> Result<Option<Bowler>> {
    let sql = format!(
        "UPDATE bowlers SET name = COALESCE(?1, name), nickname = COALESCE(?2, nickname), pin_code = COALESCE(?3, pin_code), avatar_color = COALESCE(?4, avatar_color) WHERE id = ?5 RETURNING {}",
        BOWLER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            update.name,
            update.nickname,
            update.pin_code,
            update.avatar_color,
            id
        ],
        parse_bowler_row,
    )
    .optional()
    .context("Failed to update bowler")
}

fn parse_bowler_row(row: &rusqlite::Row) -> rusqlite::Result<Bowler> {
    Ok(Bowler {
        id: row.get(0)?,
        name: row.get(1)?,
        nickname: row.get(2)?,
        pin_code: row.get(3)?,
        avatar_color: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: BowlerId) -> Result<Option<Bowler>> {
    let sql = format!("SELECT {} FROM bowlers WHERE id = ?1", BOWLER_COLUMNS);

    conn.query_row(&sql, params![id], parse_bowler_row)
        .optional()
        .context("Failed to query bowler by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Bowler>> {
    let sql = format!("SELECT {} FROM bowlers ORDER BY name", BOWLER_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_bowler_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::test_conn;

    fn new_bowler(name: &str) -> NewBowler {
        NewBowler {
            name: name.to_string(),
            nickname: None,
            pin_code: None,
            avatar_color: "#ff0000".to_string(),
        }
    }

    #[test]
    fn test_insert_and_list_sorted_by_name() {
        let mut conn = test_conn();
        insert_bowler(&mut conn, &new_bowler("Zed")).unwrap();
        let alice = insert_bowler(&mut conn, &new_bowler("Alice")).unwrap();

        let bowlers = list_all(&mut conn).unwrap();
        assert_eq!(bowlers.len(), 2);
        assert_eq!(bowlers[0].name, "Alice");
        assert!(bowlers[0].created_at.is_some());

        let found = find_by_id(&mut conn, alice.id).unwrap();
        assert_eq!(found.map(|b| b.name), Some("Alice".to_string()));
    }

    #[test]
    fn test_update_keeps_untouched_columns() {
        let mut conn = test_conn();
        let bowler = insert_bowler(&mut conn, &new_bowler("Bob")).unwrap();

        let update = BowlerUpdate {
            pin_code: Some("1234".to_string()),
            ..Default::default()
        };
        let updated = update_bowler(&mut conn, bowler.id, &update).unwrap().unwrap();

        assert_eq!(updated.name, "Bob");
        assert_eq!(updated.pin_code.as_deref(), Some("1234"));
        assert_eq!(updated.avatar_color, "#ff0000");

        assert!(update_bowler(&mut conn, 999, &update).unwrap().is_none());
    }
}
