use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::connection::DbConn;
use crate::domain::GameScore;
use crate::errors::with_storage_context;
use crate::scoring::types::{BowlerId, GameNumber, WeekId};

const GAME_COLUMNS: &str = "week_id, bowler_id, game_number, score";

const UPSERT_SQL: &str = "INSERT INTO games (week_id, bowler_id, game_number, score) VALUES (?1, ?2, ?3, ?4) \
    ON CONFLICT (week_id, bowler_id, game_number) DO UPDATE SET score = excluded.score, updated_at = CURRENT_TIMESTAMP \
    RETURNING week_id, bowler_id, game_number, score";

pub fn upsert_game(conn: &mut DbConn, game: &GameScore) -> Result<GameScore> {
    upsert_row(conn, game)
}

/// Upserts every game or none of them.
pub fn batch_upsert_games(conn: &mut DbConn, games: &[GameScore]) -> Result<Vec<GameScore>> {
    let tx = with_storage_context(conn.transaction(), "start", "game batch")?;

    let mut saved = Vec::with_capacity(games.len());
    for game in games {
        saved.push(upsert_row(&tx, game)?);
    }

    with_storage_context(tx.commit(), "commit", "game batch")?;
    log::debug!("Upserted {} games", saved.len());
    Ok(saved)
}

fn upsert_row(conn: &Connection, game: &GameScore) -> Result<GameScore> {
    conn.query_row(
        UPSERT_SQL,
        params![game.week_id, game.bowler_id, game.game_number, game.score],
        parse_game_row,
    )
    .with_context(|| {
        format!(
            "Failed to upsert game {} for bowler {} in week {}",
            game.game_number, game.bowler_id, game.week_id
        )
    })
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<GameScore> {
    Ok(GameScore {
        week_id: row.get(0)?,
        bowler_id: row.get(1)?,
        game_number: row.get(2)?,
        score: row.get(3)?,
    })
}

/// Returns whether a row was removed.
pub fn delete_game(
    conn: &mut DbConn,
    week_id: WeekId,
    bowler_id: BowlerId,
    game_number: GameNumber,
) -> Result<bool> {
    let sql = "DELETE FROM games WHERE week_id = ?1 AND bowler_id = ?2 AND game_number = ?3";

    let removed = conn
        .execute(sql, params![week_id, bowler_id, game_number])
        .context("Failed to delete game")?;
    Ok(removed > 0)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<GameScore>> {
    let sql = format!("SELECT {} FROM games ORDER BY week_id, bowler_id, game_number", GAME_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_week(conn: &mut DbConn, week_id: WeekId) -> Result<Vec<GameScore>> {
    let sql = format!(
        "SELECT {} FROM games WHERE week_id = ?1 ORDER BY bowler_id, game_number",
        GAME_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![week_id], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_bowler(conn: &mut DbConn, bowler_id: BowlerId) -> Result<Vec<GameScore>> {
    let sql = format!(
        "SELECT {} FROM games WHERE bowler_id = ?1 ORDER BY week_id, game_number",
        GAME_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![bowler_id], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_bowler, seed_week, test_conn};

    fn game(week_id: WeekId, bowler_id: BowlerId, game_number: GameNumber, score: Option<i32>) -> GameScore {
        GameScore {
            week_id,
            bowler_id,
            game_number,
            score,
        }
    }

    #[test]
    fn test_upsert_overwrites_by_natural_key() {
        let mut conn = test_conn();
        let bowler = seed_bowler(&mut conn, "Alice");
        let week = seed_week(&mut conn, 1);

        upsert_game(&mut conn, &game(week, bowler, GameNumber::First, Some(150))).unwrap();
        let saved = upsert_game(&mut conn, &game(week, bowler, GameNumber::First, Some(175))).unwrap();
        assert_eq!(saved.score, Some(175));

        let games = list_by_week(&mut conn, week).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].score, Some(175));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut conn = test_conn();
        let bowler = seed_bowler(&mut conn, "Alice");
        let week = seed_week(&mut conn, 1);

        let batch = vec![
            game(week, bowler, GameNumber::First, Some(150)),
            game(week, bowler, GameNumber::Second, Some(400)),
        ];
        assert!(batch_upsert_games(&mut conn, &batch).is_err());
        assert!(list_all(&mut conn).unwrap().is_empty());

        let batch = vec![
            game(week, bowler, GameNumber::First, Some(150)),
            game(week, bowler, GameNumber::Second, None),
            game(week, bowler, GameNumber::Third, Some(210)),
        ];
        let saved = batch_upsert_games(&mut conn, &batch).unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(list_by_bowler(&mut conn, bowler).unwrap()[1].score, None);
    }

    #[test]
    fn test_delete_game() {
        let mut conn = test_conn();
        let bowler = seed_bowler(&mut conn, "Alice");
        let week = seed_week(&mut conn, 1);
        upsert_game(&mut conn, &game(week, bowler, GameNumber::Second, Some(190))).unwrap();

        assert!(delete_game(&mut conn, week, bowler, GameNumber::Second).unwrap());
        assert!(!delete_game(&mut conn, week, bowler, GameNumber::Second).unwrap());
        assert!(list_all(&mut conn).unwrap().is_empty());
    }
}
