use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::connection::DbConn;
use crate::domain::{Prediction, SeriesPrediction};
use crate::errors::with_storage_context;
use crate::scoring::types::{BowlerId, WeekId};

const PREDICTION_COLUMNS: &str = "week_id, predictor_id, target_id, game_number, predicted_score";

const UPSERT_SQL: &str = "INSERT INTO predictions (week_id, predictor_id, target_id, game_number, predicted_score) VALUES (?1, ?2, ?3, ?4, ?5) \
    ON CONFLICT (week_id, predictor_id, target_id, game_number) DO UPDATE SET predicted_score = excluded.predicted_score, updated_at = CURRENT_TIMESTAMP \
    RETURNING week_id, predictor_id, target_id, game_number, predicted_score";

const SERIES_COLUMNS: &str = "week_id, predictor_id, target_id, predicted_series";

const UPSERT_SERIES_SQL: &str = "INSERT INTO series_predictions (week_id, predictor_id, target_id, predicted_series) VALUES (?1, ?2, ?3, ?4) \
    ON CONFLICT (week_id, predictor_id, target_id) DO UPDATE SET predicted_series = excluded.predicted_series, updated_at = CURRENT_TIMESTAMP \
    RETURNING week_id, predictor_id, target_id, predicted_series";

pub fn upsert_prediction(conn: &mut DbConn, prediction: &Prediction) -> Result<Prediction> {
    upsert_row(conn, prediction)
}

/// Upserts every prediction or none of them.
pub fn batch_upsert_predictions(conn: &mut DbConn, predictions: &[Prediction]) -> Result<Vec<Prediction>> {
    let tx = with_storage_context(conn.transaction(), "start", "prediction batch")?;

    let mut saved = Vec::with_capacity(predictions.len());
    for prediction in predictions {
        saved.push(upsert_row(&tx, prediction)?);
    }

    with_storage_context(tx.commit(), "commit", "prediction batch")?;
    log::debug!("Upserted {} predictions", saved.len());
    Ok(saved)
}

fn upsert_row(conn: &Connection, prediction: &Prediction) -> Result<Prediction> {
    conn.query_row(
        UPSERT_SQL,
        params![
            prediction.week_id,
            prediction.predictor_id,
            prediction.target_id,
            prediction.game_number,
            prediction.predicted_score
        ],
        parse_prediction_row,
    )
    .with_context(|| {
        format!(
            "Failed to upsert prediction by {} for bowler {} game {}",
            prediction.predictor_id, prediction.target_id, prediction.game_number
        )
    })
}

fn parse_prediction_row(row: &rusqlite::Row) -> rusqlite::Result<Prediction> {
    Ok(Prediction {
        week_id: row.get(0)?,
        predictor_id: row.get(1)?,
        target_id: row.get(2)?,
        game_number: row.get(3)?,
        predicted_score: row.get(4)?,
    })
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Prediction>> {
    let sql = format!(
        "SELECT {} FROM predictions ORDER BY week_id, predictor_id, target_id, game_number",
        PREDICTION_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_prediction_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_week(conn: &mut DbConn, week_id: WeekId) -> Result<Vec<Prediction>> {
    let sql = format!(
        "SELECT {} FROM predictions WHERE week_id = ?1 ORDER BY predictor_id, target_id, game_number",
        PREDICTION_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![week_id], parse_prediction_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_week_and_predictor(
    conn: &mut DbConn,
    week_id: WeekId,
    predictor_id: BowlerId,
) -> Result<Vec<Prediction>> {
    let sql = format!(
        "SELECT {} FROM predictions WHERE week_id = ?1 AND predictor_id = ?2 ORDER BY target_id, game_number",
        PREDICTION_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![week_id, predictor_id], parse_prediction_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn upsert_series_prediction(conn: &mut DbConn, prediction: &SeriesPrediction) -> Result<SeriesPrediction> {
    conn.query_row(
        UPSERT_SERIES_SQL,
        params![
            prediction.week_id,
            prediction.predictor_id,
            prediction.target_id,
            prediction.predicted_series
        ],
        parse_series_row,
    )
    .context("Failed to upsert series prediction")
}

fn parse_series_row(row: &rusqlite::Row) -> rusqlite::Result<SeriesPrediction> {
    Ok(SeriesPrediction {
        week_id: row.get(0)?,
        predictor_id: row.get(1)?,
        target_id: row.get(2)?,
        predicted_series: row.get(3)?,
    })
}

pub fn list_all_series(conn: &mut DbConn) -> Result<Vec<SeriesPrediction>> {
    let sql = format!(
        "SELECT {} FROM series_predictions ORDER BY week_id, predictor_id, target_id",
        SERIES_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_series_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_series_by_week(conn: &mut DbConn, week_id: WeekId) -> Result<Vec<SeriesPrediction>> {
    let sql = format!(
        "SELECT {} FROM series_predictions WHERE week_id = ?1 ORDER BY predictor_id, target_id",
        SERIES_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![week_id], parse_series_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
