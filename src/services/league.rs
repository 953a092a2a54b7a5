use anyhow::Result;
use log::{info, warn};

use crate::config::settings::AppConfig;
use crate::database::{self, BowlerUpdate, DbConn, DbPool, NewBowler, NewWeek};
use crate::domain::validation::{validate_game_scores, validate_predictions, validate_series_prediction};
use crate::domain::{Bowler, BowlerStats, GameScore, Prediction, SeriesPrediction, Week, WeeklySeries};
use crate::errors::LeagueError;
use crate::scoring::predictions::{self, resolve_series_week, resolve_week};
use crate::scoring::stats::{self, DistributionBucket, PersonalBest, TeamSummary, TrendPoint};
use crate::scoring::types::{BowlerId, GameNumber, LeaderboardEntry, PredictionResult, Score, SeriesTotals, WeekId};
use crate::scoring::handicap::series_with_handicap;

/// Reads source rows from storage and recomputes every derived view on each
/// call; nothing derived is kept between calls.
#[derive(Clone)]
pub struct LeagueService {
    pool: DbPool,
    config: AppConfig,
}

impl LeagueService {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    pub fn open(config: AppConfig) -> Result<Self> {
        let pool = database::create_pool(&config.database.path)?;
        Ok(Self::new(pool, config))
    }

    fn conn(&self) -> Result<DbConn> {
        database::get_connection(&self.pool).map_err(|e| LeagueError::Storage(e).into())
    }

    pub fn initialize(&self) -> Result<()> {
        let mut conn = self.conn()?;
        database::setup::ensure_schema(&mut conn)
    }

    pub fn reset(&self) -> Result<()> {
        let mut conn = self.conn()?;
        warn!("Dropping all league data");
        database::setup::reset_database(&mut conn)
    }

    // --- bowlers ---

    pub fn add_bowler(&self, bowler: &NewBowler) -> Result<Bowler> {
        let mut conn = self.conn()?;
        let saved = database::bowlers::insert_bowler(&mut conn, bowler)?;
        info!("Added bowler {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    pub fn update_bowler(&self, bowler_id: BowlerId, update: &BowlerUpdate) -> Result<Bowler> {
        let mut conn = self.conn()?;
        database::bowlers::update_bowler(&mut conn, bowler_id, update)?
            .ok_or_else(|| LeagueError::not_found("Bowler", bowler_id).into())
    }

    pub fn bowlers(&self) -> Result<Vec<Bowler>> {
        let mut conn = self.conn()?;
        database::bowlers::list_all(&mut conn)
    }

    pub fn bowler(&self, bowler_id: BowlerId) -> Result<Bowler> {
        let mut conn = self.conn()?;
        database::bowlers::find_by_id(&mut conn, bowler_id)?
            .ok_or_else(|| LeagueError::not_found("Bowler", bowler_id).into())
    }

    // --- weeks ---

    pub fn create_week(&self, week: &NewWeek) -> Result<Week> {
        let mut conn = self.conn()?;
        let saved = database::weeks::insert_week(&mut conn, week)?;
        info!("Created week {}", saved.week_number);
        Ok(saved)
    }

    pub fn weeks(&self) -> Result<Vec<Week>> {
        let mut conn = self.conn()?;
        database::weeks::list_all(&mut conn)
    }

    pub fn week(&self, week_id: WeekId) -> Result<Week> {
        let mut conn = self.conn()?;
        find_week(&mut conn, week_id)
    }

    pub fn week_by_number(&self, week_number: i32) -> Result<Week> {
        let mut conn = self.conn()?;
        database::weeks::find_by_number(&mut conn, week_number)?
            .ok_or_else(|| LeagueError::not_found("Week", week_number).into())
    }

    pub fn lock_predictions(&self, week_id: WeekId, locked: bool) -> Result<Week> {
        let mut conn = self.conn()?;
        let week = database::weeks::set_predictions_locked(&mut conn, week_id, locked)?
            .ok_or_else(|| LeagueError::not_found("Week", week_id))?;
        info!("Week {} predictions {}", week.week_number, if locked { "locked" } else { "unlocked" });
        Ok(week)
    }

    pub fn complete_week(&self, week_id: WeekId, complete: bool) -> Result<Week> {
        let mut conn = self.conn()?;
        let week = database::weeks::set_complete(&mut conn, week_id, complete)?
            .ok_or_else(|| LeagueError::not_found("Week", week_id))?;
        info!("Week {} marked as {}", week.week_number, week.status().as_str());
        Ok(week)
    }

    // --- writes ---

    /// Validates the whole batch before anything is written.
    pub fn record_scores(&self, games: &[GameScore]) -> Result<Vec<GameScore>> {
        validate_game_scores(games)?;
        if games.is_empty() {
            warn!("No scores to save");
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        for week_id in distinct_weeks(games.iter().map(|g| g.week_id)) {
            find_week(&mut conn, week_id)?;
        }

        let saved = database::games::batch_upsert_games(&mut conn, games)
            .map_err(LeagueError::Storage)?;
        info!("Saved {} scores", saved.len());
        Ok(saved)
    }

    pub fn delete_score(&self, week_id: WeekId, bowler_id: BowlerId, game_number: GameNumber) -> Result<bool> {
        let mut conn = self.conn()?;
        let removed = database::games::delete_game(&mut conn, week_id, bowler_id, game_number)?;
        if removed {
            info!("Removed game {} for bowler {} in week {}", game_number, bowler_id, week_id);
        }
        Ok(removed)
    }

    pub fn record_predictions(&self, predictions: &[Prediction]) -> Result<Vec<Prediction>> {
        validate_predictions(predictions)?;
        if predictions.is_empty() {
            warn!("No predictions to save");
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        for week_id in distinct_weeks(predictions.iter().map(|p| p.week_id)) {
            ensure_predictions_open(&mut conn, week_id)?;
        }

        let saved = database::predictions::batch_upsert_predictions(&mut conn, predictions)
            .map_err(LeagueError::Storage)?;
        info!("Saved {} predictions", saved.len());
        Ok(saved)
    }

    pub fn record_series_prediction(&self, prediction: &SeriesPrediction) -> Result<SeriesPrediction> {
        validate_series_prediction(prediction)?;

        let mut conn = self.conn()?;
        ensure_predictions_open(&mut conn, prediction.week_id)?;

        database::predictions::upsert_series_prediction(&mut conn, prediction)
            .map_err(|e| LeagueError::Storage(e).into())
    }

    // --- derived views ---

    /// Stats for one bowler, or for every bowler with games when `bowler_id` is `None`.
    pub fn bowler_stats(&self, bowler_id: Option<BowlerId>) -> Result<Vec<BowlerStats>> {
        let mut conn = self.conn()?;
        let settings = &self.config.handicap;

        match bowler_id {
            Some(id) => {
                let games = database::games::list_by_bowler(&mut conn, id)?;
                Ok(vec![stats::bowler_stats(id, &games, settings)])
            }
            None => {
                let games = database::games::list_all(&mut conn)?;
                Ok(stats::all_bowler_stats(&games, settings))
            }
        }
    }

    pub fn weekly_series(&self, week_id: Option<WeekId>) -> Result<Vec<WeeklySeries>> {
        let mut conn = self.conn()?;
        let weeks = database::weeks::list_all(&mut conn)?;
        let games = match week_id {
            Some(id) => database::games::list_by_week(&mut conn, id)?,
            None => database::games::list_all(&mut conn)?,
        };
        Ok(stats::weekly_series(&games, &weeks))
    }

    /// A bowler's week with the current all-time handicap applied per game.
    pub fn series_with_handicap(&self, week_id: WeekId, bowler_id: BowlerId) -> Result<SeriesTotals> {
        let mut conn = self.conn()?;
        let history = database::games::list_by_bowler(&mut conn, bowler_id)?;
        let handicap = stats::bowler_stats(bowler_id, &history, &self.config.handicap).handicap;

        let week_scores: Vec<Score> = history
            .iter()
            .filter(|g| g.week_id == week_id)
            .filter_map(|g| g.score)
            .collect();

        Ok(series_with_handicap(&week_scores, handicap))
    }

    /// Per-game results for the week followed by any legacy series results.
    pub fn week_results(&self, week_id: WeekId) -> Result<Vec<PredictionResult>> {
        let mut conn = self.conn()?;
        let week = find_week(&mut conn, week_id)?;
        week_results_for(&mut conn, &week)
    }

    pub fn all_results(&self) -> Result<Vec<PredictionResult>> {
        let mut conn = self.conn()?;
        let weeks = database::weeks::list_all(&mut conn)?;

        let mut results = Vec::new();
        for week in &weeks {
            results.extend(week_results_for(&mut conn, week)?);
        }
        Ok(results)
    }

    pub fn weekly_leaderboard(&self, week_id: WeekId) -> Result<Vec<LeaderboardEntry>> {
        let results = self.week_results(week_id)?;
        Ok(predictions::weekly_leaderboard(&results, week_id))
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let results = self.all_results()?;
        Ok(predictions::leaderboard(&results))
    }

    pub fn weekly_winner(&self, week_id: WeekId) -> Result<Option<LeaderboardEntry>> {
        let results = self.week_results(week_id)?;
        Ok(predictions::weekly_winner(&results, week_id))
    }

    /// `(week_number, winner)` for every week with a resolved result, newest first.
    pub fn weekly_winners(&self) -> Result<Vec<(i32, LeaderboardEntry)>> {
        let results = self.all_results()?;
        Ok(predictions::weekly_winners(&results))
    }

    pub fn handicap_trend(&self, bowler_id: BowlerId) -> Result<Vec<TrendPoint>> {
        let mut conn = self.conn()?;
        let weeks = database::weeks::list_all(&mut conn)?;
        let games = database::games::list_by_bowler(&mut conn, bowler_id)?;
        Ok(stats::handicap_trend(bowler_id, &games, &weeks, &self.config.handicap))
    }

    pub fn personal_bests(&self) -> Result<Vec<PersonalBest>> {
        let mut conn = self.conn()?;
        let bowlers = database::bowlers::list_all(&mut conn)?;
        let weeks = database::weeks::list_all(&mut conn)?;
        let games = database::games::list_all(&mut conn)?;

        let ids: Vec<BowlerId> = bowlers.iter().map(|b| b.id).collect();
        let all_stats = stats::all_bowler_stats(&games, &self.config.handicap);
        let series = stats::weekly_series(&games, &weeks);
        Ok(stats::personal_bests(&ids, &all_stats, &series))
    }

    pub fn team_summary(&self) -> Result<Option<TeamSummary>> {
        let all_stats = self.bowler_stats(None)?;
        Ok(stats::team_summary(&all_stats))
    }

    pub fn score_distribution(&self, bowler_id: Option<BowlerId>) -> Result<Vec<DistributionBucket>> {
        let mut conn = self.conn()?;
        let games = match bowler_id {
            Some(id) => database::games::list_by_bowler(&mut conn, id)?,
            None => database::games::list_all(&mut conn)?,
        };
        let scores: Vec<Score> = games.iter().filter_map(|g| g.score).collect();
        Ok(stats::score_distribution(&scores))
    }
}

fn find_week(conn: &mut DbConn, week_id: WeekId) -> Result<Week> {
    database::weeks::find_by_id(conn, week_id)?
        .ok_or_else(|| LeagueError::not_found("Week", week_id).into())
}

fn ensure_predictions_open(conn: &mut DbConn, week_id: WeekId) -> Result<()> {
    let week = find_week(conn, week_id)?;
    if !week.accepts_predictions() {
        warn!("Rejected predictions for week {} ({})", week.week_number, week.status().as_str());
        return Err(LeagueError::WeekLocked {
            week_number: week.week_number,
        }
        .into());
    }
    Ok(())
}

fn week_results_for(conn: &mut DbConn, week: &Week) -> Result<Vec<PredictionResult>> {
    let games = database::games::list_by_week(conn, week.id)?;
    let game_predictions = database::predictions::list_by_week(conn, week.id)?;
    let series_predictions = database::predictions::list_series_by_week(conn, week.id)?;

    let mut results = resolve_week(week, &game_predictions, &games);
    if !series_predictions.is_empty() {
        let series = stats::weekly_series(&games, std::slice::from_ref(week));
        results.extend(resolve_series_week(week, &series_predictions, &series));
    }
    Ok(results)
}

fn distinct_weeks(ids: impl Iterator<Item = WeekId>) -> Vec<WeekId> {
    let mut ids: Vec<WeekId> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
