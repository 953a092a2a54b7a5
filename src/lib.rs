pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod scoring;
pub mod services;

use std::collections::HashMap;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use log::info;

use crate::cli::{BowlerCommand, Cli, ScoreArg, WeekCommand};
use crate::config::settings::AppConfig;
use crate::database::{BowlerUpdate, NewBowler, NewWeek};
use crate::domain::{Bowler, GameScore, Prediction, SeriesPrediction};
use crate::scoring::types::{BowlerId, GameNumber, LeaderboardEntry};
use crate::services::league::LeagueService;
use crate::services::server::ServerService;

pub fn interpret() -> Cli {
    Cli::parse()
}

fn open_league(config: &AppConfig) -> Result<LeagueService> {
    let league = LeagueService::open(config.clone())?;
    league.initialize()?;
    Ok(league)
}

fn bowler_names(league: &LeagueService) -> Result<HashMap<BowlerId, String>> {
    Ok(league
        .bowlers()?
        .into_iter()
        .map(|b| (b.id, display_name(&b)))
        .collect())
}

fn display_name(bowler: &Bowler) -> String {
    match &bowler.nickname {
        Some(nickname) => format!("{} ({})", bowler.name, nickname),
        None => bowler.name.clone(),
    }
}

fn name_of(names: &HashMap<BowlerId, String>, id: BowlerId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id))
}

pub fn handle_init(config: &AppConfig, reset: bool) -> Result<()> {
    let league = LeagueService::open(config.clone())?;
    if reset {
        league.reset()?;
    } else {
        league.initialize()?;
    }
    println!("Database ready at {}", config.database.path.bold());
    Ok(())
}

pub fn handle_serve(config: &AppConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = ServerService::new(port, config.clone());
        service.run().await
    })
}

pub fn handle_bowler(config: &AppConfig, command: &BowlerCommand) -> Result<()> {
    let league = open_league(config)?;

    match command {
        BowlerCommand::Add {
            name,
            nickname,
            pin,
            color,
        } => {
            let bowler = league.add_bowler(&NewBowler {
                name: name.clone(),
                nickname: nickname.clone(),
                pin_code: pin.clone(),
                avatar_color: color.clone(),
            })?;
            println!("Added {} with id {}", display_name(&bowler).bold(), bowler.id);
        }
        BowlerCommand::Update {
            id,
            name,
            nickname,
            pin,
            color,
        } => {
            let bowler = league.update_bowler(
                *id,
                &BowlerUpdate {
                    name: name.clone(),
                    nickname: nickname.clone(),
                    pin_code: pin.clone(),
                    avatar_color: color.clone(),
                },
            )?;
            println!("Updated {}", display_name(&bowler).bold());
        }
        BowlerCommand::List => {
            println!("{}", format!("{:>4}  {:<28} {}", "ID", "NAME", "COLOR").bold());
            for bowler in league.bowlers()? {
                println!("{:>4}  {:<28} {}", bowler.id, display_name(&bowler), bowler.avatar_color);
            }
        }
    }
    Ok(())
}

pub fn handle_week(config: &AppConfig, command: &WeekCommand) -> Result<()> {
    let league = open_league(config)?;

    let week = match command {
        WeekCommand::Add { number, date } => league.create_week(&NewWeek {
            week_number: *number,
            bowling_date: *date,
        })?,
        WeekCommand::List => {
            println!("{}", format!("{:>4}  {:<12} {}", "WEEK", "DATE", "STATUS").bold());
            for week in league.weeks()? {
                let date = week.bowling_date.map(|d| d.to_string()).unwrap_or_default();
                println!("{:>4}  {:<12} {}", week.week_number, date, week.status().as_str());
            }
            return Ok(());
        }
        WeekCommand::Lock { number } => league.lock_predictions(league.week_by_number(*number)?.id, true)?,
        WeekCommand::Unlock { number } => league.lock_predictions(league.week_by_number(*number)?.id, false)?,
        WeekCommand::Complete { number } => league.complete_week(league.week_by_number(*number)?.id, true)?,
        WeekCommand::Reopen { number } => league.complete_week(league.week_by_number(*number)?.id, false)?,
    };

    println!("Week {} is {}", week.week_number, week.status().as_str().bold());
    Ok(())
}

pub fn handle_score(config: &AppConfig, week_number: i32, bowler_id: BowlerId, games: &[ScoreArg]) -> Result<()> {
    let league = open_league(config)?;
    let week = league.week_by_number(week_number)?;
    league.bowler(bowler_id)?;

    let scores: Vec<GameScore> = GameNumber::ALL
        .iter()
        .zip(games)
        .map(|(&game_number, score)| GameScore {
            week_id: week.id,
            bowler_id,
            game_number,
            score: score.0,
        })
        .collect();

    let saved = league.record_scores(&scores)?;
    let totals = league.series_with_handicap(week.id, bowler_id)?;
    println!(
        "Saved {} games. Series {} scratch, {} with handicap",
        saved.len(),
        totals.scratch.to_string().bold(),
        totals.with_handicap.to_string().bold()
    );
    Ok(())
}

pub fn handle_delete_score(config: &AppConfig, week_number: i32, bowler_id: BowlerId, game: i32) -> Result<()> {
    let game_number = GameNumber::try_from(game)?;
    let league = open_league(config)?;
    let week = league.week_by_number(week_number)?;

    if league.delete_score(week.id, bowler_id, game_number)? {
        println!("Removed game {} for bowler {} in week {}", game_number, bowler_id, week_number);
    } else {
        println!("No game {} recorded for bowler {} in week {}", game_number, bowler_id, week_number);
    }
    Ok(())
}

/// Games marked `-` are left without a prediction.
pub fn handle_predict(
    config: &AppConfig,
    week_number: i32,
    predictor_id: BowlerId,
    target_id: BowlerId,
    games: &[ScoreArg],
) -> Result<()> {
    let league = open_league(config)?;
    let week = league.week_by_number(week_number)?;
    league.bowler(predictor_id)?;
    league.bowler(target_id)?;

    let predictions: Vec<Prediction> = GameNumber::ALL
        .iter()
        .zip(games)
        .filter_map(|(&game_number, predicted)| {
            predicted.0.map(|predicted_score| Prediction {
                week_id: week.id,
                predictor_id,
                target_id,
                game_number,
                predicted_score,
            })
        })
        .collect();

    let saved = league.record_predictions(&predictions)?;
    println!("Saved {} predictions for week {}", saved.len(), week_number);
    Ok(())
}

pub fn handle_predict_series(
    config: &AppConfig,
    week_number: i32,
    predictor_id: BowlerId,
    target_id: BowlerId,
    series: i32,
) -> Result<()> {
    let league = open_league(config)?;
    let week = league.week_by_number(week_number)?;
    league.bowler(predictor_id)?;
    league.bowler(target_id)?;

    league.record_series_prediction(&SeriesPrediction {
        week_id: week.id,
        predictor_id,
        target_id,
        predicted_series: series,
    })?;
    println!("Saved series prediction of {} for week {}", series, week_number);
    Ok(())
}

pub fn handle_stats(config: &AppConfig, bowler_id: Option<BowlerId>) -> Result<()> {
    let league = open_league(config)?;
    if let Some(id) = bowler_id {
        league.bowler(id)?;
    }
    let names = bowler_names(&league)?;

    println!(
        "{}",
        format!("{:<28} {:>5} {:>7} {:>4} {:>5} {:>5}", "BOWLER", "GAMES", "AVG", "HDCP", "HIGH", "LOW").bold()
    );
    for stats in league.bowler_stats(bowler_id)? {
        println!(
            "{:<28} {:>5} {:>7.1} {:>4} {:>5} {:>5}",
            name_of(&names, stats.bowler_id),
            stats.total_games,
            stats.average,
            stats.handicap,
            stats.high_game,
            stats.low_game
        );
    }
    Ok(())
}

pub fn handle_series(config: &AppConfig, week_number: i32) -> Result<()> {
    let league = open_league(config)?;
    let week = league.week_by_number(week_number)?;
    let names = bowler_names(&league)?;

    println!("{}", format!("Week {} series", week_number).bold());
    for series in league.weekly_series(Some(week.id))? {
        let totals = league.series_with_handicap(week.id, series.bowler_id)?;
        let games: Vec<String> = series.game_scores.iter().map(|s| s.to_string()).collect();
        println!(
            "{:<28} {:<15} {:>4} {:>5}",
            name_of(&names, series.bowler_id),
            games.join(" "),
            totals.scratch,
            totals.with_handicap.to_string().cyan()
        );
    }
    Ok(())
}

pub fn handle_results(config: &AppConfig, week_number: i32) -> Result<()> {
    let league = open_league(config)?;
    let week = league.week_by_number(week_number)?;
    let names = bowler_names(&league)?;

    println!("{}", format!("Week {} predictions ({})", week_number, week.status().as_str()).bold());
    for result in league.week_results(week.id)? {
        let outcome = match (result.actual_score, result.difference, result.points) {
            (Some(actual), Some(difference), Some(points)) => {
                let line = format!("actual {:>3}  off by {:>3}  {:>2} pts", actual, difference, points);
                if result.is_exact() {
                    line.green().bold().to_string()
                } else {
                    line
                }
            }
            _ => "pending".dimmed().to_string(),
        };
        println!(
            "{:<20} -> {:<20} {:<8} predicted {:>3}  {}",
            name_of(&names, result.predictor_id),
            name_of(&names, result.target_id),
            result.slot.label(),
            result.predicted_score,
            outcome
        );
    }

    if let Some(winner) = league.weekly_winner(week.id)? {
        println!(
            "Winner: {} with {} points",
            name_of(&names, winner.bowler_id).yellow().bold(),
            winner.total_points
        );
    }
    Ok(())
}

pub fn handle_leaderboard(config: &AppConfig, week_number: Option<i32>) -> Result<()> {
    let league = open_league(config)?;
    let names = bowler_names(&league)?;

    let entries = match week_number {
        Some(number) => {
            let week = league.week_by_number(number)?;
            league.weekly_leaderboard(week.id)?
        }
        None => league.leaderboard()?,
    };
    print_leaderboard(&entries, &names);

    if week_number.is_none() {
        let winners = league.weekly_winners()?;
        if !winners.is_empty() {
            println!("{}", "Weekly winners".bold());
        }
        for (number, winner) in winners {
            println!(
                "week {:>3}  {:<28} {:>3} pts",
                number,
                name_of(&names, winner.bowler_id).yellow(),
                winner.total_points
            );
        }
    }
    Ok(())
}

fn print_leaderboard(entries: &[LeaderboardEntry], names: &HashMap<BowlerId, String>) {
    println!(
        "{}",
        format!("{:>4}  {:<28} {:>6} {:>9} {:>6}", "RANK", "BOWLER", "POINTS", "AVG DIFF", "PREDS").bold()
    );
    for (i, entry) in entries.iter().enumerate() {
        let line = format!(
            "{:>4}  {:<28} {:>6} {:>9.1} {:>6}",
            i + 1,
            name_of(names, entry.bowler_id),
            entry.total_points,
            entry.avg_difference,
            entry.predictions_count
        );
        if i == 0 {
            println!("{}", line.yellow().bold());
        } else {
            println!("{}", line);
        }
    }
}

pub fn handle_trend(config: &AppConfig, bowler_id: BowlerId) -> Result<()> {
    let league = open_league(config)?;
    let bowler = league.bowler(bowler_id)?;

    println!("{}", format!("Handicap trend for {}", display_name(&bowler)).bold());
    for point in league.handicap_trend(bowler_id)? {
        println!("week {:>3}  avg {:>6.1}  hdcp {:>3}", point.week_number, point.average, point.handicap);
    }
    Ok(())
}

pub fn handle_team(config: &AppConfig) -> Result<()> {
    let league = open_league(config)?;
    let names = bowler_names(&league)?;

    match league.team_summary()? {
        Some(summary) => println!(
            "Team average {:.1}, high game {}, {} games, {} pins",
            summary.team_average,
            summary.team_high_game.to_string().bold(),
            summary.total_games,
            summary.total_pins
        ),
        None => println!("No games recorded yet"),
    }

    println!("{}", "Personal bests".bold());
    for best in league.personal_bests()? {
        let high_game = best.high_game.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let high_series = best.high_series.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        println!("{:<28} game {:>3}  series {:>3}", name_of(&names, best.bowler_id), high_game, high_series);
    }

    println!("{}", "Score distribution".bold());
    for bucket in league.score_distribution(None)? {
        println!("{:>8}  {:>3} {}", bucket.label, bucket.count, "#".repeat(bucket.count).cyan());
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    info!("Generating {} completions", shell);
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
