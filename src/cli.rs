use std::str::FromStr;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bowling league scores, handicaps and prediction game")]
pub struct Cli {
    /// Path to the SQLite database (defaults to DATABASE_PATH or bowling_league.db)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Create the database schema
    Init {
        /// Drop existing tables first
        #[arg(long)]
        reset: bool,
    },
    /// Start the read-only JSON API
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage bowlers
    Bowler {
        #[clap(subcommand)]
        command: BowlerCommand,
    },
    /// Manage weeks and their lifecycle
    Week {
        #[clap(subcommand)]
        command: WeekCommand,
    },
    /// Enter a bowler's games for a week ("-" leaves a game unentered)
    Score {
        week: i32,
        bowler: i32,
        #[arg(num_args = 1..=3, required = true)]
        games: Vec<ScoreArg>,
    },
    /// Remove one entered game
    DeleteScore { week: i32, bowler: i32, game: i32 },
    /// Predict another bowler's games for a week ("-" skips a game)
    Predict {
        week: i32,
        predictor: i32,
        target: i32,
        #[arg(num_args = 1..=3, required = true)]
        games: Vec<ScoreArg>,
    },
    /// Predict another bowler's whole series for a week
    PredictSeries {
        week: i32,
        predictor: i32,
        target: i32,
        series: i32,
    },
    /// Show averages and handicaps
    Stats {
        #[arg(short, long)]
        bowler: Option<i32>,
    },
    /// Show every bowler's series for a week, scratch and with handicap
    Series { week: i32 },
    /// Show resolved and pending predictions for a week
    Results { week: i32 },
    /// Show the prediction leaderboard, all-time or for one week
    Leaderboard {
        #[arg(short, long)]
        week: Option<i32>,
    },
    /// Show a bowler's running average and handicap week by week
    Trend { bowler: i32 },
    /// Show team totals, personal bests and the score distribution
    Team,
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum BowlerCommand {
    /// Add a bowler
    Add {
        name: String,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        pin: Option<String>,
        #[arg(long, default_value = "#3b82f6")]
        color: String,
    },
    /// Change a bowler's details
    Update {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        pin: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// List bowlers
    List,
}

/// Weeks are addressed by week number on the command line.
#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum WeekCommand {
    /// Add a week
    Add {
        number: i32,
        /// Bowling date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// List weeks with their status
    List,
    /// Stop accepting predictions
    Lock { number: i32 },
    /// Accept predictions again
    Unlock { number: i32 },
    /// Mark the week as complete
    Complete { number: i32 },
    /// Mark a completed week as open again
    Reopen { number: i32 },
}

/// A score on the command line; `-` means not entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreArg(pub Option<i32>);

impl FromStr for ScoreArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(ScoreArg(None));
        }
        s.parse::<i32>()
            .map(|v| ScoreArg(Some(v)))
            .map_err(|_| format!("'{}' is not a score (use '-' for not entered)", s))
    }
}
