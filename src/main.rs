use anyhow::Result;

use bowling_league::cli::{Cli, Command};
use bowling_league::config::settings::AppConfig;
use bowling_league::{
    handle_bowler, handle_completions, handle_delete_score, handle_init, handle_leaderboard,
    handle_predict, handle_predict_series, handle_results, handle_score, handle_serve,
    handle_series, handle_stats, handle_team, handle_trend, handle_week, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = AppConfig::new().with_database_path(cli.database.clone());

    match &cli.command {
        Command::Init { reset } => handle_init(&config, *reset),
        Command::Serve { port } => handle_serve(&config, *port),
        Command::Bowler { command } => handle_bowler(&config, command),
        Command::Week { command } => handle_week(&config, command),
        Command::Score { week, bowler, games } => handle_score(&config, *week, *bowler, games),
        Command::DeleteScore { week, bowler, game } => handle_delete_score(&config, *week, *bowler, *game),
        Command::Predict {
            week,
            predictor,
            target,
            games,
        } => handle_predict(&config, *week, *predictor, *target, games),
        Command::PredictSeries {
            week,
            predictor,
            target,
            series,
        } => handle_predict_series(&config, *week, *predictor, *target, *series),
        Command::Stats { bowler } => handle_stats(&config, *bowler),
        Command::Series { week } => handle_series(&config, *week),
        Command::Results { week } => handle_results(&config, *week),
        Command::Leaderboard { week } => handle_leaderboard(&config, *week),
        Command::Trend { bowler } => handle_trend(&config, *bowler),
        Command::Team => handle_team(&config),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
