use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

use skore::fetch::{DEFAULT_BASE_URL, OpenDota, UpstreamConfig};
use skore::subscriber::{self, LoggingConfig, LoggingError};
use skore::{DataSource, FetchError, FileSource, TeamScore, rank_from};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML writing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Logging setup error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Could not fetch player and team data: {0}")]
    Fetch(#[from] FetchError),
}

/// Minimum severity written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "CRITICAL")]
    Critical,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "INFO")]
    Info,
    #[value(name = "DEBUG")]
    Debug,
}

impl LogLevel {
    /// tracing has no level above `error`, so CRITICAL and ERROR coincide.
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Critical | LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "skore")]
#[command(about = "Find the DOTA 2 teams with the most combined player score*")]
#[command(after_help = "*Score is defined as the length of a player's recorded history.")]
struct Cli {
    /// Result output file (default: stdout)
    output: Option<PathBuf>,

    /// Number of teams in output
    #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
    numteams: i64,

    /// Only output log messages of this severity or above. Writes to stderr.
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = LogLevel::Warning)]
    loglevel: LogLevel,

    /// The API server base URL
    #[arg(short, long, default_value = DEFAULT_BASE_URL, env = "SKORE_SERVER")]
    server: String,

    /// Read players from a local JSON file instead of the API
    #[arg(long, requires = "teams")]
    players: Option<PathBuf>,

    /// Read teams from a local JSON file instead of the API
    #[arg(long, requires = "players")]
    teams: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Extra attempts after a transient upstream failure
    #[arg(long, default_value_t = 2)]
    retries: u32,
}

impl Cli {
    fn source(&self) -> Result<Box<dyn DataSource>, AppError> {
        match (&self.players, &self.teams) {
            (Some(players), Some(teams)) => Ok(Box::new(FileSource::new(players, teams))),
            _ => {
                let config = UpstreamConfig {
                    timeout_secs: self.timeout,
                    retries: self.retries,
                    ..UpstreamConfig::with_base_url(&self.server)
                };
                Ok(Box::new(OpenDota::new(config)?))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    subscriber::init(&LoggingConfig::stderr(cli.loglevel.filter()))?;

    let source = cli.source()?;
    let ranking = match rank_from(source.as_ref(), cli.numteams).await {
        Ok(ranking) => ranking,
        Err(e) => {
            tracing::error!(source = %source.describe(), error = %e, "found no valid players or teams");
            return Err(e.into());
        }
    };
    for diagnostic in &ranking.diagnostics {
        tracing::debug!(?diagnostic, "ranking diagnostic");
    }

    match &cli.output {
        Some(path) => {
            tracing::info!(count = cli.numteams, path = %path.display(), "writing top teams");
            let file = std::fs::File::create(path)?;
            write_teams(std::io::BufWriter::new(file), &ranking.teams)?;
        }
        None => write_teams(std::io::stdout().lock(), &ranking.teams)?,
    }
    Ok(())
}

/// Write one `{team_id: entry}` mapping per team, in ranked order.
fn write_teams<W: Write>(mut out: W, teams: &[TeamScore]) -> Result<(), AppError> {
    for team in teams {
        let entry = BTreeMap::from([(team.team_id, team)]);
        serde_yaml::to_writer(&mut out, &entry)?;
    }
    out.flush()?;
    Ok(())
}
