use beacon_config::ConfigSource;
use clap::{Parser, ValueEnum};

/// Beacon: mirror a presence API into Discord Rich Presence.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about)]
pub struct Args {
    /// Where to read API_BASE and APP_ID from.
    #[arg(long, value_enum, default_value_t = Source::Env)]
    pub source: Source,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Connect, run a single update, and exit.
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Process environment (and .env file).
    Env,
    /// Values baked in at build time.
    Baked,
}

impl From<Source> for ConfigSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Env => ConfigSource::Env,
            Source::Baked => ConfigSource::Baked,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
