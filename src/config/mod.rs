pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
mod args {
    use crate::config::toml_config::ShowtimesConfig;
    use crate::core::report::OutputFormat;
    use crate::domain::model::{Chain, ScheduleQuery, Selector};
    use crate::utils::error::{Result, ShowtimeError};
    use crate::utils::validation::{parse_play_date, Validate};
    use chrono::NaiveDate;
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "showtimes")]
    #[command(about = "Print showtimes for a movie at a Megabox or Lotte Cinema theater")]
    pub struct CliConfig {
        #[arg(long, global = true, help = "TOML file overriding endpoints, headers and lookup tables")]
        pub config: Option<PathBuf>,

        #[arg(long, global = true, help = "Directory holding the CSV lookup files [default: .]")]
        pub data_dir: Option<String>,

        #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
        pub format: OutputFormat,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: ChainCommand,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum ChainCommand {
        /// Query the Megabox booking API
        Megabox(QueryArgs),
        /// Query the Lotte Cinema booking API
        Lotte(QueryArgs),
    }

    impl ChainCommand {
        pub fn chain(&self) -> Chain {
            match self {
                ChainCommand::Megabox(_) => Chain::Megabox,
                ChainCommand::Lotte(_) => Chain::Lotte,
            }
        }

        pub fn args(&self) -> &QueryArgs {
            match self {
                ChainCommand::Megabox(args) | ChainCommand::Lotte(args) => args,
            }
        }
    }

    #[derive(Debug, Clone, Args)]
    pub struct QueryArgs {
        #[arg(long, conflicts_with = "theater_code", required_unless_present = "theater_code")]
        pub theater: Option<String>,

        #[arg(long, help = "Chain-internal theater code, skips the CSV lookup")]
        pub theater_code: Option<String>,

        #[arg(long, conflicts_with = "movie_code", required_unless_present = "movie_code")]
        pub movie: Option<String>,

        #[arg(long, help = "Chain-internal movie code, skips the CSV lookup")]
        pub movie_code: Option<String>,

        #[arg(long, value_parser = parse_date_arg, help = "Play date, YYYY-MM-DD or YYYYMMDD [default: today]")]
        pub date: Option<NaiveDate>,
    }

    fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
        parse_play_date(value).map_err(|e| e.to_string())
    }

    fn selector(name: &Option<String>, code: &Option<String>, field: &str) -> Result<Selector> {
        match (code, name) {
            (Some(code), _) => Ok(Selector::Code(code.clone())),
            (None, Some(name)) => Ok(Selector::Name(name.clone())),
            (None, None) => Err(ShowtimeError::MissingConfigError {
                field: field.to_string(),
            }),
        }
    }

    impl QueryArgs {
        pub fn to_query(&self, today: NaiveDate) -> Result<ScheduleQuery> {
            Ok(ScheduleQuery {
                theater: selector(&self.theater, &self.theater_code, "--theater")?,
                movie: selector(&self.movie, &self.movie_code, "--movie")?,
                date: self.date.unwrap_or(today),
            })
        }
    }

    impl CliConfig {
        /// Built-in defaults, optionally overridden by `--config`, then validated.
        pub fn load_settings(&self) -> Result<ShowtimesConfig> {
            let settings = match &self.config {
                Some(path) => {
                    tracing::debug!("Loading configuration from {}", path.display());
                    ShowtimesConfig::from_file(path)?
                }
                None => ShowtimesConfig::default(),
            };
            settings.validate()?;
            Ok(settings)
        }

        /// `--data-dir` wins over the config file's `data_dir`.
        pub fn data_dir(&self, settings: &ShowtimesConfig) -> String {
            self.data_dir
                .clone()
                .or_else(|| settings.data_dir.clone())
                .unwrap_or_else(|| ".".to_string())
        }
    }

}

#[cfg(feature = "cli")]
pub use args::{ChainCommand, CliConfig, QueryArgs};
