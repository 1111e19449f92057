pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{ChainCommand, CliConfig, QueryArgs};

pub use config::{cli::LocalStorage, toml_config::ShowtimesConfig};
pub use core::{
    engine::ShowtimeEngine, lotte::LotteClient, megabox::MegaboxClient, report::OutputFormat,
};
pub use domain::model::{Chain, ScheduleQuery, Selector, Showtime};
pub use utils::error::{Result, ShowtimeError};
