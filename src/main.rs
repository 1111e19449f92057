use cinema_showtimes::core::ScheduleSource;
use cinema_showtimes::utils::logger;
use cinema_showtimes::{
    Chain, CliConfig, LocalStorage, LotteClient, MegaboxClient, OutputFormat, Result,
    ScheduleQuery, ShowtimeEngine,
};
use clap::Parser;

async fn run_with<S: ScheduleSource>(
    source: S,
    format: OutputFormat,
    query: &ScheduleQuery,
) -> Result<usize> {
    let engine = ShowtimeEngine::new(source).with_format(format);
    let mut stdout = std::io::stdout();
    engine.run(query, &mut stdout).await
}

async fn run(config: &CliConfig) -> Result<usize> {
    let settings = config.load_settings()?;
    let storage = LocalStorage::new(config.data_dir(&settings));
    let today = chrono::Local::now().date_naive();
    let query = config.command.args().to_query(today)?;

    match config.command.chain() {
        Chain::Megabox => {
            let client = MegaboxClient::new(storage, settings.megabox)?;
            run_with(client, config.format, &query).await
        }
        Chain::Lotte => {
            let client = LotteClient::new(storage, settings.lotte)?;
            run_with(client, config.format, &query).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    match run(&config).await {
        Ok(count) => {
            tracing::debug!("Printed {} showtimes", count);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Showtime lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }
}
