use crate::core::report::{self, OutputFormat};
use crate::domain::model::ScheduleQuery;
use crate::domain::ports::ScheduleSource;
use crate::utils::error::Result;
use std::io::Write;

/// Runs one query against one chain: resolve codes, fetch, print.
pub struct ShowtimeEngine<S: ScheduleSource> {
    source: S,
    format: OutputFormat,
}

impl<S: ScheduleSource> ShowtimeEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns how many showtimes were printed.
    pub async fn run<W: Write>(&self, query: &ScheduleQuery, out: &mut W) -> Result<usize> {
        let chain = self.source.chain();
        tracing::info!(
            "Looking up {} showtimes for {} on {}",
            chain.display_name(),
            query.movie.as_str(),
            query.date
        );

        let resolved = self.source.resolve(query).await?;
        tracing::debug!(
            "Resolved theater={} movie={}",
            resolved.theater_code,
            resolved.movie_code
        );

        let showtimes = self.source.fetch(&resolved).await?;
        tracing::info!("Fetched {} showtimes", showtimes.len());

        report::render(out, chain, &resolved, &showtimes, self.format)?;
        Ok(showtimes.len())
    }
}
