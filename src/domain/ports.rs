use crate::domain::model::{Chain, ResolvedQuery, ScheduleQuery, Showtime};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

#[async_trait]
pub trait ScheduleSource: Send + Sync {
    fn chain(&self) -> Chain;
    async fn resolve(&self, query: &ScheduleQuery) -> Result<ResolvedQuery>;
    async fn fetch(&self, query: &ResolvedQuery) -> Result<Vec<Showtime>>;
}
