pub mod client;
pub mod engine;
pub mod lookup;
pub mod lotte;
pub mod megabox;
pub mod report;

pub use crate::domain::model::{ResolvedQuery, ScheduleQuery, Showtime};
pub use crate::domain::ports::{ScheduleSource, Storage};
pub use crate::utils::error::Result;
