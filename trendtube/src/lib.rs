pub mod chart;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod text;
pub mod trending;
pub mod utils;
pub mod video;

pub use chart::BarChart;
pub use config::Config;
pub use discovery::{TrendingPage, TrendingSource};
pub use error::{ServiceError, TrendError};
pub use fetcher::{MetadataApi, YouTubeClient};
pub use trending::{CombineOptions, FrequencyTable, Target, Trending};
pub use video::{LikeRatio, Title, Video};
