use anyhow::{Context, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TRENDING_URL: &str = "https://www.youtube.com/feed/trending";
/// Largest `id` list the videos endpoint accepts in one call.
pub const MAX_BATCH_SIZE: usize = 50;
pub const DEFAULT_TAG_THRESHOLD: usize = 5;
pub const DEFAULT_CHART_PATH: &str = "trending_tags.svg";
pub const USER_AGENT: &str = concat!("trendtube/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub trending_url: String,
    pub batch_size: usize,
    pub tag_threshold: usize,
    pub chart_path: PathBuf,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(8),
            max_elapsed: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            trending_url: DEFAULT_TRENDING_URL.to_string(),
            batch_size: MAX_BATCH_SIZE,
            tag_threshold: DEFAULT_TAG_THRESHOLD,
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            retry: RetryConfig::default(),
        }
    }

    /// Build the configuration from the process environment. Only the API key
    /// is required.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("YT_API_KEY")
            .or_else(|_| env::var("YOUTUBE_API_KEY"))
            .context("YT_API_KEY environment variable must be set")?;

        let mut config = Config::new(api_key);

        if let Ok(url) = env::var("TRENDTUBE_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = env::var("TRENDTUBE_TRENDING_URL") {
            config.trending_url = url;
        }
        if let Some(size) = parse_var::<usize>("TRENDTUBE_BATCH_SIZE")? {
            config.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        }
        if let Some(threshold) = parse_var::<usize>("TRENDTUBE_TAG_THRESHOLD")? {
            config.tag_threshold = threshold;
        }
        if let Ok(path) = env::var("TRENDTUBE_CHART_PATH") {
            config.chart_path = PathBuf::from(path);
        }
        if let Some(secs) = parse_var::<u64>("TRENDTUBE_MAX_RETRY_SECS")? {
            config.retry.max_elapsed = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {value}")),
        Err(_) => Ok(None),
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting trendtube...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}
