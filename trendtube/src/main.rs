use anyhow::{Context, Result};
use log::info;
use trendtube::config::{init_logger, load_environment};
use trendtube::{CombineOptions, Config, Target, Trending, TrendingPage, YouTubeClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    load_environment();
    init_logger();

    let config = Config::from_env()?;
    let mut source = TrendingPage::new(&config).context("Failed to create trending page client")?;
    let api = YouTubeClient::new(&config).context("Failed to create YouTube API client")?;

    let mut trending = Trending::new();
    trending
        .get_videos(&mut source, &api, config.batch_size)
        .await
        .context("Failed to load trending videos")?;

    trending.combine_tags(CombineOptions {
        split: true,
        combine: true,
        stop_words: true,
    })?;
    info!(
        "Combined {} tags from {} videos",
        trending.tags().len(),
        trending.len()
    );

    trending
        .bar_plot(Some(Target::Tag), config.tag_threshold, &config.chart_path)
        .context("Failed to render tag chart")?;

    Ok(())
}
