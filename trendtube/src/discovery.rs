use crate::config::{Config, USER_AGENT};
use crate::error::{Result, ServiceError};
use crate::text::dedup;
use crate::utils::extract_youtube_video_id;
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

lazy_static! {
    static ref INITIAL_DATA_ID_RE: Regex =
        Regex::new(r#""videoId":"([a-zA-Z0-9_-]{11})""#).expect("videoId pattern is valid");
    static ref THUMBNAIL_SELECTOR: Selector =
        Selector::parse("a#thumbnail[href]").expect("thumbnail selector is valid");
}

/// Produces the ordered video IDs currently listed as trending.
#[async_trait]
pub trait TrendingSource: Send {
    /// An empty list means the page had no videos, not a failure.
    async fn discover(&mut self) -> Result<Vec<String>>;
}

/// Scrapes the public trending page over plain HTTP.
pub struct TrendingPage {
    client: Client,
    url: String,
}

impl TrendingPage {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ServiceError::from)?;

        Ok(TrendingPage {
            client,
            url: config.trending_url.clone(),
        })
    }
}

#[async_trait]
impl TrendingSource for TrendingPage {
    async fn discover(&mut self) -> Result<Vec<String>> {
        info!("Loading trending page: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(ServiceError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
                message: format!("trending page request to {} failed", self.url),
            }
            .into());
        }

        let html = response.text().await.map_err(ServiceError::from)?;
        let ids = extract_video_ids(&html);
        if ids.is_empty() {
            warn!("No videos found on the trending page");
        } else {
            info!("Discovered {} trending videos", ids.len());
        }
        Ok(ids)
    }
}

/// Video IDs from thumbnail links, in page order. Pages rendered client side
/// carry no thumbnail anchors, so the embedded initial data is scanned instead.
pub fn extract_video_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let from_anchors: Vec<String> = document
        .select(&THUMBNAIL_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(extract_youtube_video_id)
        .collect();
    if !from_anchors.is_empty() {
        return dedup(from_anchors);
    }

    dedup(
        INITIAL_DATA_ID_RE
            .captures_iter(html)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str().to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_thumbnail_anchors_in_order() {
        let html = r#"
            <html><body>
              <a id="thumbnail" href="/watch?v=AAAAAAAAAAA">one</a>
              <a id="video-title" href="/watch?v=ZZZZZZZZZZZ">title link</a>
              <a id="thumbnail">no href</a>
              <a id="thumbnail" href="/watch?v=BBBBBBBBBBB&pp=sAQA">two</a>
              <a id="thumbnail" href="/watch?v=AAAAAAAAAAA">dup</a>
              <a id="thumbnail" href="/shorts/CCCCCCCCCCC">three</a>
            </body></html>
        "#;

        assert_eq!(
            extract_video_ids(html),
            vec!["AAAAAAAAAAA", "BBBBBBBBBBB", "CCCCCCCCCCC"]
        );
    }

    #[test]
    fn falls_back_to_initial_data() {
        let html = r#"<script>var ytInitialData = {"contents":[{"videoId":"dQw4w9WgXcQ"},{"videoId":"jNQXAC9WgXc"},{"videoId":"dQw4w9WgXcQ"}]};</script>"#;
        assert_eq!(extract_video_ids(html), vec!["dQw4w9WgXcQ", "jNQXAC9WgXc"]);
    }

    #[test]
    fn page_without_videos_is_empty() {
        assert!(extract_video_ids("<html><body>Nothing trending</body></html>").is_empty());
    }
}
