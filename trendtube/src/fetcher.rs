use crate::config::{Config, RetryConfig, MAX_BATCH_SIZE, USER_AGENT};
use crate::error::{Result, ServiceError};
use crate::models::{ApiErrorResponse, VideoItem, VideoListResponse};
use crate::video::Video;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoffBuilder;
use log::{error, info, warn};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const PARTS: &str = "snippet,contentDetails,statistics,status,id";
const FIELDS: &str = "items(id,snippet(title,tags),contentDetails(duration),\
statistics(viewCount,likeCount,dislikeCount,commentCount),status(madeForKids))";

/// Source of per-video metadata, one call per batch of IDs.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Look up at most [`MAX_BATCH_SIZE`] videos. Unknown IDs are simply
    /// missing from the result.
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>>;
}

/// `videos.list` client for the YouTube Data API v3.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryConfig,
}

impl YouTubeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ServiceError::from)?;

        Ok(YouTubeClient {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.clone(),
            retry: config.retry.clone(),
        })
    }

    fn videos_url(&self, ids: &[String]) -> std::result::Result<Url, ServiceError> {
        let mut url = Url::parse(&format!("{}/videos", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("part", PARTS)
            .append_pair("fields", FIELDS)
            .append_pair("id", &ids.join(","))
            .append_pair("maxResults", &MAX_BATCH_SIZE.to_string())
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn request_once(
        &self,
        url: &Url,
    ) -> std::result::Result<VideoListResponse, ServiceError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MetadataApi for YouTubeClient {
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.videos_url(ids)?;
        let url = &url;
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry.initial_interval)
            .with_max_interval(self.retry.max_interval)
            .with_max_elapsed_time(Some(self.retry.max_elapsed))
            .build();

        let mut attempt = 0u32;
        let response = retry(policy, || {
            attempt += 1;
            let current = attempt;
            async move {
                self.request_once(url).await.map_err(|e| {
                    if e.is_transient() {
                        warn!("videos.list attempt {current} failed, retrying: {e}");
                        backoff::Error::transient(e)
                    } else {
                        error!("videos.list failed permanently on attempt {current}: {e}");
                        backoff::Error::permanent(e)
                    }
                })
            }
        })
        .await?;

        Ok(response.items)
    }
}

/// Map a non-success response onto the failure taxonomy. Auth and quota
/// failures are permanent; everything else is decided by the status code.
pub fn classify_failure(status: u16, body: &str) -> ServiceError {
    let Ok(envelope) = serde_json::from_str::<ApiErrorResponse>(body) else {
        return ServiceError::Http {
            status,
            message: body.chars().take(200).collect(),
        };
    };

    let error = envelope.error;
    let message = error.message.clone();
    let known = error.errors.iter().map(|detail| detail.reason.as_str()).find(|reason| {
        matches!(
            *reason,
            "quotaExceeded"
                | "dailyLimitExceeded"
                | "rateLimitExceeded"
                | "userRateLimitExceeded"
                | "keyInvalid"
                | "keyExpired"
                | "authError"
                | "forbidden"
                | "accessNotConfigured"
                | "ipRefererBlocked"
        )
    });
    let reason = known.unwrap_or_else(|| error.reason()).to_string();

    match reason.as_str() {
        "quotaExceeded" | "dailyLimitExceeded" => ServiceError::Quota { reason, message },
        // Per-second limits clear up on their own.
        "rateLimitExceeded" | "userRateLimitExceeded" => ServiceError::Http {
            status: 429,
            message,
        },
        "keyInvalid" | "keyExpired" | "authError" | "forbidden" | "accessNotConfigured"
        | "ipRefererBlocked" => ServiceError::Auth { reason, message },
        _ if status == 401 => ServiceError::Auth { reason, message },
        _ if status == 400 && message.contains("API key") => ServiceError::Auth { reason, message },
        _ => ServiceError::Http { status, message },
    }
}

/// Fetch metadata for `ids` in consecutive chunks of at most `batch_size`,
/// one call per chunk. The returned records follow the order of `ids`.
pub async fn fetch_videos<A>(api: &A, ids: &[String], batch_size: usize) -> Result<Vec<Video>>
where
    A: MetadataApi + ?Sized,
{
    let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
    let batches = ids.len().div_ceil(batch_size);
    let mut videos = Vec::with_capacity(ids.len());

    for (n, chunk) in ids.chunks(batch_size).enumerate() {
        info!(
            "Requesting metadata batch {}/{batches} ({} videos)",
            n + 1,
            chunk.len()
        );

        let items: HashMap<String, VideoItem> = api
            .list_videos(chunk)
            .await?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        for id in chunk {
            match items.get(id) {
                Some(item) => videos.push(Video::from_item(item.clone())),
                None => warn!("No metadata returned for video {id}; skipping"),
            }
        }
    }

    info!("Fetched metadata for {}/{} videos", videos.len(), ids.len());
    Ok(videos)
}
