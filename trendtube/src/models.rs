use serde::{Deserialize, Deserializer, Serialize};

// Documentation: https://developers.google.com/youtube/v3/docs/videos

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub status: VideoStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: String,
}

/// Counters arrive as decimal strings; absent counters (hidden likes, disabled
/// comments, retired dislikes) read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub dislike_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub comment_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    #[serde(default)]
    pub made_for_kids: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub domain: String,
}

impl ApiError {
    pub fn reason(&self) -> &str {
        self.errors
            .first()
            .map(|detail| detail.reason.as_str())
            .unwrap_or("")
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Number(n)) => Ok(n),
        Some(Count::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_item() {
        let body = json!({
            "items": [{
                "id": "abc123def45",
                "snippet": { "title": "Top 10 (AMAZING) Moments!", "tags": ["Funny Cats", "cats"] },
                "contentDetails": { "duration": "PT4M13S" },
                "statistics": {
                    "viewCount": "1200",
                    "likeCount": "90",
                    "dislikeCount": "3",
                    "commentCount": "17"
                },
                "status": { "madeForKids": false }
            }]
        });

        let response: VideoListResponse = serde_json::from_value(body).unwrap();
        let item = &response.items[0];
        assert_eq!(item.id, "abc123def45");
        assert_eq!(item.snippet.tags.as_ref().unwrap().len(), 2);
        assert_eq!(item.content_details.duration, "PT4M13S");
        assert_eq!(item.statistics.view_count, 1200);
        assert_eq!(item.statistics.dislike_count, 3);
        assert_eq!(item.statistics.comment_count, 17);
        assert_eq!(item.status.made_for_kids, Some(false));
    }

    #[test]
    fn missing_optional_fields_default() {
        let body = json!({
            "items": [{
                "id": "xyz",
                "snippet": { "title": "No tags here" },
                "contentDetails": { "duration": "PT30S" },
                "statistics": { "viewCount": "5" },
                "status": {}
            }]
        });

        let response: VideoListResponse = serde_json::from_value(body).unwrap();
        let item = &response.items[0];
        assert!(item.snippet.tags.is_none());
        assert_eq!(item.statistics.like_count, 0);
        assert_eq!(item.statistics.dislike_count, 0);
        assert_eq!(item.statistics.comment_count, 0);
        assert_eq!(item.status.made_for_kids, None);
    }

    #[test]
    fn empty_response_has_no_items() {
        let response: VideoListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn error_envelope_exposes_reason() {
        let body = r#"{"error":{"code":403,"message":"quota","errors":[{"reason":"quotaExceeded","domain":"youtube.quota"}]}}"#;
        let response: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error.code, 403);
        assert_eq!(response.error.reason(), "quotaExceeded");
    }
}
