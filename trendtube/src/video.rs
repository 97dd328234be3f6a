use crate::error::{Result, TrendError};
use crate::fetcher::MetadataApi;
use crate::models::VideoItem;
use crate::text::{dedup, remove_stop_words, split_words};
use crate::utils::parse_iso8601_duration_to_seconds;
use log::debug;
use std::fmt;

/// A title is either the raw string from the API or, once split, its words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Text(String),
    Words(Vec<String>),
}

impl Title {
    /// The terms this title contributes to a flat sequence.
    pub fn terms(&self) -> &[String] {
        match self {
            Title::Text(text) => std::slice::from_ref(text),
            Title::Words(words) => words,
        }
    }
}

impl Default for Title {
    fn default() -> Self {
        Title::Text(String::new())
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Title::Text(text) => f.write_str(text),
            Title::Words(words) => f.write_str(&words.join(" ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LikeRatio {
    Ratio(f64),
    /// The video has no dislikes to divide by.
    Undefined,
}

impl fmt::Display for LikeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeRatio::Ratio(ratio) => write!(f, "{ratio:.2}"),
            LikeRatio::Undefined => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Video {
    id: String,
    title: Title,
    tags: Option<Vec<String>>,
    duration: String,
    view_count: u64,
    likes: u64,
    dislikes: u64,
    comment_count: u64,
    made_for_kids: Option<bool>,
}

impl Video {
    pub fn new(id: impl Into<String>) -> Self {
        Video {
            id: id.into(),
            ..Default::default()
        }
    }

    /// A record with pre-fetched text fields. Tags are normalized the same way
    /// fetched tags are.
    pub fn with_details(
        id: impl Into<String>,
        title: impl Into<String>,
        tags: Option<Vec<String>>,
    ) -> Self {
        Video {
            id: id.into(),
            title: Title::Text(title.into()),
            tags: tags.map(normalize_tags),
            ..Default::default()
        }
    }

    pub fn with_statistics(
        mut self,
        view_count: u64,
        likes: u64,
        dislikes: u64,
        comment_count: u64,
    ) -> Self {
        self.view_count = view_count;
        self.likes = likes;
        self.dislikes = dislikes;
        self.comment_count = comment_count;
        self
    }

    pub fn from_item(item: VideoItem) -> Self {
        let mut video = Video::new(item.id.clone());
        video.apply_item(item);
        video
    }

    fn apply_item(&mut self, item: VideoItem) {
        self.title = Title::Text(item.snippet.title);
        self.tags = Some(normalize_tags(item.snippet.tags.unwrap_or_default()));
        self.duration = item.content_details.duration;
        self.view_count = item.statistics.view_count;
        self.likes = item.statistics.like_count;
        self.dislikes = item.statistics.dislike_count;
        self.comment_count = item.statistics.comment_count;
        self.made_for_kids = item.status.made_for_kids;
    }

    /// Populate every field from the metadata API using this record's ID.
    pub async fn fetch_details<A>(&mut self, api: &A) -> Result<()>
    where
        A: MetadataApi + ?Sized,
    {
        let item = api
            .list_videos(std::slice::from_ref(&self.id))
            .await?
            .into_iter()
            .find(|item| item.id == self.id)
            .ok_or_else(|| TrendError::NotFound(self.id.clone()))?;

        self.apply_item(item);
        debug!("Fetched details for video {}", self.id);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn duration_seconds(&self) -> u64 {
        parse_iso8601_duration_to_seconds(&self.duration)
    }

    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn dislikes(&self) -> u64 {
        self.dislikes
    }

    pub fn comment_count(&self) -> u64 {
        self.comment_count
    }

    pub fn made_for_kids(&self) -> Option<bool> {
        self.made_for_kids
    }

    /// Likes per dislike, rounded to two decimals.
    pub fn like_ratio(&self) -> LikeRatio {
        if self.dislikes == 0 {
            return LikeRatio::Undefined;
        }
        let ratio = self.likes as f64 / self.dislikes as f64;
        LikeRatio::Ratio((ratio * 100.0).round() / 100.0)
    }

    /// Replace the title with its unique words. With `combine`, the original
    /// title is kept as the first term.
    pub fn split_title(&mut self, combine: bool) {
        let Title::Text(text) = &self.title else {
            debug!("Title of video {} is already split", self.id);
            return;
        };

        let mut words = split_words(text);
        if combine {
            words.insert(0, text.clone());
        }
        self.title = Title::Words(words);
    }

    /// Split every tag on whitespace and keep the unique pieces, either in place
    /// of the tags or appended after them.
    pub fn split_tags(&mut self, combine: bool) -> Result<()> {
        let Some(tags) = self.tags.as_mut() else {
            return Err(missing_tags(&self.id));
        };

        let pieces = dedup(
            tags.iter()
                .flat_map(|tag| tag.split_whitespace())
                .map(str::to_string),
        );
        if combine {
            tags.extend(pieces);
        } else {
            *tags = pieces;
        }
        Ok(())
    }

    /// Drop stop words (custom list included) from the title terms.
    pub fn stop_title(&mut self) {
        let terms = self.title.terms().to_vec();
        self.title = Title::Words(remove_stop_words(terms, true));
    }

    /// Drop stop words (custom list included) from the tags.
    pub fn stop_tags(&mut self) -> Result<()> {
        let tags = self.tags.take().ok_or_else(|| missing_tags(&self.id))?;
        self.tags = Some(remove_stop_words(tags, true));
        Ok(())
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

fn missing_tags(id: &str) -> TrendError {
    TrendError::InvalidState(format!("video {id} has no tags; fetch its details first"))
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    dedup(tags.into_iter().map(|tag| tag.to_lowercase()))
}
