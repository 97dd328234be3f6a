use crate::discovery::TrendingSource;
use crate::error::{Result, TrendError};
use crate::fetcher::{fetch_videos, MetadataApi};
use crate::video::Video;
use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;

/// Which flat sequence a query or chart works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Title,
    Tag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineOptions {
    /// Split titles into unique words and tags into unique pieces.
    pub split: bool,
    /// When splitting, keep the original title or tags alongside the pieces.
    pub combine: bool,
    /// Remove stop words (custom list included).
    pub stop_words: bool,
}

/// Term counts ordered ascending by count; equal counts keep the order in
/// which the terms first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn from_terms(terms: &[String], threshold: usize) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for term in terms {
            let count = counts.entry(term.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(term.as_str());
            }
            *count += 1;
        }

        let mut entries: Vec<(String, usize)> = first_seen
            .into_iter()
            .map(|term| (term.to_string(), counts[term]))
            .filter(|(_, count)| *count >= threshold)
            .collect();
        entries.sort_by_key(|(_, count)| *count);

        FrequencyTable { entries }
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(term, count)| (term.as_str(), *count))
    }

    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The videos on the trending page at one point in time, plus the flat term
/// sequences and frequency tables derived from them.
#[derive(Debug, Clone, Default)]
pub struct Trending {
    videos: Vec<Video>,
    titles: Vec<String>,
    tags: Vec<String>,
    title_frequencies: Option<FrequencyTable>,
    tag_frequencies: Option<FrequencyTable>,
    date: Option<DateTime<Utc>>,
}

impl Trending {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot over records that were fetched elsewhere.
    pub fn from_videos(videos: Vec<Video>, date: DateTime<Utc>) -> Self {
        Trending {
            videos,
            date: Some(date),
            ..Default::default()
        }
    }

    /// Discover the trending IDs, stamp the capture time, then fetch their
    /// metadata in batches of at most `batch_size`.
    pub async fn get_videos<S, A>(
        &mut self,
        source: &mut S,
        api: &A,
        batch_size: usize,
    ) -> Result<()>
    where
        S: TrendingSource + ?Sized,
        A: MetadataApi + ?Sized,
    {
        let ids = source.discover().await?;
        self.date = Some(Utc::now());

        let videos = fetch_videos(api, &ids, batch_size).await?;
        self.videos.extend(videos);
        self.invalidate();
        info!("Trending snapshot holds {} videos", self.videos.len());
        Ok(())
    }

    pub fn combine_titles(&mut self, options: CombineOptions) {
        for video in &mut self.videos {
            if options.split {
                video.split_title(options.combine);
            }
            if options.stop_words {
                video.stop_title();
            }
            self.titles.extend_from_slice(video.title().terms());
        }
        self.title_frequencies = None;
    }

    /// Videos without tags are skipped.
    pub fn combine_tags(&mut self, options: CombineOptions) -> Result<()> {
        for video in self.videos.iter_mut().filter(|v| v.tags().is_some()) {
            if options.split {
                video.split_tags(options.combine)?;
            }
            if options.stop_words {
                video.stop_tags()?;
            }
            if let Some(tags) = video.tags() {
                self.tags.extend_from_slice(tags);
            }
        }
        self.tag_frequencies = None;
        Ok(())
    }

    pub fn combine(&mut self, options: CombineOptions) -> Result<()> {
        self.combine_titles(options);
        self.combine_tags(options)
    }

    /// Occurrences of `name`, or of the term at `index`, in the target's flat
    /// sequence. `name` wins when both are given.
    pub fn count(
        &self,
        target: Option<Target>,
        name: Option<&str>,
        index: Option<usize>,
    ) -> Result<usize> {
        let terms = match target {
            Some(target) => self.terms(target),
            None => return Err(TrendError::EmptySelector),
        };

        let needle = match (name, index) {
            (Some(name), _) => name,
            (None, Some(index)) => terms
                .get(index)
                .map(String::as_str)
                .ok_or(TrendError::IndexOutOfRange {
                    index,
                    len: terms.len(),
                })?,
            (None, None) => return Err(TrendError::EmptySelector),
        };

        Ok(terms.iter().filter(|term| *term == needle).count())
    }

    pub fn find_title_frequencies(&mut self, threshold: usize) -> &FrequencyTable {
        self.title_frequencies
            .insert(FrequencyTable::from_terms(&self.titles, threshold))
    }

    pub fn find_tag_frequencies(&mut self, threshold: usize) -> &FrequencyTable {
        self.tag_frequencies
            .insert(FrequencyTable::from_terms(&self.tags, threshold))
    }

    /// The target's table, computed with `threshold` if it is missing or stale.
    pub fn frequencies_or_compute(&mut self, target: Target, threshold: usize) -> &FrequencyTable {
        match target {
            Target::Title => {
                if self.title_frequencies.is_none() {
                    self.find_title_frequencies(threshold);
                }
                self.title_frequencies.get_or_insert_with(FrequencyTable::default)
            }
            Target::Tag => {
                if self.tag_frequencies.is_none() {
                    self.find_tag_frequencies(threshold);
                }
                self.tag_frequencies.get_or_insert_with(FrequencyTable::default)
            }
        }
    }

    pub fn terms(&self, target: Target) -> &[String] {
        match target {
            Target::Title => &self.titles,
            Target::Tag => &self.tags,
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// `None` until computed, and again after the flat sequences change.
    pub fn title_frequencies(&self) -> Option<&FrequencyTable> {
        self.title_frequencies.as_ref()
    }

    pub fn tag_frequencies(&self) -> Option<&FrequencyTable> {
        self.tag_frequencies.as_ref()
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    fn invalidate(&mut self) {
        self.title_frequencies = None;
        self.tag_frequencies = None;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    /// Every term becomes both a whole title and a single tag.
    fn snapshot_of(terms: &[String]) -> Trending {
        let date = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let videos = terms
            .iter()
            .enumerate()
            .map(|(n, term)| {
                Video::with_details(format!("v{n}"), term.clone(), Some(vec![term.clone()]))
            })
            .collect();
        let mut trending = Trending::from_videos(videos, date);
        trending.combine(CombineOptions::default()).unwrap();
        trending
    }

    proptest! {
        #[test]
        fn table_respects_threshold_and_order(
            terms in prop::collection::vec("[a-e]{1,2}", 0..60),
            threshold in 0usize..8,
        ) {
            let table = FrequencyTable::from_terms(&terms, threshold);
            let counts: Vec<usize> = table.iter().map(|(_, count)| count).collect();

            prop_assert!(counts.iter().all(|count| *count >= threshold));
            prop_assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
            for term in &terms {
                let occurrences = terms.iter().filter(|t| *t == term).count();
                let expected = (occurrences >= threshold).then_some(occurrences);
                prop_assert_eq!(table.get(term), expected);
            }
        }

        #[test]
        fn count_agrees_with_tables(
            terms in prop::collection::vec("[a-d]{1,2}", 0..40),
            threshold in 1usize..5,
        ) {
            let mut trending = snapshot_of(&terms);

            for target in [Target::Title, Target::Tag] {
                let table = match target {
                    Target::Title => trending.find_title_frequencies(threshold).clone(),
                    Target::Tag => trending.find_tag_frequencies(threshold).clone(),
                };
                prop_assert!(table.iter().all(|(_, count)| count >= threshold));
                for (term, count) in table.iter() {
                    prop_assert_eq!(trending.count(Some(target), Some(term), None).unwrap(), count);
                }
            }
        }
    }
}
