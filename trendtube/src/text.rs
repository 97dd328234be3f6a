use lazy_static::lazy_static;
use std::collections::HashSet;
use stop_words::LANGUAGE;

/// Words that carry no signal on a video platform.
pub const CUSTOM_STOP_WORDS: &[&str] = &["video", "youtube", "new", "get", "ft"];

lazy_static! {
    /// NLTK English list.
    static ref ENGLISH: HashSet<String> = stop_words::get(LANGUAGE::English).into_iter().collect();
}

/// Strip one leading and one trailing ASCII punctuation character.
pub fn strip_punctuation(token: &str) -> &str {
    let mut word = token;
    if word.starts_with(|c: char| c.is_ascii_punctuation()) {
        word = &word[1..];
    }
    if word.ends_with(|c: char| c.is_ascii_punctuation()) {
        word = &word[..word.len() - 1];
    }
    word
}

/// Keep the first occurrence of every term.
pub fn dedup<I>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Whitespace tokenize, strip edge punctuation, drop empties and duplicates.
pub fn split_words(text: &str) -> Vec<String> {
    dedup(
        text.split_whitespace()
            .map(strip_punctuation)
            .filter(|word| !word.is_empty())
            .map(str::to_string),
    )
}

pub fn is_stop_word(word: &str, include_custom: bool) -> bool {
    let lower = word.to_lowercase();
    if ENGLISH.contains(lower.as_str()) {
        return true;
    }
    if !include_custom {
        return false;
    }

    let mut chars = lower.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_digit() || c.is_ascii_punctuation() {
            return true;
        }
    }
    CUSTOM_STOP_WORDS.contains(&lower.as_str())
}

/// Case-insensitive stop word filter. With `include_custom`, single digits,
/// single punctuation characters and [`CUSTOM_STOP_WORDS`] are dropped too.
pub fn remove_stop_words(words: Vec<String>, include_custom: bool) -> Vec<String> {
    words
        .into_iter()
        .filter(|word| !is_stop_word(word, include_custom))
        .collect()
}
