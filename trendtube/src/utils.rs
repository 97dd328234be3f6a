use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIDEO_URL_RE: Regex = Regex::new(
        r"(?:youtube\.com/watch\?(?:.*&)?v=|^/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|^/shorts/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})",
    )
    .expect("video URL pattern is valid");
}

/// Parse ISO8601 duration string (PT1H2M3S) to total seconds
pub fn parse_iso8601_duration_to_seconds(duration_str: &str) -> u64 {
    if duration_str.is_empty() {
        return 0;
    }

    // Day components (P1DT2H) show up on live archives
    let Some(rest) = duration_str.strip_prefix('P') else {
        return 0;
    };

    let mut total_seconds = 0.0;
    let mut current_number = String::new();
    let mut in_time = false;

    for ch in rest.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
            continue;
        }
        if ch == 'T' {
            in_time = true;
            current_number.clear();
            continue;
        }
        if let Ok(num) = current_number.parse::<f64>() {
            match (ch, in_time) {
                ('D', false) => total_seconds += num * 86_400.0,
                ('W', false) => total_seconds += num * 604_800.0,
                ('H', true) => total_seconds += num * 3600.0,
                ('M', true) => total_seconds += num * 60.0,
                ('S', true) => total_seconds += num,
                _ => {}
            }
        }
        current_number.clear();
    }

    total_seconds as u64
}

/// Pull the 11 character video ID out of a watch, short or embed link.
/// Relative links (`/watch?v=...`) from the trending page are accepted too.
pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_durations() {
        assert_eq!(parse_iso8601_duration_to_seconds("PT4M13S"), 253);
        assert_eq!(parse_iso8601_duration_to_seconds("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration_to_seconds("P1DT1S"), 86_401);
        assert_eq!(parse_iso8601_duration_to_seconds("P0D"), 0);
        assert_eq!(parse_iso8601_duration_to_seconds(""), 0);
        assert_eq!(parse_iso8601_duration_to_seconds("4:13"), 0);
    }

    #[test]
    fn extracts_ids_from_links() {
        assert_eq!(
            extract_youtube_video_id("/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=4s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_youtube_video_id("https://youtu.be/jNQXAC9WgXc").as_deref(),
            Some("jNQXAC9WgXc")
        );
        assert_eq!(
            extract_youtube_video_id("/shorts/abcdefghijk").as_deref(),
            Some("abcdefghijk")
        );
        assert_eq!(extract_youtube_video_id("/channel/UCX6OQ3DkcsbYNE6H8uQQuVA"), None);
    }
}
