//! YouTube URL rules

use url::Url;

/// Hosts accepted as YouTube sources
pub const VALID_HOSTS: [&str; 4] = ["www.youtube.com", "youtube.com", "m.youtube.com", "youtu.be"];

const SHORT_HOST: &str = "youtu.be";

/// Whether `source_url` is a YouTube video link
///
/// Short links need a non-empty path (`youtu.be/<id>`); the long forms need
/// either a `v=` query or a `/watch` path.
pub fn is_valid_url(source_url: &str) -> bool {
    let Ok(url) = Url::parse(source_url) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    if !VALID_HOSTS.contains(&host) {
        return false;
    }

    if host == SHORT_HOST {
        return last_path_segment(&url).is_some();
    }

    let has_video_query = url.query().is_some_and(|q| q.contains("v="));
    has_video_query || url.path().contains("/watch")
}

/// Extract the video id from a YouTube link
pub fn extract_video_id(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;

    if url.host_str()? == SHORT_HOST {
        return last_path_segment(&url).map(str::to_owned);
    }

    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

fn last_path_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.rev().find(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_known_forms() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "https://youtube.com/watch?v=abc123",
            "https://m.youtube.com/watch?v=abc123&t=30",
            "https://youtu.be/abc123",
            "https://www.youtube.com/watch",
        ] {
            assert!(is_valid_url(url), "{url} should be valid");
        }
    }

    #[test]
    fn rejects_other_hosts_and_shapes() {
        for url in [
            "",
            "not a url",
            "https://vimeo.com/watch?v=abc",
            "https://www.youtube.com/",
            "https://www.youtube.com/channel/xyz",
            "https://youtu.be/",
            "https://youtube.com.evil.example/watch?v=abc",
        ] {
            assert!(!is_valid_url(url), "{url} should be invalid");
        }
    }

    #[test]
    fn extracts_ids() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("https://www.youtube.com/watch"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(extract_video_id("garbage"), None);
    }
}
