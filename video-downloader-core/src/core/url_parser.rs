//! Heuristic URL shape rules for telling a single video apart from a
//! profile/channel. Platform URL grammars drift over time; these rules follow
//! the shapes seen in the wild and will misclassify some edge cases.

use serde::Serialize;

use crate::platforms::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    Video,
    Profile,
}

const INSTAGRAM_CONTENT_PREFIXES: &[&str] = &["p", "reel", "tv", "stories"];
const YOUTUBE_CHANNEL_MARKERS: &[&str] = &["/c/", "/channel/", "/user/", "/playlist"];

/// `None` when the platform is unknown, since the rules below are meaningless
/// for arbitrary hosts.
pub fn url_kind(url: &str) -> Option<UrlKind> {
    let platform = Platform::from_url(url);
    let path = url_path(url);
    let segments = path_segments(&path);

    let is_profile = match platform {
        Platform::YouTube => youtube_is_profile(&path, &segments),
        Platform::TikTok => tiktok_is_profile(&path, &segments),
        Platform::Instagram => instagram_is_profile(&segments),
        Platform::Unknown => return None,
    };

    Some(if is_profile {
        UrlKind::Profile
    } else {
        UrlKind::Video
    })
}

pub fn is_profile_url(url: &str) -> bool {
    url_kind(url) == Some(UrlKind::Profile)
}

/// Canonical `/shorts` listing for a channel URL whose path ends in `shorts`,
/// e.g. `youtube.com/@name/shorts/` -> `https://www.youtube.com/@name/shorts`.
pub fn youtube_shorts_listing(url: &str) -> Option<String> {
    if Platform::from_url(url) != Platform::YouTube {
        return None;
    }

    let path = url_path(url);
    let segments = path_segments(&path);
    let (last, prefix) = segments.split_last()?;
    if !last.eq_ignore_ascii_case("shorts") {
        return None;
    }

    let channel_prefix = match prefix {
        [handle] => handle.starts_with('@'),
        [kind, _] => ["c", "channel", "user"].contains(&kind.to_lowercase().as_str()),
        _ => false,
    };

    channel_prefix.then(|| format!("https://www.youtube.com/{}/shorts", prefix.join("/")))
}

fn youtube_is_profile(path: &str, segments: &[&str]) -> bool {
    let lower = path.to_lowercase();

    if YOUTUBE_CHANNEL_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }

    if segments.first().is_some_and(|s| s.starts_with('@')) {
        if lower.contains("/watch") {
            return false;
        }
        let single_short = segments.len() == 3 && segments[1].eq_ignore_ascii_case("shorts");
        return !single_short;
    }

    segments
        .last()
        .is_some_and(|s| s.eq_ignore_ascii_case("shorts"))
}

fn tiktok_is_profile(path: &str, segments: &[&str]) -> bool {
    segments.first().is_some_and(|s| s.starts_with('@'))
        && !path.to_lowercase().contains("/video/")
}

fn instagram_is_profile(segments: &[&str]) -> bool {
    match segments {
        [only] => !INSTAGRAM_CONTENT_PREFIXES.contains(&only.to_lowercase().as_str()),
        _ => false,
    }
}

fn url_path(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url.trim()) {
        if parsed.has_host() {
            return parsed.path().to_string();
        }
    }

    // scheme-less input such as "youtube.com/@name"
    let rest = url.trim();
    let rest = rest.split_once("://").map(|(_, r)| r).unwrap_or(rest);
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    match rest.find('/') {
        Some(idx) => rest[idx..].to_string(),
        None => String::new(),
    }
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_handle_is_profile() {
        assert!(is_profile_url("https://www.youtube.com/@name"));
        assert!(is_profile_url("https://www.youtube.com/@name/"));
        assert!(is_profile_url("https://www.youtube.com/@name/videos"));
    }

    #[test]
    fn youtube_handle_shorts_listing_is_profile() {
        assert!(is_profile_url("https://www.youtube.com/@name/shorts"));
        assert!(is_profile_url("https://www.youtube.com/@name/shorts/"));
    }

    #[test]
    fn youtube_single_short_is_video() {
        assert!(!is_profile_url("https://www.youtube.com/@name/shorts/abc123"));
        assert!(!is_profile_url("https://www.youtube.com/shorts/abc123"));
    }

    #[test]
    fn youtube_watch_is_video() {
        assert!(!is_profile_url("https://www.youtube.com/watch?v=abc123"));
        assert!(!is_profile_url("https://youtu.be/abc123"));
        assert_eq!(
            url_kind("https://www.youtube.com/watch?v=abc123"),
            Some(UrlKind::Video)
        );
    }

    #[test]
    fn youtube_channel_markers_are_profiles() {
        assert!(is_profile_url("https://www.youtube.com/c/SomeName"));
        assert!(is_profile_url("https://www.youtube.com/channel/UC1234"));
        assert!(is_profile_url("https://www.youtube.com/user/legacy"));
        assert!(is_profile_url("https://www.youtube.com/playlist?list=PL123"));
        assert!(is_profile_url("https://www.youtube.com/channel/UC1234/shorts"));
    }

    #[test]
    fn tiktok_rules() {
        assert!(is_profile_url("https://www.tiktok.com/@name"));
        assert!(is_profile_url("https://www.tiktok.com/@name/"));
        assert!(!is_profile_url("https://www.tiktok.com/@name/video/123"));
        assert!(!is_profile_url("https://vm.tiktok.com/ZMabc/"));
    }

    #[test]
    fn instagram_rules() {
        assert!(is_profile_url("https://www.instagram.com/username"));
        assert!(is_profile_url("https://www.instagram.com/username/"));
        assert!(!is_profile_url("https://www.instagram.com/p/abc123"));
        assert!(!is_profile_url("https://www.instagram.com/reel/abc123"));
        assert!(!is_profile_url("https://www.instagram.com/tv/abc123/"));
        assert!(!is_profile_url("https://www.instagram.com/stories/username/123"));
        assert!(!is_profile_url("https://www.instagram.com/reel"));
        assert!(!is_profile_url("https://www.instagram.com/"));
    }

    #[test]
    fn unknown_platform_has_no_kind() {
        assert_eq!(url_kind("https://vimeo.com/123"), None);
        assert!(!is_profile_url("https://example.com/@name"));
    }

    #[test]
    fn scheme_less_urls_are_understood() {
        assert!(is_profile_url("youtube.com/@name"));
        assert!(is_profile_url("www.instagram.com/username"));
        assert!(!is_profile_url("tiktok.com/@name/video/1?lang=en"));
    }

    #[test]
    fn resolver_is_stable() {
        for url in [
            "https://www.youtube.com/@name/shorts",
            "https://www.tiktok.com/@name/video/123",
            "https://www.instagram.com/username",
        ] {
            assert_eq!(url_kind(url), url_kind(url));
        }
    }

    #[test]
    fn shorts_listing_rewrites_channel_urls() {
        assert_eq!(
            youtube_shorts_listing("https://m.youtube.com/@name/shorts/?feature=share").as_deref(),
            Some("https://www.youtube.com/@name/shorts")
        );
        assert_eq!(
            youtube_shorts_listing("https://www.youtube.com/channel/UC1/shorts").as_deref(),
            Some("https://www.youtube.com/channel/UC1/shorts")
        );
    }

    #[test]
    fn shorts_listing_ignores_other_shapes() {
        assert_eq!(youtube_shorts_listing("https://www.youtube.com/@name"), None);
        assert_eq!(youtube_shorts_listing("https://www.youtube.com/@name/shorts/abc"), None);
        assert_eq!(youtube_shorts_listing("https://www.youtube.com/shorts"), None);
        assert_eq!(youtube_shorts_listing("https://www.tiktok.com/@name/shorts"), None);
    }
}
