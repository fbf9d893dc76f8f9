use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::media::MediaMetadata;
use crate::platforms::Platform;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

const PLATFORM_DOMAINS: &[&str] = &["youtube.com", "youtu.be", "tiktok.com", "instagram.com"];

const CTA_KEYWORDS: &[&str] = &[
    "link in bio",
    "ссылка",
    "link",
    "подпис",
    "subscribe",
    "telegram",
    "телеграм",
    "whatsapp",
    "напиши",
    "пиши",
    "write",
    "директ",
    "direct",
    "заказ",
    "order",
    "консультац",
    "consult",
    "курс",
    "course",
    "бесплатн",
    "free",
    "скидк",
    "discount",
    "переход",
    "click",
    "join",
];

const CTA_WINDOW: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub profile_header: String,
    pub description: String,
    pub bio: String,
    pub links: Vec<String>,
    #[serde(rename = "external_links")]
    pub has_external_links: bool,
    #[serde(rename = "cta_in_bio")]
    pub call_to_action: String,
}

impl ProfileInfo {
    pub fn from_metadata(platform: Platform, meta: &MediaMetadata) -> Self {
        let profile_header = match platform {
            Platform::YouTube => first_non_empty(&[&meta.channel_description, &meta.description]),
            Platform::TikTok => {
                first_non_empty(&[&meta.description, &meta.signature, &meta.uploader])
            }
            Platform::Instagram => {
                first_non_empty(&[&meta.description, &meta.biography, &meta.fullname])
            }
            Platform::Unknown => String::new(),
        };

        let description = [&meta.description, &meta.channel_description]
            .into_iter()
            .flatten()
            .filter(|d| !d.trim().is_empty())
            .max_by_key(|d| d.chars().count())
            .cloned()
            .unwrap_or_default();

        let bio = first_non_empty(&[&meta.uploader, &meta.channel, &meta.fullname]);
        let links = extract_links(&description);
        let has_external_links = links.iter().any(|l| is_external_link(l));
        let call_to_action = call_to_action_snippet(&description);

        Self {
            profile_header,
            description,
            bio,
            links,
            has_external_links,
            call_to_action,
        }
    }
}

fn first_non_empty(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|c| !c.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn extract_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LINK_RE
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']', '}', '"', '\'', '»'])
                .to_string()
        })
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

pub fn is_external_link(link: &str) -> bool {
    let host = match url::Url::parse(link).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(h) => h,
        None => return false,
    };
    !PLATFORM_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

/// Text around the earliest trigger keyword, cut from the original-case
/// description. Offsets are in characters so multi-byte text slices cleanly.
pub fn call_to_action_snippet(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let keywords: Vec<Vec<char>> = CTA_KEYWORDS.iter().map(|k| k.chars().collect()).collect();

    for start in 0..lowered.len() {
        let hit = keywords
            .iter()
            .find(|kw| lowered[start..].starts_with(kw.as_slice()));
        if let Some(kw) = hit {
            let from = start.saturating_sub(CTA_WINDOW);
            let to = (start + kw.len() + CTA_WINDOW).min(chars.len());
            return chars[from..to].iter().collect::<String>().trim().to_string();
        }
    }

    String::new()
}
