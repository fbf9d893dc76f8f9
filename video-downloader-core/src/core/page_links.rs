//! Link discovery in rendered profile pages: anchors, `data-href`
//! attributes, JSON payloads in `<script>` tags and quoted strings in raw
//! script text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

pub const INSTAGRAM_ORIGIN: &str = "https://www.instagram.com";

const MAX_JSON_DEPTH: usize = 10;

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).unwrap());

/// Every link in `html` containing one of `needles`, made absolute against
/// `origin`, deduplicated, in discovery order.
pub fn collect_links(html: &str, origin: &str, needles: &[&str]) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut found = LinkSet::new(origin, needles);

    let anchors = Selector::parse("a[href]").unwrap();
    for el in doc.select(&anchors) {
        if let Some(href) = el.value().attr("href") {
            found.offer(href);
        }
    }

    let data_hrefs = Selector::parse("[data-href]").unwrap();
    for el in doc.select(&data_hrefs) {
        if let Some(href) = el.value().attr("data-href") {
            found.offer(href);
        }
    }

    let scripts = Selector::parse("script").unwrap();
    for el in doc.select(&scripts) {
        let text: String = el.text().collect();

        let is_json = el
            .value()
            .attr("type")
            .map(|t| {
                let t = t.trim().to_ascii_lowercase();
                t == "application/json" || t == "application/ld+json"
            })
            .unwrap_or(false);

        if is_json {
            if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
                walk_json(&value, 0, &mut found);
            }
        }

        for cap in QUOTED_RE.captures_iter(&text) {
            found.offer(&cap[1].replace("\\/", "/"));
        }
    }

    found.into_links()
}

fn walk_json(value: &Value, depth: usize, found: &mut LinkSet<'_>) {
    if depth > MAX_JSON_DEPTH {
        return;
    }

    match value {
        Value::String(s) => found.offer(s),
        Value::Array(items) => {
            for item in items {
                walk_json(item, depth + 1, found);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                walk_json(item, depth + 1, found);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

struct LinkSet<'a> {
    origin: &'a str,
    needles: &'a [&'a str],
    seen: HashSet<String>,
    links: Vec<String>,
}

impl<'a> LinkSet<'a> {
    fn new(origin: &'a str, needles: &'a [&'a str]) -> Self {
        Self {
            origin,
            needles,
            seen: HashSet::new(),
            links: Vec::new(),
        }
    }

    fn offer(&mut self, candidate: &str) {
        let candidate = candidate.trim();
        if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
            return;
        }
        if !self.needles.iter().any(|n| candidate.contains(n)) {
            return;
        }

        let absolute = absolutize(candidate, self.origin);
        if self.seen.insert(absolute.clone()) {
            self.links.push(absolute);
        }
    }

    fn into_links(self) -> Vec<String> {
        self.links
    }
}

/// Resolves relative and protocol-relative links against `origin` and drops
/// the query string and fragment.
pub fn absolutize(link: &str, origin: &str) -> String {
    let link = link.split(['?', '#']).next().unwrap_or(link);
    let origin = origin.trim_end_matches('/');

    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else if let Some(rest) = link.strip_prefix("//") {
        format!("https://{}", rest)
    } else if link.starts_with('/') {
        format!("{}{}", origin, link)
    } else if link.split('/').next().is_some_and(|host| host.contains('.')) {
        format!("https://{}", link)
    } else {
        format!("{}/{}", origin, link)
    }
}
