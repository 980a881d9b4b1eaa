use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";
const VIMEO_PLAYER_BASE: &str = "https://player.vimeo.com/video/";
const VIDEO_FILE_SUFFIXES: &[&str] = &[".mp4", ".webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Embeddable,
    File,
    Link,
    Empty,
}

impl UrlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlKind::Embeddable => "embeddable",
            UrlKind::File => "file",
            UrlKind::Link => "link",
            UrlKind::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub url: String,
    pub kind: UrlKind,
}

fn vimeo_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"vimeo\.com/(\d+)").expect("static regex"))
}

fn embed_host() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"youtube\.com/embed|player\.vimeo\.com").expect("static regex"))
}

/// Rewrites YouTube and Vimeo share links into their player form and says how
/// the result can be shown. Matching is substring based and case-sensitive.
pub fn classify_and_normalize(raw: &str) -> NormalizedUrl {
    if raw.is_empty() {
        return NormalizedUrl {
            url: String::new(),
            kind: UrlKind::Empty,
        };
    }

    if let Some(url) = embed_url(raw) {
        return NormalizedUrl {
            url,
            kind: UrlKind::Embeddable,
        };
    }

    if embed_host().is_match(raw) {
        return NormalizedUrl {
            url: raw.to_string(),
            kind: UrlKind::Embeddable,
        };
    }

    let kind = if VIDEO_FILE_SUFFIXES.iter().any(|suffix| raw.ends_with(suffix)) {
        UrlKind::File
    } else {
        UrlKind::Link
    };
    NormalizedUrl {
        url: raw.to_string(),
        kind,
    }
}

fn embed_url(raw: &str) -> Option<String> {
    if raw.contains("youtube.com/watch") {
        if let Some(id) = watch_id(raw) {
            return Some(format!("{YOUTUBE_EMBED_BASE}{id}"));
        }
    }

    if let Some((_, tail)) = raw.split_once("youtu.be/") {
        let id = tail.split(['?', '&']).next().unwrap_or_default();
        if !id.is_empty() {
            return Some(format!("{YOUTUBE_EMBED_BASE}{id}"));
        }
    }

    if raw.contains("vimeo.com/") {
        if let Some(caps) = vimeo_id().captures(raw) {
            return Some(format!("{VIMEO_PLAYER_BASE}{}", &caps[1]));
        }
    }

    None
}

fn watch_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}
