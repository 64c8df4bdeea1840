use crate::config::SiteConfig;
use crate::extract::FieldChain;
use lazy_static::lazy_static;
use regex::Regex;

/// Default for quality and size when nothing matches
pub const UNKNOWN: &str = "Unknown";

/// Default container format
pub const DEFAULT_FORMAT: &str = "mkv";

lazy_static! {
    // Resolution token such as 480p, 720p, 1080p, 2160p
    static ref RESOLUTION: Regex = Regex::new(r"(?i)\b(\d{3,4})p").unwrap();

    // HDTC must be tried before HD
    static ref NAMED_QUALITY: Regex = Regex::new(r"(?i)\b(HEVC|HDTC|HD)").unwrap();

    static ref EXTENSION: Regex = Regex::new(r"(?i)\.(mkv|mp4|avi)\b").unwrap();

    static ref SIZE: Regex = Regex::new(r"(?i)\d+(?:\.\d+)?\s*(?:GB|MB)\b").unwrap();

    // Free text before the first resolution marker
    static ref TITLE_BEFORE_QUALITY: Regex = Regex::new(r"(?i)^(.+?)\s+\d+p").unwrap();

    // First four digits, even inside a longer run
    static ref YEAR: Regex = Regex::new(r"\d{4}").unwrap();

    static ref DIGIT_GROUP: Regex = Regex::new(r"\d{4,}").unwrap();
}

/// Inputs for title resolution, taken from the detail page
#[derive(Debug, Clone, Default)]
pub struct TitleInput {
    /// Text of the last item-detail anchor on the page
    pub item_anchor_text: String,

    /// Text of the first server-link anchor on the page
    pub server_anchor_text: String,
}

/// Inputs for size resolution, taken from one server-link anchor
#[derive(Debug, Clone, Default)]
pub struct SizeInput {
    /// `small`/`span` text around the anchor
    pub context_text: String,

    /// The anchor's own text
    pub anchor_text: String,
}

/// Title: item anchor text, else the server-link text before its quality marker
pub fn title_chain(placeholders: &[String]) -> FieldChain<TitleInput> {
    let placeholders: Vec<String> = placeholders.iter().map(|p| p.trim().to_string()).collect();

    FieldChain::new("title", "")
        .then("item-anchor", move |input: &TitleInput| {
            let text = input.item_anchor_text.trim();
            if placeholders.iter().any(|p| p.eq_ignore_ascii_case(text)) {
                None
            } else {
                Some(text.to_string())
            }
        })
        .then("server-anchor-prefix", |input: &TitleInput| {
            TITLE_BEFORE_QUALITY
                .captures(input.server_anchor_text.trim())
                .map(|caps| caps[1].to_string())
        })
}

/// Id: digits right after the item marker, else any 4+ digit group in the path
pub fn id_chain(item_marker: &str) -> FieldChain<str> {
    let after_marker = Regex::new(&format!(r"{}(\d+)", regex::escape(item_marker))).ok();

    FieldChain::new("id", "")
        .then("after-item-marker", move |url: &str| {
            after_marker
                .as_ref()
                .and_then(|re| re.captures(url))
                .map(|caps| caps[1].to_string())
        })
        .then("path-digit-group", |url: &str| {
            let path = match url::Url::parse(url) {
                Ok(parsed) => parsed.path().to_string(),
                Err(_) => url.to_string(),
            };
            DIGIT_GROUP.find(&path).map(|m| m.as_str().to_string())
        })
}

/// Year: first four-digit run in the resolved title
pub fn year_chain() -> FieldChain<str> {
    FieldChain::new("year", "").then("four-digit-run", |title: &str| {
        YEAR.find(title).map(|m| m.as_str().to_string())
    })
}

/// Quality: resolution marker, else a named release marker
pub fn quality_chain() -> FieldChain<str> {
    FieldChain::new("quality", UNKNOWN)
        .then("resolution", |text: &str| {
            RESOLUTION
                .captures(text)
                .map(|caps| format!("{}p", &caps[1]))
        })
        .then("named-marker", |text: &str| {
            NAMED_QUALITY
                .captures(text)
                .map(|caps| caps[1].to_ascii_uppercase())
        })
}

/// Format: container extension in the anchor text
pub fn format_chain() -> FieldChain<str> {
    FieldChain::new("format", DEFAULT_FORMAT).then("extension", |text: &str| {
        EXTENSION
            .captures(text)
            .map(|caps| caps[1].to_ascii_lowercase())
    })
}

/// Size: `<number><GB|MB>` in the surrounding text, else in the anchor itself
pub fn size_chain() -> FieldChain<SizeInput> {
    FieldChain::new("size", UNKNOWN)
        .then("context-text", |input: &SizeInput| {
            SIZE.find(&input.context_text).map(|m| m.as_str().to_string())
        })
        .then("anchor-text", |input: &SizeInput| {
            SIZE.find(&input.anchor_text).map(|m| m.as_str().to_string())
        })
}

/// All field chains for one site, built once per crawl
pub struct FieldExtractors {
    pub title: FieldChain<TitleInput>,
    pub id: FieldChain<str>,
    pub year: FieldChain<str>,
    pub quality: FieldChain<str>,
    pub format: FieldChain<str>,
    pub size: FieldChain<SizeInput>,
}

impl FieldExtractors {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            title: title_chain(&site.placeholder_titles),
            id: id_chain(&site.item_marker),
            year: year_chain(),
            quality: quality_chain(),
            format: format_chain(),
            size: size_chain(),
        }
    }
}
