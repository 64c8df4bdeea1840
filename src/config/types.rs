use serde::Deserialize;

/// Main configuration structure for Catalog-Crawler
///
/// Every section falls back to its defaults, so an empty file (or no file
/// at all) yields a configuration for the stock listing site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Site layout: where to start and which path markers identify each tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the listing site, also the base for relative links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Substring identifying category listing links
    #[serde(rename = "category-marker")]
    pub category_marker: String,

    /// Substring identifying item detail links
    #[serde(rename = "item-marker")]
    pub item_marker: String,

    /// Substring identifying download-server (redirect) links
    #[serde(rename = "server-marker")]
    pub server_marker: String,

    /// Substring identifying final download links on a server page
    #[serde(rename = "download-marker")]
    pub download_marker: String,

    /// Substring identifying the poster image source
    #[serde(rename = "poster-marker")]
    pub poster_marker: String,

    /// Anchor texts that are the site name rather than an item title
    #[serde(rename = "placeholder-titles")]
    pub placeholder_titles: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.filmyzilla28.com".to_string(),
            category_marker: "/category/".to_string(),
            item_marker: "/movie/".to_string(),
            server_marker: "/server/".to_string(),
            download_marker: "/downloads/".to_string(),
            poster_marker: "poster".to_string(),
            placeholder_titles: vec!["FilmyZilla.Com".to_string()],
        }
    }
}

/// Request headers and transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Browser-like user agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept header sent with every request
    pub accept: String,

    /// Optional per-request timeout in seconds (no timeout when absent)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/143.0.0.0 Mobile Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            timeout_secs: None,
        }
    }
}

/// Fixed politeness delays (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each server-link resolution
    #[serde(rename = "link-delay-ms")]
    pub link_delay_ms: u64,

    /// Pause after each movie
    #[serde(rename = "movie-delay-ms")]
    pub movie_delay_ms: u64,

    /// Pause after each category
    #[serde(rename = "category-delay-ms")]
    pub category_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            link_delay_ms: 1000,
            movie_delay_ms: 2000,
            category_delay_ms: 3000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the checkpoint and catalog files
    pub directory: String,

    /// Name of the periodically rewritten progress checkpoint
    #[serde(rename = "progress-file")]
    pub progress_file: String,

    /// Name of the completion catalog written at the end of a run
    #[serde(rename = "final-file")]
    pub final_file: String,

    /// Persist a checkpoint whenever the movie count is a multiple of this
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./output".to_string(),
            progress_file: "progress.json".to_string(),
            final_file: "filmyzilla_data.json".to_string(),
            checkpoint_interval: 5,
        }
    }
}
