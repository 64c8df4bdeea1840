use crate::UrlError;
use std::collections::HashSet;
use url::Url;

/// Parses the site base URL used for resolving relative links
pub fn parse_base_url(base: &str) -> Result<Url, UrlError> {
    let url = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Resolves a link href to an absolute URL
///
/// Absolute http(s) hrefs are returned exactly as written so that two
/// listings of the same link dedup to one entry. Relative hrefs are joined
/// onto `base`.
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - anything that does not resolve to http(s)
///
/// # Examples
///
/// ```
/// use catalog_crawler::url::absolutize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// assert_eq!(
///     absolutize("/movie/1234/title.html", &base).as_deref(),
///     Some("https://example.com/movie/1234/title.html")
/// );
/// ```
pub fn absolutize(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    if let Ok(absolute) = Url::parse(href) {
        return match absolute.scheme() {
            "http" | "https" => Some(href.to_string()),
            _ => None,
        };
    }

    match base.join(href) {
        Ok(joined) if joined.scheme() == "http" || joined.scheme() == "https" => {
            Some(joined.to_string())
        }
        _ => None,
    }
}

/// Removes duplicate URLs, keeping the first occurrence of each
pub fn dedup_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Derives a category name from its listing URL
///
/// Uses the last non-empty path segment, so `/category/bollywood/` and
/// `/category/bollywood` both yield `bollywood`.
pub fn category_name(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}
