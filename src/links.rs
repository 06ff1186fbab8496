use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

use crate::domain::Lookup;
use crate::fetch::Fetcher;

static DIRECTORY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a href=[^>]+>([^/]+/)</a>").expect("directory link pattern"));
static PDF_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a href=[^>]+>([^/]+\.pdf)</a>").expect("pdf link pattern")
});

/// Pulls the first capture group out of every matching line of a listing.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Anchors whose text ends in `/`.
    pub fn directories() -> Self {
        Self {
            pattern: DIRECTORY_LINK.clone(),
        }
    }

    /// Anchors whose text ends in `.pdf`.
    pub fn pdf_reports() -> Self {
        Self {
            pattern: PDF_LINK.clone(),
        }
    }

    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| {
                self.pattern
                    .captures(line.as_ref())
                    .and_then(|caps| caps.get(1))
                    .map(|capture| capture.as_str().to_string())
            })
            .collect()
    }

    /// Fetches `url` and extracts links from its body. A non-OK status is
    /// `NotFound`; a transport failure is `TransportFailed`.
    pub fn extract_from<F: Fetcher + ?Sized>(&self, fetcher: &F, url: &str) -> Lookup<Vec<String>> {
        match fetcher.fetch(url) {
            Ok(response) if response.is_ok() => Lookup::Found(self.extract(&response.lines)),
            Ok(response) => {
                error!(status = response.status, url, "listing request failed");
                Lookup::NotFound
            }
            Err(err) => {
                error!(url, "listing request failed: {err}");
                Lookup::TransportFailed(err.to_string())
            }
        }
    }
}
