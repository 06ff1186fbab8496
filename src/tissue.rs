use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::warn;

use crate::config::SlideArchiveSettings;
use crate::domain::{CaseId, Lookup};
use crate::fetch::Fetcher;

static TOTAL_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<data total_count='([0-9]+)'>").expect("slide count pattern"));

/// Asks the slide archive whether any tissue images exist for a case.
/// Not cached; every call hits the archive.
pub struct TissueImageChecker<F: Fetcher> {
    fetcher: Arc<F>,
    settings: SlideArchiveSettings,
}

impl<F: Fetcher> TissueImageChecker<F> {
    pub fn new(fetcher: Arc<F>, settings: SlideArchiveSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn iframe_url(&self, case_id: &CaseId) -> Lookup<String> {
        if !case_id.has_prefix_ignore_case(&self.settings.case_prefix) {
            return Lookup::NotFound;
        }

        let meta_url = self.settings.meta_url(case_id.as_str());
        let response = match self.fetcher.fetch(&meta_url) {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %meta_url, "slide archive request failed: {err}");
                return Lookup::TransportFailed(err.to_string());
            }
        };
        if !response.is_ok() {
            warn!(status = response.status, url = %meta_url, "slide archive request failed");
            return Lookup::NotFound;
        }

        match slide_count(&response.lines) {
            Some(count) if count > 0 => Lookup::Found(self.settings.iframe_url(case_id.as_str())),
            Some(_) => Lookup::NotFound,
            None => {
                warn!(url = %meta_url, "slide archive response has no slide count");
                Lookup::NotFound
            }
        }
    }
}

/// First `total_count` marker in the body.
pub fn slide_count<S: AsRef<str>>(lines: &[S]) -> Option<u64> {
    lines.iter().find_map(|line| {
        TOTAL_COUNT
            .captures(line.as_ref())
            .and_then(|caps| caps.get(1))
            .and_then(|count| count.as_str().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_count_marker() {
        let lines = [
            "<?xml version='1.0'?>",
            "<data total_count='3'>",
            "<data total_count='0'>",
        ];
        assert_eq!(slide_count(&lines), Some(3));
        assert_eq!(slide_count(&["<data>"]), None);
    }
}
