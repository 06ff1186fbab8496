use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::cache::MemoCache;
use crate::config::PathologyReportSettings;
use crate::domain::{CaseId, Lookup};
use crate::fetch::Fetcher;
use crate::links::LinkExtractor;

static REPORT_CASE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(TCGA-..-....).+").expect("report case key pattern"));

/// Report URLs of one tumor type, keyed by the case id prefix of the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportIndex {
    reports: HashMap<String, String>,
    listing_failure: Option<String>,
}

impl ReportIndex {
    pub fn get(&self, case_key: &str) -> Option<&str> {
        self.reports.get(case_key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Set when the base listing itself could not be fetched.
    pub fn listing_failure(&self) -> Option<&str> {
        self.listing_failure.as_deref()
    }

    fn insert(&mut self, case_key: String, url: String) {
        if let Some(previous) = self.reports.insert(case_key.clone(), url.clone()) {
            if previous != url {
                warn!(
                    case = %case_key,
                    kept = %url,
                    replaced = %previous,
                    "multiple pathology reports for case"
                );
            }
        }
    }
}

pub fn report_case_key(file_name: &str) -> Option<&str> {
    REPORT_CASE_KEY
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|capture| capture.as_str())
}

/// Walks `base_url`'s directory listing and every sub-listing for PDF
/// reports. Failed sub-listings are skipped; what was found elsewhere is kept.
pub fn crawl_report_index<F: Fetcher + ?Sized>(fetcher: &F, base_url: &str) -> ReportIndex {
    let mut index = ReportIndex::default();

    let dirs = match LinkExtractor::directories().extract_from(fetcher, base_url) {
        Lookup::Found(dirs) => dirs,
        Lookup::NotFound => {
            index.listing_failure = Some(format!("no listing at {base_url}"));
            return index;
        }
        Lookup::TransportFailed(reason) => {
            index.listing_failure = Some(reason);
            return index;
        }
    };

    let pdfs = LinkExtractor::pdf_reports();
    for dir in dirs {
        let dir_url = format!("{base_url}{dir}");
        let Some(files) = pdfs.extract_from(fetcher, &dir_url).found() else {
            continue;
        };
        debug!(url = %dir_url, reports = files.len(), "scanned pathology report listing");
        for file in files {
            let Some(case_key) = report_case_key(&file) else {
                continue;
            };
            index.insert(case_key.to_string(), format!("{dir_url}{file}"));
        }
    }

    index
}

/// Lazily crawled pathology report URLs, one crawl per tumor type for the
/// lifetime of the index.
pub struct PathologyReportIndex<F: Fetcher> {
    fetcher: Arc<F>,
    settings: PathologyReportSettings,
    cache: MemoCache<String, ReportIndex>,
}

impl<F: Fetcher> PathologyReportIndex<F> {
    pub fn new(fetcher: Arc<F>, settings: PathologyReportSettings) -> Self {
        Self {
            fetcher,
            settings,
            cache: MemoCache::new(),
        }
    }

    pub fn lookup(&self, tumor_type: &str, case_id: &CaseId) -> Lookup<String> {
        let index = self.index_for(tumor_type);
        if let Some(url) = index.get(case_id.as_str()) {
            return Lookup::Found(url.to_string());
        }
        match index.listing_failure() {
            Some(reason) => Lookup::TransportFailed(reason.to_string()),
            None => Lookup::NotFound,
        }
    }

    pub fn index_for(&self, tumor_type: &str) -> Arc<ReportIndex> {
        self.cache
            .get_or_build(&tumor_type.to_string(), |tumor_type| {
                match self.settings.base_url(tumor_type) {
                    Some(base_url) => {
                        debug!(
                            tumor_type = %tumor_type,
                            url = %base_url,
                            "crawling pathology reports"
                        );
                        crawl_report_index(self.fetcher.as_ref(), &base_url)
                    }
                    None => ReportIndex::default(),
                }
            })
    }

    pub fn is_ready(&self, tumor_type: &str) -> bool {
        self.cache.contains(&tumor_type.to_string())
    }
}
