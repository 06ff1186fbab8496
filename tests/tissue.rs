use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;

use patient_view::config::SlideArchiveSettings;
use patient_view::domain::{CaseId, Lookup};
use patient_view::error::PatientViewError;
use patient_view::fetch::{FetchResponse, Fetcher};
use patient_view::tissue::TissueImageChecker;

enum Page {
    Body(&'static str),
    Status(u16),
    Broken(&'static str),
}

#[derive(Default)]
struct MockFetcher {
    pages: HashMap<String, Page>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|seen| *seen == url).count()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, PatientViewError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Page::Body(body)) => Ok(FetchResponse::new(200, body)),
            Some(Page::Status(status)) => Ok(FetchResponse::new(*status, "")),
            Some(Page::Broken(reason)) => Err(PatientViewError::Http(reason.to_string())),
            None => Ok(FetchResponse::new(404, "")),
        }
    }
}

fn settings() -> SlideArchiveSettings {
    SlideArchiveSettings {
        meta_url_template: "https://slides.example.org/meta?case={case_id}".to_string(),
        iframe_url_template: "https://slides.example.org/view?case={case_id}".to_string(),
        case_prefix: "TCGA-".to_string(),
    }
}

fn checker(fetcher: &Arc<MockFetcher>) -> TissueImageChecker<MockFetcher> {
    TissueImageChecker::new(Arc::clone(fetcher), settings())
}

#[test]
fn unrecognized_prefix_never_fetches() {
    let fetcher = Arc::new(MockFetcher::default());
    let lookup = checker(&fetcher).iframe_url(&CaseId::new("MSK-0001"));

    assert_matches!(lookup, Lookup::NotFound);
    assert!(fetcher.requests().is_empty());
}

#[test]
fn positive_count_yields_iframe_url() {
    let fetcher = Arc::new(MockFetcher::default().page(
        "https://slides.example.org/meta?case=tcga-AB-1234",
        Page::Body("<?xml version='1.0'?>\n<data total_count='2'>\n</data>"),
    ));
    let lookup = checker(&fetcher).iframe_url(&CaseId::new("tcga-AB-1234"));

    assert_eq!(
        lookup,
        Lookup::Found("https://slides.example.org/view?case=tcga-AB-1234".to_string())
    );
}

#[test]
fn zero_count_or_missing_marker_is_absent() {
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(
                "https://slides.example.org/meta?case=TCGA-AB-0000",
                Page::Body("<data total_count='0'>"),
            )
            .page(
                "https://slides.example.org/meta?case=TCGA-AB-1111",
                Page::Body("<data></data>"),
            ),
    );
    let checker = checker(&fetcher);

    assert_matches!(checker.iframe_url(&CaseId::new("TCGA-AB-0000")), Lookup::NotFound);
    assert_matches!(checker.iframe_url(&CaseId::new("TCGA-AB-1111")), Lookup::NotFound);
}

#[test]
fn failures_degrade_to_absent() {
    let fetcher = Arc::new(
        MockFetcher::default()
            .page(
                "https://slides.example.org/meta?case=TCGA-AB-5000",
                Page::Status(500),
            )
            .page(
                "https://slides.example.org/meta?case=TCGA-AB-6000",
                Page::Broken("timed out"),
            ),
    );
    let checker = checker(&fetcher);

    assert_matches!(checker.iframe_url(&CaseId::new("TCGA-AB-5000")), Lookup::NotFound);
    assert_matches!(
        checker.iframe_url(&CaseId::new("TCGA-AB-6000")),
        Lookup::TransportFailed(_)
    );
}

#[test]
fn every_call_hits_the_archive() {
    let url = "https://slides.example.org/meta?case=TCGA-AB-1234";
    let fetcher = Arc::new(MockFetcher::default().page(url, Page::Body("<data total_count='1'>")));
    let checker = checker(&fetcher);

    assert!(checker.iframe_url(&CaseId::new("TCGA-AB-1234")).is_found());
    assert!(checker.iframe_url(&CaseId::new("TCGA-AB-1234")).is_found());
    assert_eq!(fetcher.request_count(url), 2);
}
