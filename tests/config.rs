use std::fs;
use std::time::Duration;

use assert_matches::assert_matches;

use patient_view::config::{ConfigLoader, DEFAULT_SLIDE_IFRAME_URL};
use patient_view::error::PatientViewError;

#[test]
fn resolve_reads_json_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("patient-view.json");
    fs::write(
        &path,
        r#"{
            "accessible_studies": ["brca_tcga"],
            "http_timeout_secs": 5,
            "slide_archive": { "case_prefix": "tcga-" },
            "pathology_reports": {
                "url_template": "https://reports.example.org/{tumor_type}/",
                "overrides": { "gbm": "https://mirror.example.org/gbm/" }
            }
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.schema_version, 1);
    assert_eq!(resolved.accessible_studies, vec!["brca_tcga".to_string()]);
    assert_eq!(resolved.http_timeout, Duration::from_secs(5));
    assert_eq!(resolved.slide_archive.case_prefix, "tcga-");
    assert_eq!(resolved.slide_archive.iframe_url_template, DEFAULT_SLIDE_IFRAME_URL);
    assert_eq!(
        resolved.pathology_reports.base_url("ov").as_deref(),
        Some("https://reports.example.org/ov/")
    );
    assert_eq!(
        resolved.pathology_reports.base_url("gbm").as_deref(),
        Some("https://mirror.example.org/gbm/")
    );
}

#[test]
fn resolve_reports_unreadable_and_malformed_files() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("absent.json");
    assert_matches!(
        ConfigLoader::resolve(missing.to_str()),
        Err(PatientViewError::ConfigRead(_))
    );

    let broken = temp.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert_matches!(
        ConfigLoader::resolve(broken.to_str()),
        Err(PatientViewError::ConfigParse(_))
    );
}
