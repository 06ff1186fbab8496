use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PatientViewError;

pub const DEFAULT_CONFIG_FILE: &str = "patient-view.json";
pub const DEFAULT_SLIDE_META_URL: &str = "http://cancer.digitalslidearchive.net/local_php/get_slide_list_from_db_groupid_not_needed.php?slide_name_filter={case_id}";
pub const DEFAULT_SLIDE_IFRAME_URL: &str =
    "http://cancer.digitalslidearchive.net/index_mskcc.php?slide_name={case_id}";
pub const DEFAULT_SLIDE_CASE_PREFIX: &str = "TCGA-";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub slide_archive: Option<SlideArchiveEntry>,
    #[serde(default)]
    pub pathology_reports: Option<PathologyReportEntry>,
    #[serde(default)]
    pub accessible_studies: Vec<String>,
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SlideArchiveEntry {
    #[serde(default)]
    pub meta_url_template: Option<String>,
    #[serde(default)]
    pub iframe_url_template: Option<String>,
    #[serde(default)]
    pub case_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PathologyReportEntry {
    #[serde(default)]
    pub url_template: Option<String>,
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct SlideArchiveSettings {
    pub meta_url_template: String,
    pub iframe_url_template: String,
    pub case_prefix: String,
}

impl SlideArchiveSettings {
    pub fn meta_url(&self, case_id: &str) -> String {
        self.meta_url_template.replace("{case_id}", case_id)
    }

    pub fn iframe_url(&self, case_id: &str) -> String {
        self.iframe_url_template.replace("{case_id}", case_id)
    }
}

impl Default for SlideArchiveSettings {
    fn default() -> Self {
        Self {
            meta_url_template: DEFAULT_SLIDE_META_URL.to_string(),
            iframe_url_template: DEFAULT_SLIDE_IFRAME_URL.to_string(),
            case_prefix: DEFAULT_SLIDE_CASE_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathologyReportSettings {
    pub url_template: Option<String>,
    pub overrides: BTreeMap<String, String>,
}

impl PathologyReportSettings {
    /// Base listing URL for a tumor type, if one is configured.
    pub fn base_url(&self, tumor_type: &str) -> Option<String> {
        if let Some(url) = self.overrides.get(tumor_type) {
            return Some(url.clone());
        }
        self.url_template
            .as_ref()
            .map(|template| template.replace("{tumor_type}", tumor_type))
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub slide_archive: SlideArchiveSettings,
    pub pathology_reports: PathologyReportSettings,
    pub accessible_studies: Vec<String>,
    pub http_timeout: Duration,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, PatientViewError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Err(PatientViewError::MissingConfig);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| PatientViewError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| PatientViewError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        let schema_version = config.schema_version.unwrap_or(1);

        let defaults = SlideArchiveSettings::default();
        let slide_archive = match config.slide_archive {
            Some(entry) => SlideArchiveSettings {
                meta_url_template: entry
                    .meta_url_template
                    .unwrap_or(defaults.meta_url_template),
                iframe_url_template: entry
                    .iframe_url_template
                    .unwrap_or(defaults.iframe_url_template),
                case_prefix: entry.case_prefix.unwrap_or(defaults.case_prefix),
            },
            None => defaults,
        };

        let pathology_reports = config
            .pathology_reports
            .map(|entry| PathologyReportSettings {
                url_template: entry.url_template,
                overrides: entry.overrides,
            })
            .unwrap_or_default();

        ResolvedConfig {
            schema_version,
            slide_archive,
            pathology_reports,
            accessible_studies: config.accessible_studies,
            http_timeout: Duration::from_secs(config.http_timeout_secs.unwrap_or(30)),
        }
    }
}
