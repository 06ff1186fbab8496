use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Clinical attribute that links cases to the patient they were taken from.
pub const PATIENT_ID_ATTR_NAME: &str = "PATIENT_ID";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_prefix_ignore_case(&self, prefix: &str) -> bool {
        self.0
            .get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticProfile {
    pub internal_id: i64,
    pub stable_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancerStudy {
    pub stable_id: String,
    pub internal_id: i64,
    pub type_of_cancer: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mutation_profile: Option<GeneticProfile>,
    #[serde(default)]
    pub cna_profile: Option<GeneticProfile>,
    #[serde(default)]
    pub mrna_profile: Option<GeneticProfile>,
}

impl CancerStudy {
    /// Pathology reports are published only for TCGA studies of the study's
    /// own tumor type.
    pub fn has_tcga_path_reports(&self) -> bool {
        self.stable_id.contains(&format!("{}_tcga", self.type_of_cancer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: CaseId,
    pub study_internal_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub study_internal_id: i64,
    pub case_id: CaseId,
    pub attr_id: String,
    pub attr_val: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub profile_id: i64,
    pub case_id: CaseId,
    #[serde(default)]
    pub gene: Option<String>,
    #[serde(default)]
    pub tumor_alt_count: Option<u32>,
}

/// Deduplicated case ids that were verified against one cancer study.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResolvedCaseSet(BTreeSet<CaseId>);

impl ResolvedCaseSet {
    pub fn insert(&mut self, case_id: CaseId) -> bool {
        self.0.insert(case_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&CaseId> {
        self.0.first()
    }

    /// The only member, when the set has exactly one.
    pub fn single(&self) -> Option<&CaseId> {
        if self.0.len() == 1 { self.0.first() } else { None }
    }

    pub fn as_set(&self) -> &BTreeSet<CaseId> {
        &self.0
    }

    pub fn to_ids(&self) -> Vec<String> {
        self.0.iter().map(|id| id.as_str().to_string()).collect()
    }
}

impl FromIterator<CaseId> for ResolvedCaseSet {
    fn from_iter<I: IntoIterator<Item = CaseId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of an external lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    TransportFailed(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::TransportFailed(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Splits free-form identifier input on whitespace.
pub fn tokenize(input: Option<&str>) -> Vec<&str> {
    input
        .map(|value| value.split_whitespace().collect())
        .unwrap_or_default()
}

pub fn is_blank(input: Option<&str>) -> bool {
    input.map(|value| value.trim().is_empty()).unwrap_or(true)
}
