use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{CancerStudy, CaseId, CaseRecord, ClinicalRecord, MutationRecord};
use crate::error::PatientViewError;

/// Read access to cancer studies, cases and their clinical and genomic
/// records. Implementations report backend failures as
/// [`PatientViewError::Repository`].
pub trait ClinicalRepository: Send + Sync {
    fn cancer_study_by_stable_id(
        &self,
        stable_id: &str,
    ) -> Result<Option<CancerStudy>, PatientViewError>;
    fn case(
        &self,
        case_id: &str,
        study_internal_id: i64,
    ) -> Result<Option<CaseRecord>, PatientViewError>;
    fn case_ids_by_attribute(
        &self,
        study_internal_id: i64,
        attr_id: &str,
        attr_val: &str,
    ) -> Result<Vec<CaseId>, PatientViewError>;
    fn clinical_data(
        &self,
        study_internal_id: i64,
        case_ids: &BTreeSet<CaseId>,
    ) -> Result<Vec<ClinicalRecord>, PatientViewError>;
    fn clinical_data_for_case(
        &self,
        study_internal_id: i64,
        case_id: &CaseId,
    ) -> Result<Vec<ClinicalRecord>, PatientViewError>;
    fn count_cases(&self, study_internal_id: i64) -> Result<usize, PatientViewError>;
    fn count_cases_in_profile(&self, profile_id: i64) -> Result<usize, PatientViewError>;
    fn segment_data_exists(&self, study_internal_id: i64) -> Result<bool, PatientViewError>;
    fn mutations(
        &self,
        profile_id: i64,
        case_id: &CaseId,
    ) -> Result<Vec<MutationRecord>, PatientViewError>;
}

/// Decides which cancer studies the requesting principal may read.
pub trait AccessControl: Send + Sync {
    /// The accessible subset of `{study_id}`.
    fn accessible_studies(&self, study_id: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticAccessControl {
    grants: BTreeSet<String>,
}

impl StaticAccessControl {
    pub fn new<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grants: grants.into_iter().map(Into::into).collect(),
        }
    }
}

impl AccessControl for StaticAccessControl {
    fn accessible_studies(&self, study_id: &str) -> Vec<String> {
        self.grants
            .iter()
            .filter(|grant| grant.as_str() == study_id)
            .cloned()
            .collect()
    }
}

/// Repository contents as stored in a JSON snapshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RepositorySnapshot {
    #[serde(default)]
    pub studies: Vec<CancerStudy>,
    #[serde(default)]
    pub cases: Vec<CaseRecord>,
    #[serde(default)]
    pub clinical: Vec<ClinicalRecord>,
    #[serde(default)]
    pub profile_cases: BTreeMap<i64, Vec<CaseId>>,
    #[serde(default)]
    pub segment_studies: BTreeSet<i64>,
    #[serde(default)]
    pub mutations: Vec<MutationRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    snapshot: RepositorySnapshot,
}

impl InMemoryRepository {
    pub fn new(snapshot: RepositorySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: &Path) -> Result<Self, PatientViewError> {
        let content = fs::read_to_string(path)
            .map_err(|_| PatientViewError::SnapshotRead(path.to_path_buf()))?;
        let snapshot: RepositorySnapshot = serde_json::from_str(&content)
            .map_err(|err| PatientViewError::SnapshotParse(err.to_string()))?;
        Ok(Self::new(snapshot))
    }
}

impl ClinicalRepository for InMemoryRepository {
    fn cancer_study_by_stable_id(
        &self,
        stable_id: &str,
    ) -> Result<Option<CancerStudy>, PatientViewError> {
        Ok(self
            .snapshot
            .studies
            .iter()
            .find(|study| study.stable_id == stable_id)
            .cloned())
    }

    fn case(
        &self,
        case_id: &str,
        study_internal_id: i64,
    ) -> Result<Option<CaseRecord>, PatientViewError> {
        Ok(self
            .snapshot
            .cases
            .iter()
            .find(|record| {
                record.study_internal_id == study_internal_id && record.case_id.as_str() == case_id
            })
            .cloned())
    }

    fn case_ids_by_attribute(
        &self,
        study_internal_id: i64,
        attr_id: &str,
        attr_val: &str,
    ) -> Result<Vec<CaseId>, PatientViewError> {
        Ok(self
            .snapshot
            .clinical
            .iter()
            .filter(|row| {
                row.study_internal_id == study_internal_id
                    && row.attr_id == attr_id
                    && row.attr_val == attr_val
            })
            .map(|row| row.case_id.clone())
            .collect())
    }

    fn clinical_data(
        &self,
        study_internal_id: i64,
        case_ids: &BTreeSet<CaseId>,
    ) -> Result<Vec<ClinicalRecord>, PatientViewError> {
        Ok(self
            .snapshot
            .clinical
            .iter()
            .filter(|row| {
                row.study_internal_id == study_internal_id && case_ids.contains(&row.case_id)
            })
            .cloned()
            .collect())
    }

    fn clinical_data_for_case(
        &self,
        study_internal_id: i64,
        case_id: &CaseId,
    ) -> Result<Vec<ClinicalRecord>, PatientViewError> {
        Ok(self
            .snapshot
            .clinical
            .iter()
            .filter(|row| row.study_internal_id == study_internal_id && &row.case_id == case_id)
            .cloned()
            .collect())
    }

    fn count_cases(&self, study_internal_id: i64) -> Result<usize, PatientViewError> {
        Ok(self
            .snapshot
            .cases
            .iter()
            .filter(|record| record.study_internal_id == study_internal_id)
            .count())
    }

    fn count_cases_in_profile(&self, profile_id: i64) -> Result<usize, PatientViewError> {
        Ok(self
            .snapshot
            .profile_cases
            .get(&profile_id)
            .map(|cases| cases.iter().collect::<BTreeSet<_>>().len())
            .unwrap_or(0))
    }

    fn segment_data_exists(&self, study_internal_id: i64) -> Result<bool, PatientViewError> {
        Ok(self.snapshot.segment_studies.contains(&study_internal_id))
    }

    fn mutations(
        &self,
        profile_id: i64,
        case_id: &CaseId,
    ) -> Result<Vec<MutationRecord>, PatientViewError> {
        Ok(self
            .snapshot
            .mutations
            .iter()
            .filter(|row| row.profile_id == profile_id && &row.case_id == case_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_grants_return_matching_study_only() {
        let access = StaticAccessControl::new(["brca_tcga", "gbm_tcga"]);
        assert_eq!(access.accessible_studies("brca_tcga"), vec!["brca_tcga"]);
        assert!(access.accessible_studies("luad_tcga").is_empty());
    }

    #[test]
    fn profile_counts_ignore_duplicates() {
        let snapshot = RepositorySnapshot {
            profile_cases: BTreeMap::from([(
                7,
                vec![CaseId::new("A"), CaseId::new("B"), CaseId::new("A")],
            )]),
            ..RepositorySnapshot::default()
        };
        let repo = InMemoryRepository::new(snapshot);
        assert_eq!(repo.count_cases_in_profile(7).unwrap(), 2);
        assert_eq!(repo.count_cases_in_profile(8).unwrap(), 0);
    }
}
