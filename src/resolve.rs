use tracing::debug;

use crate::domain::{
    CancerStudy, CaseId, PATIENT_ID_ATTR_NAME, ResolvedCaseSet, is_blank, tokenize,
};
use crate::error::PatientViewError;
use crate::repository::{AccessControl, ClinicalRepository};

#[derive(Debug, Clone, Default)]
pub struct PatientViewRequest {
    pub case_ids: Option<String>,
    pub patient_ids: Option<String>,
    pub cancer_study_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub cases: ResolvedCaseSet,
    pub study: CancerStudy,
    pub has_segment_data: bool,
    pub has_allele_frequency_data: bool,
}

/// Turns raw case and patient id text into an access-checked case set.
pub struct CaseResolver<'a, R: ClinicalRepository + ?Sized, A: AccessControl + ?Sized> {
    repository: &'a R,
    access: &'a A,
}

impl<'a, R: ClinicalRepository + ?Sized, A: AccessControl + ?Sized> CaseResolver<'a, R, A> {
    pub fn new(repository: &'a R, access: &'a A) -> Self {
        Self { repository, access }
    }

    pub fn resolve(&self, request: &PatientViewRequest) -> Result<Resolution, PatientViewError> {
        let case_input = request.case_ids.as_deref();
        let patient_input = request.patient_ids.as_deref();
        if is_blank(case_input) && is_blank(patient_input) {
            return Err(PatientViewError::MissingInput);
        }

        let study_id = request
            .cancer_study_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(PatientViewError::MissingStudy)?;

        let study = self
            .repository
            .cancer_study_by_stable_id(study_id)?
            .ok_or_else(|| PatientViewError::UnknownStudy(study_id.to_string()))?;

        let mut cases = ResolvedCaseSet::default();
        for token in tokenize(case_input) {
            if let Some(case_id) = self.resolve_case(token, &study)? {
                cases.insert(case_id);
            }
        }
        for token in tokenize(patient_input) {
            for case_id in self.cases_of_patient(token, &study)? {
                cases.insert(case_id);
            }
        }

        if cases.is_empty() {
            return Err(PatientViewError::NoMatchingCases);
        }

        if !is_authorized(self.access, &study.stable_id) {
            return Err(PatientViewError::Unauthorized(study.stable_id.clone()));
        }

        let has_segment_data = self.repository.segment_data_exists(study.internal_id)?;
        let has_allele_frequency_data = match cases.first() {
            Some(first) => has_allele_frequency_data(self.repository, &study, first)?,
            None => false,
        };

        debug!(study = %study.stable_id, cases = cases.len(), "resolved patient view cases");
        Ok(Resolution {
            cases,
            study,
            has_segment_data,
            has_allele_frequency_data,
        })
    }

    fn resolve_case(
        &self,
        token: &str,
        study: &CancerStudy,
    ) -> Result<Option<CaseId>, PatientViewError> {
        Ok(self
            .repository
            .case(token, study.internal_id)?
            .map(|record| record.case_id))
    }

    fn cases_of_patient(
        &self,
        patient_id: &str,
        study: &CancerStudy,
    ) -> Result<Vec<CaseId>, PatientViewError> {
        let mut resolved = Vec::new();
        for sample in self.repository.case_ids_by_attribute(
            study.internal_id,
            PATIENT_ID_ATTR_NAME,
            patient_id,
        )? {
            if let Some(case_id) = self.resolve_case(sample.as_str(), study)? {
                resolved.push(case_id);
            }
        }
        Ok(resolved)
    }
}

/// Access requires a grant for exactly the requested study.
pub fn is_authorized<A: AccessControl + ?Sized>(access: &A, study_id: &str) -> bool {
    access.accessible_studies(study_id).len() == 1
}

/// Whether any mutation of `case_id` in the study's mutation profile carries a
/// tumor alternate-allele count.
pub fn has_allele_frequency_data<R: ClinicalRepository + ?Sized>(
    repository: &R,
    study: &CancerStudy,
    case_id: &CaseId,
) -> Result<bool, PatientViewError> {
    let Some(profile) = &study.mutation_profile else {
        return Ok(false);
    };
    Ok(repository
        .mutations(profile.internal_id, case_id)?
        .iter()
        .any(|mutation| mutation.tumor_alt_count.is_some()))
}
