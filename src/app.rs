use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::clinical::{ClinicalAggregator, ClinicalAttributeMap};
use crate::config::ResolvedConfig;
use crate::domain::{CancerStudy, GeneticProfile, PatientId};
use crate::error::PatientViewError;
use crate::fetch::Fetcher;
use crate::pathology::PathologyReportIndex;
use crate::repository::{AccessControl, ClinicalRepository};
use crate::resolve::{CaseResolver, PatientViewRequest};
use crate::tissue::TissueImageChecker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub profile: GeneticProfile,
    pub num_cases: usize,
}

/// What the rendering layer receives for one patient-view request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientView {
    pub error: Option<String>,
    pub title: Option<String>,
    pub case_ids: Vec<String>,
    pub cancer_study: Option<CancerStudy>,
    pub mutation_profile: Option<ProfileSummary>,
    pub cna_profile: Option<ProfileSummary>,
    pub mrna_profile: Option<ProfileSummary>,
    pub num_cases: Option<usize>,
    pub clinical_data: ClinicalAttributeMap,
    pub tissue_images: Option<String>,
    pub path_report_url: Option<String>,
    pub patient_id: Option<PatientId>,
    pub has_segment_data: bool,
    pub has_allele_frequency_data: bool,
}

impl PatientView {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Serves patient-view requests. One instance lives for the whole process so
/// the pathology report index is crawled at most once per tumor type.
pub struct App<R: ClinicalRepository, A: AccessControl, F: Fetcher> {
    repository: R,
    access: A,
    tissue: TissueImageChecker<F>,
    pathology: PathologyReportIndex<F>,
}

impl<R: ClinicalRepository, A: AccessControl, F: Fetcher> App<R, A, F> {
    pub fn new(repository: R, access: A, fetcher: F, config: &ResolvedConfig) -> Self {
        let fetcher = Arc::new(fetcher);
        Self {
            repository,
            access,
            tissue: TissueImageChecker::new(Arc::clone(&fetcher), config.slide_archive.clone()),
            pathology: PathologyReportIndex::new(fetcher, config.pathology_reports.clone()),
        }
    }

    pub fn pathology(&self) -> &PathologyReportIndex<F> {
        &self.pathology
    }

    /// Validation problems come back as a view carrying the message;
    /// repository failures are returned as errors.
    pub fn view(&self, request: &PatientViewRequest) -> Result<PatientView, PatientViewError> {
        let resolution = match CaseResolver::new(&self.repository, &self.access).resolve(request) {
            Ok(resolution) => resolution,
            Err(err) if err.is_validation() => {
                info!("patient view rejected: {err}");
                return Ok(PatientView::rejected(err.to_string()));
            }
            Err(err) => return Err(err),
        };

        let study = resolution.study;
        let case_ids = resolution.cases.to_ids();
        let mut view = PatientView {
            title: Some(format!("Patient: {}", case_ids.join(","))),
            case_ids,
            has_segment_data: resolution.has_segment_data,
            has_allele_frequency_data: resolution.has_allele_frequency_data,
            ..PatientView::default()
        };

        view.mutation_profile = self.profile_summary(study.mutation_profile.as_ref())?;
        view.cna_profile = self.profile_summary(study.cna_profile.as_ref())?;
        view.mrna_profile = self.profile_summary(study.mrna_profile.as_ref())?;

        let summary = ClinicalAggregator::new(&self.repository, &self.tissue, &self.pathology)
            .aggregate(&resolution.cases, &study)?;
        view.clinical_data = summary.clinical_data;
        if let Some(enrichment) = summary.enrichment {
            view.tissue_images = enrichment.tissue_images;
            view.path_report_url = enrichment.path_report_url;
            view.patient_id = enrichment.sibling_patient_id;
        }

        view.num_cases = Some(self.repository.count_cases(study.internal_id)?);
        view.cancer_study = Some(study);
        Ok(view)
    }

    fn profile_summary(
        &self,
        profile: Option<&GeneticProfile>,
    ) -> Result<Option<ProfileSummary>, PatientViewError> {
        let Some(profile) = profile else {
            return Ok(None);
        };
        Ok(Some(ProfileSummary {
            profile: profile.clone(),
            num_cases: self.repository.count_cases_in_profile(profile.internal_id)?,
        }))
    }
}
