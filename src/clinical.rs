use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::{
    CancerStudy, CaseId, ClinicalRecord, Lookup, PATIENT_ID_ATTR_NAME, PatientId, ResolvedCaseSet,
};
use crate::error::PatientViewError;
use crate::fetch::Fetcher;
use crate::pathology::PathologyReportIndex;
use crate::repository::ClinicalRepository;
use crate::tissue::TissueImageChecker;

/// Case id -> attribute name -> attribute value.
pub type ClinicalAttributeMap = BTreeMap<CaseId, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseEnrichment {
    pub tissue_images: Option<String>,
    pub path_report_url: Option<String>,
    pub sibling_patient_id: Option<PatientId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicalSummary {
    pub clinical_data: ClinicalAttributeMap,
    /// Only present for single-case views.
    pub enrichment: Option<CaseEnrichment>,
}

pub fn group_by_case(records: Vec<ClinicalRecord>) -> ClinicalAttributeMap {
    let mut grouped = ClinicalAttributeMap::new();
    for record in records {
        grouped
            .entry(record.case_id)
            .or_default()
            .insert(record.attr_id, record.attr_val);
    }
    grouped
}

pub struct ClinicalAggregator<'a, R: ClinicalRepository + ?Sized, F: Fetcher> {
    repository: &'a R,
    tissue: &'a TissueImageChecker<F>,
    pathology: &'a PathologyReportIndex<F>,
}

impl<'a, R: ClinicalRepository + ?Sized, F: Fetcher> ClinicalAggregator<'a, R, F> {
    pub fn new(
        repository: &'a R,
        tissue: &'a TissueImageChecker<F>,
        pathology: &'a PathologyReportIndex<F>,
    ) -> Self {
        Self {
            repository,
            tissue,
            pathology,
        }
    }

    pub fn aggregate(
        &self,
        cases: &ResolvedCaseSet,
        study: &CancerStudy,
    ) -> Result<ClinicalSummary, PatientViewError> {
        let records = self
            .repository
            .clinical_data(study.internal_id, cases.as_set())?;
        let clinical_data = group_by_case(records);

        let Some(case_id) = cases.single() else {
            debug!(cases = cases.len(), "skipping per-case enrichment for multi-case view");
            return Ok(ClinicalSummary {
                clinical_data,
                enrichment: None,
            });
        };

        let enrichment = self.enrich(case_id, study, &clinical_data)?;
        Ok(ClinicalSummary {
            clinical_data,
            enrichment: Some(enrichment),
        })
    }

    /// Clinical rows of one case keyed by lowercased attribute name.
    pub fn freeform(
        &self,
        study: &CancerStudy,
        case_id: &CaseId,
    ) -> Result<HashMap<String, ClinicalRecord>, PatientViewError> {
        Ok(self
            .repository
            .clinical_data_for_case(study.internal_id, case_id)?
            .into_iter()
            .map(|record| (record.attr_id.to_lowercase(), record))
            .collect())
    }

    fn enrich(
        &self,
        case_id: &CaseId,
        study: &CancerStudy,
        clinical_data: &ClinicalAttributeMap,
    ) -> Result<CaseEnrichment, PatientViewError> {
        let tissue_images = self.tissue.iframe_url(case_id).found();

        let path_report_url = if study.has_tcga_path_reports() {
            match self.pathology.lookup(&study.type_of_cancer, case_id) {
                Lookup::Found(url) => Some(url),
                Lookup::NotFound => None,
                Lookup::TransportFailed(reason) => {
                    debug!(case = %case_id, "pathology reports unavailable: {reason}");
                    None
                }
            }
        } else {
            None
        };

        let sibling_patient_id = self.sibling_patient(case_id, study, clinical_data)?;

        Ok(CaseEnrichment {
            tissue_images,
            path_report_url,
            sibling_patient_id,
        })
    }

    fn sibling_patient(
        &self,
        case_id: &CaseId,
        study: &CancerStudy,
        clinical_data: &ClinicalAttributeMap,
    ) -> Result<Option<PatientId>, PatientViewError> {
        let Some(patient_id) = clinical_data
            .get(case_id)
            .and_then(|attrs| attrs.get(PATIENT_ID_ATTR_NAME))
        else {
            return Ok(None);
        };
        let samples = self.repository.case_ids_by_attribute(
            study.internal_id,
            PATIENT_ID_ATTR_NAME,
            patient_id,
        )?;
        Ok((samples.len() > 1).then(|| PatientId::new(patient_id.clone())))
    }
}
