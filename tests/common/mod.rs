use std::collections::BTreeMap;

use patient_view::domain::{
    CancerStudy, CaseId, CaseRecord, ClinicalRecord, GeneticProfile, MutationRecord,
};
use patient_view::repository::RepositorySnapshot;

fn profile(internal_id: i64, stable_id: &str) -> GeneticProfile {
    GeneticProfile {
        internal_id,
        stable_id: stable_id.to_string(),
        name: None,
    }
}

fn study(stable_id: &str, internal_id: i64, type_of_cancer: &str) -> CancerStudy {
    CancerStudy {
        stable_id: stable_id.to_string(),
        internal_id,
        type_of_cancer: type_of_cancer.to_string(),
        name: None,
        mutation_profile: None,
        cna_profile: None,
        mrna_profile: None,
    }
}

fn case(case_id: &str, study_internal_id: i64) -> CaseRecord {
    CaseRecord {
        case_id: CaseId::new(case_id),
        study_internal_id,
    }
}

fn clinical(study_internal_id: i64, case_id: &str, attr: &str, value: &str) -> ClinicalRecord {
    ClinicalRecord {
        study_internal_id,
        case_id: CaseId::new(case_id),
        attr_id: attr.to_string(),
        attr_val: value.to_string(),
    }
}

fn mutation(profile_id: i64, case_id: &str, tumor_alt_count: Option<u32>) -> MutationRecord {
    MutationRecord {
        profile_id,
        case_id: CaseId::new(case_id),
        gene: Some("TP53".to_string()),
        tumor_alt_count,
    }
}

/// Study 1 `brca_tcga` with a mutation profile, patient PT-01 owning two
/// cases and PT-02 owning one.
pub fn brca_snapshot() -> RepositorySnapshot {
    let mut brca = study("brca_tcga", 1, "brca");
    brca.mutation_profile = Some(profile(10, "brca_tcga_mutations"));
    brca.cna_profile = Some(profile(11, "brca_tcga_gistic"));

    RepositorySnapshot {
        studies: vec![brca, study("gbm_tcga", 2, "gbm")],
        cases: vec![
            case("TCGA-AB-0001-01", 1),
            case("TCGA-AB-0001-02", 1),
            case("TCGA-CD-0002-01", 1),
            case("TCGA-EF-0003-01", 2),
        ],
        clinical: vec![
            clinical(1, "TCGA-AB-0001-01", "PATIENT_ID", "PT-01"),
            clinical(1, "TCGA-AB-0001-02", "PATIENT_ID", "PT-01"),
            clinical(1, "TCGA-CD-0002-01", "PATIENT_ID", "PT-02"),
            clinical(1, "TCGA-CD-0002-01", "AGE", "54"),
            clinical(2, "TCGA-EF-0003-01", "PATIENT_ID", "PT-03"),
        ],
        profile_cases: BTreeMap::from([
            (
                10,
                vec![
                    CaseId::new("TCGA-AB-0001-01"),
                    CaseId::new("TCGA-CD-0002-01"),
                ],
            ),
            (11, vec![CaseId::new("TCGA-AB-0001-01")]),
        ]),
        segment_studies: [1].into_iter().collect(),
        mutations: vec![
            mutation(10, "TCGA-AB-0001-01", Some(12)),
            mutation(10, "TCGA-CD-0002-01", None),
        ],
    }
}
