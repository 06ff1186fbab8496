use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PatientViewError {
    #[error("Please specify at least one case ID or patient ID.")]
    MissingInput,

    #[error("Please specify cancer study ID.")]
    MissingStudy,

    #[error("We have no information about cancer study {0}")]
    UnknownStudy(String),

    #[error("We have no information about the patient.")]
    NoMatchingCases,

    #[error("You are not authorized to view the cancer study with id: '{0}'.")]
    Unauthorized(String),

    #[error("repository error: {0}")]
    #[diagnostic(help("an error occurred while trying to connect to the database"))]
    Repository(String),

    #[error("missing config file patient-view.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read repository snapshot at {0}")]
    SnapshotRead(PathBuf),

    #[error("failed to parse repository snapshot: {0}")]
    SnapshotParse(String),

    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl PatientViewError {
    /// Validation outcomes are reported to the user on a degraded view
    /// instead of failing the request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PatientViewError::MissingInput
                | PatientViewError::MissingStudy
                | PatientViewError::UnknownStudy(_)
                | PatientViewError::NoMatchingCases
                | PatientViewError::Unauthorized(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_outcomes_are_classified() {
        assert!(PatientViewError::MissingInput.is_validation());
        assert!(PatientViewError::Unauthorized("brca_tcga".to_string()).is_validation());
        assert!(!PatientViewError::Repository("down".to_string()).is_validation());
        assert!(!PatientViewError::Http("timeout".to_string()).is_validation());
    }

    #[test]
    fn unauthorized_message_names_study() {
        let err = PatientViewError::Unauthorized("brca_tcga".to_string());
        assert_eq!(
            err.to_string(),
            "You are not authorized to view the cancer study with id: 'brca_tcga'."
        );
    }
}
