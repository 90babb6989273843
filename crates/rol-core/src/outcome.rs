use crate::error::RolError;
use serde::{Deserialize, Serialize};

pub const ACQUIRED_MESSAGE: &str =
    "Rol de procedimentos baixado, compactado e extraído com sucesso!";
pub const PROCESSED_MESSAGE: &str = "Processo finalizado com sucesso.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Structured result of a pipeline stage: `{status, message, ...payload}`.
///
/// Error outcomes carry no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub status: Status,
    pub message: String,
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Outcome {
            status: Status::Success,
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn error(err: &RolError) -> Self {
        Outcome {
            status: Status::Error,
            message: err.to_string(),
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Turn a stage result into an outcome. Errors that are not modeled
    /// outcomes (see [`RolError::is_outcome`]) are passed through as faults.
    pub fn from_result(
        result: Result<T, RolError>,
        message: impl Into<String>,
    ) -> Result<Self, RolError> {
        match result {
            Ok(payload) => Ok(Outcome::success(message, payload)),
            Err(e) if e.is_outcome() => Ok(Outcome::error(&e)),
            Err(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            status: self.status,
            message: self.message,
            payload: self.payload.map(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct ZipPath {
        zip_path: String,
    }

    #[test]
    fn test_success_flattens_payload() {
        let outcome = Outcome::success(
            PROCESSED_MESSAGE,
            ZipPath {
                zip_path: "downloads/Teste_seu_nome.zip".into(),
            },
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "status": "success",
                "message": "Processo finalizado com sucesso.",
                "zip_path": "downloads/Teste_seu_nome.zip"
            })
        );
    }

    #[test]
    fn test_error_has_status_and_message_only() {
        let outcome: Outcome<ZipPath> = Outcome::error(&RolError::PageFetch {
            url: "https://www.gov.br".into(),
            status: Some(404),
        });
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "status": "error", "message": "Falha ao acessar a página." })
        );
    }

    #[test]
    fn test_from_result_passes_faults_through() {
        let fault: Result<ZipPath, RolError> = Err(RolError::Io(std::io::Error::other("boom")));
        assert!(Outcome::from_result(fault, PROCESSED_MESSAGE).is_err());

        let modeled: Result<ZipPath, RolError> = Err(RolError::EmptyDataset);
        let outcome = Outcome::from_result(modeled, PROCESSED_MESSAGE).unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.message, "Nenhuma tabela encontrada no PDF.");
    }
}
