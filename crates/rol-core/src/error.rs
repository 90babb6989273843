use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RolError {
    #[error("Falha ao acessar a página.")]
    PageFetch { url: String, status: Option<u16> },

    #[error("Nenhum link de PDF com {markers} encontrado.")]
    NoCandidates { markers: String },

    #[error("Falha ao baixar o arquivo PDF {index}")]
    Download { index: usize, url: String },

    #[error("Nenhum arquivo ZIP com '{marker}' encontrado.")]
    ArchiveNotFound { marker: String },

    #[error("Nenhum PDF '{marker}' encontrado dentro do ZIP extraído.")]
    DocumentNotFound { marker: String },

    #[error("Nenhuma tabela encontrada no PDF.")]
    EmptyDataset,

    #[error("Arquivo {0} não encontrado.")]
    ArtifactMissing(String),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("table extraction failed: {0}")]
    Extraction(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RolError {
    /// True for failures the pipeline reports as an error outcome. Everything
    /// else is a fault the transport surfaces as an internal error.
    pub fn is_outcome(&self) -> bool {
        matches!(
            self,
            RolError::PageFetch { .. }
                | RolError::NoCandidates { .. }
                | RolError::Download { .. }
                | RolError::ArchiveNotFound { .. }
                | RolError::DocumentNotFound { .. }
                | RolError::EmptyDataset
                | RolError::ArtifactMissing(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_fetch_message_is_user_facing() {
        let err = RolError::PageFetch {
            url: "https://example.org".into(),
            status: Some(404),
        };
        assert_eq!(err.to_string(), "Falha ao acessar a página.");
        assert!(err.is_outcome());
    }

    #[test]
    fn download_message_carries_index() {
        let err = RolError::Download {
            index: 3,
            url: "https://example.org/c.pdf".into(),
        };
        assert_eq!(err.to_string(), "Falha ao baixar o arquivo PDF 3");
    }

    #[test]
    fn io_errors_are_faults() {
        let err = RolError::from(std::io::Error::other("disk full"));
        assert!(!err.is_outcome());
    }
}
