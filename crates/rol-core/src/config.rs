use crate::error::RolError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SOURCE_URL: &str = "https://www.gov.br/ans/pt-br/acesso-a-informacao/participacao-da-sociedade/atualizacao-do-rol-de-procedimentos";
pub const DEFAULT_SITE_ORIGIN: &str = "https://www.gov.br";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Locations, markers and timeouts used by every pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Page listing the annexes.
    pub source_url: Url,
    /// Base used to resolve relative annex links.
    pub site_origin: Url,
    pub page_timeout_secs: u64,
    pub download_timeout_secs: u64,
    /// A link qualifies when its visible text contains any of these.
    pub link_markers: Vec<String>,
    pub document_extension: String,
    /// Root of the download store; also what `GET /downloads` lists.
    pub download_root: PathBuf,
    /// Directory inside the download root holding the unzipped annexes.
    pub extracted_dir: String,
    pub source_archive: String,
    /// Case-insensitive substring used to find the source archive.
    pub archive_marker: String,
    /// Case-insensitive substring used to find the annex inside the archive.
    pub document_marker: String,
    /// Root of the work store holding the intermediate CSV.
    pub work_root: PathBuf,
    pub tabular_file: String,
    pub output_archive: String,
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            source_url: Url::parse(DEFAULT_SOURCE_URL).expect("default source url is valid"),
            site_origin: Url::parse(DEFAULT_SITE_ORIGIN).expect("default origin is valid"),
            page_timeout_secs: 30,
            download_timeout_secs: 20,
            link_markers: vec!["Anexo I".into(), "Anexo II".into()],
            document_extension: ".pdf".into(),
            download_root: PathBuf::from("downloads"),
            extracted_dir: "extracted".into(),
            source_archive: "rol_procedimentos.zip".into(),
            archive_marker: "rol_procedimentos".into(),
            document_marker: "anexo_i".into(),
            work_root: PathBuf::from("."),
            tabular_file: "dados_rol.csv".into(),
            output_archive: "Teste_seu_nome.zip".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl PipelineConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Markers rendered for messages, e.g. `'Anexo I' ou 'Anexo II'`.
    pub fn markers_display(&self) -> String {
        self.link_markers
            .iter()
            .map(|m| format!("'{m}'"))
            .collect::<Vec<_>>()
            .join(" ou ")
    }

    /// Storage key of the document downloaded at `index` (1-based).
    pub fn document_name(&self, index: usize) -> String {
        format!("document_{}{}", index, self.document_extension)
    }
}

/// Load a pipeline config from a JSON file.
pub fn load_config(path: &Path) -> Result<PipelineConfig, RolError> {
    let content = std::fs::read_to_string(path).map_err(|e| RolError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: PipelineConfig =
        serde_json::from_str(&content).map_err(|e| RolError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a pipeline config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<PipelineConfig, RolError> {
    let config: PipelineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable by every stage.
pub fn validate_config(config: &PipelineConfig) -> Result<(), RolError> {
    if config.link_markers.is_empty() || config.link_markers.iter().any(|m| m.is_empty()) {
        return Err(RolError::ConfigInvalid(
            "link_markers must contain at least one non-empty marker".into(),
        ));
    }

    if config.page_timeout_secs == 0 || config.download_timeout_secs == 0 {
        return Err(RolError::ConfigInvalid("timeouts must be positive".into()));
    }

    if config.archive_marker.is_empty() || config.document_marker.is_empty() {
        return Err(RolError::ConfigInvalid(
            "archive_marker and document_marker must not be empty".into(),
        ));
    }

    for (field, name) in [
        ("extracted_dir", &config.extracted_dir),
        ("source_archive", &config.source_archive),
        ("tabular_file", &config.tabular_file),
        ("output_archive", &config.output_archive),
    ] {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return Err(RolError::ConfigInvalid(format!(
                "{field} must be a plain file name, got '{name}'"
            )));
        }
    }

    for (field, name) in [
        ("source_archive", &config.source_archive),
        ("output_archive", &config.output_archive),
    ] {
        if !name.ends_with(".zip") {
            return Err(RolError::ConfigInvalid(format!(
                "{field} must end with .zip, got '{name}'"
            )));
        }
    }

    if !config.document_extension.starts_with('.') {
        return Err(RolError::ConfigInvalid(format!(
            "document_extension must start with '.', got '{}'",
            config.document_extension
        )));
    }

    Ok(())
}
