pub mod pdftotext;
pub mod table;

use crate::error::RolError;
use serde::{Deserialize, Serialize};

/// One table as rows of cells, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

/// Tables found on a single page of a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTables {
    pub page_number: usize,
    pub tables: Vec<Table>,
}

/// Trait for PDF table extraction backends.
pub trait TableExtractor: Send + Sync {
    /// Extract the tables of every page from PDF bytes, one entry per page in
    /// page order.
    fn extract_tables(&self, pdf_bytes: &[u8]) -> Result<Vec<PageTables>, RolError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
