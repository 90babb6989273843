use crate::error::RolError;
use crate::extraction::PageTables;
use serde::{Deserialize, Serialize};

/// Rows extracted from the annex, in page/table/row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularDataset {
    pub rows: Vec<Vec<String>>,
}

impl TabularDataset {
    /// Concatenate the rows of every table of every page, dropping rows
    /// whose cells are all blank. Kept rows are not modified.
    pub fn from_pages(pages: &[PageTables]) -> Self {
        let rows = pages
            .iter()
            .flat_map(|page| &page.tables)
            .flat_map(|table| &table.rows)
            .filter(|row| !is_blank_row(row))
            .cloned()
            .collect();
        TabularDataset { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize as UTF-8 CSV: comma delimited, quoted only where needed,
    /// CRLF terminated. Rows may differ in length.
    pub fn to_csv(&self) -> Result<Vec<u8>, RolError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.into_inner().map_err(|e| RolError::Io(e.into_error()))
    }

    /// Parse CSV written by [`TabularDataset::to_csv`]. No header row, no
    /// trimming.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, RolError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(TabularDataset { rows })
    }
}

/// True if every cell is empty after trimming (including rows with no cells).
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::Table;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_pages_drops_blank_rows_only() {
        let pages = vec![
            PageTables {
                page_number: 1,
                tables: vec![
                    Table {
                        rows: vec![row(&["A", "OD"]), row(&["  ", "\t"]), row(&[" x ", ""])],
                    },
                    Table {
                        rows: vec![row(&[]), row(&["B", "AMB"])],
                    },
                ],
            },
            PageTables {
                page_number: 2,
                tables: vec![],
            },
            PageTables {
                page_number: 3,
                tables: vec![Table {
                    rows: vec![row(&["C", ""])],
                }],
            },
        ];

        let dataset = TabularDataset::from_pages(&pages);
        assert_eq!(
            dataset.rows,
            vec![
                row(&["A", "OD"]),
                row(&[" x ", ""]),
                row(&["B", "AMB"]),
                row(&["C", ""]),
            ]
        );
    }

    #[test]
    fn test_csv_quoting() {
        let dataset = TabularDataset {
            rows: vec![
                row(&["CONSULTA, MÉDICA", "OD"]),
                row(&["diz \"sim\"", "linha\nquebrada", "extra"]),
            ],
        };
        let csv = String::from_utf8(dataset.to_csv().unwrap()).unwrap();
        assert_eq!(
            csv,
            "\"CONSULTA, MÉDICA\",OD\r\n\"diz \"\"sim\"\"\",\"linha\nquebrada\",extra\r\n"
        );
    }

    #[test]
    fn test_csv_read_back_keeps_whitespace() {
        let dataset = TabularDataset {
            rows: vec![row(&[" OD", "AMB "]), row(&["Seg. Odontológica"])],
        };
        let parsed = TabularDataset::from_csv(&dataset.to_csv().unwrap()).unwrap();
        assert_eq!(parsed, dataset);
    }
}
