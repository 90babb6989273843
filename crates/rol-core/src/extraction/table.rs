use crate::extraction::Table;

/// Minimum run of blank character columns that separates two table columns.
const MIN_GUTTER: usize = 2;

/// Reconstruct tables from `pdftotext -layout` lines of one page.
///
/// A table is a run of lines that each show a column gap (two or more spaces
/// between words). Indented lines without a gap directly after such a line
/// are kept as wrapped-cell continuation rows. Blank lines and flush-left
/// prose end the table. A run needs at least two gapped lines to count.
///
/// Column boundaries are the gutters shared by every line of the table, so
/// empty cells come out as empty strings rather than shifting later cells.
pub fn detect_tables(lines: &[&str]) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for &line in lines {
        if line.trim().is_empty() {
            flush(&mut block, &mut tables);
        } else if has_column_gap(line) {
            block.push(line);
        } else if !block.is_empty() && line.starts_with(char::is_whitespace) {
            block.push(line);
        } else {
            flush(&mut block, &mut tables);
        }
    }
    flush(&mut block, &mut tables);

    tables
}

fn flush(block: &mut Vec<&str>, tables: &mut Vec<Table>) {
    while block.last().is_some_and(|l| !has_column_gap(l)) {
        block.pop();
    }
    let gapped = block.iter().filter(|l| has_column_gap(l)).count();
    if gapped >= 2 {
        tables.push(split_columns(block.as_slice()));
    }
    block.clear();
}

/// True if the line has two or more spaces between non-space text.
pub fn has_column_gap(line: &str) -> bool {
    line.trim().contains("  ")
}

/// Slice every line at the gutters shared by all lines.
pub fn split_columns(lines: &[&str]) -> Table {
    let grid: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let blank_column: Vec<bool> = (0..width)
        .map(|c| {
            grid.iter()
                .all(|row| row.get(c).map_or(true, |ch| ch.is_whitespace()))
        })
        .collect();

    let spans = column_spans(&blank_column);

    let rows = grid
        .iter()
        .map(|row| {
            spans
                .iter()
                .map(|&(start, end)| {
                    let end = end.min(row.len());
                    if start >= end {
                        String::new()
                    } else {
                        row[start..end].iter().collect::<String>().trim().to_string()
                    }
                })
                .collect()
        })
        .collect();

    Table { rows }
}

/// Content spans `[start, end)` between gutters of at least [`MIN_GUTTER`]
/// blank columns. Narrower blank runs (word spacing) stay inside a span.
fn column_spans(blank_column: &[bool]) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut c = 0;

    while c < blank_column.len() {
        if blank_column[c] {
            c += 1;
            continue;
        }
        let start = c;
        while c < blank_column.len() && !blank_column[c] {
            c += 1;
        }
        match spans.last_mut() {
            Some(last) if start - last.1 < MIN_GUTTER => last.1 = c,
            _ => spans.push((start, c)),
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_column_gap() {
        assert!(has_column_gap("  CONSULTA MÉDICA     OD   AMB"));
        assert!(!has_column_gap("  Anexo I - Lista de procedimentos"));
        assert!(!has_column_gap("   indented"));
    }

    #[test]
    fn test_detect_single_table() {
        let lines = [
            "Rol de Procedimentos",
            "",
            "PROCEDIMENTO          OD    AMB   HCO",
            "CONSULTA MÉDICA             AMB   HCO",
            "RESTAURAÇÃO           OD",
            "",
            "Legenda: OD odontológica",
        ];
        let tables = detect_tables(&lines);
        assert_eq!(tables.len(), 1);
        let rows = &tables[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["PROCEDIMENTO", "OD", "AMB", "HCO"]);
        assert_eq!(rows[1], vec!["CONSULTA MÉDICA", "", "AMB", "HCO"]);
        assert_eq!(rows[2], vec!["RESTAURAÇÃO", "OD", "", ""]);
    }

    #[test]
    fn test_continuation_lines_stay_in_table() {
        let lines = [
            "PROCEDIMENTO                  OD    AMB",
            "ATENDIMENTO DE URGÊNCIA E           AMB",
            "  EMERGÊNCIA",
            "CONSULTA                            AMB",
        ];
        let tables = detect_tables(&lines);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 4);
        assert_eq!(tables[0].rows[2][0], "EMERGÊNCIA");
        assert_eq!(tables[0].rows[2][2], "");
    }

    #[test]
    fn test_prose_splits_tables() {
        let lines = [
            "A    B",
            "C    D",
            "Texto corrido entre tabelas",
            "E    F",
            "G    H",
        ];
        let tables = detect_tables(&lines);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].rows[0], vec!["E", "F"]);
    }

    #[test]
    fn test_single_gapped_line_is_not_a_table() {
        let lines = ["Página 1      de 30", "", "texto"];
        assert!(detect_tables(&lines).is_empty());
    }

    #[test]
    fn test_column_spans_merge_word_spacing() {
        // "AB CD   EF" -> columns "AB CD" and "EF"
        let blank: Vec<bool> = "AB CD   EF".chars().map(|c| c == ' ').collect();
        assert_eq!(column_spans(&blank), vec![(0, 5), (8, 10)]);
    }
}
