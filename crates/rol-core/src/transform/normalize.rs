use crate::transform::dataset::TabularDataset;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Coverage codes used in the annex and the labels they expand to.
static CODE_LABELS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("OD", "Seg. Odontológica");
    m.insert("AMB", "Seg. Ambulatorial");
    m
});

/// Label for a cell whose whole value is a known code. Exact, case-sensitive,
/// untrimmed.
pub fn label_for(cell: &str) -> Option<&'static str> {
    CODE_LABELS.get(cell).copied()
}

/// Replace every code cell with its label. Returns the number of cells
/// replaced.
pub fn substitute_codes(dataset: &mut TabularDataset) -> usize {
    let mut replaced = 0;
    for cell in dataset.rows.iter_mut().flatten() {
        if let Some(label) = label_for(cell) {
            *cell = label.to_string();
            replaced += 1;
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[&[&str]]) -> TabularDataset {
        TabularDataset {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_codes_are_expanded() {
        let mut data = dataset(&[&["OD", "x"], &["AMB", "y"], &["Z", "w"]]);
        let replaced = substitute_codes(&mut data);
        assert_eq!(replaced, 2);
        assert_eq!(
            data,
            dataset(&[
                &["Seg. Odontológica", "x"],
                &["Seg. Ambulatorial", "y"],
                &["Z", "w"],
            ])
        );
    }

    #[test]
    fn test_near_matches_are_untouched() {
        let mut data = dataset(&[&["od", " OD", "AMB ", "ODAMB", "OD/AMB", ""]]);
        let before = data.clone();
        assert_eq!(substitute_codes(&mut data), 0);
        assert_eq!(data, before);
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for("OD"), Some("Seg. Odontológica"));
        assert_eq!(label_for("HCO"), None);
    }
}
