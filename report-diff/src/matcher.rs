//! Row alignment between a reference table and its comparison counterpart

use crate::types::Row;

/// Result of looking up a reference row in the comparison table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowMatch<'a> {
    Matched(&'a Row),
    Unmatched,
}

impl<'a> RowMatch<'a> {
    /// The matched comparison row, if any
    pub fn row(self) -> Option<&'a Row> {
        match self {
            Self::Matched(row) => Some(row),
            Self::Unmatched => None,
        }
    }
}

/// Find the first candidate whose identifier equals the reference row's identifier.
///
/// Identifiers are compared by their raw text; a row without an identifier only
/// matches another row without one. Duplicate identifiers are not detected, the
/// first candidate wins.
pub fn match_row<'a>(reference: &Row, candidates: &'a [Row], id_column: &str) -> RowMatch<'a> {
    let wanted = reference.identifier(id_column);

    candidates
        .iter()
        .find(|candidate| candidate.identifier(id_column) == wanted)
        .map_or(RowMatch::Unmatched, RowMatch::Matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        Row::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), Some(v.to_string()))))
    }

    #[test]
    fn test_matches_by_value_not_position() {
        let reference = row(&[("id", "B"), ("p50", "1")]);
        let candidates = vec![row(&[("id", "A"), ("p50", "2")]), row(&[("id", "B"), ("p50", "3")])];

        let matched = match_row(&reference, &candidates, "id").row().unwrap();
        assert_eq!(matched.raw("p50"), Some("3".to_string()));
    }

    #[test]
    fn test_unmatched_row() {
        let reference = row(&[("id", "X")]);
        let candidates = vec![row(&[("id", "A")])];

        assert_eq!(match_row(&reference, &candidates, "id"), RowMatch::Unmatched);
        assert_eq!(match_row(&reference, &[], "id"), RowMatch::Unmatched);
    }

    #[test]
    fn test_first_match_wins_on_duplicates() {
        let reference = row(&[("id", "A")]);
        let candidates = vec![
            row(&[("id", "A"), ("v", "first")]),
            row(&[("id", "A"), ("v", "second")]),
        ];

        let matched = match_row(&reference, &candidates, "id").row().unwrap();
        assert_eq!(matched.raw("v"), Some("first".to_string()));
    }
}
