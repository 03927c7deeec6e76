/// Record filtering
///
/// Filtering is a pure function of the full record set, the selected-tag
/// set and the free-text query. It returns indices into the record set,
/// always in catalog order, and is cheap enough to recompute on every
/// keystroke and chip toggle.

use std::collections::BTreeSet;

use crate::catalog::record::Record;

/// Select the records matching the current criteria.
///
/// With no criteria at all, every record matches. Otherwise a record is
/// admitted when its tags intersect the selected set, or when any single
/// query term is a substring of the lower-cased title or of any
/// lower-cased tag. Multi-word queries widen the result set, they do not
/// narrow it.
pub fn filter_records(
    records: &[Record],
    selected: &BTreeSet<String>,
    query: &str,
) -> Vec<usize> {
    let terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if selected.is_empty() && terms.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, selected, &terms))
        .map(|(index, _)| index)
        .collect()
}

fn matches(record: &Record, selected: &BTreeSet<String>, terms: &[String]) -> bool {
    if !selected.is_empty()
        && record.tags.iter().any(|tag| selected.contains(tag.trim()))
    {
        return true;
    }

    if terms.is_empty() {
        return false;
    }

    let title = record.title.to_lowercase();
    terms.iter().any(|term| {
        title.contains(term.as_str())
            || record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(term.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(title: &str, tags: &[&str]) -> Record {
        Record {
            id: None,
            title: title.to_string(),
            image: None,
            thumb: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: None,
        }
    }

    fn selected(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn catalog() -> Vec<Record> {
        vec![
            record("Red Fort at dawn", &["delhi", "fort"]),
            record("Taj view", &[]),
            record("Howrah Bridge", &["kolkata", "bridge"]),
            record("Palace interior", &["Mahal", "1920s"]),
            record("Chandni Chowk bazaar", &["delhi", "market"]),
        ]
    }

    #[test]
    fn test_no_criteria_is_identity() {
        let records = catalog();
        let result = filter_records(&records, &selected(&[]), "");
        assert_eq!(result, vec![0, 1, 2, 3, 4]);

        // Whitespace-only queries carry no terms
        let result = filter_records(&records, &selected(&[]), "   ");
        assert_eq!(result, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_single_tag_selection_in_catalog_order() {
        let records = catalog();
        let result = filter_records(&records, &selected(&["delhi"]), "");
        assert_eq!(result, vec![0, 4]);
    }

    #[test]
    fn test_tag_match_is_exact_and_case_sensitive() {
        let records = catalog();
        assert_eq!(filter_records(&records, &selected(&["Delhi"]), ""), Vec::<usize>::new());
        assert_eq!(filter_records(&records, &selected(&["Mahal"]), ""), vec![3]);
    }

    #[test]
    fn test_tag_intersection_trims_record_tags() {
        let records = vec![record("Ghats", &["  varanasi "])];
        assert_eq!(filter_records(&records, &selected(&["varanasi"]), ""), vec![0]);
    }

    #[test]
    fn test_any_query_term_is_sufficient() {
        let records = catalog();
        // "taj" hits the title of record 1, "mahal" hits a tag of record 3;
        // both records pass even though neither matches both terms
        let result = filter_records(&records, &selected(&[]), "taj mahal");
        assert_eq!(result, vec![1, 3]);
    }

    #[test]
    fn test_query_matches_title_and_tag_substrings_case_insensitively() {
        let records = catalog();
        assert_eq!(filter_records(&records, &selected(&[]), "HOWRAH"), vec![2]);
        assert_eq!(filter_records(&records, &selected(&[]), "brid"), vec![2]);
    }

    #[test]
    fn test_tags_and_query_combine_as_or() {
        let records = catalog();
        let result = filter_records(&records, &selected(&["kolkata"]), "fort");
        // Tag hit on 2, query hits on 0 ("Red Fort" / "fort"); catalog
        // order is preserved across both match paths
        assert_eq!(result, vec![0, 2]);
    }

    #[test]
    fn test_query_alone_with_no_match_selects_nothing() {
        let records = catalog();
        assert_eq!(
            filter_records(&records, &selected(&[]), "zeppelin"),
            Vec::<usize>::new()
        );
    }
}
