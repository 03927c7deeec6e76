/// Tag frequency index
///
/// A single stable pass over the loaded records produces an occurrence
/// count per tag. The chip row is fed from `top_tags`: a hand-curated
/// list first, then the most frequent organic tags, with decade-style
/// numeric tags kept out of the chips (they stay valid filter targets).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::catalog::record::Record;

/// Decade labels and plain years: 3-4 digits, optionally followed by "s"
static NUMERIC_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}s?$").unwrap());

/// Whether a tag is a year/decade label like "1999" or "1920s".
pub fn is_numeric_tag(tag: &str) -> bool {
    NUMERIC_TAG.is_match(tag)
}

/// Occurrence counts for every tag in the catalog.
///
/// Tags are counted after whitespace trimming; empty strings are excluded.
/// Keys are case-sensitive. The index remembers first-seen order so that
/// equal counts rank stably.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    /// (tag, count) in first-seen order
    counts: Vec<(String, usize)>,
    /// tag -> position in `counts`
    positions: HashMap<String, usize>,
}

impl TagIndex {
    /// Build the index from the full record set. Pure; the records are not
    /// mutated. A count is the number of records carrying the tag, so a
    /// tag repeated inside one record still counts once.
    pub fn build(records: &[Record]) -> Self {
        let mut index = TagIndex::default();

        for record in records {
            let mut seen: Vec<&str> = Vec::new();
            for tag in &record.tags {
                let tag = tag.trim();
                if tag.is_empty() || seen.contains(&tag) {
                    continue;
                }
                seen.push(tag);
                match index.positions.get(tag) {
                    Some(&pos) => index.counts[pos].1 += 1,
                    None => {
                        index.positions.insert(tag.to_string(), index.counts.len());
                        index.counts.push((tag.to_string(), 1));
                    }
                }
            }
        }

        index
    }

    /// How many records carry `tag` (trimmed, case-sensitive).
    pub fn count(&self, tag: &str) -> usize {
        self.positions
            .get(tag)
            .map(|&pos| self.counts[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The chip list: `curated` in given order, then the highest-count
    /// non-numeric tags (stable on ties), deduplicated, truncated to `n`.
    pub fn top_tags(&self, n: usize, curated: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();

        for &tag in curated {
            if !out.iter().any(|t| t == tag) {
                out.push(tag.to_string());
            }
        }

        // Stable sort keeps first-seen order among equal counts
        let mut ranked: Vec<&(String, usize)> = self.counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        for (tag, _) in ranked {
            if out.len() >= n {
                break;
            }
            if is_numeric_tag(tag) || out.iter().any(|t| t == tag) {
                continue;
            }
            out.push(tag.clone());
        }

        out.truncate(n);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record_with_tags(tags: &[&str]) -> Record {
        Record {
            id: None,
            title: String::new(),
            image: None,
            thumb: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: None,
        }
    }

    #[test]
    fn test_is_numeric_tag() {
        assert!(is_numeric_tag("1920s"));
        assert!(is_numeric_tag("1999"));
        assert!(is_numeric_tag("860s"));
        assert!(!is_numeric_tag("20th Century"));
        assert!(!is_numeric_tag("Delhi"));
        assert!(!is_numeric_tag("12"));
        assert!(!is_numeric_tag("19995"));
        assert!(!is_numeric_tag(""));
    }

    #[test]
    fn test_counts_records_not_occurrences() {
        let records = vec![
            // "delhi" appears twice here (once padded) but counts once
            record_with_tags(&["delhi", " delhi ", ""]),
            record_with_tags(&["delhi", "mumbai", "   "]),
        ];
        let index = TagIndex::build(&records);

        assert_eq!(index.count("delhi"), 2);
        assert_eq!(index.count("mumbai"), 1);
        assert_eq!(index.count(""), 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_counts_are_case_sensitive() {
        let records = vec![record_with_tags(&["Delhi", "delhi"])];
        let index = TagIndex::build(&records);

        assert_eq!(index.count("Delhi"), 1);
        assert_eq!(index.count("delhi"), 1);
    }

    #[test]
    fn test_top_tags_curated_first_then_by_count() {
        let records = vec![
            record_with_tags(&["temple", "fort"]),
            record_with_tags(&["temple", "fort"]),
            record_with_tags(&["temple", "river"]),
        ];
        let index = TagIndex::build(&records);

        assert_eq!(
            index.top_tags(4, &["delhi"]),
            vec!["delhi", "temple", "fort", "river"]
        );
    }

    #[test]
    fn test_top_tags_excludes_numeric_and_deduplicates() {
        let records = vec![
            record_with_tags(&["1920s", "palace"]),
            record_with_tags(&["1920s", "palace"]),
            record_with_tags(&["1920s", "garden"]),
        ];
        let index = TagIndex::build(&records);

        let chips = index.top_tags(10, &["palace"]);
        // "1920s" outranks everything by count but never becomes a chip;
        // "palace" appears once even though it is also curated
        assert_eq!(chips, vec!["palace", "garden"]);
    }

    #[test]
    fn test_top_tags_ties_break_by_first_seen_order() {
        let records = vec![record_with_tags(&["zebra", "arch", "gate"])];
        let index = TagIndex::build(&records);

        assert_eq!(index.top_tags(3, &[]), vec!["zebra", "arch", "gate"]);
    }

    #[test]
    fn test_top_tags_truncates_to_n() {
        let records = vec![record_with_tags(&["a", "b", "c"])];
        let index = TagIndex::build(&records);

        assert_eq!(index.top_tags(2, &["x", "y", "z"]), vec!["x", "y"]);
    }
}
