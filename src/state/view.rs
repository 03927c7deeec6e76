/// View state and its query-string codec
///
/// The current view (selected tags, search text, revealed page count and
/// the open detail record) is mirrored into a query string so a view can
/// be shared, restored at startup, and walked with back/forward
/// navigation. Serialization and parsing are a pure pair over the state
/// struct; the history stack below supplies the navigation semantics.

use std::collections::BTreeSet;

/// The whole shareable view, one instance per running session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// OR-combined tag selection; set order is irrelevant
    pub selected_tags: BTreeSet<String>,
    /// Free-text search
    pub query: String,
    /// Pages already revealed
    pub page: usize,
    /// Record shown in the detail modal
    pub open_id: Option<String>,
}

impl ViewState {
    /// Serialize to a query string. Fields at their defaults are omitted;
    /// an entirely default state serializes to the empty string.
    ///
    /// Tags are percent-encoded individually before the comma join, so a
    /// comma inside a tag survives the round trip.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.selected_tags.is_empty() {
            let joined: Vec<String> = self
                .selected_tags
                .iter()
                .map(|tag| encode_component(tag))
                .collect();
            parts.push(format!("tags={}", joined.join(",")));
        }
        if !self.query.is_empty() {
            parts.push(format!("q={}", encode_component(&self.query)));
        }
        if self.page > 0 {
            parts.push(format!("p={}", self.page));
        }
        if let Some(id) = &self.open_id {
            parts.push(format!("open={}", encode_component(id)));
        }

        parts.join("&")
    }

    /// Parse a query string back into a view state.
    ///
    /// Unknown keys are ignored, an unparseable page count defaults to 0,
    /// and empty values collapse to the field defaults. Malformed input
    /// never fails, it degrades.
    pub fn from_query_string(input: &str) -> Self {
        let mut state = ViewState::default();
        let input = input.strip_prefix('?').unwrap_or(input);

        for pair in input.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "tags" => {
                    state.selected_tags = value
                        .split(',')
                        .map(decode_component)
                        .filter(|tag| !tag.is_empty())
                        .collect();
                }
                "q" => state.query = decode_component(value),
                "p" => state.page = value.parse().unwrap_or(0),
                "open" => {
                    let id = decode_component(value);
                    state.open_id = (!id.is_empty()).then_some(id);
                }
                _ => {}
            }
        }

        state
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set, one
/// `%XX` escape per UTF-8 byte.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Reverse of `encode_component`. Stray `%` sequences that are not valid
/// escapes pass through untouched; invalid UTF-8 is replaced, not refused.
pub fn decode_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 3 <= bytes.len() {
            if let Ok(hex) = std::str::from_utf8(&bytes[i + 1..i + 3]) {
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// A linear history of serialized view states with a cursor, mirroring
/// browser session history: filter edits replace the current entry, modal
/// transitions push a new one, back/forward move the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new(initial: String) -> Self {
        History {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The entry the cursor points at.
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Non-navigating update: overwrite the current entry. Used for every
    /// keystroke and chip toggle so rapid input keeps one logical entry.
    pub fn replace(&mut self, entry: String) {
        self.entries[self.cursor] = entry;
    }

    /// Navigating update: drop the forward tail, append, advance.
    pub fn push(&mut self, entry: String) {
        if entry == *self.current() {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor += 1;
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back and return the entry to restore, if any.
    pub fn back(&mut self) -> Option<String> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step forward and return the entry to restore, if any.
    pub fn forward(&mut self) -> Option<String> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(tags: &[&str], query: &str, page: usize, open: Option<&str>) -> ViewState {
        ViewState {
            selected_tags: tags.iter().map(|t| t.to_string()).collect(),
            query: query.to_string(),
            page,
            open_id: open.map(str::to_string),
        }
    }

    #[test]
    fn test_default_state_serializes_to_empty() {
        assert_eq!(ViewState::default().to_query_string(), "");
        assert_eq!(ViewState::from_query_string(""), ViewState::default());
    }

    #[test]
    fn test_fields_at_defaults_are_omitted() {
        let qs = state(&["delhi"], "", 0, None).to_query_string();
        assert_eq!(qs, "tags=delhi");

        let qs = state(&[], "fort", 2, None).to_query_string();
        assert_eq!(qs, "q=fort&p=2");
    }

    #[test]
    fn test_round_trip_all_fields() {
        let original = state(&["delhi", "mumbai"], "red fort", 3, Some("42"));
        let restored = ViewState::from_query_string(&original.to_query_string());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_round_trip_awkward_tag_contents() {
        // Commas, equals signs, ampersands and non-ASCII inside tags must
        // all survive the comma-joined encoding
        let original = state(&["old, delhi", "a&b=c", "काशी", "100%"], "", 0, None);
        let restored = ViewState::from_query_string(&original.to_query_string());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_round_trip_query_with_spaces() {
        let original = state(&[], "taj mahal 1900s", 0, None);
        let restored = ViewState::from_query_string(&original.to_query_string());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_serialize_is_idempotent_after_parse() {
        let qs = "q=ghat&tags=varanasi&p=1";
        let once = ViewState::from_query_string(qs);
        let twice = ViewState::from_query_string(&once.to_query_string());
        assert_eq!(once, twice);
        assert_eq!(once.to_query_string(), twice.to_query_string());
    }

    #[test]
    fn test_unparseable_page_defaults_to_zero() {
        let restored = ViewState::from_query_string("tags=delhi&p=banana");
        assert_eq!(restored.page, 0);
        assert!(restored.selected_tags.contains("delhi"));

        assert_eq!(ViewState::from_query_string("p=-3").page, 0);
        assert_eq!(ViewState::from_query_string("p=").page, 0);
    }

    #[test]
    fn test_unknown_keys_and_junk_are_ignored() {
        let restored = ViewState::from_query_string("?utm_source=x&&tags=delhi&open=");
        assert_eq!(restored, state(&["delhi"], "", 0, None));
    }

    #[test]
    fn test_percent_codec_round_trips() {
        for input in ["plain", "with space", "a,b&c=d", "100%", "पुरानी दिल्ली"] {
            assert_eq!(decode_component(&encode_component(input)), input);
        }
    }

    #[test]
    fn test_decode_tolerates_stray_percent() {
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
    }

    #[test]
    fn test_history_replace_keeps_single_entry() {
        let mut history = History::new(String::new());
        history.replace("tags=delhi".into());
        history.replace("tags=delhi&p=1".into());

        assert_eq!(history.current(), "tags=delhi&p=1");
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_history_push_back_forward() {
        let mut history = History::new("".into());
        history.replace("tags=delhi".into());
        history.push("tags=delhi&open=7".into());

        assert_eq!(history.back().as_deref(), Some("tags=delhi"));
        assert!(history.can_go_forward());
        assert_eq!(history.forward().as_deref(), Some("tags=delhi&open=7"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_history_push_truncates_forward_tail() {
        let mut history = History::new("a".into());
        history.push("b".into());
        history.push("c".into());
        history.back();
        history.push("d".into());

        assert!(!history.can_go_forward());
        assert_eq!(history.back().as_deref(), Some("b"));
        assert_eq!(history.back().as_deref(), Some("a"));
        assert_eq!(history.back(), None);
    }

    #[test]
    fn test_history_push_ignores_identical_entry() {
        let mut history = History::new("a".into());
        history.push("a".into());
        assert!(!history.can_go_back());
    }
}
