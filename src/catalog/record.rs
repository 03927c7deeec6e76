/// Catalog record normalization
///
/// The catalog is produced by external batch scripts and its entries are
/// loosely shaped: images may arrive as an `images` array or a singular
/// `image` field, thumbnails as `thumbs` or `thumb`, and the tag list as
/// `tag` or `tags`. Every record is normalized once at load time so the
/// rest of the pipeline sees a single shape.

use serde::Deserialize;
use serde_json::Value;

/// A single entry as it appears in the raw catalog JSON.
///
/// Every field is optional; normalization fills the gaps.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    /// Opaque identifier; the producers emit either a number or a string
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    /// Full-resolution references, newest producer shape
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Full-resolution reference, older singular shape
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub thumbs: Option<Vec<String>>,
    #[serde(default)]
    pub thumb: Option<String>,
    /// Tag list; `tag` is the cleaned shape, `tags` the original one
    #[serde(default)]
    pub tag: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub post_description: Option<String>,
}

/// A normalized catalog record.
///
/// Immutable after load. Whatever raw fields the source JSON used, every
/// record exposes `image`, `thumb` and `tags` in this one shape. Tag
/// strings are carried verbatim, in their original order; trimming and
/// empty-string exclusion happen at the index and filter layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stringified identifier, if the entry carried one
    pub id: Option<String>,
    /// Display title; empty when absent
    pub title: String,
    /// Primary full-resolution reference
    pub image: Option<String>,
    /// Primary thumbnail reference
    pub thumb: Option<String>,
    /// Ordered tag strings; possibly empty, never null
    pub tags: Vec<String>,
    /// Free-text description
    pub description: Option<String>,
}

impl Record {
    /// Normalize one raw entry.
    pub fn from_raw(raw: RawEntry) -> Self {
        let image = first_or_scalar(raw.images, raw.image);
        let thumb = first_or_scalar(raw.thumbs, raw.thumb);
        let tags = raw.tag.or(raw.tags).unwrap_or_default();

        Record {
            id: raw.id.as_ref().and_then(stringify_id),
            title: raw.title.unwrap_or_default(),
            image,
            thumb,
            tags,
            description: raw.post_description,
        }
    }
}

/// Prefer the first element of the plural field, fall back to the scalar.
fn first_or_scalar(plural: Option<Vec<String>>, scalar: Option<String>) -> Option<String> {
    plural
        .and_then(|list| list.into_iter().next())
        .or(scalar)
}

/// Identifiers are compared as strings everywhere; numbers are stringified,
/// other JSON shapes are ignored.
fn stringify_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
