/// Catalog loading
///
/// The catalog is a single JSON document containing an array of loosely
/// shaped entries. It lives either on disk next to the images or on the
/// same object-storage host the rewritten image URLs point at. Loading it
/// is the only suspension point of the whole pipeline: nothing renders
/// until it resolves, and a failure here is fatal rather than retried.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::record::{RawEntry, Record};

/// Where a catalog (and the references inside it) comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// A file on the local filesystem
    File(PathBuf),
    /// An HTTP(S) resource
    Url(String),
}

impl CatalogSource {
    /// Classify a user-supplied string as URL or filesystem path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            CatalogSource::Url(input.to_string())
        } else {
            CatalogSource::File(PathBuf::from(input))
        }
    }

    /// Resolve an image reference from a record against this catalog's
    /// location. Absolute URLs and absolute paths pass through untouched;
    /// relative references (`thumbs/foo.jpg`) are anchored at the catalog's
    /// own directory, which is how the producer scripts lay the site out.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }

        match self {
            CatalogSource::File(path) => {
                let reference_path = Path::new(reference);
                if reference_path.is_absolute() {
                    return reference.to_string();
                }
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                base.join(reference_path).to_string_lossy().to_string()
            }
            CatalogSource::Url(url) => match reqwest::Url::parse(url)
                .and_then(|base| base.join(reference))
            {
                Ok(joined) => joined.to_string(),
                // A base URL we cannot join against was already good enough
                // to fetch the catalog, so just hand the reference back
                Err(_) => reference.to_string(),
            },
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Why a catalog could not be loaded. Both cases are fatal to the
/// pipeline: without a catalog there is nothing to index, filter or render.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    /// The resource could not be read at all
    #[error("catalog unreachable: {source_name}: {detail}")]
    Unreachable { source_name: String, detail: String },
    /// The resource was read but is not a valid catalog document
    #[error("catalog is not valid JSON: {source_name}: {detail}")]
    Parse { source_name: String, detail: String },
}

/// Fetch and normalize a catalog.
///
/// Returns records in catalog order; that order is the canonical one every
/// later stage preserves.
pub async fn load_catalog(source: CatalogSource) -> Result<Vec<Record>, LoadError> {
    let bytes = fetch_bytes(&source).await?;

    let entries: Vec<RawEntry> =
        serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
            source_name: source.to_string(),
            detail: e.to_string(),
        })?;

    let records: Vec<Record> = entries.into_iter().map(Record::from_raw).collect();
    tracing::info!(count = records.len(), source = %source, "catalog loaded");

    Ok(records)
}

async fn fetch_bytes(source: &CatalogSource) -> Result<Vec<u8>, LoadError> {
    let unreachable = |detail: String| LoadError::Unreachable {
        source_name: source.to_string(),
        detail,
    };

    match source {
        CatalogSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| unreachable(e.to_string())),
        CatalogSource::Url(url) => {
            let response = reqwest::get(url)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| unreachable(e.to_string()))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| unreachable(e.to_string()))?;
            Ok(bytes.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_source_classification() {
        assert_eq!(
            CatalogSource::parse("https://storage.example.com/site/index.json"),
            CatalogSource::Url("https://storage.example.com/site/index.json".into())
        );
        assert_eq!(
            CatalogSource::parse("site/index.json"),
            CatalogSource::File(PathBuf::from("site/index.json"))
        );
    }

    #[test]
    fn test_resolve_relative_against_file_parent() {
        let source = CatalogSource::File(PathBuf::from("/srv/site/index.json"));
        assert_eq!(
            source.resolve("thumbs/fort.jpg"),
            "/srv/site/thumbs/fort.jpg"
        );
    }

    #[test]
    fn test_resolve_relative_against_url_directory() {
        let source = CatalogSource::Url("https://cdn.example.com/site/index.json".into());
        assert_eq!(
            source.resolve("thumbs/fort.jpg"),
            "https://cdn.example.com/site/thumbs/fort.jpg"
        );
    }

    #[test]
    fn test_resolve_leaves_absolute_references_alone() {
        let source = CatalogSource::File(PathBuf::from("/srv/site/index.json"));
        assert_eq!(
            source.resolve("https://cdn.example.com/full/fort.jpg"),
            "https://cdn.example.com/full/fort.jpg"
        );
        assert_eq!(source.resolve("/mnt/archive/fort.jpg"), "/mnt/archive/fort.jpg");
    }

    #[tokio::test]
    async fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "title": "Red Fort", "thumb": "thumbs/a.jpg", "tag": ["delhi"]}},
                {{"id": 2, "title": "Marine Drive", "tags": ["mumbai"]}}
            ]"#
        )
        .unwrap();

        let source = CatalogSource::File(file.path().to_path_buf());
        let records = load_catalog(source).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Red Fort");
        assert_eq!(records[0].tags, vec!["delhi"]);
        assert_eq!(records[1].id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_load_catalog_missing_file_is_unreachable() {
        let source = CatalogSource::File(PathBuf::from("/nonexistent/index.json"));
        match load_catalog(source).await {
            Err(LoadError::Unreachable { .. }) => {}
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_catalog_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let source = CatalogSource::File(file.path().to_path_buf());
        match load_catalog(source).await {
            Err(LoadError::Parse { .. }) => {}
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
