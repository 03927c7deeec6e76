/// Catalog acquisition module
///
/// This module handles:
/// - Fetching the JSON catalog from disk or object storage
/// - Normalizing loosely-shaped entries into uniform records
/// - Resolving relative image references against the catalog location

pub mod loader;
pub mod record;
