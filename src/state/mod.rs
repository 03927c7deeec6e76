/// State management module
///
/// This module holds the headless half of the gallery pipeline:
/// - Tag frequency index and chip selection (tags.rs)
/// - Record filtering (filter.rs)
/// - Masonry column layout and pagination (grid.rs)
/// - View state, its query-string codec, and history (view.rs)
///
/// Nothing in here touches a widget; everything is a pure function of the
/// loaded records and the current view state, so it is all testable
/// without a display surface.

pub mod filter;
pub mod grid;
pub mod tags;
pub mod view;
