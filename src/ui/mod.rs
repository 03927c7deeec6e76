/// Widget construction module
///
/// Presentation only: these functions turn records and fetch state into
/// elements. All decisions about what is visible live in the state
/// module; nothing here mutates anything.

pub mod card;
pub mod chips;
pub mod modal;
