//! Asset records and their type tags.
//!
//! Pure domain types: parsing, validation, and the storage encoding. Reading
//! and writing them against world state lives in [`crate::ledger`].

pub mod asset_type;
pub mod record;

pub use asset_type::AssetType;
pub use record::{Asset, Page};
