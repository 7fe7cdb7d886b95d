//! Asset registry contract core.
//!
//! Holds the asset model, the world-state capability traits the contract runs
//! against, and the transaction handlers themselves. Nothing here performs
//! I/O directly; every read and write goes through a [`state::WorldState`]
//! supplied by the host.

pub mod assets;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod pagination;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
