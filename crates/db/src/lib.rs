//! In-memory world-state database for the asset contract.
//!
//! Implements [`chainav_core::state::WorldState`] with key-ordered range
//! scans, Mango-style rich queries, and store-issued bookmarks.

pub mod config;
pub mod memory;
pub mod selector;

pub use config::StateConfig;
pub use memory::MemoryWorldState;

/// Create an empty world state with the given configuration.
pub fn create_state(config: StateConfig) -> MemoryWorldState {
    tracing::info!(
        rich_query = config.rich_query,
        total_query_limit = config.total_query_limit,
        "World state created"
    );
    MemoryWorldState::new(config)
}
