//! The asset contract's transaction handlers.
//!
//! [`AssetContract`] is what the host runtime instantiates and serves. Each
//! method is one transaction against the world state it is given.

use crate::assets::asset_type::VALID_ASSET_TYPES;
use crate::assets::{Asset, Page};
use crate::error::CoreError;
use crate::ledger::AssetLedger;
use crate::pagination;
use crate::state::WorldState;

/// Number of assets created by [`AssetContract::seed_ledger`].
pub const SEED_ASSET_COUNT: usize = 100;

/// Handler names in the order the host registers them.
pub const TRANSACTION_NAMES: &[&str] = &[
    "Ping",
    "CreateAsset",
    "ReadAsset",
    "GetAsset",
    "AssetExists",
    "QueryAssets",
    "ReadAssets",
    "DeleteAsset",
    "SeedLedger",
    "DeleteSeededAssets",
];

/// Asset registry contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetContract;

impl AssetContract {
    pub fn new() -> Self {
        Self
    }

    /// Liveness check. Never fails.
    pub fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }

    pub fn create_asset<S: WorldState + ?Sized>(
        &self,
        state: &mut S,
        cid: &str,
        id: &str,
        type_raw: &str,
        features: &str,
    ) -> Result<Asset, CoreError> {
        AssetLedger::create(state, cid, id, type_raw, features)
    }

    pub fn read_asset<S: WorldState + ?Sized>(
        &self,
        state: &S,
        cid: &str,
    ) -> Result<Asset, CoreError> {
        AssetLedger::read(state, cid)
    }

    /// Alias of [`read_asset`](Self::read_asset).
    pub fn get_asset<S: WorldState + ?Sized>(
        &self,
        state: &S,
        cid: &str,
    ) -> Result<Asset, CoreError> {
        self.read_asset(state, cid)
    }

    pub fn asset_exists<S: WorldState + ?Sized>(
        &self,
        state: &S,
        cid: &str,
    ) -> Result<bool, CoreError> {
        AssetLedger::exists(state, cid)
    }

    /// Page through the results of a store-native query.
    ///
    /// The query string is executed as is; its syntax belongs to the state
    /// database. Only stores with rich-query support can answer it.
    pub fn query_assets<S: WorldState + ?Sized>(
        &self,
        state: &S,
        query: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<Page, CoreError> {
        pagination::query_page(state, query, page_size, bookmark)
    }

    /// Page through every asset in key order.
    pub fn read_assets<S: WorldState + ?Sized>(
        &self,
        state: &S,
        page_size: i32,
        bookmark: &str,
    ) -> Result<Page, CoreError> {
        pagination::range_page(state, page_size, bookmark)
    }

    pub fn delete_asset<S: WorldState + ?Sized>(
        &self,
        state: &mut S,
        cid: &str,
    ) -> Result<(), CoreError> {
        AssetLedger::delete(state, cid)
    }

    /// Create `CID_0`..`CID_99`, alternating between the recognized types.
    ///
    /// Stops at the first failure; the host discards the partial write set.
    pub fn seed_ledger<S: WorldState + ?Sized>(&self, state: &mut S) -> Result<usize, CoreError> {
        for i in 0..SEED_ASSET_COUNT {
            let asset_type = VALID_ASSET_TYPES[i % VALID_ASSET_TYPES.len()];
            AssetLedger::create(state, &seed_cid(i), &format!("ASSET_{i}"), asset_type, "[]")?;
        }
        Ok(SEED_ASSET_COUNT)
    }

    /// Remove every key [`seed_ledger`](Self::seed_ledger) may have written.
    pub fn delete_seeded_assets<S: WorldState + ?Sized>(
        &self,
        state: &mut S,
    ) -> Result<usize, CoreError> {
        for i in 0..SEED_ASSET_COUNT {
            state
                .delete(&seed_cid(i))
                .map_err(|source| CoreError::StoreWrite {
                    op: "DeleteSeededAssets",
                    source,
                })?;
        }
        Ok(SEED_ASSET_COUNT)
    }
}

fn seed_cid(i: usize) -> String {
    format!("CID_{i}")
}
