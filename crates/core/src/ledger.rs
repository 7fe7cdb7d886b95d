//! Single-key reads and writes of asset records against world state.
//!
//! Every function here is confined to one transaction: it reads what it needs,
//! performs at most one mutation, and holds nothing across calls.

use crate::assets::{Asset, AssetType};
use crate::error::CoreError;
use crate::state::WorldState;

/// Provides existence checks, creation, point reads and deletion of assets.
pub struct AssetLedger;

impl AssetLedger {
    /// Whether a record is stored under `cid`.
    ///
    /// An empty stored value counts as absent.
    pub fn exists<S: WorldState + ?Sized>(state: &S, cid: &str) -> Result<bool, CoreError> {
        Self::exists_in(state, cid, "AssetExists")
    }

    /// Create a new asset under `cid`.
    ///
    /// Existence is checked before the type tag is validated, and nothing is
    /// written unless both checks pass.
    pub fn create<S: WorldState + ?Sized>(
        state: &mut S,
        cid: &str,
        id: &str,
        type_raw: &str,
        features: &str,
    ) -> Result<Asset, CoreError> {
        const OP: &str = "CreateAsset";

        if Self::exists_in(state, cid, OP)? {
            return Err(CoreError::AlreadyExists {
                cid: cid.to_string(),
            });
        }

        let asset = Asset {
            cid: cid.to_string(),
            features: features.to_string(),
            id: id.to_string(),
            asset_type: AssetType::parse(type_raw)?,
        };

        let bytes = asset
            .to_bytes()
            .map_err(|source| CoreError::Encoding { op: OP, source })?;

        state
            .put(cid, bytes)
            .map_err(|source| CoreError::StoreWrite { op: OP, source })?;

        Ok(asset)
    }

    /// Read the asset stored under `cid`.
    pub fn read<S: WorldState + ?Sized>(state: &S, cid: &str) -> Result<Asset, CoreError> {
        const OP: &str = "ReadAsset";

        let bytes = state
            .get(cid)
            .map_err(|source| CoreError::StoreRead { op: OP, source })?;

        match bytes {
            Some(bytes) if !bytes.is_empty() => {
                Asset::from_bytes(&bytes).map_err(|source| CoreError::Decoding { op: OP, source })
            }
            _ => Err(CoreError::NotFound {
                cid: cid.to_string(),
            }),
        }
    }

    /// Delete the asset stored under `cid`, failing if there is none.
    pub fn delete<S: WorldState + ?Sized>(state: &mut S, cid: &str) -> Result<(), CoreError> {
        const OP: &str = "DeleteAsset";

        if !Self::exists_in(state, cid, OP)? {
            return Err(CoreError::NotFound {
                cid: cid.to_string(),
            });
        }

        state
            .delete(cid)
            .map_err(|source| CoreError::StoreWrite { op: OP, source })
    }

    fn exists_in<S: WorldState + ?Sized>(
        state: &S,
        cid: &str,
        op: &'static str,
    ) -> Result<bool, CoreError> {
        let bytes = state
            .get(cid)
            .map_err(|source| CoreError::StoreRead { op, source })?;

        Ok(bytes.is_some_and(|b| !b.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
