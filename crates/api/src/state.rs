use std::sync::Arc;

use chainav_core::contract::AssetContract;
use chainav_db::MemoryWorldState;
use tokio::sync::Mutex;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. The world state sits behind one mutex, so transactions
/// run one at a time.
#[derive(Clone)]
pub struct AppState {
    /// World state the contract reads and writes.
    pub ledger: Arc<Mutex<MemoryWorldState>>,
    /// The handler set served by this host.
    pub contract: AssetContract,
}

impl AppState {
    pub fn new(ledger: MemoryWorldState) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            contract: AssetContract::new(),
        }
    }
}
