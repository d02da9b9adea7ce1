//! Order Lifecycle Engine
//!
//! Owns the two multi-record writes of the system: checkout (order fan-out
//! plus stock reservation) and the vendor status transition (stock restore
//! plus parent aggregation). Both run as single database transactions so a
//! failed step leaves no partial state behind.

pub mod checkout;
pub mod status;

pub use status::aggregate_status;

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

/// Lifecycle service shared across request handlers
///
/// `status_lock` serializes the read-aggregate-write sequence of status
/// transitions within this process. The database transaction alone cannot
/// cover the sibling read that feeds the parent aggregation.
#[derive(Clone)]
pub struct OrderLifecycle {
    db: Surreal<Db>,
    status_lock: Arc<Mutex<()>>,
}

impl OrderLifecycle {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            db,
            status_lock: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Upper bound on re-running a transaction after an optimistic conflict
pub(crate) const TXN_MAX_RETRIES: usize = 5;

/// The embedded store reports optimistic write conflicts as retryable
/// transaction errors; nothing was committed, so re-running is safe.
pub(crate) fn is_retryable_txn_error(detail: &str) -> bool {
    detail.contains("retried") || detail.contains("conflict")
}
