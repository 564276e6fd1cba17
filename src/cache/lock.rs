use std::sync::{LockResult, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

/// Shared read access that survives a writer having panicked mid-update.
pub(crate) fn rw_read<'a, T>(
    lock: &'a RwLock<T>,
    region: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    recover(lock.read(), region, op, "rwlock.read")
}

/// Exclusive access; also used for LRU reads because a hit reorders recency.
pub(crate) fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    region: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    recover(lock.write(), region, op, "rwlock.write")
}

fn recover<G>(
    result: LockResult<G>,
    region: &'static str,
    op: &'static str,
    lock_kind: &'static str,
) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(
            op,
            region,
            lock_kind,
            result = "poisoned_recovered",
            hint = "cached entries may be stale after panic in another thread",
            "Recovered from poisoned cache lock"
        );
        poisoned.into_inner()
    })
}
