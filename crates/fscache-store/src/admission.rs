// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_types::CacheError;

/// Default memory ceiling before the admission guard starts refusing new
/// tenant loads: 2 GiB.
pub const DEFAULT_MEMORY_THRESHOLD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Refuses admission of a new tenant if the process's live jemalloc-allocated
/// bytes exceed `threshold_bytes`. Reads the allocator's own live-bytes
/// stat rather than an OS-level RSS figure, the same kind of counter Go's
/// `runtime.MemStats.Alloc` exposes for a process's own runtime.
pub fn check_memory_usage(threshold_bytes: u64) -> Result<(), CacheError> {
    let allocated = live_allocated_bytes()?;
    if allocated > threshold_bytes {
        return Err(CacheError::ResourceExhausted(format!(
            "memory usage ({allocated} bytes) exceeds threshold ({threshold_bytes} bytes)"
        )));
    }
    Ok(())
}

fn live_allocated_bytes() -> Result<u64, CacheError> {
    // jemalloc caches its own stats; refresh the epoch before reading so we
    // observe recent allocations rather than a stale snapshot.
    tikv_jemalloc_ctl::epoch::advance()
        .map_err(|e| CacheError::Unavailable(anyhow::anyhow!("jemalloc epoch advance failed: {e}")))?;
    let allocated = tikv_jemalloc_ctl::stats::allocated::read()
        .map_err(|e| CacheError::Unavailable(anyhow::anyhow!("jemalloc stats read failed: {e}")))?;
    Ok(allocated as u64)
}
