//! 时间与 ID 工具

use std::sync::atomic::{AtomicI64, Ordering};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// 上一次发出的 ID；CAS 保证进程内严格递增
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-millisecond sequence (4096 values per ms)
///
/// Ids are strictly increasing within the process: the sequence, not
/// randomness, separates ids minted in the same clock tick, so a burst
/// of mints (a cart converted line by line) can never collide. A burst
/// that exhausts the 4096-per-ms sequence borrows from the next
/// millisecond instead of wrapping.
///
/// Replaces userid+timestamp order numbers, which collide within one
/// clock tick.
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    loop {
        let prev = LAST_ID.load(Ordering::Relaxed);
        let ts = ((now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF) << 12;
        let candidate = if ts > prev { ts } else { prev + 1 };
        if LAST_ID
            .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            return candidate;
        }
    }
}
