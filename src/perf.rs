use std::cell::Cell;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static SLOW_FILE_OP_THRESHOLD_MS: AtomicU64 = AtomicU64::new(if cfg!(debug_assertions) {
    50
} else {
    200
});

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static FILE_OP_COUNT: Cell<u64> = Cell::new(0);
    static SLOW_FILE_OP_COUNT: Cell<u64> = Cell::new(0);
}

/// 配置慢文件操作阈值（毫秒）
///
/// 环境变量 `FOOD_COSTING_SLOW_FILE_MS` 可覆盖;
/// Debug 默认 50ms, Release 默认 200ms
pub fn init_from_env() {
    if let Ok(v) = std::env::var("FOOD_COSTING_SLOW_FILE_MS") {
        if let Ok(ms) = v.trim().parse::<u64>() {
            SLOW_FILE_OP_THRESHOLD_MS.store(ms, Ordering::Relaxed);
        }
    }
}

/// 记录一次档案读写（由 csv_io 在每次整文件读/写后调用）
///
/// 计数仅在 PerfGuard 作用域内累加; 慢操作无条件告警
pub fn note_file_op(kind: &'static str, path: &Path, duration: Duration) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        FILE_OP_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_FILE_OP_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_file",
            kind,
            duration_ms = ms,
            path = %path.display(),
            "slow file op"
        );
        if active {
            SLOW_FILE_OP_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        }
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 档案操作数 + 慢操作数
///
/// 使用方式：
/// ```ignore
/// let _perf = food_costing::perf::PerfGuard::new("ipc.list_ingredients");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    file_op_start: u64,
    slow_file_op_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let file_op_start = FILE_OP_COUNT.with(|c| c.get());
        let slow_file_op_start = SLOW_FILE_OP_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            file_op_start,
            slow_file_op_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let file_op_end = FILE_OP_COUNT.with(|c| c.get());
        let slow_file_op_end = SLOW_FILE_OP_COUNT.with(|c| c.get());
        let file_op_count = file_op_end.saturating_sub(self.file_op_start);
        let slow_file_op_count = slow_file_op_end.saturating_sub(self.slow_file_op_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            file_op_count,
            slow_file_op_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
