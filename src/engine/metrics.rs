use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineMetricsSnapshot {
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub type_scans: u64,
    pub value_lookups: u64,
}

#[derive(Default)]
pub struct EngineMetrics {
    sessions_opened: AtomicU64,
    sessions_closed: AtomicU64,
    type_scans: AtomicU64,
    value_lookups: AtomicU64,
}

impl EngineMetrics {
    pub fn snapshot(&self) -> EngineMetricsSnapshot {
        EngineMetricsSnapshot {
            sessions_opened: self.sessions_opened.load(Ordering::Relaxed),
            sessions_closed: self.sessions_closed.load(Ordering::Relaxed),
            type_scans: self.type_scans.load(Ordering::Relaxed),
            value_lookups: self.value_lookups.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.sessions_opened.store(0, Ordering::Relaxed);
        self.sessions_closed.store(0, Ordering::Relaxed);
        self.type_scans.store(0, Ordering::Relaxed);
        self.value_lookups.store(0, Ordering::Relaxed);
    }

    pub fn record_session_open(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_close(&self) {
        self.sessions_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_type_scan(&self) {
        self.type_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_value_lookup(&self) {
        self.value_lookups.fetch_add(1, Ordering::Relaxed);
    }
}
