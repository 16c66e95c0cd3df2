use crate::core::loader::LoadReport;
use crate::core::session::SessionSummary;
#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// 行程常駐記憶體 (MB) 與目前為止的峰值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    pub resident_mb: u64,
    pub peak_mb: u64,
}

impl MemorySample {
    /// 載入後每筆作品或評分平均佔用的位元組，沒有任何記錄時為 None
    pub fn bytes_per_record(&self, report: &LoadReport) -> Option<u64> {
        let records = (report.titles + report.ratings) as u64;
        (records > 0).then(|| self.resident_mb * 1024 * 1024 / records)
    }
}

/// 追蹤兩個集合載入後與查詢結束時的記憶體用量
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    peak_mb: AtomicU64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("Could not determine current PID, monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            peak_mb: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    /// 只重新整理本行程的記憶體資訊
    pub fn sample(&self) -> Option<MemorySample> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let resident_mb = system.process(pid)?.memory() / 1024 / 1024;
        let peak_mb = self
            .peak_mb
            .fetch_max(resident_mb, Ordering::Relaxed)
            .max(resident_mb);
        Some(MemorySample {
            resident_mb,
            peak_mb,
        })
    }

    pub fn log_load(&self, report: &LoadReport) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 Load - {} titles, {} ratings in {:?}; Memory: {}MB (~{} bytes/record)",
                report.titles,
                report.ratings,
                report.elapsed,
                sample.resident_mb,
                sample.bytes_per_record(report).unwrap_or_default()
            );
        }
    }

    pub fn log_session(&self, summary: &SessionSummary) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 Queries - {} executed, {} failed in {:?}; Peak Memory: {}MB",
                summary.executed,
                summary.failed,
                summary.elapsed,
                sample.peak_mb
            );
        }
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn sample(&self) -> Option<MemorySample> {
        None
    }

    pub fn log_load(&self, _report: &LoadReport) {}

    pub fn log_session(&self, _summary: &SessionSummary) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_is_silent() {
        let monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert_eq!(monitor.sample(), None);
        monitor.log_load(&LoadReport::default());
        monitor.log_session(&SessionSummary::default());
    }

    #[test]
    fn test_bytes_per_record() {
        let sample = MemorySample {
            resident_mb: 3,
            peak_mb: 3,
        };
        let report = LoadReport {
            titles: 2048,
            ratings: 1024,
            ..LoadReport::default()
        };
        assert_eq!(sample.bytes_per_record(&report), Some(1024));
        assert_eq!(sample.bytes_per_record(&LoadReport::default()), None);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_peak_never_drops_below_resident() {
        let monitor = SystemMonitor::new(true);
        let first = monitor.sample();
        let second = monitor.sample();
        if let (Some(first), Some(second)) = (first, second) {
            assert!(first.peak_mb >= first.resident_mb);
            assert!(second.peak_mb >= first.peak_mb);
        }
    }
}
