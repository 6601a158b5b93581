use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Counts the requests sent to the REST API. Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct RequestCounter {
    count: Arc<AtomicUsize>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: usize,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests made to the REST API in {} seconds.",
            self.requests,
            self.elapsed.as_secs()
        )
    }
}

#[cfg(feature = "cli")]
struct ProcessProbe {
    system: Mutex<System>,
    pid: Pid,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl ProcessProbe {
    fn new() -> Option<Self> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("System stats unavailable: {}", e);
                return None;
            }
        };

        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();

        Some(Self {
            system: Mutex::new(system),
            pid,
            peak_memory_mb: Mutex::new(0),
        })
    }

    /// (cpu %, memory MB, peak memory MB)
    fn sample(&self) -> Option<(f32, u64, u64)> {
        let mut system = self.system.lock().ok()?;
        system.refresh_all();

        let process = system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory_mb.lock().ok()?;
        if memory_mb > *peak {
            *peak = memory_mb;
        }

        Some((process.cpu_usage(), memory_mb, *peak))
    }
}

/// Tracks elapsed time and request count for one run, plus process stats
/// when system monitoring is switched on.
pub struct RunMonitor {
    counter: RequestCounter,
    start_time: Instant,
    #[cfg(feature = "cli")]
    probe: Option<ProcessProbe>,
}

impl RunMonitor {
    pub fn new(counter: RequestCounter, system_stats: bool) -> Self {
        #[cfg(not(feature = "cli"))]
        let _ = system_stats;

        Self {
            counter,
            start_time: Instant::now(),
            #[cfg(feature = "cli")]
            probe: if system_stats { ProcessProbe::new() } else { None },
        }
    }

    pub fn counter(&self) -> &RequestCounter {
        &self.counter
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            requests: self.counter.get(),
            elapsed: self.start_time.elapsed(),
        }
    }

    pub fn system_stats_enabled(&self) -> bool {
        #[cfg(feature = "cli")]
        {
            self.probe.is_some()
        }
        #[cfg(not(feature = "cli"))]
        {
            false
        }
    }

    #[cfg(feature = "cli")]
    fn sample(&self) -> Option<(f32, u64, u64)> {
        self.probe.as_ref().and_then(|probe| probe.sample())
    }

    #[cfg(not(feature = "cli"))]
    fn sample(&self) -> Option<(f32, u64, u64)> {
        None
    }

    pub fn log_phase(&self, phase: &str) {
        let summary = self.summary();

        match self.sample() {
            Some((cpu, memory_mb, peak_mb)) => tracing::info!(
                "📊 {} - Requests: {}, CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                summary.requests,
                cpu,
                memory_mb,
                peak_mb,
                summary.elapsed
            ),
            None => tracing::debug!(
                "{} - Requests: {}, Time: {:?}",
                phase,
                summary.requests,
                summary.elapsed
            ),
        }
    }
}
