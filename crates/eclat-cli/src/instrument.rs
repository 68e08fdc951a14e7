//! Run statistics: wall-clock time, memory footprint and RAPL energy.
//!
//! Energy comes from the Linux powercap interface. Each `intel-rapl:*` zone
//! exposes a monotonically increasing `energy_uj` counter that wraps at
//! `max_energy_range_uj`, often within minutes on a busy package. A sampler
//! thread reads the counters every [`SAMPLE_INTERVAL`] so that at most one wrap
//! happens between two reads.
//!
//! Every probe is best effort. Without powercap there are no energy columns,
//! and without `/proc/self/statm` the memory column is 0.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;

/// Default powercap sysfs directory.
pub const POWERCAP_ROOT: &str = "/sys/class/powercap";

/// Delay between two counter samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

const RAPL_PREFIX: &str = "intel-rapl:";
const STATM_PATH: &str = "/proc/self/statm";

/// One RAPL power zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaplDomain {
    /// Zone directory name, e.g. `intel-rapl:0`.
    pub id: String,
    /// Zone name, e.g. `package-0` or `dram`.
    pub name: String,
    /// Value at which `energy_uj` wraps around.
    pub max_energy_range_uj: u64,
    dir: PathBuf,
}

impl RaplDomain {
    fn load(dir: PathBuf, id: String) -> Option<Self> {
        let name = fs::read_to_string(dir.join("name")).ok()?;
        let name = name.split_whitespace().next()?.to_string();
        let max_energy_range_uj = read_u64(&dir.join("max_energy_range_uj"))?;
        Some(Self {
            id,
            name,
            max_energy_range_uj,
            dir,
        })
    }

    /// Current counter value in microjoules.
    #[must_use]
    pub fn energy_uj(&self) -> Option<u64> {
        read_u64(&self.dir.join("energy_uj"))
    }
}

fn read_u64(path: &Path) -> Option<u64> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Lists the RAPL zones under `root`, sorted by id. Zones missing their
/// `name` or `max_energy_range_uj` are skipped.
#[must_use]
pub fn discover_rapl(root: &Path) -> Vec<RaplDomain> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut domains: Vec<RaplDomain> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let id = entry.file_name().into_string().ok()?;
            if !id.starts_with(RAPL_PREFIX) {
                return None;
            }
            let domain = RaplDomain::load(entry.path(), id);
            if domain.is_none() {
                tracing::debug!(zone = %entry.path().display(), "skipping unreadable rapl zone");
            }
            domain
        })
        .collect();
    domains.sort_by(|a, b| a.id.cmp(&b.id));
    domains
}

/// Microjoules consumed between two readings of a counter wrapping at `max`.
#[must_use]
pub fn energy_delta(previous: u64, current: u64, max: u64) -> u64 {
    if current >= previous {
        current - previous
    } else {
        tracing::debug!(previous, current, max, "rapl counter wrapped");
        max.saturating_sub(previous).saturating_add(current)
    }
}

/// Parses the first field of `/proc/<pid>/statm` (program size, in pages).
#[must_use]
pub fn parse_statm(contents: &str) -> Option<u64> {
    contents.split_whitespace().next()?.parse().ok()
}

#[cfg(target_os = "linux")]
fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(size).ok().filter(|&s| s > 0).unwrap_or(4096)
}

#[cfg(not(target_os = "linux"))]
fn page_size() -> u64 {
    4096
}

/// Virtual memory size of this process in bytes, 0 if unknown.
#[must_use]
pub fn memory_bytes() -> u64 {
    fs::read_to_string(STATM_PATH)
        .ok()
        .and_then(|s| parse_statm(&s))
        .map_or(0, |pages| pages.saturating_mul(page_size()))
}

/// Statistics of one measured run.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Wall-clock seconds.
    pub seconds: f64,
    /// Memory footprint at the end of the run, in bytes.
    pub memory_bytes: u64,
    /// Joules per RAPL zone, in the order of [`Instruments::domains`].
    pub energy_joules: Vec<f64>,
}

impl Measurement {
    /// CSV fields matching [`Instruments::header`].
    #[must_use]
    pub fn csv_fields(&self) -> String {
        let mut out = format!("{:.6},{}", self.seconds, self.memory_bytes);
        for joules in &self.energy_joules {
            out.push_str(&format!(",{joules:.6}"));
        }
        out
    }
}

/// Available probes.
#[derive(Debug, Clone)]
pub struct Instruments {
    domains: Arc<[RaplDomain]>,
}

impl Instruments {
    /// Probes the system powercap directory.
    #[must_use]
    pub fn discover() -> Self {
        Self::with_domains(discover_rapl(Path::new(POWERCAP_ROOT)))
    }

    /// Uses the given RAPL zones.
    #[must_use]
    pub fn with_domains(domains: Vec<RaplDomain>) -> Self {
        Self {
            domains: domains.into(),
        }
    }

    /// Discovered RAPL zones.
    #[must_use]
    pub fn domains(&self) -> &[RaplDomain] {
        &self.domains
    }

    /// CSV header of the instrument columns.
    #[must_use]
    pub fn header(&self) -> String {
        let mut out = String::from("time,memory");
        for domain in self.domains.iter() {
            out.push_str(",energy_");
            out.push_str(&domain.name);
        }
        out
    }

    /// Starts measuring.
    #[must_use]
    pub fn start(&self) -> Recording {
        self.start_with_interval(SAMPLE_INTERVAL)
    }

    /// Starts measuring with a custom sampling interval.
    #[must_use]
    pub fn start_with_interval(&self, interval: Duration) -> Recording {
        let state = Arc::new(Mutex::new(Accumulator::new(&self.domains)));
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let sampler = {
            let domains = Arc::clone(&self.domains);
            let state = Arc::clone(&state);
            std::thread::Builder::new()
                .name("eclat-rapl-sampler".into())
                .spawn(move || loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => state.lock().collect(&domains),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                })
                .map_err(|e| tracing::warn!(error = %e, "energy sampler not started"))
                .ok()
        };

        Recording {
            domains: Arc::clone(&self.domains),
            state,
            stop_tx,
            sampler,
        }
    }
}

#[derive(Debug)]
struct Accumulator {
    last_sample: Instant,
    seconds: f64,
    last_energy: Vec<Option<u64>>,
    joules: Vec<f64>,
}

impl Accumulator {
    fn new(domains: &[RaplDomain]) -> Self {
        Self {
            last_sample: Instant::now(),
            seconds: 0.0,
            last_energy: domains.iter().map(RaplDomain::energy_uj).collect(),
            joules: vec![0.0; domains.len()],
        }
    }

    fn collect(&mut self, domains: &[RaplDomain]) {
        let now = Instant::now();
        self.seconds += now.duration_since(self.last_sample).as_secs_f64();
        self.last_sample = now;

        for (i, domain) in domains.iter().enumerate() {
            let current = domain.energy_uj();
            if let (Some(previous), Some(current)) = (self.last_energy[i], current) {
                let delta = energy_delta(previous, current, domain.max_energy_range_uj);
                self.joules[i] += delta as f64 / 1_000_000.0;
            }
            if current.is_some() {
                self.last_energy[i] = current;
            }
        }
    }
}

/// A measurement in progress.
#[derive(Debug)]
pub struct Recording {
    domains: Arc<[RaplDomain]>,
    state: Arc<Mutex<Accumulator>>,
    stop_tx: Sender<()>,
    sampler: Option<JoinHandle<()>>,
}

impl Recording {
    /// Stops the sampler and takes the final readings.
    #[must_use]
    pub fn stop(self) -> Measurement {
        // A full channel means a stop is already pending
        let _ = self.stop_tx.try_send(());
        if let Some(handle) = self.sampler {
            if handle.join().is_err() {
                tracing::warn!("energy sampler panicked");
            }
        }

        let mut state = self.state.lock();
        state.collect(&self.domains);
        Measurement {
            seconds: state.seconds,
            memory_bytes: memory_bytes(),
            energy_joules: state.joules.clone(),
        }
    }
}
