//! Run-time options and build-time tuning constants.

/// Gigabytes moved by each workload; also the pass count over a 1 GiB buffer.
pub const REPS: u64 = 4;

/// Size of the shared device buffer in bytes.
pub const MEMSIZE: usize = 1 << 30;

/// Parallelism width. The 1-D global work size is `256 * WAVES`.
pub const WAVES: usize = 64;

/// Work-group size for every workload launch.
pub const LOCAL_WORK_SIZE: usize = 64;

/// Logical workers per launch (the 1-D global work size).
pub const GLOBAL_WORK_SIZE: usize = 256 * WAVES;

/// Debug-buffer length in records: one per worker when counters are
/// compiled into the device program.
#[cfg(feature = "debug-counters")]
pub const DEBUG_SLOTS: usize = GLOBAL_WORK_SIZE;

/// Debug-buffer length in records: a single placeholder when counters are
/// compiled out, so allocation and release stay unconditional.
#[cfg(not(feature = "debug-counters"))]
pub const DEBUG_SLOTS: usize = 1;

/// Per-run options, threaded explicitly through the pipeline.
///
/// There is no process-wide mutable state; every stage that needs an option
/// receives this value.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Global ordinal of the device to run on.
    pub device_ordinal: u32,
    /// Diagnostic verbosity (count of `-v` flags).
    pub verbosity: u8,
}

impl BenchConfig {
    /// Create a config for one run.
    pub fn new(device_ordinal: u32, verbosity: u8) -> Self {
        BenchConfig {
            device_ordinal,
            verbosity,
        }
    }

    /// Whether the debug buffer is read back and summed after the workloads.
    pub fn debug_readback(&self) -> bool {
        self.verbosity >= 2
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_readback_threshold() {
        assert!(!BenchConfig::new(0, 0).debug_readback());
        assert!(!BenchConfig::new(0, 1).debug_readback());
        assert!(BenchConfig::new(0, 2).debug_readback());
        assert!(BenchConfig::new(0, 5).debug_readback());
    }

    #[test]
    fn test_default_selects_first_device() {
        let config = BenchConfig::default();
        assert_eq!(config.device_ordinal, 0);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_grid_constants_agree() {
        assert_eq!(GLOBAL_WORK_SIZE, 256 * WAVES);
        assert_eq!(GLOBAL_WORK_SIZE % LOCAL_WORK_SIZE, 0);
        // The kernels stride a 16-byte vector view of the buffer; every
        // worker must get a whole number of lanes.
        assert_eq!(MEMSIZE % 16, 0);
        assert_eq!((MEMSIZE / 16) % GLOBAL_WORK_SIZE, 0);
        // REPS gigabytes must be a whole number of buffer sweeps.
        assert_eq!((REPS << 30) % MEMSIZE as u64, 0);
    }
}
