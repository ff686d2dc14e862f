//! Unified error types for membw_core.

use opencl3::error_codes::ClError;

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Unified error type for the benchmark pipeline.
///
/// Every variant is fatal: the pipeline performs no local recovery, and
/// errors propagate unchanged to the caller that owns the process exit.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// No OpenCL platform is reachable on this host.
    #[error("Found 0 OpenCL platform(s)")]
    NoPlatforms,

    /// The requested device ordinal matched no enumerated device.
    #[error("Selected device (ID {requested}) not found among {available} device(s); see --list")]
    DeviceNotFound {
        /// Ordinal the operator asked for.
        requested: u32,
        /// Devices visible in this enumeration pass.
        available: usize,
    },

    /// The device program failed to compile.
    #[error("Program build failed:\n{log}")]
    Build {
        /// Full compiler diagnostic log for the selected device.
        log: String,
    },

    /// A named entry point was missing from the built program.
    #[error("Kernel \"{name}\" not found in program (status {status})")]
    MissingKernel {
        /// Entry-point name that failed to resolve.
        name: &'static str,
        /// OpenCL status code returned by kernel creation.
        status: i32,
    },

    /// An OpenCL call returned a non-success status.
    #[error("{call} failed (status {status})")]
    Api {
        /// Name of the failing OpenCL call.
        call: &'static str,
        /// Numeric OpenCL status code.
        status: i32,
    },
}

impl BenchError {
    /// Wrap a failed OpenCL call, keeping the call name for context.
    pub fn api(call: &'static str, err: ClError) -> Self {
        BenchError::Api { call, status: err.0 }
    }

    /// Wrap a failed kernel resolution, keeping the entry-point name.
    pub fn missing_kernel(name: &'static str, err: ClError) -> Self {
        BenchError::MissingKernel {
            name,
            status: err.0,
        }
    }
}
