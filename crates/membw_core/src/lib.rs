//! # membw_core
//!
//! Device selection, program compilation, and timed dispatch for the membw
//! OpenCL memory benchmark.
//!
//! One run walks a fixed pipeline: enumerate platforms and devices, resolve
//! the operator's global device ordinal, build the embedded kernel program,
//! then launch the write/read/copy workloads against a single large device
//! buffer, timing each from launch to confirmed queue drain. Every stage is
//! a hard prerequisite for the next; the first failure aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use membw_core::{run_bench, BenchConfig};
//!
//! let config = BenchConfig::new(0, 0);
//! for timing in run_bench(&config)? {
//!     println!("{}", timing);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `debug-counters`: compile per-worker dropped-access counters into the
//!   device program and size the debug buffer at one record per worker
//!   instead of a single placeholder.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod program;
pub mod workload;

// Re-export commonly used types
pub use catalog::{DeviceCatalog, DeviceEntry, SelectedDevice};
pub use config::BenchConfig;
pub use debug::{DebugRecord, DebugTotals};
pub use engine::{run_bench, run_workloads, ExecutionContext};
pub use error::{BenchError, BenchResult};
pub use program::{build_program, KernelSet};
pub use workload::{Workload, WorkloadTiming};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::catalog::{DeviceCatalog, DeviceEntry, SelectedDevice};
    pub use crate::config::BenchConfig;
    pub use crate::engine::run_bench;
    pub use crate::error::{BenchError, BenchResult};
    pub use crate::workload::{Workload, WorkloadTiming};
}
