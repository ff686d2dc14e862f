//! Workload identities and per-workload timing samples.

use std::fmt;
use std::time::Duration;

use crate::config::REPS;

/// The three fixed access patterns, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    /// Write-only sweep over the device buffer.
    Write,
    /// Read-only sweep over the device buffer.
    Read,
    /// Copy between the two halves of the device buffer.
    Copy,
}

impl Workload {
    /// Every workload, in the order it runs and reports.
    pub const ALL: [Workload; 3] = [Workload::Write, Workload::Read, Workload::Copy];

    /// Entry-point name inside the device program.
    pub fn kernel_name(self) -> &'static str {
        match self {
            Workload::Write => "test0",
            Workload::Read => "test1",
            Workload::Copy => "test2",
        }
    }

    /// Position in the fixed execution order.
    pub fn index(self) -> usize {
        match self {
            Workload::Write => 0,
            Workload::Read => 1,
            Workload::Copy => 2,
        }
    }

    /// Name used in reports and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Workload::Write => "write",
            Workload::Read => "read",
            Workload::Copy => "copy",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wall-clock timing of one fully drained workload.
///
/// The duration runs from just before the launch call to the return of the
/// queue-drain barrier, so it bounds device execution rather than enqueue
/// latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadTiming {
    /// Which workload this sample measures.
    pub workload: Workload,
    /// Host-monotonic time from launch to confirmed queue drain.
    pub elapsed: Duration,
}

impl WorkloadTiming {
    /// Elapsed microseconds, clamped to 1 so the throughput division is
    /// always defined.
    pub fn elapsed_us(&self) -> u64 {
        (self.elapsed.as_micros() as u64).max(1)
    }

    /// Elapsed milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_us() as f64 / 1_000.0
    }

    /// Gigabytes moved by the workload.
    pub fn gigabytes(&self) -> u64 {
        REPS
    }

    /// Achieved bandwidth in gigabytes per second.
    pub fn throughput_gbps(&self) -> f64 {
        self.gigabytes() as f64 / (self.elapsed_us() as f64 / 1_000_000.0)
    }
}

impl fmt::Display for WorkloadTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} GB in {:.1} ms ({:.1} GB/s)",
            self.workload,
            self.gigabytes(),
            self.elapsed_ms(),
            self.throughput_gbps()
        )
    }
}
