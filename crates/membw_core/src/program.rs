//! Device program compilation and kernel resolution.

use opencl3::context::Context;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use tracing::{debug, info};

use crate::config::{MEMSIZE, REPS, WAVES};
use crate::error::{BenchError, BenchResult};
use crate::workload::Workload;

/// Program text shared by all workloads, embedded at build time.
const KERNEL_SOURCE: &str = include_str!("kernels/membw.cl");

/// Compiler flags passed to the device build. None are used; the tuning
/// constants travel as a source prelude instead.
pub const BUILD_OPTIONS: &str = "";

/// Assemble the full program text: tuning constants first, kernels after.
pub fn kernel_source() -> String {
    let mut source = format!(
        "#define MEMSIZE {}u\n#define WAVES {}u\n#define REPS {}u\n",
        MEMSIZE, WAVES, REPS
    );
    if cfg!(feature = "debug-counters") {
        source.push_str("#define ENABLE_DEBUG 1\n");
    }
    source.push_str(KERNEL_SOURCE);
    source
}

/// Compile the program for the context's device.
///
/// A failed build is terminal; the full compiler diagnostic log is carried
/// in the error so the operator sees what the device compiler saw.
pub fn build_program(context: &Context) -> BenchResult<Program> {
    let source = kernel_source();
    info!("building device program ({} bytes of source)", source.len());
    Program::create_and_build_from_source(context, &source, BUILD_OPTIONS)
        .map_err(|log| BenchError::Build { log })
}

/// The three workload entry points resolved from a built program.
pub struct KernelSet {
    kernels: Vec<Kernel>,
}

impl KernelSet {
    /// Resolve every workload's entry point from the program.
    pub fn resolve(program: &Program) -> BenchResult<Self> {
        let mut kernels = Vec::with_capacity(Workload::ALL.len());
        for workload in Workload::ALL {
            let name = workload.kernel_name();
            let kernel =
                Kernel::create(program, name).map_err(|e| BenchError::missing_kernel(name, e))?;
            debug!("resolved kernel \"{}\"", name);
            kernels.push(kernel);
        }
        Ok(KernelSet { kernels })
    }

    /// Kernel handle for one workload.
    pub fn get(&self, workload: Workload) -> &Kernel {
        &self.kernels[workload.index()]
    }
}
