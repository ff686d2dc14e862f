//! Execution context, device buffers, and the timed workload loop.

use std::ptr;
use std::time::Instant;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::memory::{Buffer, CL_MEM_READ_WRITE};
use opencl3::types::{cl_uchar, CL_BLOCKING};
use tracing::{debug, info};

use crate::catalog::{DeviceCatalog, SelectedDevice};
use crate::config::{BenchConfig, DEBUG_SLOTS, GLOBAL_WORK_SIZE, LOCAL_WORK_SIZE, MEMSIZE};
use crate::debug::{self, DebugRecord};
use crate::error::{BenchError, BenchResult};
use crate::program::{build_program, KernelSet};
use crate::workload::{Workload, WorkloadTiming};

/// Owns the OpenCL context and in-order command queue for one device.
///
/// Both handles are released by `Drop`, on success and on every error path.
pub struct ExecutionContext {
    context: Context,
    queue: CommandQueue,
}

impl ExecutionContext {
    /// Create the context and queue for the selected device.
    pub fn new(selected: &SelectedDevice) -> BenchResult<Self> {
        let device = selected.device();
        let context =
            Context::from_device(&device).map_err(|e| BenchError::api("clCreateContext", e))?;

        // In-order queue, no profiling; timing is host-side around the drain.
        #[allow(deprecated)] // OpenCL 1.2 queue API
        let queue = CommandQueue::create_default(&context, 0)
            .map_err(|e| BenchError::api("clCreateCommandQueue", e))?;

        Ok(ExecutionContext { context, queue })
    }

    /// The owned context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The owned in-order queue.
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }
}

/// Drive the whole pipeline for one run: enumerate, select, build, execute.
pub fn run_bench(config: &BenchConfig) -> BenchResult<Vec<WorkloadTiming>> {
    let catalog = DeviceCatalog::enumerate()?;
    let selected = catalog.select(config.device_ordinal)?;
    info!(
        "using device ID {}: {} (platform \"{}\")",
        selected.ordinal(),
        selected.device_name(),
        selected.platform_name()
    );

    let exec = ExecutionContext::new(&selected)?;
    let program = build_program(exec.context())?;
    let kernels = KernelSet::resolve(&program)?;
    run_workloads(&exec, &kernels, config)
}

/// Run every workload in order against one shared device buffer.
///
/// Each launch is bounded by a host timestamp pair taken around the enqueue
/// and the queue-drain barrier; a failure in any workload aborts the loop
/// with no partial result.
pub fn run_workloads(
    exec: &ExecutionContext,
    kernels: &KernelSet,
    config: &BenchConfig,
) -> BenchResult<Vec<WorkloadTiming>> {
    info!(
        "test buffer is {} bytes, debug buffer holds {} record(s)",
        MEMSIZE, DEBUG_SLOTS
    );

    let test_buffer = unsafe {
        Buffer::<cl_uchar>::create(exec.context(), CL_MEM_READ_WRITE, MEMSIZE, ptr::null_mut())
    }
    .map_err(|e| BenchError::api("clCreateBuffer", e))?;

    let mut debug_buffer = unsafe {
        Buffer::<DebugRecord>::create(
            exec.context(),
            CL_MEM_READ_WRITE,
            DEBUG_SLOTS,
            ptr::null_mut(),
        )
    }
    .map_err(|e| BenchError::api("clCreateBuffer", e))?;

    // Counters accumulate across all three workloads; start them at zero.
    let zeroed = vec![DebugRecord::default(); DEBUG_SLOTS];
    let _init = unsafe {
        exec.queue()
            .enqueue_write_buffer(&mut debug_buffer, CL_BLOCKING, 0, &zeroed, &[])
    }
    .map_err(|e| BenchError::api("clEnqueueWriteBuffer", e))?;

    let global_work = [GLOBAL_WORK_SIZE];
    let local_work = [LOCAL_WORK_SIZE];
    let mut timings = Vec::with_capacity(Workload::ALL.len());

    for workload in Workload::ALL {
        let kernel = kernels.get(workload);

        // Argument state does not persist across kernel objects, so every
        // workload binds its own.
        unsafe { kernel.set_arg(0, &test_buffer) }
            .map_err(|e| BenchError::api("clSetKernelArg", e))?;
        #[cfg(feature = "debug-counters")]
        unsafe { kernel.set_arg(1, &debug_buffer) }
            .map_err(|e| BenchError::api("clSetKernelArg", e))?;

        info!("running {} workload", workload);
        let start = Instant::now();

        let _launch = unsafe {
            exec.queue().enqueue_nd_range_kernel(
                kernel.get(),
                1,
                ptr::null(),
                global_work.as_ptr(),
                local_work.as_ptr(),
                &[],
            )
        }
        .map_err(|e| BenchError::api("clEnqueueNDRangeKernel", e))?;

        // Full queue barrier; the end stamp bounds device execution, not
        // enqueue latency.
        exec.queue()
            .finish()
            .map_err(|e| BenchError::api("clFinish", e))?;

        let timing = WorkloadTiming {
            workload,
            elapsed: start.elapsed(),
        };
        info!("{} workload drained in {:.1} ms", workload, timing.elapsed_ms());
        timings.push(timing);
    }

    if config.debug_readback() {
        let totals = debug::read_totals(exec.queue(), &debug_buffer, DEBUG_SLOTS)?;
        debug!(
            "Dropped: {} (coll) {} (stor)",
            totals.dropped_collisions, totals.dropped_storage
        );
    }

    Ok(timings)
}
