//! Per-worker debug counters and their aggregation.
//!
//! The counters are a diagnostic channel only: they are read back and summed
//! when the operator asks for them (verbosity >= 2) and never influence
//! workload execution or timing.

use opencl3::command_queue::CommandQueue;
use opencl3::memory::Buffer;
use opencl3::types::CL_BLOCKING;

use crate::error::{BenchError, BenchResult};

/// One worker's counter pair, laid out exactly as the device program
/// writes it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugRecord {
    /// Loads dropped by the worker after range clamping.
    pub dropped_coll: u32,
    /// Stores dropped by the worker after range clamping.
    pub dropped_stor: u32,
}

/// Counter sums across every worker record in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugTotals {
    /// Total dropped loads.
    pub dropped_collisions: u64,
    /// Total dropped stores.
    pub dropped_storage: u64,
}

impl DebugTotals {
    /// Sum the counters across records. Totals are 64-bit so even
    /// u32-saturated workers cannot overflow them.
    pub fn accumulate(records: &[DebugRecord]) -> Self {
        let mut totals = DebugTotals::default();
        for record in records {
            totals.dropped_collisions += u64::from(record.dropped_coll);
            totals.dropped_storage += u64::from(record.dropped_stor);
        }
        totals
    }
}

/// Read the whole debug buffer back in one blocking transfer and sum it.
pub fn read_totals(
    queue: &CommandQueue,
    buffer: &Buffer<DebugRecord>,
    slots: usize,
) -> BenchResult<DebugTotals> {
    let mut records = vec![DebugRecord::default(); slots];
    let _read = unsafe { queue.enqueue_read_buffer(buffer, CL_BLOCKING, 0, &mut records, &[]) }
        .map_err(|e| BenchError::api("clEnqueueReadBuffer", e))?;
    Ok(DebugTotals::accumulate(&records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layout_matches_device_struct() {
        assert_eq!(std::mem::size_of::<DebugRecord>(), 8);
        assert_eq!(std::mem::align_of::<DebugRecord>(), 4);
    }

    #[test]
    fn test_accumulate_sums_both_fields() {
        let records = [
            DebugRecord {
                dropped_coll: 1,
                dropped_stor: 10,
            },
            DebugRecord {
                dropped_coll: 2,
                dropped_stor: 20,
            },
            DebugRecord::default(),
        ];
        let totals = DebugTotals::accumulate(&records);
        assert_eq!(totals.dropped_collisions, 3);
        assert_eq!(totals.dropped_storage, 30);
    }

    #[test]
    fn test_accumulate_empty_is_zero() {
        assert_eq!(DebugTotals::accumulate(&[]), DebugTotals::default());
    }

    #[test]
    fn test_accumulate_does_not_overflow_u32() {
        let records = vec![
            DebugRecord {
                dropped_coll: u32::MAX,
                dropped_stor: u32::MAX,
            };
            3
        ];
        let totals = DebugTotals::accumulate(&records);
        assert_eq!(totals.dropped_collisions, u64::from(u32::MAX) * 3);
        assert_eq!(totals.dropped_storage, u64::from(u32::MAX) * 3);
    }
}
