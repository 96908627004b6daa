// ## src/telemetry/snapshot.rs

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::telemetry::counters::PoolStats;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Summary of one sweep or session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub items: u64,
    pub items_failed: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    /// Combine pool counters with the consumer-side timer.
    ///
    /// Worker read/codec time is folded into the `Read` and `Encrypt`/`Decrypt`
    /// stages; `codec_stage` picks which of the two.
    pub fn from(pool: &PoolStats, timer: &TelemetryTimer, codec_stage: Stage) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            pool.bytes_produced as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let mut stage_times = timer.stage_times.clone();
        stage_times.add(Stage::Read, pool.read_time);
        stage_times.add(codec_stage, pool.codec_time);

        Self {
            items: pool.jobs_completed,
            items_failed: pool.jobs_failed,
            bytes_in: pool.bytes_read,
            bytes_out: pool.bytes_produced,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times,
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn items_ok(&self) -> u64 {
        self.items.saturating_sub(self.items_failed)
    }
}
