//! Tick driver background task

use std::sync::Arc;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome};

/// Owner of the single tick task.
///
/// Every start bumps the run id, so a tick from a task that was stopped or
/// replaced can be told apart from the current one.
#[derive(Debug, Default)]
pub struct TickDriver {
    handle: Option<JoinHandle<()>>,
    run_id: u64,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new tick task, replacing any existing one. Returns its run id.
    pub fn start(&mut self, state: Arc<AppState>) -> u64 {
        self.stop();
        self.run_id += 1;
        let run_id = self.run_id;
        self.handle = Some(tokio::spawn(tick_task(state, run_id)));
        debug!("Tick task {} spawned", run_id);
        run_id
    }

    /// Cancel the active tick task. Returns false if none was active.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                debug!("Tick task {} cancelled", self.run_id);
                true
            }
            None => false,
        }
    }

    /// Mark run `run_id` as ended from within its own task
    pub fn finish(&mut self, run_id: u64) {
        if self.run_id == run_id {
            self.handle = None;
        }
    }

    pub fn is_current(&self, run_id: u64) -> bool {
        self.handle.is_some() && self.run_id == run_id
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background task that applies one tick per interval until the countdown
/// expires or the run is superseded
pub async fn tick_task(state: Arc<AppState>, run_id: u64) {
    let period = state.tick_interval;
    // The first tick lands one full period after start
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        match state.apply_tick(run_id) {
            Ok(TickOutcome::Ticked) => {}
            Ok(TickOutcome::Expired) => {
                info!("Countdown reached 00:00, tick task {} finished", run_id);
                break;
            }
            Ok(TickOutcome::Idle) => {
                debug!("Tick task {} no longer current, exiting", run_id);
                break;
            }
            Err(e) => {
                error!("Failed to apply tick: {}", e);
                state.abandon_run(run_id);
                break;
            }
        }
    }
}
