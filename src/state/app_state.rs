//! Main application state management

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{Clock, TickOutcome, Toggle};
use crate::{
    presentation::ClockView,
    services::AlertPlayer,
    tasks::TickDriver,
};

/// Main application state that owns the clock, its tick task and the alert.
///
/// Lock order is `clock` before `driver`.
#[derive(Debug)]
pub struct AppState {
    /// The timer state machine
    pub clock: Arc<Mutex<Clock>>,
    /// Handle of the running tick task, if any
    driver: Mutex<TickDriver>,
    /// Time between two ticks
    pub tick_interval: Duration,
    alert: Arc<dyn AlertPlayer>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for clock view updates
    pub clock_update_tx: watch::Sender<ClockView>,
    /// Keep the receiver alive to prevent channel closure
    pub _clock_update_rx: watch::Receiver<ClockView>,
}

impl AppState {
    /// Create a new AppState with an idle default clock
    pub fn new(
        port: u16,
        host: String,
        tick_interval: Duration,
        alert: Arc<dyn AlertPlayer>,
    ) -> Self {
        let clock = Clock::new();
        let (clock_update_tx, clock_update_rx) = watch::channel(ClockView::from(&clock));

        Self {
            clock: Arc::new(Mutex::new(clock)),
            driver: Mutex::new(TickDriver::new()),
            tick_interval,
            alert,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            clock_update_tx,
            _clock_update_rx: clock_update_rx,
        }
    }

    /// Apply a length change and notify watchers.
    ///
    /// Returns whether the clock changed along with the resulting view.
    pub fn update_clock<F>(&self, action: &str, updater: F) -> Result<(bool, ClockView), String>
    where
        F: FnOnce(&mut Clock) -> bool,
    {
        let mut clock = self.clock.lock()
            .map_err(|e| format!("Failed to lock clock: {}", e))?;

        let changed = updater(&mut *clock);
        let view = ClockView::from(&*clock);
        drop(clock); // Release the lock early

        if changed {
            info!("{}: break={} session={}", action, view.break_length, view.session_length);
        } else {
            debug!("{} ignored", action);
        }

        self.record_action(action);
        self.publish(view.clone());
        Ok((changed, view))
    }

    pub fn increment_break(&self) -> Result<(bool, ClockView), String> {
        self.update_clock("break-increment", Clock::increment_break)
    }

    pub fn decrement_break(&self) -> Result<(bool, ClockView), String> {
        self.update_clock("break-decrement", Clock::decrement_break)
    }

    pub fn increment_session(&self) -> Result<(bool, ClockView), String> {
        self.update_clock("session-increment", Clock::increment_session)
    }

    pub fn decrement_session(&self) -> Result<(bool, ClockView), String> {
        self.update_clock("session-decrement", Clock::decrement_session)
    }

    /// The start/pause toggle: starts, pauses, or moves on after an alert
    pub fn start_stop(self: &Arc<Self>) -> Result<(Toggle, ClockView), String> {
        let mut clock = self.clock.lock()
            .map_err(|e| format!("Failed to lock clock: {}", e))?;

        let toggle = clock.toggle();
        let view = ClockView::from(&*clock);

        {
            let mut driver = self.driver.lock()
                .map_err(|e| format!("Failed to lock tick driver: {}", e))?;
            match toggle {
                Toggle::Paused => {
                    driver.stop();
                }
                Toggle::Started | Toggle::Advanced(_) => {
                    driver.start(Arc::clone(self));
                }
            }
        }
        drop(clock);

        match toggle {
            Toggle::Started => info!("{} started at {}", view.label, view.time_left),
            Toggle::Paused => info!("{} paused at {}", view.label, view.time_left),
            Toggle::Advanced(phase) => info!("{} started after alert at {}", phase, view.time_left),
        }

        self.record_action("start-stop");
        self.publish(view.clone());
        Ok((toggle, view))
    }

    /// Stop everything and return to the default idle session
    pub fn reset(&self) -> Result<ClockView, String> {
        let mut clock = self.clock.lock()
            .map_err(|e| format!("Failed to lock clock: {}", e))?;

        clock.reset();
        let view = ClockView::from(&*clock);

        {
            let mut driver = self.driver.lock()
                .map_err(|e| format!("Failed to lock tick driver: {}", e))?;
            driver.stop();
        }

        if let Err(e) = self.alert.stop() {
            warn!("Failed to stop alert sound: {}", e);
        }
        drop(clock);

        info!("Clock reset to {} {}", view.label, view.time_left);
        self.record_action("reset");
        self.publish(view.clone());
        Ok(view)
    }

    /// Apply one tick on behalf of the tick task identified by `run_id`.
    ///
    /// Ticks from a task that has since been stopped or replaced are ignored
    /// and reported as `TickOutcome::Idle`.
    pub fn apply_tick(&self, run_id: u64) -> Result<TickOutcome, String> {
        let mut clock = self.clock.lock()
            .map_err(|e| format!("Failed to lock clock: {}", e))?;
        let mut driver = self.driver.lock()
            .map_err(|e| format!("Failed to lock tick driver: {}", e))?;

        if !driver.is_current(run_id) {
            debug!("Discarding tick from stale run {}", run_id);
            return Ok(TickOutcome::Idle);
        }

        let outcome = clock.tick();
        if outcome != TickOutcome::Ticked {
            driver.finish(run_id);
        }
        drop(driver);

        let view = ClockView::from(&*clock);
        drop(clock);

        // Played outside the locks so a slow player never stalls the handlers
        if outcome == TickOutcome::Expired {
            info!("{} finished, sounding alert", view.label);
            if let Err(e) = self.alert.play() {
                error!("Failed to play alert sound: {}", e);
            }
        }

        if outcome != TickOutcome::Idle {
            debug!("Tick: {} {}", view.label, view.time_left);
            self.publish(view);
        }
        Ok(outcome)
    }

    /// Stop run `run_id` after its tick task gave up, so the clock no longer
    /// reports itself as running. Recovers poisoned locks to do so.
    pub fn abandon_run(&self, run_id: u64) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut driver = self.driver.lock().unwrap_or_else(PoisonError::into_inner);

        if driver.is_current(run_id) {
            driver.finish(run_id);
            clock.pause();
            warn!("Tick task {} abandoned, clock paused", run_id);
        }
        drop(driver);

        let view = ClockView::from(&*clock);
        drop(clock);
        self.publish(view);
    }

    /// Cancel the tick task and silence the alert before the process exits
    pub fn shutdown(&self) {
        match self.driver.lock() {
            Ok(mut driver) => {
                if driver.stop() {
                    info!("Tick task cancelled");
                }
            }
            Err(e) => error!("Failed to lock tick driver: {}", e),
        }

        if let Err(e) = self.alert.stop() {
            warn!("Failed to stop alert sound: {}", e);
        }
    }

    /// Get the current clock view
    pub fn get_clock_view(&self) -> Result<ClockView, String> {
        self.clock.lock()
            .map(|clock| ClockView::from(&*clock))
            .map_err(|e| format!("Failed to lock clock: {}", e))
    }

    /// Whether a tick task is currently active
    pub fn is_ticking(&self) -> bool {
        self.driver.lock()
            .map(|driver| driver.is_active())
            .unwrap_or(false)
    }

    /// Subscribe to clock view updates
    pub fn subscribe(&self) -> watch::Receiver<ClockView> {
        self.clock_update_tx.subscribe()
    }

    fn publish(&self, view: ClockView) {
        if let Err(e) = self.clock_update_tx.send(view) {
            warn!("Failed to send clock update: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::sleep;

    use crate::state::Phase;

    #[derive(Debug, Default)]
    struct CountingAlert {
        plays: AtomicUsize,
        stops: AtomicUsize,
        /// Clock to probe for contention while the sound starts
        watched_clock: Mutex<Option<Arc<Mutex<Clock>>>>,
        clock_free_on_play: AtomicBool,
    }

    impl AlertPlayer for CountingAlert {
        fn play(&self) -> Result<(), String> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            if let Some(clock) = self.watched_clock.lock().unwrap().as_ref() {
                let free = clock.try_lock().is_ok();
                self.clock_free_on_play.store(free, Ordering::SeqCst);
            }
            Ok(())
        }

        fn stop(&self) -> Result<(), String> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_state() -> (Arc<AppState>, Arc<CountingAlert>) {
        let alert = Arc::new(CountingAlert::default());
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            Duration::from_secs(1),
            Arc::clone(&alert) as Arc<dyn AlertPlayer>,
        );
        (Arc::new(state), alert)
    }

    fn ticks(n: u64) -> Duration {
        Duration::from_secs(n) + Duration::from_millis(500)
    }

    #[tokio::test(start_paused = true)]
    async fn default_cycle_alerts_once_then_starts_break() {
        let (state, alert) = test_state();

        let (toggle, _) = state.start_stop().unwrap();
        assert_eq!(toggle, Toggle::Started);
        sleep(ticks(1500)).await;

        let view = state.get_clock_view().unwrap();
        assert!(view.alert);
        assert!(!view.running);
        assert_eq!(view.time_left, "00:00");
        assert_eq!(alert.plays.load(Ordering::SeqCst), 1);
        assert!(!state.is_ticking());

        sleep(ticks(30)).await;
        assert_eq!(state.get_clock_view().unwrap(), view);
        assert_eq!(alert.plays.load(Ordering::SeqCst), 1);

        let (toggle, view) = state.start_stop().unwrap();
        assert_eq!(toggle, Toggle::Advanced(Phase::Break));
        assert_eq!(view.label, "Break");
        assert_eq!(view.time_left, "05:00");
        assert!(view.running);
        assert!(state.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_preserves_remaining_time() {
        let (state, _alert) = test_state();

        state.start_stop().unwrap();
        sleep(ticks(75)).await;
        let (toggle, paused) = state.start_stop().unwrap();
        assert_eq!(toggle, Toggle::Paused);
        assert_eq!(paused.time_left, "23:45");
        assert!(!state.is_ticking());

        sleep(ticks(100)).await;
        assert_eq!(state.get_clock_view().unwrap().time_left, "23:45");

        let (_, resumed) = state.start_stop().unwrap();
        assert_eq!(resumed.time_left, "23:45");
        sleep(ticks(1)).await;
        assert_eq!(state.get_clock_view().unwrap().time_left, "23:44");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_ticking_and_alert() {
        let (state, alert) = test_state();

        state.increment_break().unwrap();
        state.decrement_session().unwrap();
        state.start_stop().unwrap();
        sleep(ticks(24 * 60)).await;
        assert!(state.get_clock_view().unwrap().alert);

        let view = state.reset().unwrap();
        assert_eq!(view, ClockView::from(&Clock::new()));
        assert_eq!(alert.stops.load(Ordering::SeqCst), 1);
        assert!(!state.is_ticking());

        state.start_stop().unwrap();
        state.reset().unwrap();
        sleep(ticks(5)).await;
        assert_eq!(state.get_clock_view().unwrap().time_left, "25:00");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_run_ticks_are_discarded() {
        let (state, _alert) = test_state();

        state.start_stop().unwrap();
        state.start_stop().unwrap();
        state.start_stop().unwrap();

        assert_eq!(state.apply_tick(1).unwrap(), TickOutcome::Idle);
        assert_eq!(state.get_clock_view().unwrap().time_left, "25:00");
        assert_eq!(state.apply_tick(2).unwrap(), TickOutcome::Ticked);
        assert_eq!(state.get_clock_view().unwrap().time_left, "24:59");
    }

    #[tokio::test(start_paused = true)]
    async fn lengths_ignored_while_running() {
        let (state, _alert) = test_state();

        state.start_stop().unwrap();
        let (changed, view) = state.increment_session().unwrap();
        assert!(!changed);
        assert_eq!(view.session_length, 25);

        state.start_stop().unwrap();
        let (changed, view) = state.increment_session().unwrap();
        assert!(changed);
        assert_eq!(view.time_left, "26:00");
    }

    #[tokio::test(start_paused = true)]
    async fn watchers_see_every_tick() {
        let (state, _alert) = test_state();
        let mut rx = state.subscribe();

        state.start_stop().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().running);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().time_left, "24:59");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_tick_task() {
        let (state, alert) = test_state();

        state.start_stop().unwrap();
        state.shutdown();
        state.shutdown();
        assert!(!state.is_ticking());
        assert_eq!(alert.stops.load(Ordering::SeqCst), 2);

        sleep(ticks(3)).await;
        assert_eq!(state.get_clock_view().unwrap().time_left, "25:00");
    }

    #[tokio::test(start_paused = true)]
    async fn alert_plays_without_holding_the_clock() {
        let (state, alert) = test_state();
        *alert.watched_clock.lock().unwrap() = Some(Arc::clone(&state.clock));

        for _ in 0..24 {
            state.decrement_session().unwrap();
        }
        state.start_stop().unwrap();
        sleep(ticks(60)).await;

        assert_eq!(alert.plays.load(Ordering::SeqCst), 1);
        assert!(alert.clock_free_on_play.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn poisoned_clock_pauses_instead_of_reporting_running() {
        let (state, _alert) = test_state();

        state.start_stop().unwrap();
        let clock = Arc::clone(&state.clock);
        std::thread::spawn(move || {
            let _guard = clock.lock().unwrap();
            panic!("clock holder crashed");
        })
        .join()
        .unwrap_err();

        sleep(ticks(2)).await;
        assert!(!state.is_ticking());
        let clock = state.clock.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(!clock.countdown().is_running());
        assert_eq!(clock.countdown().minutes(), 25);
    }
}
