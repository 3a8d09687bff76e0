use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time::MissedTickBehavior};

use crate::{
    api::ControllerApi,
    event::{AppEvent, Event},
    log_debug, log_info,
};

use super::{Cycle, PollingSettings};

/// Sequence counter and in-flight count of one cycle. Shared between the
/// interval task and on-demand requests.
#[derive(Debug, Default)]
struct CycleState {
    seq: AtomicU64,
    in_flight: AtomicUsize,
}

impl CycleState {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Owns the two polling tasks. Results travel back to the app loop as
/// [`AppEvent`]s tagged with their cycle's sequence number.
#[derive(Debug)]
pub struct PollingSession {
    api: Arc<dyn ControllerApi>,
    sender: mpsc::UnboundedSender<Event>,
    settings: PollingSettings,
    fast: Arc<CycleState>,
    slow: Arc<CycleState>,
    /// Cleared on stop so late results from aborted sessions are dropped.
    active: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl PollingSession {
    pub fn new(
        api: Arc<dyn ControllerApi>,
        sender: mpsc::UnboundedSender<Event>,
        settings: PollingSettings,
    ) -> Self {
        Self {
            api,
            sender,
            settings,
            fast: Arc::new(CycleState::default()),
            slow: Arc::new(CycleState::default()),
            active: Arc::new(AtomicBool::new(false)),
            tasks: Vec::new(),
        }
    }

    /// Spawn both interval tasks. Each fires immediately, then on its period.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.active = Arc::new(AtomicBool::new(true));
        log_info!(
            "Polling started (fast {:?}, slow {:?}, single flight {})",
            self.settings.fast_interval,
            self.settings.slow_interval,
            self.settings.single_flight
        );
        self.tasks.push(self.spawn_cycle(Cycle::Fast, self.settings.fast_interval));
        self.tasks.push(self.spawn_cycle(Cycle::Slow, self.settings.slow_interval));
    }

    /// Abort both interval tasks. Requests already in flight finish but their
    /// results are not delivered.
    pub fn stop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.active.store(false, Ordering::SeqCst);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        log_info!("Polling stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Out-of-band status refresh, sequenced with the fast cycle.
    pub fn request_status(&self) -> u64 {
        self.spawn_request(Cycle::Fast)
    }

    /// Out-of-band next-run refresh, sequenced with the slow cycle.
    pub fn request_next_runs(&self) -> u64 {
        self.spawn_request(Cycle::Slow)
    }

    fn state(&self, cycle: Cycle) -> &Arc<CycleState> {
        match cycle {
            Cycle::Fast => &self.fast,
            Cycle::Slow => &self.slow,
        }
    }

    fn spawn_cycle(&self, cycle: Cycle, period: Duration) -> JoinHandle<()> {
        let api = self.api.clone();
        let sender = self.sender.clone();
        let state = self.state(cycle).clone();
        let active = self.active.clone();
        let single_flight = self.settings.single_flight;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.is_closed() {
                    break;
                }
                if single_flight && state.in_flight.load(Ordering::SeqCst) > 0 {
                    log_debug!("Skipping {} tick, previous request still in flight", cycle.as_str());
                    continue;
                }
                request(cycle, api.clone(), sender.clone(), state.clone(), active.clone());
            }
        })
    }

    fn spawn_request(&self, cycle: Cycle) -> u64 {
        request(
            cycle,
            self.api.clone(),
            self.sender.clone(),
            self.state(cycle).clone(),
            self.active.clone(),
        )
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request(
    cycle: Cycle,
    api: Arc<dyn ControllerApi>,
    sender: mpsc::UnboundedSender<Event>,
    state: Arc<CycleState>,
    active: Arc<AtomicBool>,
) -> u64 {
    let seq = state.next_seq();
    state.in_flight.fetch_add(1, Ordering::SeqCst);

    tokio::spawn(async move {
        let event = match cycle {
            Cycle::Fast => {
                let (status, queue) = tokio::join!(api.status(), api.queue());
                let result = status.and_then(|status| queue.map(|queue| (status, queue)));
                AppEvent::StatusFetched { seq, result }
            }
            Cycle::Slow => AppEvent::NextRunsFetched {
                seq,
                result: api.next_runs().await,
            },
        };
        state.in_flight.fetch_sub(1, Ordering::SeqCst);

        if active.load(Ordering::SeqCst) {
            let _ = sender.send(Event::App(event));
        }
    });

    seq
}
