use color_eyre::eyre::OptionExt;
use futures::{FutureExt, StreamExt};
use ratatui::crossterm::event::Event as CrosstermEvent;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::{
    api::{ControllerConfig, NextRunTable, QueueSnapshot, StatusSnapshot, ValveAction, ValveDetail},
    error::Result,
};

/// The frequency at which tick events are emitted.
const TICK_FPS: f64 = 4.0;

/// Representation of all possible events.
#[derive(Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    Tick,
    /// Crossterm events.
    Crossterm(CrosstermEvent),
    /// Application events.
    App(AppEvent),
}

/// Which schedule mutation a round-trip performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleChange {
    Created,
    Updated(usize),
    Deleted(usize),
}

impl ScheduleChange {
    pub fn success_message(&self) -> &'static str {
        match self {
            ScheduleChange::Created => "Schedule added",
            ScheduleChange::Updated(_) => "Schedule updated",
            ScheduleChange::Deleted(_) => "Schedule deleted",
        }
    }
}

/// Application events. Background tasks report back through these and never
/// touch app state themselves.
#[derive(Debug)]
pub enum AppEvent {
    Quit,

    /// Fast cycle: status and queue, tagged with the cycle sequence.
    StatusFetched {
        seq: u64,
        result: Result<(StatusSnapshot, QueueSnapshot)>,
    },
    /// Slow cycle: the next-run lookahead table.
    NextRunsFetched {
        seq: u64,
        result: Result<NextRunTable>,
    },

    ActionFinished {
        valve: String,
        action: ValveAction,
        result: Result<()>,
    },
    DetailLoaded {
        valve: String,
        result: Result<ValveDetail>,
    },
    ScheduleChanged {
        valve: String,
        change: ScheduleChange,
        result: Result<()>,
    },
    ConfigLoaded(Result<ControllerConfig>),
    SimulationFinished(Result<String>),
}

/// Terminal event handler.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns a task reading terminal events.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone());
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// Handler with no terminal reader attached; only app events arrive.
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Receives an event from the sender.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("Failed to receive event")
    }

    /// Queue an app event to be sent to the event receiver.
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }

    /// Sender handed to background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// A task that reads crossterm events and emits tick events on a regular schedule.
struct EventTask {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
}

impl EventTask {
    /// Constructs a new instance of [`EventTask`].
    fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    /// Runs the event loop.
    async fn run(self) -> color_eyre::Result<()> {
        let tick_rate = Duration::from_secs_f64(1.0 / TICK_FPS);
        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(tick_rate);
        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
              _ = self.sender.closed() => {
                break;
              }
              _ = tick_delay => {
                self.send(Event::Tick);
              }
              Some(Ok(evt)) = crossterm_event => {
                self.send(Event::Crossterm(evt));
              }
            };
        }
        Ok(())
    }

    /// Sends an event to the receiver.
    fn send(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}
