//! Event sinks
//!
//! The simulation returns its events; the scheduler hands each one to an
//! `EventSink`. Audio and HUD collaborators implement this trait.

use crate::sim::GameEvent;

/// Consumer of simulation events
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: &GameEvent) {
        (**self).on_event(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_event(&mut self, event: &GameEvent) {
        (**self).on_event(event);
    }
}

/// Logs every event through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameOver | GameEvent::LevelUp => log::info!("{:?}", event),
            GameEvent::Score { points } => log::debug!("Enemy destroyed (+{})", points),
            GameEvent::EnemyStep { alt } => log::debug!("Formation step (alt={})", alt),
            GameEvent::Shoot | GameEvent::EnemyFire => log::trace!("{:?}", event),
        }
    }
}

/// Records events in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: &GameEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(*event);
    }
}
