//! Unified event stream consumed by the application loop

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::core::scheduler::TickReading;

/// All possible events in the system
#[derive(Debug, Clone)]
pub enum Event {
    // Input events
    Key(KeyEvent),
    Resize(u16, u16),

    /// Animation frame for the progress indicators
    Frame,

    // Metric refreshes
    Tick(TickReading),
    CpuSample(f64),
}

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> (Self, mpsc::UnboundedSender<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }

    /// Start the terminal input and animation frame tasks
    pub fn spawn_sources(event_tx: mpsc::UnboundedSender<Event>, frame_interval: Duration) {
        tokio::spawn(Self::terminal_events(event_tx.clone()));
        tokio::spawn(Self::frame_events(event_tx, frame_interval));
    }

    async fn terminal_events(tx: mpsc::UnboundedSender<Event>) {
        use crossterm::event;
        use futures::StreamExt;

        let mut reader = event::EventStream::new();
        while let Some(event_result) = reader.next().await {
            let event = match event_result {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "terminal event stream failed");
                    break;
                }
            };
            let Some(event) = Self::translate(event) else {
                continue;
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    }

    /// Keys and resizes only; mouse, focus and paste events are dropped.
    fn translate(event: crossterm::event::Event) -> Option<Event> {
        use crossterm::event::Event as CrosstermEvent;

        match event {
            CrosstermEvent::Key(key) => Some(Event::Key(key)),
            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            _ => None,
        }
    }

    async fn frame_events(tx: mpsc::UnboundedSender<Event>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tx.send(Event::Frame).is_err() {
                break;
            }
        }
    }

    /// `None` once every producer has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key binding helper
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.kind == KeyEventKind::Press
            && event.code == self.key
            && event.modifiers == self.modifiers
    }
}

/// Standard key bindings
pub struct KeyBindings;

impl KeyBindings {
    pub fn quit() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('q'))
    }

    pub fn quit_alt() -> KeyBinding {
        KeyBinding::ctrl(KeyCode::Char('c'))
    }

    pub fn is_quit(event: &KeyEvent) -> bool {
        Self::quit().matches(event) || Self::quit_alt().matches(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn quit_bindings() {
        assert!(KeyBindings::is_quit(&KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
        assert!(KeyBindings::is_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!KeyBindings::is_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn key_release_does_not_quit() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(!KeyBindings::is_quit(&release));
    }

    #[test]
    fn mouse_events_are_dropped() {
        use crossterm::event::{Event as CrosstermEvent, MouseEvent, MouseEventKind};

        let mouse = CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert!(EventHandler::translate(mouse).is_none());
        assert!(EventHandler::translate(CrosstermEvent::FocusGained).is_none());

        assert!(matches!(
            EventHandler::translate(CrosstermEvent::Resize(90, 30)),
            Some(Event::Resize(90, 30))
        ));
        assert!(matches!(
            EventHandler::translate(CrosstermEvent::Key(KeyEvent::new(
                KeyCode::Char('q'),
                KeyModifiers::NONE
            ))),
            Some(Event::Key(_))
        ));
    }

    #[tokio::test]
    async fn sender_feeds_the_handler() {
        let (mut handler, tx) = EventHandler::new();
        tx.send(Event::CpuSample(12.5)).expect("send");

        match handler.next().await {
            Some(Event::CpuSample(p)) => assert_eq!(p, 12.5),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
