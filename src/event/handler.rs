use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

impl Event {
    /// Map a raw terminal event. Key releases and mouse input are dropped.
    fn from_terminal(raw: event::Event) -> Option<Self> {
        match raw {
            event::Event::Key(key) if key.kind != KeyEventKind::Release => Some(Event::Key(key)),
            event::Event::Resize(_, _) => Some(Event::Resize),
            _ => None,
        }
    }
}

/// Reads terminal input on a dedicated thread and forwards it over a channel.
/// Emits `Tick` whenever `tick_rate` passes without input.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        std::thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(raw) => Event::from_terminal(raw),
                        Err(e) => {
                            debug!("Terminal read failed: {e}");
                            None
                        }
                    }
                } else {
                    Some(Event::Tick)
                };

                if let Some(ev) = next {
                    if event_tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
