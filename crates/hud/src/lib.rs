use anyhow::Context;
use controlroom_client::NotificationPort;
use controlroom_panel::{DisplayState, HudController};
use controlroom_protocol::{HudMessage, VisualCommand};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[cfg(test)]
mod tests;

/// User-originated actions. `CloseButton` and `CancelKey` both request that
/// the host close the UI; `DispatchCrew` is the programmatic entry point with
/// no visible control wired to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HudInput {
    CloseButton,
    CancelKey,
    DispatchCrew(String),
}

#[derive(Debug, Clone)]
pub enum HudEvent {
    Host(HudMessage),
    Input(HudInput),
}

/// Seam between the core and whatever surface hosts the markup. The runtime
/// pushes every batch of commands through here in arrival order.
pub trait PatchSink: Send {
    fn apply(&mut self, commands: &[VisualCommand]);
}

/// Writes each command as one JSON line. The binary points this at stdout.
pub struct JsonLineSink<W: Write + Send> {
    out: W,
}

impl JsonLineSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> PatchSink for JsonLineSink<W> {
    fn apply(&mut self, commands: &[VisualCommand]) {
        for cmd in commands {
            if let Ok(line) = serde_json::to_string(cmd) {
                let _ = writeln!(self.out, "{line}");
            }
        }
    }
}

/// Holds a weak sender so outstanding handles cannot keep a disposed
/// runtime's queue open.
#[derive(Debug, Clone)]
pub struct HudHandle {
    tx: mpsc::WeakUnboundedSender<HudEvent>,
}

impl HudHandle {
    pub fn send(&self, event: HudEvent) {
        // Dropped silently once the runtime is disposed.
        if let Some(tx) = self.tx.upgrade() {
            let _ = tx.send(event);
        }
    }

    pub fn host_message(&self, msg: HudMessage) {
        self.send(HudEvent::Host(msg));
    }

    pub fn input(&self, input: HudInput) {
        self.send(HudEvent::Input(input));
    }
}

/// Owns the HUD's single event queue. One consumer task drains it, so every
/// message or input runs to completion before the next is processed. Outbound
/// notifications are spawned off and never awaited by later events.
pub struct HudRuntime {
    tx: mpsc::UnboundedSender<HudEvent>,
    task: JoinHandle<()>,
}

impl HudRuntime {
    pub fn spawn(
        state: DisplayState,
        sink: impl PatchSink + 'static,
        port: Arc<dyn NotificationPort>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_loop(rx, HudController::new(state), sink, port));
        Self { tx, task }
    }

    pub fn handle(&self) -> HudHandle {
        HudHandle {
            tx: self.tx.downgrade(),
        }
    }

    /// Detaches all wiring: closes the queue, drains events already sent,
    /// then waits for the consumer task to exit.
    pub async fn dispose(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn run_loop(
    mut rx: mpsc::UnboundedReceiver<HudEvent>,
    mut controller: HudController,
    mut sink: impl PatchSink,
    port: Arc<dyn NotificationPort>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            HudEvent::Host(msg) => {
                let commands = controller.handle(&msg);
                if !commands.is_empty() {
                    sink.apply(&commands);
                }
            }
            HudEvent::Input(input) => {
                let port = port.clone();
                match input {
                    // One outbound call per activation, shown or hidden.
                    HudInput::CloseButton | HudInput::CancelKey => {
                        tokio::spawn(async move { port.close_ui().await });
                    }
                    HudInput::DispatchCrew(sector) => {
                        tokio::spawn(async move { port.dispatch_crew(&sector).await });
                    }
                }
            }
        }
    }
}

/// Parses one harness line: a host message, or a user input directive such as
/// `"closeButton"` or `{"dispatchCrew":"downtown"}`.
pub fn parse_event(line: &str) -> anyhow::Result<HudEvent> {
    if let Ok(msg) = serde_json::from_str::<HudMessage>(line) {
        return Ok(HudEvent::Host(msg));
    }
    serde_json::from_str::<HudInput>(line)
        .map(HudEvent::Input)
        .with_context(|| format!("unrecognized event line: {line}"))
}
