use super::*;
use controlroom_protocol::HudAction;
use std::sync::Mutex;

#[derive(Clone, Default)]
struct CollectSink {
    commands: Arc<Mutex<Vec<VisualCommand>>>,
}

impl PatchSink for CollectSink {
    fn apply(&mut self, commands: &[VisualCommand]) {
        self.commands.lock().unwrap().extend_from_slice(commands);
    }
}

struct ChannelPort {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait::async_trait]
impl NotificationPort for ChannelPort {
    async fn close_ui(&self) {
        let _ = self.tx.send("closeUI".to_string());
    }

    async fn dispatch_crew(&self, sector: &str) {
        let _ = self.tx.send(format!("dispatchCrew:{sector}"));
    }
}

fn channel_port() -> (Arc<ChannelPort>, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelPort { tx }), rx)
}

fn host_msg(json: &str) -> HudMessage {
    serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn host_messages_flow_through_to_the_sink() {
    let sink = CollectSink::default();
    let seen = sink.commands.clone();
    let (port, _rx) = channel_port();
    let runtime = HudRuntime::spawn(DisplayState::with_cards(["A"]), sink, port);
    let handle = runtime.handle();

    handle.host_message(host_msg(r#"{"action":"open","sectors":{"A":{"health":15}}}"#));
    handle.host_message(host_msg(r#"{"action":"update","sectors":{"A":60}}"#));
    handle.host_message(host_msg(r#"{"action":"close"}"#));
    runtime.dispose().await;

    let commands = seen.lock().unwrap();
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[0], VisualCommand::Show);
    let VisualCommand::Card(open_patch) = &commands[1] else {
        panic!("expected card patch");
    };
    assert_eq!(open_patch.label, "15");
    let VisualCommand::Card(update_patch) = &commands[2] else {
        panic!("expected card patch");
    };
    assert_eq!(update_patch.label, "60");
    assert_eq!(commands[3], VisualCommand::Hide);
}

#[tokio::test]
async fn close_inputs_issue_exactly_one_callback_each() {
    let (port, mut rx) = channel_port();
    let runtime = HudRuntime::spawn(DisplayState::with_cards(["A"]), CollectSink::default(), port);
    let handle = runtime.handle();

    // Still hidden; the callback fires regardless of visibility.
    handle.input(HudInput::CloseButton);
    assert_eq!(rx.recv().await.unwrap(), "closeUI");

    handle.host_message(HudMessage::new(HudAction::Open, Some(Default::default())));
    handle.input(HudInput::CancelKey);
    assert_eq!(rx.recv().await.unwrap(), "closeUI");

    runtime.dispose().await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn dispatch_input_carries_the_sector_id() {
    let (port, mut rx) = channel_port();
    let runtime = HudRuntime::spawn(DisplayState::with_cards(["A"]), CollectSink::default(), port);

    runtime.handle().input(HudInput::DispatchCrew("downtown".to_string()));
    assert_eq!(rx.recv().await.unwrap(), "dispatchCrew:downtown");
    runtime.dispose().await;
}

#[tokio::test]
async fn dispose_drains_already_queued_events() {
    let sink = CollectSink::default();
    let seen = sink.commands.clone();
    let (port, _rx) = channel_port();
    let runtime = HudRuntime::spawn(DisplayState::with_cards(["A"]), sink, port);
    let handle = runtime.handle();

    for _ in 0..10 {
        handle.host_message(host_msg(r#"{"action":"update","sectors":{"A":50}}"#));
    }
    runtime.dispose().await;
    assert_eq!(seen.lock().unwrap().len(), 10);

    // Sends after dispose are dropped, not errors.
    handle.host_message(host_msg(r#"{"action":"close"}"#));
}

#[test]
fn parse_event_accepts_messages_and_inputs() {
    let HudEvent::Host(msg) = parse_event(r#"{"action":"open","sectors":{}}"#).unwrap() else {
        panic!("expected host message");
    };
    assert_eq!(msg.action, HudAction::Open);

    let HudEvent::Input(input) = parse_event(r#""cancelKey""#).unwrap() else {
        panic!("expected input");
    };
    assert_eq!(input, HudInput::CancelKey);

    let HudEvent::Input(input) = parse_event(r#"{"dispatchCrew":"downtown"}"#).unwrap() else {
        panic!("expected input");
    };
    assert_eq!(input, HudInput::DispatchCrew("downtown".to_string()));

    assert!(parse_event("not json").is_err());
}

#[test]
fn json_line_sink_writes_one_command_per_line() {
    let mut sink = JsonLineSink::new(Vec::new());
    sink.apply(&[VisualCommand::Show, VisualCommand::Hide]);
    let out = String::from_utf8(sink.out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec![r#"{"op":"show"}"#, r#"{"op":"hide"}"#]);
}
