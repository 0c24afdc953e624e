//! Integration tests for the outbound protocol path: startup handshake,
//! two-phase resource creation, and resource event triggers.
//!
//! These run on the host and drive the full engine against scripted
//! channel replies — no real hardware required.

use crate::mock_hw::{FakeClock, MockPins, MockSignal, ScriptedTransport, TraceEvent};

use chariot_ep::config::{BoardProfile, EndpointConfig};
use chariot_ep::link::exchange::ExchangeState;
use chariot_ep::{Endpoint, Error};

const CONFIRM: &[u8] = b"chariot/2.01 CREATED 2.05 Ok<<";
const REJECT: &[u8] = b"chariot/4.00 BAD REQUEST<<";

fn rig(board: BoardProfile) -> (Endpoint, ScriptedTransport, MockSignal, FakeClock) {
    let transport = ScriptedTransport::new();
    let signal = MockSignal::new(transport.trace());
    let ep = Endpoint::new(EndpointConfig::for_board(board));
    (ep, transport, signal, FakeClock::new())
}

// ── Resource creation ─────────────────────────────────────────

#[test]
fn create_assigns_sequential_handles() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Leonardo);

    t.push_reply(CONFIRM);
    let h0 = ep
        .create_resource("event/door", 40, "state", &mut t, &mut sig, &clock)
        .unwrap();
    t.push_reply(CONFIRM);
    let h1 = ep
        .create_resource("event/window", 40, "state", &mut t, &mut sig, &clock)
        .unwrap();

    assert_eq!((h0, h1), (0, 1));
    assert_eq!(ep.handle_from_uri("event/door"), Some(0));
    assert_eq!(ep.handle_from_uri("event/window"), Some(1));
    assert_eq!(ep.registry().next_handle(), 2);
}

#[test]
fn create_frame_reaches_the_wire() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    t.push_reply(CONFIRM);
    ep.create_resource("event/door", 40, "state", &mut t, &mut sig, &clock)
        .unwrap();
    assert_eq!(
        t.written_str(),
        "rsrc=0%maxlen=40%uri=event/door%attr=state<"
    );
}

#[test]
fn create_pulses_once_strictly_after_write() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    t.push_reply(CONFIRM);
    ep.create_resource("event/door", 40, "state", &mut t, &mut sig, &clock)
        .unwrap();
    assert_eq!(sig.pulses, 1);
    assert!(t.write_then_pulse_ordered());
}

#[test]
fn invalid_arguments_never_touch_the_channel() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);

    assert_eq!(
        ep.create_resource("", 40, "state", &mut t, &mut sig, &clock),
        Err(Error::InvalidArgument)
    );
    assert_eq!(
        ep.create_resource("event/a", 0, "state", &mut t, &mut sig, &clock),
        Err(Error::InvalidArgument)
    );
    assert_eq!(
        ep.create_resource("event/a", 64, "state", &mut t, &mut sig, &clock),
        Err(Error::InvalidArgument)
    );
    assert_eq!(
        ep.create_resource("event/a", 40, "", &mut t, &mut sig, &clock),
        Err(Error::InvalidArgument)
    );

    assert!(t.written.is_empty(), "local rejections must not write");
    assert_eq!(sig.pulses, 0);
    assert_eq!(ep.registry().next_handle(), 0);
}

#[test]
fn capacity_exceeded_exactly_at_board_limit() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);

    for i in 0..4 {
        t.push_reply(CONFIRM);
        let uri = format!("event/{i}");
        assert_eq!(
            ep.create_resource(&uri, 40, "state", &mut t, &mut sig, &clock)
                .unwrap(),
            i
        );
    }

    t.clear_written();
    assert_eq!(
        ep.create_resource("event/extra", 40, "state", &mut t, &mut sig, &clock),
        Err(Error::CapacityExceeded)
    );
    assert!(t.written.is_empty());
    assert_eq!(ep.registry().next_handle(), 4, "failed create keeps the counter");
}

#[test]
fn rejected_create_rolls_back_the_reservation() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);

    t.push_reply(REJECT);
    assert_eq!(
        ep.create_resource("event/door", 40, "state", &mut t, &mut sig, &clock),
        Err(Error::RemoteRejected)
    );
    assert_eq!(ep.registry().next_handle(), 0);
    assert_eq!(ep.handle_from_uri("event/door"), None);
    assert_eq!(ep.exchange_state(), ExchangeState::Rejected);

    // The released handle is reissued.
    t.push_reply(CONFIRM);
    assert_eq!(
        ep.create_resource("event/door", 40, "state", &mut t, &mut sig, &clock)
            .unwrap(),
        0
    );
}

#[test]
fn unanswered_create_times_out_and_rolls_back() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);

    assert_eq!(
        ep.create_resource("event/door", 40, "state", &mut t, &mut sig, &clock),
        Err(Error::NoResponse)
    );
    assert_eq!(ep.registry().next_handle(), 0);
    assert_eq!(ep.exchange_state(), ExchangeState::NoResponse);
}

// ── Resource event triggers ───────────────────────────────────

fn rig_with_resource(max_len: u8) -> (Endpoint, ScriptedTransport, MockSignal, FakeClock) {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    t.push_reply(CONFIRM);
    ep.create_resource("event/door", max_len, "state", &mut t, &mut sig, &clock)
        .unwrap();
    t.clear_written();
    (ep, t, sig, clock)
}

#[test]
fn trigger_frame_reaches_the_wire() {
    let (mut ep, mut t, mut sig, clock) = rig_with_resource(40);
    t.push_reply(CONFIRM);
    ep.trigger_resource_event(0, "open", false, &mut t, &mut sig, &clock)
        .unwrap();
    assert_eq!(t.written_str(), "rsrc=0%value=open<");
}

#[test]
fn oversize_trigger_fails_locally() {
    let (mut ep, mut t, mut sig, clock) = rig_with_resource(20);

    // "rsrc=0%value=" + 10 chars + sentinel = 24 bytes > 20.
    assert_eq!(
        ep.trigger_resource_event(0, "0123456789", true, &mut t, &mut sig, &clock),
        Err(Error::FrameTooLong)
    );
    assert!(t.written.is_empty(), "no bytes may reach the channel");
    assert_eq!(sig.pulses, 1, "only the create pulse");

    // The resource itself persists.
    assert_eq!(ep.handle_from_uri("event/door"), Some(0));
}

#[test]
fn trigger_without_signal_never_pulses() {
    let (mut ep, mut t, mut sig, clock) = rig_with_resource(40);
    t.push_reply(CONFIRM);
    ep.trigger_resource_event(0, "open", false, &mut t, &mut sig, &clock)
        .unwrap();
    assert_eq!(sig.pulses, 1, "only the create pulse");
}

#[test]
fn trigger_with_signal_pulses_once_after_write() {
    let (mut ep, mut t, mut sig, clock) = rig_with_resource(40);
    t.push_reply(CONFIRM);

    let mark = t.trace_len();
    ep.trigger_resource_event(0, "open", true, &mut t, &mut sig, &clock)
        .unwrap();
    assert_eq!(sig.pulses, 2, "create pulse plus exactly one trigger pulse");

    let events = t.events_since(mark);
    let last_write = events.iter().rposition(|e| *e == TraceEvent::Write).unwrap();
    let pulse = events.iter().position(|e| *e == TraceEvent::Pulse).unwrap();
    assert!(last_write < pulse, "pulse must follow the completed write");
}

#[test]
fn trigger_on_dead_handle_is_rejected_locally() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    assert_eq!(
        ep.trigger_resource_event(0, "open", true, &mut t, &mut sig, &clock),
        Err(Error::InvalidHandle)
    );
    assert!(t.written.is_empty());
}

#[test]
fn rejected_trigger_leaves_the_registry_unchanged() {
    let (mut ep, mut t, mut sig, clock) = rig_with_resource(40);
    t.push_reply(REJECT);
    assert_eq!(
        ep.trigger_resource_event(0, "open", false, &mut t, &mut sig, &clock),
        Err(Error::RemoteRejected)
    );
    assert_eq!(ep.handle_from_uri("event/door"), Some(0));
    assert_eq!(ep.registry().len(), 1);
}

// ── Startup handshake ─────────────────────────────────────────

#[test]
fn begin_consumes_a_queued_readiness_frame() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    let mut pins = MockPins::new();
    pins.set_digital_level(ep.config().state_pin, true);
    t.push_reply(b"chariot/2.05 CONTENT ready<<");

    ep.begin(&mut t, &mut pins, &mut sig, &clock).unwrap();
    assert!(ep.is_online());
    assert!(t.written.is_empty(), "no solicitation when a frame is queued");
    assert_eq!(sig.pulses, 0);
}

#[test]
fn begin_solicits_when_the_channel_is_silent() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    let mut pins = MockPins::new();
    pins.set_digital_level(ep.config().state_pin, true);

    // Silent channel: the engine asks for status and pulses, but the
    // shield never answers.
    assert_eq!(
        ep.begin(&mut t, &mut pins, &mut sig, &clock),
        Err(Error::NoResponse)
    );
    assert_eq!(t.written_str(), "sys/status<");
    assert_eq!(sig.pulses, 1);
    assert!(!ep.is_online());
}

#[test]
fn begin_times_out_while_the_state_pin_is_low() {
    let (mut ep, mut t, mut sig, clock) = rig(BoardProfile::Uno);
    let mut pins = MockPins::new();

    assert_eq!(
        ep.begin(&mut t, &mut pins, &mut sig, &clock),
        Err(Error::NoResponse)
    );
    assert!(t.written.is_empty());
    assert!(!ep.is_online());
}

// ── Local console passthrough ─────────────────────────────────

#[test]
fn local_command_round_trips() {
    let (mut ep, mut t, _sig, clock) = rig(BoardProfile::Uno);
    t.push_reply(b"mote 1: chariot.c610.qualia OK<<");

    let reply = ep.forward_local_command("sys/motes\n", &mut t, &clock).unwrap();
    assert_eq!(t.written_str(), "sys/motes<");
    assert_eq!(reply.as_str(), "mote 1: chariot.c610.qualia OK");
}
