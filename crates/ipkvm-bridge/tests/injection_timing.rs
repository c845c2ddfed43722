//! Integration tests for event routing and text injection pacing.
//!
//! The router runs against the recording `MockTransport` on a paused Tokio
//! clock, so the 100 ms / 200 ms pauses are checked exactly without slowing
//! the test run.

use std::sync::Arc;
use std::time::Duration;

use ipkvm_bridge::application::{Driver, DriverError, EventRouter, SerialTransport};
use ipkvm_bridge::domain::{DriverKind, InboundMessage, OutboundMessage};
use ipkvm_bridge::infrastructure::serial::MockTransport;
use uuid::Uuid;

fn setup(kind: DriverKind) -> (Arc<MockTransport>, EventRouter) {
    let mock = Arc::new(MockTransport::new());
    let transport: Arc<dyn SerialTransport> = mock.clone();
    (mock, EventRouter::new(Driver::new(kind, transport)))
}

async fn dispatch_json(
    router: &mut EventRouter,
    session: Uuid,
    json: &str,
) -> Result<Option<OutboundMessage>, DriverError> {
    let message = InboundMessage::parse(json).expect("test JSON must decode");
    router.dispatch(session, message).await
}

#[tokio::test(start_paused = true)]
async fn test_arduino_31_chars_are_two_chunks_200ms_apart() {
    // Arrange
    let (mock, mut router) = setup(DriverKind::ArduinoLeonardo);
    let session = Uuid::new_v4();

    // Act
    dispatch_json(
        &mut router,
        session,
        r#"{"cmd":"inputSequence","payload":"abcdefghijklmnopqrstuvwxyz01234"}"#,
    )
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    // Assert
    let frames = mock.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].len(), 32);
    assert_eq!(frames[1], vec![250, b'4', 251]);
    let stamps = mock.timestamps();
    assert!(stamps[1] - stamps[0] >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_9000_chars_rejected_with_zero_frames() {
    for kind in [DriverKind::ArduinoLeonardo, DriverKind::Ch9329] {
        let (mock, mut router) = setup(kind);
        let json = format!(r#"{{"cmd":"inputSequence","payload":"{}"}}"#, "a".repeat(9000));

        let result = dispatch_json(&mut router, Uuid::new_v4(), &json).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(matches!(result, Err(DriverError::Sequence(_))), "{kind}");
        assert!(mock.frames().is_empty(), "{kind}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_ch9329_typing_paces_characters_100ms_apart() {
    // Arrange
    let (mock, mut router) = setup(DriverKind::Ch9329);

    // Act: the legacy command name is accepted too
    dispatch_json(
        &mut router,
        Uuid::new_v4(),
        r#"{"cmd":"sendSequence","payload":"Hi"}"#,
    )
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    // Assert: press/release per char, 100 ms between characters
    let frames = mock.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(&frames[0][5..13], &[0x02, 0, 0x0B, 0, 0, 0, 0, 0], "Shift+H");
    assert_eq!(&frames[2][5..13], &[0, 0, 0x0C, 0, 0, 0, 0, 0], "i");
    let stamps = mock.timestamps();
    assert_eq!(stamps[1], stamps[0], "release follows press immediately");
    assert!(stamps[2] - stamps[0] >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_ch9329_every_printable_char_types_as_press_then_release() {
    let (mock, mut router) = setup(DriverKind::Ch9329);
    let printable: String = (' '..='~').collect();

    router.start_injection(Uuid::new_v4(), &printable).unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;

    let frames = mock.frames();
    assert_eq!(frames.len(), printable.len() * 2);
    for (c, pair) in printable.chars().zip(frames.chunks(2)) {
        let press = &pair[0][5..13];
        assert!(press[0] == 0 || press[0] == 0x02, "{c:?}: modifier {:#04x}", press[0]);
        assert_ne!(press[2], 0, "{c:?}: no key");
        assert_eq!(&pair[1][5..13], &[0; 8], "{c:?}: release");
    }
}

#[tokio::test(start_paused = true)]
async fn test_session_cancel_stops_remaining_frames() {
    // Arrange
    let (mock, mut router) = setup(DriverKind::Ch9329);
    let session = Uuid::new_v4();
    router.start_injection(session, &"x".repeat(40)).unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    // Act
    assert!(router.cancel_injection(session));
    tokio::time::sleep(Duration::from_secs(10)).await;

    // Assert: characters at 0, 100, 200 ms only
    assert_eq!(mock.frames().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_aborts_rest_of_injection() {
    let (mock, mut router) = setup(DriverKind::ArduinoLeonardo);
    router.start_injection(Uuid::new_v4(), &"y".repeat(90)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    mock.set_fail(true);
    tokio::time::sleep(Duration::from_millis(200)).await;
    mock.set_fail(false);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(mock.frames().len(), 1, "only the chunk written before the failure");
    assert!(!router.is_injecting());
}

#[tokio::test]
async fn test_live_events_and_unknown_cmd() {
    let (mock, mut router) = setup(DriverKind::Ch9329);
    let session = Uuid::new_v4();

    let key = dispatch_json(&mut router, session, r#"{"cmd":"keyevent","payload":["Shift",16,"keydown"]}"#)
        .await
        .unwrap();
    let mouse = dispatch_json(&mut router, session, r#"{"cmd":"mouseEvent","payload":[[-1,2],"move"]}"#)
        .await
        .unwrap();
    let unknown = dispatch_json(&mut router, session, r#"{"cmd":"screenshot"}"#)
        .await
        .unwrap();

    assert_eq!(key, None);
    assert_eq!(mouse, None);
    assert_eq!(unknown, Some(OutboundMessage::Unknown));
    let frames = mock.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0][3], 0x02);
    assert_eq!(&frames[1][3..10], &[0x05, 5, 0x01, 0, 0xFF, 2, 0]);
}
