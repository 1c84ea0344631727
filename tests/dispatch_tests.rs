//! Dispatch Tests
//!
//! Registry lookup and the canonical handlers, driven through mock
//! capabilities so no real shell, screen, camera, or cursor is touched
//! (except where a test says so).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cmdrelay::capability::{
    Capabilities, CameraCapture, CursorControl, MouseButton, ScreenCapture, ShellExecutor,
};
use cmdrelay::{CommandRequest, Outcome, Registry, Result};

// =============================================================================
// Mock Capabilities
// =============================================================================

struct EchoingShell;

impl ShellExecutor for EchoingShell {
    fn run(&self, command: &str, _timeout: Duration) -> Result<Vec<u8>> {
        Ok(format!("ran: {command}").into_bytes())
    }
}

struct FixedScreen;

impl ScreenCapture for FixedScreen {
    fn capture_png(&self) -> Result<Vec<u8>> {
        Ok(b"\x89PNG fake".to_vec())
    }
}

struct NoFrameCamera;

impl CameraCapture for NoFrameCamera {
    fn capture_jpeg(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

#[derive(Clone, Default)]
struct RecordingCursor {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingCursor {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CursorControl for RecordingCursor {
    fn move_cursor(&self, x: i32, y: i32, relative: bool) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("move {x} {y} rel={relative}"));
        Ok(())
    }

    fn click(&self, button: MouseButton, count: u32) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("click {button} x{count}"));
        Ok(())
    }
}

fn registry_with_cursor() -> (Registry, RecordingCursor) {
    let cursor = RecordingCursor::default();
    let caps = Capabilities {
        shell: Box::new(EchoingShell),
        screen: Box::new(FixedScreen),
        camera: Box::new(NoFrameCamera),
        cursor: Box::new(cursor.clone()),
    };
    (Registry::builtin(caps, Duration::from_secs(5)), cursor)
}

fn registry() -> Registry {
    registry_with_cursor().0
}

fn request(line: &str) -> CommandRequest {
    CommandRequest::parse(line.as_bytes()).unwrap()
}

fn payload(outcome: Outcome) -> Vec<u8> {
    match outcome {
        Outcome::Respond(bytes) => bytes,
        Outcome::Exit => panic!("expected a response, got Exit"),
    }
}

// =============================================================================
// Registry Tests
// =============================================================================

#[test]
fn test_unknown_command_literal() {
    let registry = registry();
    let out = payload(registry.dispatch(&request("definitelynotacommand")));
    assert_eq!(out, b"Unknown command.");
}

#[test]
fn test_lookup_is_case_insensitive() {
    let registry = registry();
    assert_eq!(payload(registry.dispatch(&request("HELLOWORLD"))), b"Hello World");
    assert_eq!(payload(registry.dispatch(&request("HelloWorld"))), b"Hello World");
}

#[test]
fn test_helloworld_ignores_arguments() {
    let registry = registry();
    let out = payload(registry.dispatch(&request("helloworld these are ignored")));
    assert_eq!(out, b"Hello World");
}

#[test]
fn test_exit_is_terminal() {
    let registry = registry();
    assert_eq!(registry.dispatch(&request("exit")), Outcome::Exit);
}

// =============================================================================
// Echo Tests
// =============================================================================

#[test]
fn test_echo_requires_arguments() {
    let registry = registry();
    assert_eq!(payload(registry.dispatch(&request("echo"))), b"Not enough arguments.");
    assert_eq!(payload(registry.dispatch(&request("echo hi"))), b"Successfully.");
}

// =============================================================================
// Savefile Tests
// =============================================================================

#[test]
fn test_savefile_writes_attachment_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bin");
    let attachment: Vec<u8> = (0..2048).map(|i| (i % 256) as u8).collect();

    let registry = registry();
    let req = CommandRequest::new(
        vec!["savefile".into(), path.display().to_string()],
        Some(attachment.clone()),
    );

    assert_eq!(payload(registry.dispatch(&req)), b"Successfully.");
    assert_eq!(std::fs::read(&path).unwrap(), attachment);
}

#[test]
fn test_savefile_requires_path_and_attachment() {
    let registry = registry();

    // Attachment but no path
    let req = CommandRequest::new(vec!["savefile".into()], Some(vec![1, 2, 3]));
    assert_eq!(
        payload(registry.dispatch(&req)),
        b"Input or destination file not specified."
    );

    // Path but no attachment
    let out = payload(registry.dispatch(&request("savefile out.bin")));
    assert_eq!(out, b"Input or destination file not specified.");
}

#[test]
fn test_savefile_io_failure_becomes_error_payload() {
    let registry = registry();
    let req = CommandRequest::new(
        vec!["savefile".into(), "/nonexistent-dir/deep/out.bin".into()],
        Some(vec![0xAA]),
    );
    let out = String::from_utf8(payload(registry.dispatch(&req))).unwrap();
    assert!(out.starts_with("Error: IoError: "), "got: {out}");
}

// =============================================================================
// Exec Tests
// =============================================================================

#[test]
fn test_exec_forwards_joined_arguments() {
    let registry = registry();
    let out = payload(registry.dispatch(&request("exec ls -la /tmp")));
    assert_eq!(out, b"ran: ls -la /tmp");
}

// =============================================================================
// Capture Tests
// =============================================================================

#[test]
fn test_screen_returns_encoded_bytes() {
    let registry = registry();
    assert_eq!(payload(registry.dispatch(&request("screen"))), b"\x89PNG fake");
}

#[test]
fn test_webcam_without_frame_reports_it() {
    let registry = registry();
    let out = payload(registry.dispatch(&request("webcamphoto")));
    assert_eq!(out, b"Error while reading from webcam.");
}

// =============================================================================
// Mouse Tests
// =============================================================================

#[test]
fn test_mouse_move_absolute_and_relative() {
    let (registry, cursor) = registry_with_cursor();

    assert_eq!(payload(registry.dispatch(&request("mouse move 10 20"))), b"Successfully.");
    assert_eq!(
        payload(registry.dispatch(&request("mouse moverel -5 7"))),
        b"Successfully."
    );
    assert_eq!(cursor.calls(), ["move 10 20 rel=false", "move -5 7 rel=true"]);
}

#[test]
fn test_mouse_move_rejects_bad_arguments_without_moving() {
    let (registry, cursor) = registry_with_cursor();

    for line in ["mouse move 10 foo", "mouse move 10", "mouse moverel x y"] {
        let out = payload(registry.dispatch(&request(line)));
        assert_eq!(out, b"Not enough arguments/invalid arguments.", "line: {line}");
    }
    assert!(cursor.calls().is_empty());
}

#[test]
fn test_mouse_click_buttons_and_counts() {
    let (registry, cursor) = registry_with_cursor();

    assert_eq!(payload(registry.dispatch(&request("mouse click"))), b"Successfully.");
    assert_eq!(
        payload(registry.dispatch(&request("mouse click middle"))),
        b"Successfully."
    );
    assert_eq!(
        payload(registry.dispatch(&request("mouse dclick right"))),
        b"Successfully."
    );
    assert_eq!(
        cursor.calls(),
        ["click left x1", "click middle x1", "click right x2"]
    );
}

#[test]
fn test_mouse_click_rejects_unknown_button() {
    let (registry, cursor) = registry_with_cursor();
    let out = payload(registry.dispatch(&request("mouse click side")));
    assert_eq!(out, b"Unknown mouse button 'side'.");
    assert!(cursor.calls().is_empty());
}

#[test]
fn test_unknown_mouse_subcommand_has_its_own_literal() {
    let registry = registry();
    assert_eq!(
        payload(registry.dispatch(&request("mouse wiggle"))),
        b"Unknown mouse subcommand."
    );
    assert_eq!(
        payload(registry.dispatch(&request("mouse"))),
        b"Unknown mouse subcommand."
    );
}
