//! External capabilities
//!
//! Everything a handler does besides protocol work is a thin call into an
//! OS or media capability: process execution, screen capture, webcam
//! capture, cursor control. Each is a trait so the dispatcher and tests can
//! swap implementations freely; the protocol engine never talks to a
//! device directly.
//!
//! `SystemShell` is always available. The device-facing implementations
//! need the `media` cargo feature; without it the server wires in
//! [`Unsupported`] stand-ins whose failures surface as ordinary
//! handler-failure payloads.

use std::fmt;
use std::io::Read;
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::{RelayError, Result};

// =============================================================================
// Mouse Buttons
// =============================================================================

/// A named mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl FromStr for MouseButton {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" => Ok(MouseButton::Right),
            other => Err(RelayError::Parse(format!("unknown mouse button '{other}'"))),
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => write!(f, "left"),
            MouseButton::Middle => write!(f, "middle"),
            MouseButton::Right => write!(f, "right"),
        }
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Runs a shell command, capturing combined stdout+stderr.
pub trait ShellExecutor: Send + Sync {
    /// Run `command` through the platform shell, enforcing `timeout`.
    /// Returns the combined console output as response bytes.
    fn run(&self, command: &str, timeout: Duration) -> Result<Vec<u8>>;
}

/// Captures the primary screen as PNG bytes.
pub trait ScreenCapture: Send + Sync {
    fn capture_png(&self) -> Result<Vec<u8>>;
}

/// Captures one webcam frame as JPEG bytes.
///
/// `Ok(None)` means the device opened but yielded no frame.
pub trait CameraCapture: Send + Sync {
    fn capture_jpeg(&self) -> Result<Option<Vec<u8>>>;
}

/// Moves and clicks the cursor.
pub trait CursorControl: Send + Sync {
    /// Move to `(x, y)`: absolute screen coordinates, or a delta when
    /// `relative` is set.
    fn move_cursor(&self, x: i32, y: i32, relative: bool) -> Result<()>;

    /// Click `button` `count` times (1 = click, 2 = double click).
    fn click(&self, button: MouseButton, count: u32) -> Result<()>;
}

/// The capability set handed to the handler registry at startup.
pub struct Capabilities {
    pub shell: Box<dyn ShellExecutor>,
    pub screen: Box<dyn ScreenCapture>,
    pub camera: Box<dyn CameraCapture>,
    pub cursor: Box<dyn CursorControl>,
}

impl Capabilities {
    /// The real system capabilities: always a live shell; live devices when
    /// built with the `media` feature, [`Unsupported`] stand-ins otherwise.
    pub fn system() -> Self {
        Self {
            shell: Box::new(SystemShell),
            #[cfg(feature = "media")]
            screen: Box::new(media::SystemScreen),
            #[cfg(not(feature = "media"))]
            screen: Box::new(Unsupported("screen capture")),
            #[cfg(feature = "media")]
            camera: Box::new(media::SystemCamera),
            #[cfg(not(feature = "media"))]
            camera: Box::new(Unsupported("webcam capture")),
            #[cfg(feature = "media")]
            cursor: Box::new(media::SystemCursor),
            #[cfg(not(feature = "media"))]
            cursor: Box::new(Unsupported("cursor control")),
        }
    }
}

// =============================================================================
// Shell Execution
// =============================================================================

/// Process execution through the platform shell (`sh -c` / `cmd /C`)
pub struct SystemShell;

impl ShellExecutor for SystemShell {
    fn run(&self, command: &str, timeout: Duration) -> Result<Vec<u8>> {
        let mut child = shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain the pipes off-thread so a chatty child can't deadlock
        // against a full pipe buffer while we wait on it.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_thread = std::thread::spawn(move || drain(stdout));
        let err_thread = std::thread::spawn(move || drain(stderr));

        let timed_out = match child.wait_timeout(timeout)? {
            Some(_status) => false,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                true
            }
        };

        let mut output = out_thread.join().unwrap_or_default();
        output.extend(err_thread.join().unwrap_or_default());

        if timed_out {
            return Err(RelayError::ExecTimeout(timeout.as_secs()));
        }

        // Console output arrives in the console locale; re-encode through
        // UTF-8 so the response is valid text on the client side.
        Ok(String::from_utf8_lossy(&output).into_owned().into_bytes())
    }
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

fn drain<R: Read>(source: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut source) = source {
        let _ = source.read_to_end(&mut buf);
    }
    buf
}

// =============================================================================
// Unsupported Stand-ins
// =============================================================================

/// Placeholder capability for builds without the `media` feature. Every
/// call fails with a capability error naming what is missing.
pub struct Unsupported(pub &'static str);

impl Unsupported {
    fn unavailable<T>(&self) -> Result<T> {
        Err(RelayError::Capability(format!(
            "{} support not compiled in (enable the 'media' feature)",
            self.0
        )))
    }
}

impl ScreenCapture for Unsupported {
    fn capture_png(&self) -> Result<Vec<u8>> {
        self.unavailable()
    }
}

impl CameraCapture for Unsupported {
    fn capture_jpeg(&self) -> Result<Option<Vec<u8>>> {
        self.unavailable()
    }
}

impl CursorControl for Unsupported {
    fn move_cursor(&self, _x: i32, _y: i32, _relative: bool) -> Result<()> {
        self.unavailable()
    }

    fn click(&self, _button: MouseButton, _count: u32) -> Result<()> {
        self.unavailable()
    }
}

// =============================================================================
// Device-facing Implementations (media feature)
// =============================================================================

#[cfg(feature = "media")]
mod media {
    use std::io::Cursor;
    use std::time::Duration;

    use super::{CameraCapture, CursorControl, MouseButton, ScreenCapture};
    use crate::error::{RelayError, Result};

    fn capability_err(e: impl std::fmt::Display) -> RelayError {
        RelayError::Capability(e.to_string())
    }

    /// Primary-monitor capture via `xcap`, PNG-encoded
    pub struct SystemScreen;

    impl ScreenCapture for SystemScreen {
        fn capture_png(&self) -> Result<Vec<u8>> {
            let monitors = xcap::Monitor::all().map_err(capability_err)?;
            let monitor = monitors
                .into_iter()
                .find(|m| m.is_primary().unwrap_or(false))
                .ok_or_else(|| RelayError::Capability("no monitor found".to_string()))?;
            let image = monitor.capture_image().map_err(capability_err)?;

            let mut png = Cursor::new(Vec::new());
            image
                .write_to(&mut png, image::ImageFormat::Png)
                .map_err(capability_err)?;
            Ok(png.into_inner())
        }
    }

    /// First-webcam capture via `nokhwa`, JPEG-encoded
    pub struct SystemCamera;

    impl CameraCapture for SystemCamera {
        fn capture_jpeg(&self) -> Result<Option<Vec<u8>>> {
            use nokhwa::pixel_format::RgbFormat;
            use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

            let format =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
            let mut camera =
                nokhwa::Camera::new(CameraIndex::Index(0), format).map_err(capability_err)?;
            camera.open_stream().map_err(capability_err)?;

            // A device that opens but yields no frame is the "no frame"
            // case, not a hard failure.
            let Ok(frame) = camera.frame() else {
                return Ok(None);
            };
            let Ok(decoded) = frame.decode_image::<RgbFormat>() else {
                return Ok(None);
            };

            let mut jpeg = Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(decoded)
                .write_to(&mut jpeg, image::ImageFormat::Jpeg)
                .map_err(capability_err)?;
            Ok(Some(jpeg.into_inner()))
        }
    }

    /// Cursor movement and clicks via `enigo`
    pub struct SystemCursor;

    impl SystemCursor {
        fn enigo() -> Result<enigo::Enigo> {
            enigo::Enigo::new(&enigo::Settings::default()).map_err(capability_err)
        }
    }

    impl CursorControl for SystemCursor {
        fn move_cursor(&self, x: i32, y: i32, relative: bool) -> Result<()> {
            use enigo::{Coordinate, Mouse};

            let coordinate = if relative {
                Coordinate::Rel
            } else {
                Coordinate::Abs
            };
            Self::enigo()?
                .move_mouse(x, y, coordinate)
                .map_err(capability_err)
        }

        fn click(&self, button: MouseButton, count: u32) -> Result<()> {
            use enigo::{Button, Direction, Mouse};

            let button = match button {
                MouseButton::Left => Button::Left,
                MouseButton::Middle => Button::Middle,
                MouseButton::Right => Button::Right,
            };
            let mut enigo = Self::enigo()?;
            for _ in 0..count {
                enigo
                    .button(button, Direction::Click)
                    .map_err(capability_err)?;
                std::thread::sleep(Duration::from_millis(20));
            }
            Ok(())
        }
    }
}
