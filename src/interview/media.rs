//! Seams over the host platform's capture APIs. The runner consumes these as
//! start/stop handles plus drained results; the actual camera, recorder and
//! speech-to-text engines live outside this crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Camera/microphone permission denied: {0}")]
    PermissionDenied(String),
    #[error("Device error: {0}")]
    Device(String),
    #[error("Recorder error: {0}")]
    Recorder(String),
    #[error("Speech recognition error: {0}")]
    Recognition(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;

/// Codec profile requested first; the recorder default is the fallback.
pub const PREFERRED_MIME: &str = "video/webm;codecs=vp9,opus";

/// Grants access to the user's camera and microphone. Acquisition is the
/// point where the host shows its permission prompt.
pub trait MediaSource: Send + Sync {
    fn acquire(&self) -> Result<Box<dyn DeviceStream>>;
}

/// A live camera+microphone handle. Exclusively owned by one runner session;
/// leaked handles block subsequent acquisition, so `stop_tracks` must run on
/// every exit path.
pub trait DeviceStream: Send {
    fn stop_tracks(&mut self);
    fn is_live(&self) -> bool;
}

/// Continuous recorder over a device stream. One recording spans the whole
/// multi-question session.
pub trait MediaRecorder: Send {
    fn supports(&self, mime_type: &str) -> bool;
    /// `None` selects the recorder's default codec.
    fn start(&mut self, mime_type: Option<&str>) -> Result<()>;
    /// Stops and assembles the complete recording.
    fn stop(&mut self) -> Result<Vec<u8>>;
}

/// Continuous speech-to-text stream. Finalized segments accumulate until
/// drained by the runner.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
    fn take_finals(&mut self) -> Vec<String>;
}
