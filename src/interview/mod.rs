pub mod media;
pub mod persister;
pub mod runner;

pub use media::{DeviceStream, MediaError, MediaRecorder, MediaSource, SpeechRecognizer};
pub use persister::TranscriptionPersister;
pub use runner::{InterviewRunner, RunnerError, RunnerState, SavedInterview};
