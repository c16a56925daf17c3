use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use thiserror::Error;

use super::media::{self, DeviceStream, MediaError, MediaRecorder, MediaSource, SpeechRecognizer};
use super::persister::TranscriptionPersister;
use crate::models::{QuestionItem, TranscriptionRecord};
use crate::store::{
    DocumentStore, SessionStore, StoreError, SESSION_KEY_INTERVIEW_ID, SESSION_KEY_QUESTIONS,
};

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("No questions selected for mock interview")]
    NoQuestions,
    #[error("Invalid questions payload: {0}")]
    BadPayload(#[from] serde_json::Error),
    #[error("Not allowed in the {0:?} state")]
    InvalidState(RunnerState),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// No camera. Question navigation is still allowed.
    Idle,
    /// Stream acquired and previewing; recording not yet started.
    CameraReady,
    /// One continuous recording plus speech-to-text across all questions.
    Recording,
    /// Recording stopped; video assembled; awaiting save or discard.
    Stopped,
}

/// What comes back from a saved session: the id the feedback stage will use,
/// and the assembled recording for the local download prompt.
pub struct SavedInterview {
    pub interview_id: String,
    pub video: Vec<u8>,
}

/// One active mock-interview session. Cycles through the handed-off question
/// list, records continuously, and flushes the running transcript into a
/// per-question record each time the session advances.
///
/// The device stream is exclusively owned here and is released on every exit
/// path - save, discard, explicit exit, and drop.
pub struct InterviewRunner {
    questions: Vec<QuestionItem>,
    current: usize,
    state: RunnerState,
    stream: Option<Box<dyn DeviceStream>>,
    recorder: Box<dyn MediaRecorder>,
    recognizer: Box<dyn SpeechRecognizer>,
    transcript_buf: String,
    records: Vec<TranscriptionRecord>,
    elapsed_seconds: u64,
    video: Option<Vec<u8>>,
    completed: bool,
}

impl InterviewRunner {
    pub fn new(
        questions: Vec<QuestionItem>,
        recorder: Box<dyn MediaRecorder>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(RunnerError::NoQuestions);
        }
        Ok(Self {
            questions,
            current: 0,
            state: RunnerState::Idle,
            stream: None,
            recorder,
            recognizer,
            transcript_buf: String::new(),
            records: Vec::new(),
            elapsed_seconds: 0,
            video: None,
            completed: false,
        })
    }

    /// Builds a runner from the selector's session-store hand-off. A missing
    /// or empty payload sends the caller back to the question list.
    pub fn from_session(
        session: &dyn SessionStore,
        recorder: Box<dyn MediaRecorder>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Result<Self> {
        let payload = session
            .get(SESSION_KEY_QUESTIONS)
            .ok_or(RunnerError::NoQuestions)?;
        let questions: Vec<QuestionItem> = serde_json::from_str(&payload)?;
        Self::new(questions, recorder, recognizer)
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &QuestionItem {
        &self.questions[self.current]
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn records(&self) -> &[TranscriptionRecord] {
        &self.records
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// mm:ss display of the elapsed counter.
    pub fn format_elapsed(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }

    /// Requests the combined audio+video stream. Permission failure is
    /// surfaced to the caller and the session stays Idle.
    pub fn start_camera(&mut self, source: &dyn MediaSource) -> Result<()> {
        match self.state {
            RunnerState::Idle | RunnerState::Stopped => {}
            other => return Err(RunnerError::InvalidState(other)),
        }

        self.completed = false;
        match source.acquire() {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = RunnerState::CameraReady;
                info!("📷 Camera ready");
                Ok(())
            }
            Err(e) => {
                self.state = RunnerState::Idle;
                Err(e.into())
            }
        }
    }

    /// Starts the continuous recording, the speech-to-text stream, and the
    /// elapsed counter. Prefers the vp9/opus profile and falls back to the
    /// recorder default when unsupported.
    pub fn start_recording(&mut self) -> Result<()> {
        if self.state != RunnerState::CameraReady {
            return Err(RunnerError::InvalidState(self.state));
        }

        let mime = if self.recorder.supports(media::PREFERRED_MIME) {
            Some(media::PREFERRED_MIME)
        } else {
            info!("Codec not supported, falling back to default");
            None
        };
        self.recorder.start(mime)?;
        self.recognizer.start()?;

        self.elapsed_seconds = 0;
        self.video = None;
        self.state = RunnerState::Recording;
        info!("⏺️ Recording started ({} questions)", self.questions.len());
        Ok(())
    }

    /// Once-per-second host callback: advances the elapsed counter and drains
    /// finalized speech segments into the running transcript.
    pub fn tick(&mut self) {
        if self.state != RunnerState::Recording {
            return;
        }
        self.elapsed_seconds += 1;
        self.drain_recognizer();
    }

    fn drain_recognizer(&mut self) {
        for segment in self.recognizer.take_finals() {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            if !self.transcript_buf.is_empty() {
                self.transcript_buf.push(' ');
            }
            self.transcript_buf.push_str(segment);
        }
    }

    /// Moves the accumulated transcript into a record for the current
    /// question and resets the buffer. Questions with no captured speech
    /// produce no record.
    fn flush_transcript(&mut self) {
        self.drain_recognizer();
        let transcript = self.transcript_buf.trim().to_string();
        self.transcript_buf.clear();
        if transcript.is_empty() {
            return;
        }
        let question = &self.questions[self.current];
        self.records.push(TranscriptionRecord {
            question_id: question.id.clone(),
            question: question.question.clone(),
            transcript,
            timestamp: Utc::now(),
        });
    }

    /// Advances to the next question. While recording this flushes the
    /// transcript-so-far; the recording itself keeps running. Finishing the
    /// last question marks the interview complete and stops an active
    /// recording.
    pub fn next_question(&mut self) -> Result<()> {
        if self.state == RunnerState::Recording {
            self.flush_transcript();
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(())
        } else {
            self.completed = true;
            if self.state == RunnerState::Recording {
                self.finish_recording()?;
            }
            Ok(())
        }
    }

    /// Moves back one question. Never flushes; the running transcript keeps
    /// accumulating against the question shown when the flush happens.
    pub fn prev_question(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    /// Explicit stop: flush the in-progress transcript, assemble the video,
    /// and move to Stopped so the caller can offer Download & Save vs
    /// Discard.
    pub fn stop_recording(&mut self) -> Result<()> {
        if self.state != RunnerState::Recording {
            return Err(RunnerError::InvalidState(self.state));
        }
        self.flush_transcript();
        self.finish_recording()
    }

    fn finish_recording(&mut self) -> Result<()> {
        let video = self.recorder.stop()?;
        self.recognizer.stop();
        self.video = Some(video);
        self.state = RunnerState::Stopped;
        info!(
            "⏹️ Recording stopped ({} transcripts, {})",
            self.records.len(),
            self.format_elapsed()
        );
        Ok(())
    }

    /// "Download & Save": persists all transcription records under a fresh
    /// interview id, points the feedback stage at it through the session
    /// store, and only then hands the video back for the local download
    /// prompt. With zero captured transcripts nothing is persisted and no
    /// video is returned, but the session still ends cleanly.
    pub async fn save(
        &mut self,
        store: Arc<dyn DocumentStore>,
        session: &dyn SessionStore,
    ) -> Result<Option<SavedInterview>> {
        if self.state != RunnerState::Stopped {
            return Err(RunnerError::InvalidState(self.state));
        }

        let job_title = self.questions[0].job_title.clone();
        let title = format!("{job_title} Mock Interview");

        let persister = TranscriptionPersister::new(store);
        let saved = persister.save(&title, &job_title, &self.records).await?;

        let result = match saved {
            Some(interview_id) => {
                session.put(SESSION_KEY_INTERVIEW_ID, interview_id.clone());
                let video = self.video.take().unwrap_or_default();
                Some(SavedInterview {
                    interview_id,
                    video,
                })
            }
            None => {
                warn!("No transcript content captured; nothing persisted");
                None
            }
        };

        self.reset_session();
        Ok(result)
    }

    /// "Discard": drops all in-memory recording state and transcripts and
    /// releases the devices. Nothing is persisted. An in-progress recording
    /// is stopped and its output thrown away.
    pub fn discard(&mut self) {
        if self.state == RunnerState::Recording {
            let _ = self.recorder.stop();
            self.recognizer.stop();
        }
        info!("🗑️ Recording discarded");
        self.reset_session();
    }

    /// Leaving mid-session. Stops an active recording and always releases
    /// the devices, whatever state the session was in.
    pub fn exit(&mut self) {
        if self.state == RunnerState::Recording {
            let _ = self.recorder.stop();
            self.recognizer.stop();
        }
        self.reset_session();
    }

    fn reset_session(&mut self) {
        self.records.clear();
        self.transcript_buf.clear();
        self.video = None;
        self.elapsed_seconds = 0;
        self.state = RunnerState::Idle;
        self.release_devices();
    }

    fn release_devices(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }
    }
}

impl Drop for InterviewRunner {
    fn drop(&mut self) {
        // Component teardown is an exit path like any other.
        self.recognizer.stop();
        self.release_devices();
    }
}
