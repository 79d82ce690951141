//! Single-user recognition session.
//!
//! The session owns the selected image and the current record. A cycle is
//! `begin` -> (`complete` | `fail`); a second `begin` while one is in flight
//! is refused, so at most one recognition runs per session.
//!
//! The current record outlives state changes: only a completed cycle
//! replaces it.

use tracing::{debug, info, warn};

use crate::error::{RecognitionError, Result, SessionError};
use crate::extract::{ReceiptParser, RecordExtractor};
use crate::models::record::ExtractedRecord;
use crate::ocr::{ImageInput, RecognitionProgress, TextRecognizer, DEFAULT_LANGUAGE};

/// Where the session is in its cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected yet.
    Idle,
    /// An image is ready to process.
    ImageSelected,
    /// A recognition is in flight.
    Recognizing,
    /// The last cycle produced a record.
    Extracted,
    /// The last cycle failed with this user-facing message.
    Failed(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::ImageSelected => "image selected",
            SessionState::Recognizing => "recognizing",
            SessionState::Extracted => "extracted",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// Proof that a cycle was started. Consumed by `complete` or `fail`.
#[derive(Debug, PartialEq, Eq)]
pub struct RecognitionTicket(u64);

impl RecognitionTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Recognition session state machine.
pub struct Session {
    state: SessionState,
    image: Option<ImageInput>,
    current: Option<ExtractedRecord>,
    parser: ReceiptParser,
    language: String,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_parser(ReceiptParser::new())
    }

    pub fn with_parser(parser: ReceiptParser) -> Self {
        Self {
            state: SessionState::Idle,
            image: None,
            current: None,
            parser,
            language: DEFAULT_LANGUAGE.to_string(),
            next_ticket: 1,
            in_flight: None,
        }
    }

    /// Language code handed to the recognizer.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn image(&self) -> Option<&ImageInput> {
        self.image.as_ref()
    }

    /// The record from the most recent successful cycle, in any state.
    pub fn record(&self) -> Option<&ExtractedRecord> {
        self.current.as_ref()
    }

    /// Message of the last failure, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::Recognizing
    }

    /// Select a new image. A non-image leaves the session untouched.
    pub fn select_image(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<()> {
        if self.is_busy() {
            return Err(SessionError::Busy.into());
        }
        let input = ImageInput::new(bytes, mime_type)?;
        self.select(input)
    }

    /// Select an already validated input.
    pub fn select(&mut self, input: ImageInput) -> Result<()> {
        if self.is_busy() {
            return Err(SessionError::Busy.into());
        }
        ImageInput::validate(&input.mime_type)?;
        debug!(
            "Selected image {} ({}, {} bytes)",
            input.name.as_deref().unwrap_or("<unnamed>"),
            input.mime_type,
            input.bytes.len()
        );
        self.image = Some(input);
        self.state = SessionState::ImageSelected;
        Ok(())
    }

    /// Start a recognition cycle.
    pub fn begin(&mut self) -> std::result::Result<RecognitionTicket, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.image.is_none() {
            return Err(SessionError::NoImage);
        }

        let ticket = RecognitionTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket.0);
        self.state = SessionState::Recognizing;
        debug!("Recognition cycle {} started", ticket.0);
        Ok(ticket)
    }

    /// Finish a cycle with recognized text. Replaces any previous record.
    pub fn complete(
        &mut self,
        ticket: RecognitionTicket,
        text: &str,
    ) -> std::result::Result<&ExtractedRecord, SessionError> {
        self.settle(&ticket)?;
        let record = self.parser.extract(text);
        info!("Recognition cycle {} extracted a record", ticket.0);
        self.state = SessionState::Extracted;
        Ok(&*self.current.insert(record))
    }

    /// Finish a cycle with a recognition failure. The previous record is kept.
    pub fn fail(
        &mut self,
        ticket: RecognitionTicket,
        error: &RecognitionError,
    ) -> std::result::Result<(), SessionError> {
        self.settle(&ticket)?;
        warn!("Recognition cycle {} failed: {}", ticket.0, error.detail);
        self.state = SessionState::Failed(error.to_string());
        Ok(())
    }

    /// Run a whole cycle against `recognizer`.
    pub fn process(
        &mut self,
        recognizer: &dyn TextRecognizer,
        progress: &mut dyn FnMut(RecognitionProgress),
    ) -> Result<&ExtractedRecord> {
        let ticket = self.begin()?;

        let outcome = match &self.image {
            Some(image) => recognizer.recognize(&image.bytes, &self.language, progress),
            None => Err(RecognitionError::new("no image selected")),
        };

        match outcome {
            Ok(text) => Ok(self.complete(ticket, &text)?),
            Err(e) => {
                self.fail(ticket, &e)?;
                Err(e.into())
            }
        }
    }

    fn settle(&mut self, ticket: &RecognitionTicket) -> std::result::Result<(), SessionError> {
        if self.in_flight != Some(ticket.0) {
            return Err(SessionError::StaleTicket(ticket.0));
        }
        self.in_flight = None;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
