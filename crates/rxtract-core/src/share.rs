//! Sharing a record as pretty JSON text.
//!
//! A [`ShareTarget`] is the platform share facility (if any). When none is
//! available the text goes to a [`Clipboard`] instead.

use tracing::{debug, warn};

use crate::error::ShareError;
use crate::export::to_json;
use crate::models::record::ExtractedRecord;

/// Title attached to shared content.
pub const SHARE_TITLE: &str = "Extracted Document Data";

/// Confirmation shown after the clipboard fallback.
pub const COPIED_MESSAGE: &str = "Data copied to clipboard!";

/// A system share facility.
pub trait ShareTarget {
    fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

/// A clipboard-equivalent sink.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError>;
}

/// How the record was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
}

/// Share a record, falling back to the clipboard when no target exists.
pub fn share(
    record: &ExtractedRecord,
    target: Option<&dyn ShareTarget>,
    clipboard: &dyn Clipboard,
) -> Result<ShareOutcome, ShareError> {
    let text = to_json(record).map_err(|e| ShareError(e.to_string()))?;

    let outcome = match target {
        Some(target) => {
            target.share(SHARE_TITLE, &text)?;
            ShareOutcome::Shared
        }
        None => {
            clipboard.copy(&text)?;
            ShareOutcome::Copied
        }
    };

    debug!("Shared {} bytes via {:?}", text.len(), outcome);
    Ok(outcome)
}

/// Share, logging and returning the user-facing message either way.
pub fn share_message(
    record: &ExtractedRecord,
    target: Option<&dyn ShareTarget>,
    clipboard: &dyn Clipboard,
) -> String {
    match share(record, target, clipboard) {
        Ok(ShareOutcome::Copied) => COPIED_MESSAGE.to_string(),
        Ok(ShareOutcome::Shared) => "Data shared".to_string(),
        Err(e) => {
            warn!("{}", e);
            e.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryClipboard(RefCell<Option<String>>);

    impl Clipboard for MemoryClipboard {
        fn copy(&self, text: &str) -> Result<(), ShareError> {
            *self.0.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn copy(&self, _text: &str) -> Result<(), ShareError> {
            Err(ShareError("no clipboard".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingTarget(RefCell<Vec<(String, String)>>);

    impl ShareTarget for RecordingTarget {
        fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
            self.0.borrow_mut().push((title.to_string(), text.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_share_target_preferred() {
        let record = ExtractedRecord::unmatched("hello");
        let target = RecordingTarget::default();
        let clipboard = MemoryClipboard::default();

        let outcome = share(&record, Some(&target), &clipboard).unwrap();

        assert_eq!(outcome, ShareOutcome::Shared);
        let shared = target.0.borrow();
        assert_eq!(shared[0].0, SHARE_TITLE);
        assert_eq!(shared[0].1, to_json(&record).unwrap());
        assert!(clipboard.0.borrow().is_none());
    }

    #[test]
    fn test_clipboard_fallback() {
        let record = ExtractedRecord::unmatched("hello");
        let clipboard = MemoryClipboard::default();

        assert_eq!(share(&record, None, &clipboard).unwrap(), ShareOutcome::Copied);
        let copied = clipboard.0.borrow().clone().unwrap();
        assert!(copied.contains("\"extractedText\": \"hello\""));
        assert_eq!(share_message(&record, None, &clipboard), COPIED_MESSAGE);
    }

    #[test]
    fn test_failure_is_reported_inline() {
        let record = ExtractedRecord::unmatched("hello");
        let before = record.clone();

        let err = share(&record, None, &BrokenClipboard).unwrap_err();
        assert_eq!(err.to_string(), "Error sharing data: no clipboard");
        assert_eq!(
            share_message(&record, None, &BrokenClipboard),
            "Error sharing data: no clipboard"
        );
        assert_eq!(record, before);
    }
}
