//! WASM bindings for receipt field extraction.
//!
//! In the browser the OCR itself runs in JavaScript; the recognized text is
//! handed to these bindings for extraction, export and sharing.

use wasm_bindgen::prelude::*;

use rxtract_core::export::{self, ExportFormat};
use rxtract_core::extract::{ReceiptParser, VendorHeuristic};
use rxtract_core::models::record::ExtractedRecord;
use rxtract_core::ocr::ImageInput;
use rxtract_core::session::{RecognitionTicket, Session};
use rxtract_core::share::SHARE_TITLE;
use rxtract_core::error::RecognitionError;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn record_to_js(record: &ExtractedRecord) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(record).map_err(to_js_error)
}

fn record_from_js(record: JsValue) -> Result<ExtractedRecord, JsValue> {
    serde_wasm_bindgen::from_value(record).map_err(to_js_error)
}

/// Extract a record from recognized text.
#[wasm_bindgen]
pub fn extract_record(text: &str) -> Result<JsValue, JsValue> {
    record_to_js(&rxtract_core::extract(text))
}

/// Whether a declared MIME type is accepted as an image.
#[wasm_bindgen]
pub fn is_image_type(mime_type: &str) -> bool {
    ImageInput::validate(mime_type).is_ok()
}

/// Advisory consistency warnings for a record.
#[wasm_bindgen]
pub fn validate_record(record: JsValue) -> Result<Vec<String>, JsValue> {
    Ok(record_from_js(record)?.validate())
}

/// Export a record as "json" or "csv".
#[wasm_bindgen]
pub fn export_record(record: JsValue, format: &str) -> Result<ExportArtifactJs, JsValue> {
    let record = record_from_js(record)?;
    let format: ExportFormat = format.parse().map_err(to_js_error)?;
    let artifact = export::export(&record, format).map_err(to_js_error)?;

    Ok(ExportArtifactJs {
        bytes: artifact.bytes,
        mime_type: artifact.mime_type.to_string(),
        filename: artifact.filename,
    })
}

/// Payload for `navigator.share` or the clipboard.
#[wasm_bindgen]
pub fn share_payload(record: JsValue) -> Result<SharePayloadJs, JsValue> {
    let record = record_from_js(record)?;
    Ok(SharePayloadJs {
        title: SHARE_TITLE.to_string(),
        text: export::to_json(&record).map_err(to_js_error)?,
    })
}

/// An exported record for download.
#[wasm_bindgen]
pub struct ExportArtifactJs {
    bytes: Vec<u8>,
    mime_type: String,
    filename: String,
}

#[wasm_bindgen]
impl ExportArtifactJs {
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// Contents as text.
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Title and text to hand to the share facility.
#[wasm_bindgen]
pub struct SharePayloadJs {
    title: String,
    text: String,
}

#[wasm_bindgen]
impl SharePayloadJs {
    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new receipt extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: ReceiptParser::new(),
        }
    }

    /// Enable or disable the known-brand special case in vendor detection.
    #[wasm_bindgen]
    pub fn set_brand_parity(&mut self, enabled: bool) {
        let heuristic = if enabled {
            VendorHeuristic::BrandParity
        } else {
            VendorHeuristic::WordsBeforeDigit
        };
        self.parser = ReceiptParser::new().with_vendor_heuristic(heuristic);
    }

    /// Extract a record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        record_to_js(&self.parser.parse(text).record)
    }

    /// Extract with warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);

        #[derive(serde::Serialize)]
        struct ExtractResult {
            record: ExtractedRecord,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            record: result.record,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        };

        serde_wasm_bindgen::to_value(&output).map_err(to_js_error)
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Session state machine driven by JavaScript-side OCR.
///
/// `begin` returns a ticket id; the caller reports back with `complete` or
/// `fail` once its recognizer resolves.
#[wasm_bindgen]
pub struct ReceiptSession {
    session: Session,
    ticket: Option<RecognitionTicket>,
}

#[wasm_bindgen]
impl ReceiptSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            ticket: None,
        }
    }

    /// Select an image. Throws "Please upload an image file" for non-images.
    #[wasm_bindgen]
    pub fn select_image(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<(), JsValue> {
        self.session.select_image(bytes, mime_type).map_err(to_js_error)
    }

    /// Start a cycle and return its ticket id.
    #[wasm_bindgen]
    pub fn begin(&mut self) -> Result<f64, JsValue> {
        let ticket = self.session.begin().map_err(to_js_error)?;
        let id = ticket.id() as f64;
        self.ticket = Some(ticket);
        Ok(id)
    }

    /// Report recognized text for the in-flight cycle.
    #[wasm_bindgen]
    pub fn complete(&mut self, ticket: f64, text: &str) -> Result<JsValue, JsValue> {
        let ticket = self.take_ticket(ticket)?;
        let record = self.session.complete(ticket, text).map_err(to_js_error)?;
        record_to_js(record)
    }

    /// Report a recognizer failure for the in-flight cycle.
    #[wasm_bindgen]
    pub fn fail(&mut self, ticket: f64, detail: &str) -> Result<String, JsValue> {
        let ticket = self.take_ticket(ticket)?;
        self.session
            .fail(ticket, &RecognitionError::new(detail))
            .map_err(to_js_error)?;
        Ok(self.session.error_message().unwrap_or_default().to_string())
    }

    /// Current state name.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.session.state().name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.session.is_busy()
    }

    /// The record from the last successful cycle, or `undefined`.
    #[wasm_bindgen]
    pub fn record(&self) -> Result<JsValue, JsValue> {
        match self.session.record() {
            Some(record) => record_to_js(record),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl ReceiptSession {
    fn take_ticket(&mut self, id: f64) -> Result<RecognitionTicket, JsValue> {
        match self.ticket.take() {
            Some(ticket) if ticket.id() as f64 == id => Ok(ticket),
            other => {
                self.ticket = other;
                Err(JsValue::from_str(&format!("stale recognition ticket {}", id)))
            }
        }
    }
}

impl Default for ReceiptSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const CORNER_DELI: &str = "Store Name: Corner Deli\n123 Main Street, NY\n3/14/2024\n2 Coffee $4.50\nTax $0.50\n$5.00\nCash";

    #[wasm_bindgen_test]
    fn test_is_image_type() {
        assert!(is_image_type("image/jpeg"));
        assert!(!is_image_type("application/pdf"));
    }

    #[wasm_bindgen_test]
    fn test_export_csv() {
        let record = extract_record(CORNER_DELI).unwrap();
        let artifact = export_record(record, "csv").unwrap();
        assert_eq!(artifact.filename(), "extracted_data.csv");
        assert_eq!(artifact.mime_type(), "text/csv");
        assert!(artifact.text().contains("storeName,Corner Deli"));
    }

    #[wasm_bindgen_test]
    fn test_share_payload() {
        let record = extract_record("Cash").unwrap();
        let payload = share_payload(record).unwrap();
        assert_eq!(payload.title(), "Extracted Document Data");
        assert!(payload.text().contains("\"paymentMethod\": \"Cash\""));
    }

    #[wasm_bindgen_test]
    fn test_session_cycle() {
        let mut session = ReceiptSession::new();
        assert!(session.select_image(vec![1, 2, 3], "text/plain").is_err());
        assert_eq!(session.state(), "idle");

        session.select_image(vec![1, 2, 3], "image/png").unwrap();
        let ticket = session.begin().unwrap();
        assert!(session.busy());
        assert!(session.begin().is_err());
        assert!(session.complete(ticket + 1.0, "").is_err());

        session.complete(ticket, CORNER_DELI).unwrap();
        assert_eq!(session.state(), "extracted");

        let ticket = session.begin().unwrap();
        let message = session.fail(ticket, "unreadable").unwrap();
        assert_eq!(message, "Error processing image: unreadable");
        assert_eq!(session.state(), "failed");
        assert!(!session.record().unwrap().is_undefined());
    }
}
