//! WASM bindings for flyer event extraction.
//!
//! Text recognition happens on the JavaScript side; this crate turns the
//! recognized text into a structured event.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use flyer_core::models::config::CalendarConfig;
use flyer_core::models::event::parse_date_override;
use flyer_core::{CalendarEvent, EventParser, EventUpdate, FlyerParser, StructuredEvent};

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

/// Extract an event from recognized flyer text.
#[wasm_bindgen]
pub fn extract_event_from_text(text: &str) -> Result<JsValue, JsValue> {
    EventExtractor::new(None)?.extract(text)
}

/// Normalize free-form date text to `YYYY-MM-DD`, relative to today.
#[wasm_bindgen]
pub fn normalize_date(text: &str) -> Option<String> {
    flyer_core::normalize_date(text, today()).map(|d| d.to_string())
}

/// Event extractor class for browser use.
#[wasm_bindgen]
pub struct EventExtractor {
    parser: FlyerParser,
    reference: NaiveDate,
}

#[wasm_bindgen]
impl EventExtractor {
    /// Create an extractor. Partial dates are completed from
    /// `reference_date` (`YYYY-MM-DD`) or, when omitted, today.
    #[wasm_bindgen(constructor)]
    pub fn new(reference_date: Option<String>) -> Result<EventExtractor, JsValue> {
        let reference = match reference_date.as_deref() {
            Some(raw) => parse_date_override(raw).ok_or_else(|| {
                JsValue::from_str(&format!("invalid reference date {:?}, expected YYYY-MM-DD", raw))
            })?,
            None => today(),
        };

        Ok(Self {
            parser: FlyerParser::with_reference_date(reference),
            reference,
        })
    }

    /// Extract an event from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).event)
    }

    /// Extract an event along with warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);

        #[derive(Serialize)]
        struct ExtractResult {
            event: StructuredEvent,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        to_js(&ExtractResult {
            event: result.event,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        })
    }

    /// Apply a user edit to a previously extracted event.
    #[wasm_bindgen]
    pub fn apply_update(&self, event: JsValue, update: JsValue) -> Result<JsValue, JsValue> {
        let event: StructuredEvent = from_js(event)?;
        let update: EventUpdate = from_js(update)?;
        to_js(&event.apply(&update))
    }

    /// Build a calendar insert payload for an extracted event.
    #[wasm_bindgen]
    pub fn calendar_event(&self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: StructuredEvent = from_js(event)?;
        to_js(&CalendarEvent::from_event(
            &event,
            &CalendarConfig::default(),
            self.reference,
        ))
    }
}

/// Today's local date from the JavaScript clock.
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

/// Plain JS objects with `null` for absent fields.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
