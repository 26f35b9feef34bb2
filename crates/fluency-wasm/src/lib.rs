//! WASM bindings for oral reading fluency analysis.
//!
//! Sessions and results cross the boundary as plain JS objects with the same
//! camelCase field names as the JSON session files.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use fluency_core::text::{similarity_with_rule, RULES};
use fluency_core::{
    normalize, normalize_record, FluencyConfig, FluencyEngine, ReadingSession,
};

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

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn session_from_js(session: JsValue) -> Result<ReadingSession, JsValue> {
    let session: ReadingSession = serde_wasm_bindgen::from_value(session)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    session
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(session)
}

/// Analyze a reading session with the default configuration.
#[wasm_bindgen]
pub fn analyze_session(session: JsValue) -> Result<JsValue, JsValue> {
    FluencyAnalyzer::new().analyze(session)
}

/// Locate the OCR span a session covers.
#[wasm_bindgen]
pub fn locate_range(session: JsValue) -> Result<JsValue, JsValue> {
    FluencyAnalyzer::new().locate(session)
}

/// Canonical comparison form of a word.
#[wasm_bindgen]
pub fn normalize_word(word: &str) -> String {
    normalize(word)
}

/// Similarity of two words in [0, 1], after normalization.
#[wasm_bindgen]
pub fn word_similarity(a: &str, b: &str) -> f64 {
    similarity_with_rule(&normalize(a), &normalize(b)).0
}

/// Name of the similarity rule that scores a pair of words.
#[wasm_bindgen]
pub fn similarity_rule(a: &str, b: &str) -> String {
    similarity_with_rule(&normalize(a), &normalize(b)).1.to_string()
}

/// Names of the similarity rules, strongest first.
#[wasm_bindgen]
pub fn similarity_rules() -> js_sys::Array {
    RULES.iter().map(|rule| JsValue::from_str(rule.name)).collect()
}

/// Normalize a stored session record (JSON text) into a summary object.
#[wasm_bindgen]
pub fn normalize_history_record(json: &str) -> Result<JsValue, JsValue> {
    let summary = normalize_record(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&summary)
}

/// Fluency analyzer class holding a configuration.
#[wasm_bindgen]
pub struct FluencyAnalyzer {
    config: FluencyConfig,
    engine: FluencyEngine,
}

#[wasm_bindgen]
impl FluencyAnalyzer {
    /// Create an analyzer with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_config(FluencyConfig::default())
    }

    /// Create an analyzer from a configuration object.
    #[wasm_bindgen]
    pub fn from_config(config: JsValue) -> Result<FluencyAnalyzer, JsValue> {
        let config: FluencyConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(config))
    }

    /// Current configuration as pretty-printed JSON.
    #[wasm_bindgen]
    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(&self.config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Full analysis of a session object.
    #[wasm_bindgen]
    pub fn analyze(&self, session: JsValue) -> Result<JsValue, JsValue> {
        let session = session_from_js(session)?;
        to_js(&self.engine.analyze(&session))
    }

    /// Count-only summary of a session object.
    #[wasm_bindgen]
    pub fn summarize(&self, session: JsValue) -> Result<JsValue, JsValue> {
        let session = session_from_js(session)?;
        to_js(&self.engine.analyze(&session).summary())
    }

    /// Range covered by a session object.
    #[wasm_bindgen]
    pub fn locate(&self, session: JsValue) -> Result<JsValue, JsValue> {
        let session = session_from_js(session)?;
        to_js(&self.engine.locate(&session.spoken_words, &session.ocr_words))
    }
}

impl FluencyAnalyzer {
    fn with_config(config: FluencyConfig) -> Self {
        Self {
            engine: FluencyEngine::new(config.clone()),
            config,
        }
    }
}

impl Default for FluencyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
