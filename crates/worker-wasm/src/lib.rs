//! WASM-compatible wrapper for code highlighting in slide HTML.
//!
//! This crate exposes the document pass to JavaScript so a browser-based
//! presentation host can highlight its slides and change line highlighting
//! while presenting.

use codeslide_core::{PluginConfig, ProcessingReport, RangeSpec};
use codeslide_dom::{ProcessedDocument, TagProcessor};
use codeslide_syntect::SyntectHighlighter;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of processing an HTML string.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResult {
    /// The document with all code tags replaced.
    pub html: String,
    /// Per-tag outcomes.
    pub report: ProcessingReport,
}

/// Highlight all code tags in an HTML document or fragment.
///
/// # Arguments
/// * `html` - The slide markup
/// * `config` - Plugin configuration object (may be `undefined`)
///
/// # Returns
/// A JavaScript object `{ html, report }`, or throws on error.
#[wasm_bindgen]
pub fn process_html(html: &str, config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let result = process_html_impl(html, &config).map_err(|e| JsValue::from_str(&e))?;

    to_js(&result)
}

fn process_html_impl(html: &str, config: &PluginConfig) -> Result<ProcessResult, String> {
    let processed = process_document(html, config)?;

    Ok(ProcessResult {
        html: processed.to_html().map_err(|e| e.to_string())?,
        report: processed.report().clone(),
    })
}

fn process_document(html: &str, config: &PluginConfig) -> Result<ProcessedDocument, String> {
    let highlighter = SyntectHighlighter::from_config(config).map_err(|e| e.to_string())?;
    Ok(TagProcessor::with_config(highlighter, config).process_html(html))
}

/// Serialize to plain JS objects (maps become objects, not `Map`s).
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn config_from_js(config: JsValue) -> Result<PluginConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(PluginConfig::default());
    }

    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

/// A processed slide deck whose code blocks stay addressable.
#[wasm_bindgen]
pub struct SlideDeck {
    document: ProcessedDocument,
}

#[wasm_bindgen]
impl SlideDeck {
    /// Process `html` and keep the result alive for later highlighting.
    #[wasm_bindgen(constructor)]
    pub fn new(html: &str, config: JsValue) -> Result<SlideDeck, JsValue> {
        let config = config_from_js(config)?;
        let document = process_document(html, &config).map_err(|e| JsValue::from_str(&e))?;
        Ok(SlideDeck { document })
    }

    /// Number of rendered `<source-code>` blocks.
    pub fn block_count(&self) -> usize {
        self.document.blocks().len()
    }

    /// Number of lines in a block.
    pub fn lines(&self, block: usize) -> Result<usize, JsValue> {
        self.document
            .block(block)
            .map(|b| b.lines())
            .ok_or_else(|| JsValue::from_str(&format!("No code block at index {}", block)))
    }

    /// Highlight lines of a block.
    ///
    /// `spec` is either a string such as `"1, 3, [7, 9]"` or an array of
    /// line numbers and `[start, end]` pairs.
    pub fn highlight_lines(&self, block: usize, spec: JsValue) -> Result<(), JsValue> {
        let spec = range_spec_from_js(spec)?;
        self.document
            .highlight_lines(block, spec)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// 1-based positions of the highlighted lines of a block.
    pub fn highlighted_lines(&self, block: usize) -> js_sys::Array {
        self.document
            .block(block)
            .map(|b| b.highlighted_lines())
            .unwrap_or_default()
            .into_iter()
            .map(|line| JsValue::from_f64(line as f64))
            .collect()
    }

    /// Serialize the deck in its current state.
    pub fn to_html(&self) -> Result<String, JsValue> {
        self.document
            .to_html()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Per-tag outcomes of the initial pass.
    pub fn report(&self) -> Result<JsValue, JsValue> {
        to_js(self.document.report())
    }
}

fn range_spec_from_js(spec: JsValue) -> Result<RangeSpec, JsValue> {
    if spec.is_undefined() || spec.is_null() {
        return Ok(RangeSpec::empty());
    }

    match spec.as_string() {
        Some(text) => parse_range_spec(&text),
        None => serde_wasm_bindgen::from_value(spec)
            .map_err(|e| JsValue::from_str(&format!("Invalid line ranges: {}", e))),
    }
}

fn parse_range_spec(text: &str) -> Result<RangeSpec, JsValue> {
    RangeSpec::parse(text).map_err(|e| JsValue::from_str(&e.to_string()))
}
