//! Knowledge-graph annotation - WebAssembly bindings
//!
//! Runs the annotation engine in the browser so chat messages can be
//! highlighted client-side. Spans come back as plain JS objects:
//! `{ span: "literal", text }` or `{ span: "entity", text, type, style }`.

use kg_annotate::{Annotator, StyleTable};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// Built-in table with the caller's entries laid over it, same as a
/// `STYLE_TABLE` file on the server.
fn style_overrides(overrides: Option<StyleTable>) -> StyleTable {
    match overrides {
        Some(overrides) => StyleTable::default().merged(overrides),
        None => StyleTable::default(),
    }
}

fn annotator(styles: JsValue) -> Result<Annotator, JsValue> {
    if styles.is_undefined() || styles.is_null() {
        return Ok(Annotator::default());
    }
    let overrides: StyleTable = serde_wasm_bindgen::from_value(styles)?;
    Ok(Annotator::new(style_overrides(Some(overrides))))
}

// =============================================================================
// WASM EXPORTS
// =============================================================================

/// Spans for one message. `styles` is optional and overrides built-in entries.
#[wasm_bindgen(js_name = buildAnnotations)]
pub fn build_annotations(context: &str, text: &str, styles: JsValue) -> Result<JsValue, JsValue> {
    let spans = annotator(styles)?.build_annotations(context, text);
    to_js(&spans)
}

/// Entities declared or referenced in a context.
#[wasm_bindgen(js_name = extractEntities)]
pub fn extract_entities(context: &str) -> Result<JsValue, JsValue> {
    to_js(&kg_annotate::extract(context))
}

/// Entities plus spans for every message in a transcript, compiling the
/// context once.
#[wasm_bindgen(js_name = annotateTranscript)]
pub fn annotate_transcript(context: &str, messages: Vec<String>, styles: JsValue) -> Result<JsValue, JsValue> {
    to_js(&annotator(styles)?.annotate_transcript(context, &messages))
}

/// Built-in type → style table, for legends and tooltips.
#[wasm_bindgen(js_name = styleTable)]
pub fn style_table() -> Result<JsValue, JsValue> {
    to_js(&StyleTable::default())
}
