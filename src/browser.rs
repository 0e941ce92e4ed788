//! Browser Helpers
//!
//! Thin wrappers over window APIs used by UI actions.

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;

use crate::api::{ApiError, FilePart};

/// Blocking alert; errors are logged, never propagated
pub fn alert(message: &str) {
    let shown = web_sys::window().map(|w| w.alert_with_message(message));
    if !matches!(shown, Some(Ok(()))) {
        tracing::warn!(%message, "could not show alert");
    }
}

pub fn reload_page() {
    if let Some(win) = web_sys::window() {
        if let Err(e) = win.location().reload() {
            tracing::warn!(error = ?e, "page reload failed");
        }
    }
}

pub fn hostname() -> Option<String> {
    web_sys::window()?.location().hostname().ok()
}

pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read every file staged in a file input; each entry is read independently
pub async fn read_staged_files(input: &web_sys::HtmlInputElement) -> Vec<Result<FilePart, ApiError>> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    let mut parts = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        if let Some(file) = list.get(index) {
            parts.push(read_file(&file).await);
        }
    }
    parts
}

async fn read_file(file: &web_sys::File) -> Result<FilePart, ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::Browser(format!("could not read {}: {:?}", file.name(), e)))?;
    let mime = file.type_();
    Ok(FilePart {
        field: "file".to_string(),
        file_name: file.name(),
        mime: Some(mime).filter(|m| !m.is_empty()),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}
