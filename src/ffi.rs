//! FFI interface for embedding hosts
//!
//! Provides C-compatible functions around the extraction engine.
//! Structured results are passed as JSON strings.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::blocked::looks_blocked_or_missing;
use crate::extractors::{extract_opengraph, extract_product, normalize_detail_html};
use crate::logging::init_logging;
use crate::site::classify_site;

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via storefront_free_result
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Extract a product record from a page.
///
/// The ruleset is picked from `source_url`, which is also the base for
/// relative URLs. The JSON is a camelCase product record.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `source_url` must be a valid null-terminated C string
/// - Caller must free the result via `storefront_free_result`
#[no_mangle]
pub unsafe extern "C" fn storefront_extract_product(
    html_ptr: *const c_char,
    html_len: usize,
    source_url: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };
    let source_url = match read_c_str(source_url, "Source URL") {
        Ok(url) => url,
        Err(msg) => return make_error_result(&msg),
    };

    let record = extract_product(classify_site(source_url), html, source_url);
    make_json_result(&record)
}

/// OpenGraph, Twitter Card and product meta tags of a page
///
/// # Safety
/// Same as storefront_extract_product
#[no_mangle]
pub unsafe extern "C" fn storefront_extract_opengraph(
    html_ptr: *const c_char,
    html_len: usize,
) -> ExtractionResultFFI {
    match read_html(html_ptr, html_len) {
        Ok(html) => make_json_result(&extract_opengraph(html)),
        Err(msg) => make_error_result(msg),
    }
}

/// Sanitized description HTML, returned as a JSON string
///
/// # Safety
/// Same as storefront_extract_product
#[no_mangle]
pub unsafe extern "C" fn storefront_normalize_detail_html(
    html_ptr: *const c_char,
    html_len: usize,
    base_url: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };
    let base_url = match read_c_str(base_url, "Base URL") {
        Ok(url) => url,
        Err(msg) => return make_error_result(&msg),
    };

    make_json_result(&normalize_detail_html(html, base_url))
}

/// Site kind of a URL as a JSON string (`"danawa"`, `"naver"`, `"unknown"`)
///
/// # Safety
/// `url` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn storefront_classify_site(url: *const c_char) -> ExtractionResultFFI {
    match read_c_str(url, "URL") {
        Ok(url) => make_json_result(&classify_site(url)),
        Err(msg) => make_error_result(&msg),
    }
}

/// Whether a page looks like a block, error or "product not found" page.
/// Invalid UTF-8 is checked lossily.
///
/// # Safety
/// `html_ptr` must point to valid memory of at least `html_len` bytes
#[no_mangle]
pub unsafe extern "C" fn storefront_looks_blocked(html_ptr: *const c_char, html_len: usize) -> bool {
    if html_ptr.is_null() || html_len == 0 {
        return false;
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    looks_blocked_or_missing(&String::from_utf8_lossy(slice))
}

/// Enable log output to stderr, filtered by `RUST_LOG`
#[no_mangle]
pub extern "C" fn storefront_init_logging() -> bool {
    init_logging()
}

/// Free an ExtractionResultFFI returned by any storefront_* function
///
/// # Safety
/// - `result` must have been returned by this library
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn storefront_free_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

/// Borrow host HTML as UTF-8. Null or zero length reads as empty.
unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content")
}

unsafe fn read_c_str<'a>(value: *const c_char, what: &str) -> Result<&'a str, String> {
    if value.is_null() {
        return Err(format!("{} is null", what));
    }
    CStr::from_ptr(value)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 in {}", what))
}

fn make_json_result<T: Serialize>(value: &T) -> ExtractionResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

fn make_error_result(msg: &str) -> ExtractionResultFFI {
    // Interior NULs cannot cross the boundary, replace them
    let error = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error.into_raw(),
    }
}
