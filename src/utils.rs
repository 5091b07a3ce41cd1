// src/utils.rs
use std::path::Path;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Media type a file picker would declare for this name
pub fn media_type_for_name(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => PDF_MEDIA_TYPE,
        Some("docx") => DOCX_MEDIA_TYPE,
        _ => UNKNOWN_MEDIA_TYPE,
    }
}

/// Backend fraction (0.0..=1.0) to integer percent, half away from zero.
/// Returns `None` for NaN or infinite input.
pub fn fraction_to_percent(fraction: f64) -> Option<u8> {
    if !fraction.is_finite() {
        return None;
    }
    // f64::round rounds half away from zero
    let percent = (fraction * 100.0).round().clamp(0.0, 100.0);
    Some(percent as u8)
}

/// Cut to at most `max_chars` characters, appending "..." when shortened
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Human readable size, e.g. "2.0 MB"
pub fn format_size(size_bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes = size_bytes as f64;
    if bytes < KB {
        format!("{} B", size_bytes)
    } else if bytes < KB * KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{:.1} MB", bytes / KB / KB)
    }
}
