/// The only content type accepted for new files.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 255;

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,
    #[error("Name is too long (max {MAX_NAME_LEN} characters)")]
    TooLong,
    #[error("Name contains invalid characters")]
    InvalidCharacters,
}

/// Check a dataroom, folder or file name.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    if name.contains(FORBIDDEN_CHARS) {
        return Err(NameError::InvalidCharacters);
    }
    Ok(())
}

pub fn is_pdf(mime_type: &str) -> bool {
    mime_type == PDF_MIME_TYPE
}

/// Render a byte count for listings, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
