use crate::error::{ExportError, ExportResult};

/// Normalize a user supplied content id.
///
/// The UI shows ids as 16 hex digits, while some screens expose the decimal
/// form. Hex ids are upper-cased; decimal ids are converted to zero-padded
/// upper-case hex.
pub fn normalize_content_id(input: &str) -> ExportResult<String> {
    let trimmed = input.trim();

    if trimmed.len() == 16 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(trimmed.to_ascii_uppercase());
    }

    let number: u64 = trimmed.parse().map_err(|_| {
        ExportError::InvalidInput(format!(
            "'{}' is neither a 16 digit hex id nor a decimal id",
            input
        ))
    })?;

    Ok(format!("{:016X}", number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_id_is_uppercased() {
        assert_eq!(
            normalize_content_id("00000000005e5a0b").unwrap(),
            "00000000005E5A0B"
        );
    }

    #[test]
    fn test_decimal_id_is_converted() {
        assert_eq!(normalize_content_id("6183435").unwrap(), "00000000005E5A0B");
        assert_eq!(normalize_content_id(" 255 ").unwrap(), "00000000000000FF");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            normalize_content_id("my folder"),
            Err(ExportError::InvalidInput(_))
        ));
    }
}
