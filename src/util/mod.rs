//! Utility module
//!
//! This module provides small helpers shared across the library.

use std::fmt;

/// Number of leading bytes shown by [`HexPreview`]
pub const PREVIEW_LEN: usize = 16;

/// Lazily formats the first bytes of a buffer as space-separated hex, for
/// trace-level logging of outgoing datagrams
pub struct HexPreview<'a>(pub &'a [u8]);

impl fmt::Display for HexPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.0[..self.0.len().min(PREVIEW_LEN)];
        for (i, byte) in shown.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        if self.0.len() > PREVIEW_LEN {
            write!(f, " .. ({} bytes)", self.0.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_buffer() {
        assert_eq!(HexPreview(&[0x25, 0xEB, 0x01]).to_string(), "25 eb 01");
        assert_eq!(HexPreview(&[]).to_string(), "");
    }

    #[test]
    fn test_long_buffer_truncated() {
        let bytes = [0xAB; 20];
        let preview = HexPreview(&bytes).to_string();
        assert!(preview.starts_with("ab ab"));
        assert!(preview.ends_with(".. (20 bytes)"));
        assert_eq!(preview.matches("ab").count(), PREVIEW_LEN);
    }
}
