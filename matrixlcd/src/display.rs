//! Display geometry and literal text segmentation.

/// Character cell width in pixels.
pub const CHAR_WIDTH: usize = 5;

/// Character cell height in pixels.
pub const CHAR_HEIGHT: usize = 8;

/// Visible columns.
pub const LCD_WIDTH: usize = 20;

/// Visible rows.
pub const LCD_HEIGHT: usize = 4;

/// Characters that fit on one screen.
pub const SCREEN_CHARS: usize = LCD_WIDTH * LCD_HEIGHT;

/// Split literal text into screen-sized segments, in order.
///
/// The last segment may be shorter than a full screen. Empty text yields no
/// segments.
pub fn segments(text: &[u8]) -> std::slice::Chunks<'_, u8> {
    text.chunks(SCREEN_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_segment() {
        let parts: Vec<&[u8]> = segments(b"Hello!").collect();
        assert_eq!(parts, vec![b"Hello!".as_slice()]);
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert_eq!(segments(b"").count(), 0);
    }

    #[test]
    fn test_long_text_keeps_order() {
        let text: Vec<u8> = (0..=200u8).collect();
        let parts: Vec<&[u8]> = segments(&text).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), SCREEN_CHARS);
        assert_eq!(parts[1].len(), SCREEN_CHARS);
        assert_eq!(parts[2].len(), 201 - 2 * SCREEN_CHARS);
        assert_eq!(parts.concat(), text);
    }
}
