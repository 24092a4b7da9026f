//! Pixel format conversions.
//!
//! Palettes are stored on disk as 15-bit colours with the low five bits
//! holding red and bit 15 acting as a transparency/semi-transparency flag.
//! The decoders hand out 16-bit 5-6-5 colours (red in the top five bits).

/// Bit 15 of a stored palette entry.
pub const TRANSPARENT_BIT: u16 = 0x8000;

/// Convert a stored 5-5-5 entry to a packed 5-6-5 colour.
///
/// The five green bits land in the top of the six-bit green field; bit 15 is
/// ignored.
#[inline]
pub const fn rgb555_to_rgb565(pixel: u16) -> u16 {
    let red = (pixel & 0x1F) << 11;
    let green = ((pixel >> 5) & 0x1F) << 6;
    let blue = (pixel >> 10) & 0x1F;
    red | green | blue
}

/// Whether a stored 5-5-5 entry has its transparency bit set.
#[inline]
pub const fn is_transparent(pixel: u16) -> bool {
    pixel & TRANSPARENT_BIT != 0
}

/// Expand a packed 5-6-5 colour to 8-bit RGBA.
#[inline]
pub const fn rgb565_to_rgba8(pixel: u16, alpha: u8) -> [u8; 4] {
    let r = ((pixel >> 11) & 0x1F) as u8;
    let g = ((pixel >> 5) & 0x3F) as u8;
    let b = (pixel & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_placement() {
        // Pure red in the stored format is the low five bits.
        assert_eq!(rgb555_to_rgb565(0x001F), 0xF800);
        // Pure green.
        assert_eq!(rgb555_to_rgb565(0x03E0), 0x07C0);
        // Pure blue.
        assert_eq!(rgb555_to_rgb565(0x7C00), 0x001F);
    }

    #[test]
    fn test_transparency_bit_ignored() {
        assert_eq!(rgb555_to_rgb565(0x8000), 0);
        assert_eq!(rgb555_to_rgb565(0x801F), rgb555_to_rgb565(0x001F));
        assert!(is_transparent(0x8000));
        assert!(!is_transparent(0x7FFF));
    }

    #[test]
    fn test_rgba_expansion() {
        assert_eq!(rgb565_to_rgba8(0xFFFF, 255), [255, 255, 255, 255]);
        assert_eq!(rgb565_to_rgba8(0x0000, 0), [0, 0, 0, 0]);
        assert_eq!(rgb565_to_rgba8(0xF800, 255), [255, 0, 0, 255]);
    }
}
