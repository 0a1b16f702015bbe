//! Packed LED colors.
//!
//! WS2812-class LEDs shift in green, then red, then blue. A pixel word is
//! laid out so the transmitter can send its top three bytes MSB-first:
//!
//! ```text
//!  31      24 23      16 15       8 7        0
//! ┌──────────┬──────────┬──────────┬──────────┐
//! │  green   │   red    │   blue   │  alpha   │
//! └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! Alpha is never transmitted and is always zero, so black is `0`.

/// One packed GRBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Grba(pub u32);

impl Grba {
    pub const BLACK: Grba = Grba(0);

    #[inline]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Grba((green as u32) << 24 | (red as u32) << 16 | (blue as u32) << 8)
    }

    /// Convert hue (degrees), saturation and value (both `0.0..=1.0`).
    ///
    /// Standard six-sector conversion. Hues at or above 360 wrap to 0.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        if saturation <= 0.0 {
            let v = unit_to_byte(value);
            return Grba::from_rgb(v, v, v);
        }

        let hue = if hue >= 360.0 || hue < 0.0 { 0.0 } else { hue };
        let sector_pos = hue / 60.0;
        let sector = sector_pos as u32;
        let ff = sector_pos - sector as f32;

        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * ff);
        let t = value * (1.0 - saturation * (1.0 - ff));

        let (r, g, b) = match sector {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        Grba::from_rgb(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        self.0 as u8
    }

    /// Channel-wise additive blend. Channels wrap on overflow rather than
    /// saturate; alpha is cleared.
    #[inline]
    pub const fn blend(self, other: Grba) -> Self {
        Grba::from_rgb(
            self.red().wrapping_add(other.red()),
            self.green().wrapping_add(other.green()),
            self.blue().wrapping_add(other.blue()),
        )
    }
}

impl From<Grba> for u32 {
    fn from(color: Grba) -> u32 {
        color.0
    }
}

/// `0.0..=1.0` to `0..=255`, truncating.
#[inline(always)]
fn unit_to_byte(x: f32) -> u8 {
    // `as` saturates, and maps NaN to 0
    (x * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_grba_order() {
        let c = Grba::from_rgb(0x11, 0x22, 0x33);
        assert_eq!(c.0, 0x2211_3300);
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0x11, 0x22, 0x33, 0));
        assert_eq!(u32::from(c), 0x2211_3300);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(Grba::from_hsv(0.0, 1.0, 1.0), Grba::from_rgb(255, 0, 0));
        assert_eq!(Grba::from_hsv(120.0, 1.0, 1.0), Grba::from_rgb(0, 255, 0));
        assert_eq!(Grba::from_hsv(240.0, 1.0, 1.0), Grba::from_rgb(0, 0, 255));
        assert_eq!(Grba::from_hsv(360.0, 1.0, 1.0), Grba::from_rgb(255, 0, 0));
    }

    #[test]
    fn hsv_intermediate_hues() {
        // sector 1, halfway: q = 0.5
        assert_eq!(Grba::from_hsv(90.0, 1.0, 1.0), Grba::from_rgb(127, 255, 0));
        // sector 5, halfway: q = 0.5
        assert_eq!(Grba::from_hsv(330.0, 1.0, 1.0), Grba::from_rgb(255, 0, 127));
    }

    #[test]
    fn hsv_value_and_grey() {
        assert_eq!(Grba::from_hsv(0.0, 1.0, 0.0), Grba::BLACK);
        assert_eq!(Grba::from_hsv(200.0, 0.0, 1.0), Grba::from_rgb(255, 255, 255));
    }

    #[test]
    fn blend_wraps() {
        let a = Grba::from_rgb(200, 10, 0);
        let b = Grba::from_rgb(100, 20, 5);
        assert_eq!(a.blend(b), Grba::from_rgb(44, 30, 5));
        assert_eq!(a.blend(Grba::BLACK), a);
    }
}
