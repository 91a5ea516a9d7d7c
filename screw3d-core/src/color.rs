/// RGB colors and `#rrggbb` literal parsing
use nom::{
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map_res},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{GeometryError, Result};

/// An 8-bit-per-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` literal (case-insensitive)
    pub fn from_hex(input: &str) -> Result<Self> {
        match all_consuming(hex_color)(input.trim()) {
            Ok((_, color)) => Ok(color),
            Err(e) => Err(GeometryError::Color {
                input: input.to_string(),
                reason: format!("{:?}", e),
            }),
        }
    }

    /// Multiply every channel by `factor`, saturating at 0 and 255
    pub fn scale(self, factor: f64) -> Self {
        let channel = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Per-channel saturating sum
    pub fn saturating_add(self, other: Rgb) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }
}

fn hex_channel(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s: &str| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    let (input, (r, g, b)) =
        preceded(tag("#"), tuple((hex_channel, hex_channel, hex_channel)))(input)?;
    Ok((input, Rgb::new(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#bfa063").unwrap(), Rgb::new(0xbf, 0xa0, 0x63));
        assert_eq!(Rgb::from_hex("#1A0F00").unwrap(), Rgb::new(0x1a, 0x0f, 0x00));
    }

    #[test]
    fn test_reject_malformed() {
        assert!(Rgb::from_hex("bfa063").is_err());
        assert!(Rgb::from_hex("#bfa06").is_err());
        assert!(Rgb::from_hex("#bfa0631").is_err());
        assert!(matches!(
            Rgb::from_hex("#zzzzzz"),
            Err(GeometryError::Color { .. })
        ));
    }

    #[test]
    fn test_scale_saturates() {
        let c = Rgb::new(200, 100, 0);
        assert_eq!(c.scale(0.5), Rgb::new(100, 50, 0));
        assert_eq!(c.scale(2.0), Rgb::new(255, 200, 0));
        assert_eq!(c.saturating_add(Rgb::new(100, 0, 10)), Rgb::new(255, 100, 10));
    }
}
