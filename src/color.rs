// src/color.rs

//! Colour codec: packs ARGB / greyscale values into the single 32-bit integer
//! the display drivers take, and back.
//!
//! The wire layout is `A << 24 | R << 16 | G << 8 | B`. Packing and unpacking
//! are exact inverses for every `Argb`.

use crate::error::{DisplayError, Result};
use serde::{Deserialize, Serialize};

/// A colour as sent over the wire to the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedColor(pub u32);

/// 4-channel colour value, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Argb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Argb {
    pub const BLACK: Argb = Argb::opaque(0, 0, 0);
    pub const WHITE: Argb = Argb::opaque(255, 255, 255);
    pub const RED: Argb = Argb::opaque(255, 0, 0);
    pub const GREEN: Argb = Argb::opaque(0, 255, 0);
    pub const BLUE: Argb = Argb::opaque(0, 0, 255);
    pub const TRANSPARENT: Argb = Argb::new(0, 0, 0, 0);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { a: 255, r, g, b }
    }

    /// Greyscale shorthand: fully opaque, equal channels.
    pub const fn grey(level: u8) -> Self {
        Self::opaque(level, level, level)
    }

    pub const fn pack(self) -> PackedColor {
        PackedColor(
            (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32,
        )
    }

    /// Channels in wire order.
    pub fn to_channels(self) -> [u8; 4] {
        [self.a, self.r, self.g, self.b]
    }

    /// Builds a colour from a 1 (grey), 3 (RGB) or 4 (ARGB) channel tuple.
    pub fn from_channels(channels: &[u8]) -> Result<Self> {
        match *channels {
            [a, r, g, b] => Ok(Argb::new(a, r, g, b)),
            [r, g, b] => Ok(Argb::opaque(r, g, b)),
            [level] => Ok(Argb::grey(level)),
            _ => Err(DisplayError::InvalidColorFormat {
                channels: channels.len(),
            }),
        }
    }
}

impl From<PackedColor> for Argb {
    fn from(packed: PackedColor) -> Self {
        unpack(packed)
    }
}

impl From<Argb> for PackedColor {
    fn from(colour: Argb) -> Self {
        colour.pack()
    }
}

impl TryFrom<Vec<u8>> for Argb {
    type Error = DisplayError;

    fn try_from(channels: Vec<u8>) -> Result<Self> {
        Argb::from_channels(&channels)
    }
}

impl From<Argb> for Vec<u8> {
    fn from(colour: Argb) -> Self {
        colour.to_channels().to_vec()
    }
}

/// Packs a 1, 3 or 4 channel tuple. Any other length is `InvalidColorFormat`.
pub fn pack(channels: &[u8]) -> Result<PackedColor> {
    Argb::from_channels(channels).map(Argb::pack)
}

/// Splits a packed colour into its channels. Total: every `u32` is a colour.
pub fn unpack(packed: PackedColor) -> Argb {
    let v = packed.0;
    Argb {
        a: ((v & 0xff00_0000) >> 24) as u8,
        r: ((v & 0x00ff_0000) >> 16) as u8,
        g: ((v & 0x0000_ff00) >> 8) as u8,
        b: (v & 0x0000_00ff) as u8,
    }
}

/// Checks a greyscale level coming from arithmetic (e.g. bitmap intensity
/// mapping) before it reaches a driver.
pub fn validate_grey(level: i32) -> Result<u8> {
    u8::try_from(level).map_err(|_| DisplayError::InvalidGreyValue(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn argb_layout_is_big_endian_ordered() {
        assert_eq!(Argb::new(0x12, 0x34, 0x56, 0x78).pack(), PackedColor(0x1234_5678));
        assert_eq!(Argb::RED.pack(), PackedColor(0xffff_0000));
    }

    #[test]
    fn rgb_is_opaque_argb() {
        assert_eq!(pack(&[10, 20, 30]), pack(&[255, 10, 20, 30]));
    }

    #[test]
    fn grey_replicates_channels() {
        assert_eq!(pack(&[77]), pack(&[255, 77, 77, 77]));
        assert_eq!(pack(&[77]).unwrap(), Argb::grey(77).pack());
    }

    #[test]
    fn other_channel_counts_are_rejected() {
        assert_eq!(
            pack(&[1, 2]),
            Err(DisplayError::InvalidColorFormat { channels: 2 })
        );
        assert_eq!(
            pack(&[]),
            Err(DisplayError::InvalidColorFormat { channels: 0 })
        );
        assert!(pack(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn validate_grey_bounds() {
        assert_eq!(validate_grey(0), Ok(0));
        assert_eq!(validate_grey(255), Ok(255));
        assert_eq!(validate_grey(-1), Err(DisplayError::InvalidGreyValue(-1)));
        assert_eq!(validate_grey(256), Err(DisplayError::InvalidGreyValue(256)));
    }

    #[test]
    fn argb_deserializes_from_channel_arrays() {
        let c: Argb = serde_json::from_str("[255, 0, 0]").unwrap();
        assert_eq!(c, Argb::RED);
        let c: Argb = serde_json::from_str("[0]").unwrap();
        assert_eq!(c, Argb::BLACK);
        assert!(serde_json::from_str::<Argb>("[1, 2]").is_err());
        assert_eq!(serde_json::to_string(&Argb::BLUE).unwrap(), "[255,0,0,255]");
    }

    proptest! {
        #[test]
        fn unpack_inverts_pack(
            a in any::<u8>(),
            r in any::<u8>(),
            g in any::<u8>(),
            b in any::<u8>(),
        ) {
            let c = Argb::new(a, r, g, b);
            prop_assert_eq!(unpack(c.pack()), c);
        }

        #[test]
        fn pack_inverts_unpack(v in any::<u32>()) {
            prop_assert_eq!(unpack(PackedColor(v)).pack(), PackedColor(v));
        }

        #[test]
        fn rgb_packs_as_opaque_argb(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            prop_assert_eq!(pack(&[r, g, b]), pack(&[255, r, g, b]));
        }

        #[test]
        fn grey_packs_as_replicated_argb(g in any::<u8>()) {
            prop_assert_eq!(pack(&[g]), pack(&[255, g, g, g]));
        }
    }
}
