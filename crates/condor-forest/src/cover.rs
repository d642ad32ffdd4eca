//! Tree cover codes and their display colours.

/// The kind of trees growing in one forest map cell.
///
/// | code   | colour (RGBA)      |
/// |--------|--------------------|
/// | `0x00` | black `0,0,0,255`  |
/// | `0x01` | red `255,0,0,255`  |
/// | `0x02` | blue `0,0,255,255` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeCover {
    /// No trees.
    None,
    /// Coniferous trees.
    Coniferous,
    /// Deciduous trees.
    Deciduous,
}

impl TreeCover {
    /// All cover kinds in code order.
    pub const ALL: [TreeCover; 3] = [TreeCover::None, TreeCover::Coniferous, TreeCover::Deciduous];

    /// Look up the cover for an on-disk code.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::None),
            0x01 => Some(Self::Coniferous),
            0x02 => Some(Self::Deciduous),
            _ => None,
        }
    }

    /// The on-disk code.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0x00,
            Self::Coniferous => 0x01,
            Self::Deciduous => 0x02,
        }
    }

    /// The opaque colour the cover is drawn with.
    #[inline]
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            Self::None => [0x00, 0x00, 0x00, 0xFF],
            Self::Coniferous => [0xFF, 0x00, 0x00, 0xFF],
            Self::Deciduous => [0x00, 0x00, 0xFF, 0xFF],
        }
    }

    /// Classify a colour. Anything other than exact opaque red or blue
    /// means no trees.
    #[inline]
    pub fn from_rgba(pixel: &[u8]) -> Self {
        match pixel {
            [0xFF, 0x00, 0x00, 0xFF] => Self::Coniferous,
            [0x00, 0x00, 0xFF, 0xFF] => Self::Deciduous,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for TreeCover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Coniferous => "coniferous",
            Self::Deciduous => "deciduous",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for cover in TreeCover::ALL {
            assert_eq!(TreeCover::from_code(cover.code()), Some(cover));
            assert_eq!(TreeCover::from_rgba(&cover.rgba()), cover);
        }
        assert_eq!(TreeCover::from_code(3), None);
    }

    #[test]
    fn test_near_colours_are_empty() {
        assert_eq!(TreeCover::from_rgba(&[0xFF, 0x00, 0x00, 0xFE]), TreeCover::None);
        assert_eq!(TreeCover::from_rgba(&[0xFE, 0x00, 0x00, 0xFF]), TreeCover::None);
        assert_eq!(TreeCover::from_rgba(&[10, 10, 10, 255]), TreeCover::None);
        assert_eq!(TreeCover::from_rgba(&[0x00, 0x00, 0xFF]), TreeCover::None);
    }
}
