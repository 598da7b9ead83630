//! Cell contents: a character plus its rendition attributes.

use bitflags::bitflags;

bitflags! {
    /// The six independent boolean SGR flags a cell can carry.
    ///
    /// Colors are not part of this set; see [`Color`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellAttrFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const BLINK     = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
        const INVISIBLE = 0b0010_0000;
    }
}

/// One of the nine colors a foreground or background can hold.
///
/// `DEFAULT` is the terminal's configured default color, distinct from
/// any of the eight ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::TryFrom)]
#[try_from(repr)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    #[default]
    Default = 8,
}

impl Color {
    /// Map an SGR foreground parameter (`30..=37` or `39`) to a `Color`.
    #[must_use]
    pub fn from_sgr_fg(param: usize) -> Option<Self> {
        match param {
            30..=37 => Color::try_from((param - 30) as u8).ok(),
            39 => Some(Color::Default),
            _ => None,
        }
    }

    /// Map an SGR background parameter (`40..=47` or `49`) to a `Color`.
    #[must_use]
    pub fn from_sgr_bg(param: usize) -> Option<Self> {
        match param {
            40..=47 => Color::try_from((param - 40) as u8).ok(),
            49 => Some(Color::Default),
            _ => None,
        }
    }
}

/// The full rendition state applied to a written character: the six
/// boolean flags plus a foreground and background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAttrs {
    pub flags: CellAttrFlags,
    pub fg: Color,
    pub bg: Color,
}

impl Default for CellAttrs {
    fn default() -> Self {
        Self {
            flags: CellAttrFlags::empty(),
            fg: Color::Default,
            bg: Color::Default,
        }
    }
}

impl CellAttrs {
    #[must_use]
    pub fn bold(&self) -> bool {
        self.flags.contains(CellAttrFlags::BOLD)
    }
    #[must_use]
    pub fn dim(&self) -> bool {
        self.flags.contains(CellAttrFlags::DIM)
    }
    #[must_use]
    pub fn underline(&self) -> bool {
        self.flags.contains(CellAttrFlags::UNDERLINE)
    }
    #[must_use]
    pub fn blink(&self) -> bool {
        self.flags.contains(CellAttrFlags::BLINK)
    }
    #[must_use]
    pub fn reverse(&self) -> bool {
        self.flags.contains(CellAttrFlags::REVERSE)
    }
    #[must_use]
    pub fn invisible(&self) -> bool {
        self.flags.contains(CellAttrFlags::INVISIBLE)
    }

    pub(crate) fn set(&mut self, flag: CellAttrFlags, on: bool) {
        self.flags.set(flag, on);
    }
}

/// A single screen position: a character and the attributes it was
/// written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub c: char,
    pub attrs: CellAttrs,
}

impl Cell {
    /// A blank cell (`U+0020`) carrying `attrs`.
    #[must_use]
    pub fn blank(attrs: CellAttrs) -> Self {
        Self { c: ' ', attrs }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(CellAttrs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_try_from_repr_covers_ansi_eight() {
        assert_eq!(Color::try_from(0u8), Ok(Color::Black));
        assert_eq!(Color::try_from(7u8), Ok(Color::White));
        assert_eq!(Color::try_from(8u8), Ok(Color::Default));
        assert!(Color::try_from(9u8).is_err());
    }

    #[test]
    fn from_sgr_fg_maps_30_to_37_and_39() {
        assert_eq!(Color::from_sgr_fg(30), Some(Color::Black));
        assert_eq!(Color::from_sgr_fg(31), Some(Color::Red));
        assert_eq!(Color::from_sgr_fg(37), Some(Color::White));
        assert_eq!(Color::from_sgr_fg(39), Some(Color::Default));
        assert_eq!(Color::from_sgr_fg(38), None);
    }

    #[test]
    fn from_sgr_bg_maps_40_to_47_and_49() {
        assert_eq!(Color::from_sgr_bg(40), Some(Color::Black));
        assert_eq!(Color::from_sgr_bg(47), Some(Color::White));
        assert_eq!(Color::from_sgr_bg(49), Some(Color::Default));
    }

    #[test]
    fn blank_cell_is_space_with_given_attrs() {
        let mut attrs = CellAttrs::default();
        attrs.set(CellAttrFlags::BOLD, true);
        let cell = Cell::blank(attrs);
        assert_eq!(cell.c, ' ');
        assert!(cell.attrs.bold());
    }
}
