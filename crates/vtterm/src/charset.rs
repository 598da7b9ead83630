//! Attribute and character-set state: saved cursor/attrs, the G0/G1
//! designation slots, and the ACS / DEC Special Graphics / Unicode
//! translation tables.

use crate::cell::CellAttrs;
use crate::grid::Cursor;

/// The 31-character ACS translation table, indexed the same way as
/// `tmt.c`'s `vt->acschars`. Index `0` through the rest map to the
/// terminfo alternate character set glyphs (arrows, blocks, box
/// drawing, etc).
pub type AcsChars = [char; 31];

/// ASCII-safe fallback table, identical to `tmt_open`'s default
/// (`L"><^v#+:o##+++++~---_++++|<>*!fo"`) when the caller does not
/// supply its own.
pub const DEFAULT_ACS_CHARS: AcsChars = [
    '>', '<', '^', 'v', '#', '+', ':', 'o', '#', '#', '+', '+', '+', '+', '+', '~', '-', '-', '-',
    '_', '+', '+', '+', '+', '|', '<', '>', '*', '!', 'f', 'o',
];

/// Which of the two designated character sets (G0 or G1) is currently
/// shifted in via `SO`/`SI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSlot {
    G0,
    G1,
}

/// What a character-set slot is designated to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Designation {
    #[default]
    Ascii,
    DecSpecialGraphics,
}

/// One saved `(cursor, attrs)` snapshot — not a stack, just the one
/// slot `ESC 7`/`ESC 8` and `CSI s`/`CSI u` save and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavedCursor {
    pub cursor: Cursor,
    pub attrs: CellAttrs,
}

/// Everything about the current rendition and character-set
/// designation that isn't part of the grid itself.
#[derive(Debug, Clone)]
pub struct AttrState {
    pub attrs: CellAttrs,
    pub saved: SavedCursor,
    /// Legacy ACS toggle set by `ESC [ 10 m` / `ESC [ 11 m`; forces
    /// every byte through [`tacs`] regardless of the G0/G1 designation.
    pub acs: bool,
    /// Which slot (G0/G1) is shifted in.
    pub active: CharsetSlot,
    /// Designations of G0 and G1 respectively.
    pub designation: [Designation; 2],
    /// Try to map Unicode box-drawing/arrow/symbol code points to their
    /// DEC Special Graphics equivalents before display.
    pub decode_unicode: bool,
    acschars: AcsChars,
}

impl AttrState {
    pub(crate) fn new(acschars: Option<AcsChars>) -> Self {
        Self {
            attrs: CellAttrs::default(),
            saved: SavedCursor::default(),
            acs: false,
            active: CharsetSlot::G0,
            designation: [Designation::Ascii, Designation::Ascii],
            decode_unicode: false,
            acschars: acschars.unwrap_or(DEFAULT_ACS_CHARS),
        }
    }

    pub(crate) fn reset(&mut self) {
        let acschars = self.acschars;
        *self = Self::new(Some(acschars));
    }

    #[must_use]
    pub fn designation(&self, slot: CharsetSlot) -> Designation {
        match slot {
            CharsetSlot::G0 => self.designation[0],
            CharsetSlot::G1 => self.designation[1],
        }
    }

    pub(crate) fn set_designation(&mut self, slot: CharsetSlot, d: Designation) {
        match slot {
            CharsetSlot::G0 => self.designation[0] = d,
            CharsetSlot::G1 => self.designation[1] = d,
        }
    }

    #[must_use]
    pub fn active_designation(&self) -> Designation {
        self.designation(self.active)
    }

    /// Terminfo ACS translation: map a byte from the terminfo ACS map
    /// through the 31-entry lookup, falling back to the byte itself
    /// when it isn't one of the 31 recognized codes. Grounded in
    /// `tacs` in `tmt.c`.
    #[must_use]
    pub fn acs_translate(&self, byte: u8) -> char {
        const ACS_MAP: [u8; 31] = [
            0o020, 0o021, 0o030, 0o031, 0o333, 0o004, 0o261, 0o370, 0o361, 0o260, 0o331, 0o277,
            0o332, 0o300, 0o305, 0o176, 0o304, 0o304, 0o304, 0o137, 0o303, 0o264, 0o301, 0o302,
            0o263, 0o363, 0o362, 0o343, 0o330, 0o234, 0o376,
        ];
        ACS_MAP
            .iter()
            .position(|&m| m == byte)
            .map_or(byte as char, |i| self.acschars[i])
    }

    /// DEC Special Graphics translation: map a code point in the
    /// DEC-SG range (`` ` `` through `~`) into the ACS table, or one of
    /// the four capital-letter control-symbol stand-ins; `'_'` becomes
    /// NBSP (rendered as a plain space). Grounded in `dec_to_acs`.
    #[must_use]
    pub fn dec_special_graphics_translate(&self, w: char) -> char {
        match w {
            '_' => ' ',
            '`'..='a' => self.acschars[(w as u32 - '`' as u32 + 5) as usize],
            'b'..='e' => ['T', 'F', 'C', 'L'][(w as u32 - 'b' as u32) as usize],
            'f'..='g' => self.acschars[(w as u32 - 'f' as u32 + 7) as usize],
            'h'..='i' => ['N', 'V'][(w as u32 - 'h' as u32) as usize],
            'j'..='~' => self.acschars[(w as u32 - 'j' as u32 + 10) as usize],
            other => other,
        }
    }

    /// Unicode-to-ACS pre-pass: map a handful of Unicode box-drawing,
    /// arrow, and symbol code points to their ACS/DEC-SG equivalents,
    /// enabled by [`AttrState::decode_unicode`]. Returns `None` when
    /// `w` isn't one of the recognized code points, in which case the
    /// caller should write `w` unmodified. Grounded in the
    /// `decode_unicode` switch inside `writecharatcurs`.
    #[must_use]
    pub fn unicode_to_acs(&self, w: char) -> Option<char> {
        Some(match w {
            '\u{2192}' => self.acschars[0], // RIGHTWARDS ARROW
            '\u{2190}' => self.acschars[1], // LEFTWARDS ARROW
            '\u{2191}' => self.acschars[2], // UPWARDS ARROW
            '\u{2193}' => self.acschars[3], // DOWNWARDS ARROW
            '\u{2588}' => self.acschars[4], // FULL BLOCK
            '\u{25A6}' => self.acschars[9], // SQUARE WITH ORTHOGONAL CROSSHATCH FILL
            '\u{00A0}' => self.dec_special_graphics_translate('_'), // NO-BREAK SPACE
            '\u{2666}' | '\u{25C6}' => self.dec_special_graphics_translate('`'), // BLACK DIAMOND
            '\u{2592}' => self.dec_special_graphics_translate('a'), // MEDIUM SHADE
            '\u{2409}' => self.dec_special_graphics_translate('b'), // SYMBOL FOR HORIZONTAL TABULATION
            '\u{240C}' => self.dec_special_graphics_translate('c'), // SYMBOL FOR FORM FEED
            '\u{240D}' => self.dec_special_graphics_translate('d'), // SYMBOL FOR CARRIAGE RETURN
            '\u{240A}' => self.dec_special_graphics_translate('e'), // SYMBOL FOR LINE FEED
            '\u{00B0}' => self.dec_special_graphics_translate('f'), // DEGREE SIGN
            '\u{00B1}' => self.dec_special_graphics_translate('g'), // PLUS-MINUS SIGN
            '\u{2424}' => self.dec_special_graphics_translate('h'), // SYMBOL FOR NEWLINE
            '\u{240B}' => self.dec_special_graphics_translate('i'), // SYMBOL FOR VERTICAL TABULATION
            '\u{2518}' => self.dec_special_graphics_translate('j'), // BOX DRAWINGS LIGHT UP AND LEFT
            '\u{2510}' => self.dec_special_graphics_translate('k'), // BOX DRAWINGS LIGHT DOWN AND LEFT
            '\u{250C}' => self.dec_special_graphics_translate('l'), // BOX DRAWINGS LIGHT DOWN AND RIGHT
            '\u{2514}' => self.dec_special_graphics_translate('m'), // BOX DRAWINGS LIGHT UP AND RIGHT
            '\u{253C}' => self.dec_special_graphics_translate('n'), // BOX DRAWINGS LIGHT VERTICAL AND HORIZONTAL
            '\u{23BA}' => self.dec_special_graphics_translate('o'), // HORIZONTAL SCAN LINE-1
            '\u{23BB}' => self.dec_special_graphics_translate('p'), // HORIZONTAL SCAN LINE-3
            '\u{2500}' => self.dec_special_graphics_translate('q'), // BOX DRAWINGS LIGHT HORIZONTAL
            '\u{23BC}' => self.dec_special_graphics_translate('r'), // HORIZONTAL SCAN LINE-7
            '\u{23BD}' => self.dec_special_graphics_translate('s'), // HORIZONTAL SCAN LINE-9
            '\u{251C}' => self.dec_special_graphics_translate('t'), // BOX DRAWINGS LIGHT VERTICAL AND RIGHT
            '\u{2524}' => self.dec_special_graphics_translate('u'), // BOX DRAWINGS LIGHT VERTICAL AND LEFT
            '\u{2534}' => self.dec_special_graphics_translate('v'), // BOX DRAWINGS LIGHT UP AND HORIZONTAL
            '\u{252C}' => self.dec_special_graphics_translate('w'), // BOX DRAWINGS LIGHT DOWN AND HORIZONTAL
            '\u{2502}' => self.dec_special_graphics_translate('x'), // BOX DRAWINGS LIGHT VERTICAL
            '\u{2264}' => self.dec_special_graphics_translate('y'), // LESS-THAN OR EQUAL TO
            '\u{2265}' => self.dec_special_graphics_translate('z'), // GREATER-THAN OR EQUAL TO
            '\u{03C0}' => self.dec_special_graphics_translate('{'), // GREEK SMALL LETTER PI
            '\u{2260}' => self.dec_special_graphics_translate('|'), // NOT EQUAL TO
            '\u{00A3}' => self.dec_special_graphics_translate('}'), // POUND SIGN
            '\u{00B7}' => self.dec_special_graphics_translate('~'), // MIDDLE DOT
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_acs_chars_match_original_fallback_table() {
        let expected: Vec<char> = "><^v#+:o##+++++~---_++++|<>*!fo".chars().collect();
        assert_eq!(DEFAULT_ACS_CHARS.to_vec(), expected);
    }

    #[test]
    fn dec_special_graphics_maps_box_drawing_range() {
        let st = AttrState::new(None);
        // 'q' -> BOX DRAWINGS LIGHT HORIZONTAL glyph from the ACS table.
        assert_eq!(
            st.dec_special_graphics_translate('q'),
            DEFAULT_ACS_CHARS[('q' as u32 - 'j' as u32 + 10) as usize]
        );
        assert_eq!(st.dec_special_graphics_translate('_'), ' ');
        assert_eq!(st.dec_special_graphics_translate('b'), 'T');
        assert_eq!(st.dec_special_graphics_translate('h'), 'N');
    }

    #[test]
    fn unicode_to_acs_maps_box_drawing_light_horizontal() {
        let st = AttrState::new(None);
        let mapped = st.unicode_to_acs('\u{2500}').unwrap();
        assert_eq!(mapped, st.dec_special_graphics_translate('q'));
    }

    #[test]
    fn unicode_to_acs_returns_none_for_unrecognized_codepoint() {
        let st = AttrState::new(None);
        assert_eq!(st.unicode_to_acs('Z'), None);
    }

    #[test]
    fn acs_translate_falls_back_to_byte_when_unrecognized() {
        let st = AttrState::new(None);
        assert_eq!(st.acs_translate(b'Q'), 'Q' as char);
    }

    #[test]
    fn reset_preserves_custom_acschars_but_clears_everything_else() {
        let mut custom = DEFAULT_ACS_CHARS;
        custom[0] = '#';
        let mut st = AttrState::new(Some(custom));
        st.acs = true;
        st.decode_unicode = true;
        st.reset();
        assert!(!st.acs);
        assert!(!st.decode_unicode);
        assert_eq!(st.acschars[0], '#');
    }
}
