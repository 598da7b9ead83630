//! Escape-sequence parser state: which state the byte-level state
//! machine is in and the parameter accumulator it fills while there.

use smallvec::SmallVec;

/// Maximum number of semicolon-separated parameters tracked per
/// sequence; extra parameters are silently dropped, matching the
/// fixed `PAR_MAX` array in the original implementation.
pub const MAX_PARAMS: usize = 8;

/// Maximum number of bytes collected for an OSC title before further
/// bytes are dropped.
pub const MAX_TITLE: usize = 128;

/// Which part of an escape sequence the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Not inside any escape sequence; bytes are either C0 controls or
    /// printable characters.
    #[default]
    Ground,
    /// Just saw ESC; waiting on the byte that selects the next state.
    Esc,
    /// Inside a CSI (`ESC [`) sequence, accumulating parameters.
    Arg,
    /// Inside a CSI sequence that saw `>` (e.g. `ESC [ > c`).
    GtArg,
    /// Inside an OSC (`ESC ]`) sequence's numeric prefix (e.g. the `0`
    /// in `ESC ] 0 ; title BEL`).
    TitleArg,
    /// Inside an OSC sequence's title text, after the `;`.
    Title,
    /// Inside `ESC (` designating G0.
    LParen,
    /// Inside `ESC )` designating G1.
    RParen,
}

/// The accumulated parameters and single-character flags of the
/// sequence currently being parsed.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pars: SmallVec<[usize; MAX_PARAMS]>,
    arg: usize,
    /// Set when a `?` private-mode marker was seen (`CSI ? ...`).
    pub private: bool,
    /// Set once a sequence is known to be unsupported, so its handler
    /// is skipped but the bytes are still consumed.
    pub ignored: bool,
    title: SmallVec<[u8; MAX_TITLE]>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one more decimal digit into the current parameter.
    pub fn push_digit(&mut self, digit: u8) {
        self.arg = self.arg.saturating_mul(10).saturating_add(digit as usize);
    }

    /// Close off the current parameter (on `;` or on the final byte)
    /// and start a new one.
    pub fn consume(&mut self) {
        if self.pars.len() < MAX_PARAMS {
            self.pars.push(self.arg);
        }
        self.arg = 0;
    }

    /// The raw parameter at `index`, or `0` if it was never supplied.
    #[must_use]
    pub fn get(&self, index: usize) -> usize {
        self.pars.get(index).copied().unwrap_or(0)
    }

    /// The parameter at `index`, defaulting to `1` when it is absent
    /// or explicitly `0` — the `P1` convention `tmt.c` uses for
    /// distance/count parameters.
    #[must_use]
    pub fn get_or_one(&self, index: usize) -> usize {
        match self.pars.get(index).copied().unwrap_or(0) {
            0 => 1,
            n => n,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.pars.len()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.pars.iter().copied()
    }

    pub fn push_title_byte(&mut self, byte: u8) -> bool {
        if byte >= 0x20 && self.title.len() < MAX_TITLE {
            self.title.push(byte);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn title(&self) -> &[u8] {
        &self.title
    }

    /// Reset for the next sequence. Called after every completed
    /// handler, mirroring `resetparser` in `tmt.c`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_digit_builds_multi_digit_number() {
        let mut p = Params::new();
        p.push_digit(3);
        p.push_digit(8);
        assert_eq!(p.arg, 38);
    }

    #[test]
    fn consume_appends_and_resets_current_arg() {
        let mut p = Params::new();
        p.push_digit(5);
        p.consume();
        p.push_digit(2);
        p.consume();
        assert_eq!(p.get(0), 5);
        assert_eq!(p.get(1), 2);
        assert_eq!(p.count(), 2);
    }

    #[test]
    fn get_or_one_defaults_missing_and_zero_params_to_one() {
        let mut p = Params::new();
        assert_eq!(p.get_or_one(0), 1);
        p.push_digit(0);
        p.consume();
        assert_eq!(p.get_or_one(0), 1);
    }

    #[test]
    fn params_beyond_max_are_dropped() {
        let mut p = Params::new();
        for i in 0..MAX_PARAMS + 3 {
            p.push_digit(i as u8 % 10);
            p.consume();
        }
        assert_eq!(p.count(), MAX_PARAMS);
    }

    #[test]
    fn title_bytes_below_space_are_rejected() {
        let mut p = Params::new();
        assert!(p.push_title_byte(b'a'));
        assert!(!p.push_title_byte(0x07)); // BEL terminates, isn't stored
        assert_eq!(p.title(), b"a");
    }
}
