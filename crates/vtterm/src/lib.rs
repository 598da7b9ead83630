//! An in-memory VT100/ANSI terminal emulator core.
//!
//! `Terminal` consumes a byte stream destined for a terminal and
//! maintains a virtual screen — grid of cells, cursor, scrolling
//! region, character-set state — notifying the caller of changes
//! through a closure rather than a callback-plus-context pointer.
//!
//! Not re-entrant: do not call [`Terminal::write`] from within the
//! `on_event` closure passed to another in-progress call.

pub mod answer;
pub mod cell;
pub mod charset;
pub mod decode;
pub mod grid;
pub mod parser;

use std::fmt;

use smallvec::SmallVec;
use unicode_width::UnicodeWidthChar;

pub use cell::{Cell, CellAttrFlags, CellAttrs, Color};
pub use charset::{AcsChars, CharsetSlot, Designation, SavedCursor};
pub use grid::{Cursor, Grid, Line};
pub use parser::{ParserState, Params};

use charset::AttrState;
use decode::Decoder;

const DEFAULT_TERMINAL_NAME: &str = "tmt(0.0.0)";

/// Whether the cursor is "hanging" past the last column of a line —
/// the VT100-derived wrap behavior where a write to the last column
/// doesn't immediately move to a new line, so that filling the last
/// column exactly doesn't produce a spurious blank line or scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Hang {
    #[default]
    None,
    /// Hanging onto the line below; not yet past the bottom margin.
    SameLine,
    /// Hanging past the bottom of the scrolling region; the next
    /// newline or printable character scrolls before doing anything else.
    OffBottom,
}

/// A change notification delivered through [`Terminal::write`] and
/// [`Terminal::reset`]'s `on_event` closure. One payload shape per
/// kind of change, in place of an untyped `(tag, void*)` pair.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Bell,
    /// A byte string the caller should send back to the other end
    /// (device attributes, cursor position report, XTVERSION).
    Answer(&'a str),
    Title(&'a str),
    CursorVisibility(bool),
    SetMode([Option<u16>; parser::MAX_PARAMS]),
    UnsetMode([Option<u16>; parser::MAX_PARAMS]),
    Update,
    Moved(Cursor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalError {
    nline: usize,
    ncol: usize,
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "terminal dimensions must be at least 2x2, got {}x{}",
            self.nline, self.ncol
        )
    }
}

impl std::error::Error for TerminalError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeError {
    nline: usize,
    ncol: usize,
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resize dimensions must be at least 2x2, got {}x{}",
            self.nline, self.ncol
        )
    }
}

impl std::error::Error for ResizeError {}

/// The terminal emulator core: a screen buffer, cursor, attribute and
/// character-set state, byte decoder, and escape-sequence parser.
#[derive(Debug)]
pub struct Terminal {
    grid: Grid,
    cursor: Cursor,
    attrs: AttrState,
    decoder: Decoder,
    hang: Hang,
    state: ParserState,
    params: Params,
    terminal_name: String,
}

impl Terminal {
    /// Build a new terminal with `nline` rows and `ncol` columns.
    ///
    /// `acs_chars` supplies the 31-entry alternate-character-set
    /// table; `None` selects the same ASCII-safe fallback table the
    /// original implementation defaults to.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError`] if `nline < 2` or `ncol < 2`.
    pub fn new(nline: usize, ncol: usize, acs_chars: Option<AcsChars>) -> Result<Self, TerminalError> {
        if nline < 2 || ncol < 2 {
            return Err(TerminalError { nline, ncol });
        }
        let attrs = AttrState::new(acs_chars);
        Ok(Self {
            grid: Grid::new(nline, ncol, attrs.attrs),
            cursor: Cursor::default(),
            attrs,
            decoder: Decoder::new(),
            hang: Hang::None,
            state: ParserState::default(),
            params: Params::new(),
            terminal_name: DEFAULT_TERMINAL_NAME.to_string(),
        })
    }

    /// Resize the screen in place.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError`] if `nline < 2` or `ncol < 2`. The
    /// terminal is left unmodified when this happens — unlike the
    /// original's realloc-based resize, there is no path where a Rust
    /// `Vec` resize partially succeeds and leaves mismatched state,
    /// since the dimension floor is checked before any mutation.
    pub fn resize(&mut self, nline: usize, ncol: usize) -> Result<(), ResizeError> {
        if nline < 2 || ncol < 2 {
            return Err(ResizeError { nline, ncol });
        }
        tracing::debug!(nline, ncol, "resizing terminal");
        self.grid.resize(nline, ncol, self.attrs.attrs);
        self.cursor.row = self.cursor.row.min(nline - 1);
        self.cursor.col = self.cursor.col.min(ncol - 1);
        self.hang = Hang::None;
        Ok(())
    }

    #[must_use]
    pub fn screen(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Clear every line's dirty bit.
    pub fn clean(&mut self) {
        self.grid.clean();
    }

    /// Toggle Unicode-to-ACS pre-translation, returning the previous value.
    pub fn set_unicode_decode(&mut self, on: bool) -> bool {
        std::mem::replace(&mut self.attrs.decode_unicode, on)
    }

    /// Set the name reported by the `XTVERSION` answerback.
    pub fn set_terminal_name(&mut self, name: impl Into<String>) {
        self.terminal_name = name.into();
    }

    /// Reset the terminal to its just-constructed state, except the
    /// grid's backing storage — which is cleared to blanks, not
    /// deallocated and reallocated, unlike the original implementation
    /// (see module docs for the rationale).
    pub fn reset(&mut self, mut on_event: impl FnMut(Event<'_>)) {
        tracing::debug!("resetting terminal");
        self.attrs.reset();
        self.cursor = Cursor::default();
        self.hang = Hang::None;
        self.state = ParserState::default();
        self.params.reset();
        let nline = self.grid.nline();
        self.grid.clear_lines(0, nline, self.attrs.attrs);
        on_event(Event::CursorVisibility(true));
        on_event(Event::Update);
        on_event(Event::Moved(self.cursor));
    }

    /// Feed `bytes` through the parser, calling `on_event` for every
    /// state change. Bell, answerback, title, mode, and cursor-visibility
    /// events fire as soon as the byte that produces them is processed;
    /// `Update`/`Moved` are coalesced and fire at most once each, after
    /// the whole slice has been consumed, mirroring the original
    /// implementation's end-of-batch notification.
    pub fn write(&mut self, bytes: &[u8], mut on_event: impl FnMut(Event<'_>)) {
        let start_cursor = self.cursor;
        for &byte in bytes {
            if self.handle_byte(byte, &mut on_event) {
                self.hang = Hang::None;
                continue;
            }
            if self.attrs.acs {
                let c = self.attrs.acs_translate(byte);
                self.write_char_at_cursor(c);
            } else {
                let mut decoded: SmallVec<[char; 4]> = SmallVec::new();
                self.decoder.decode(&[byte], |c| decoded.push(c));
                for c in decoded {
                    self.write_char_at_cursor(c);
                }
            }
        }
        if self.grid.dirty() {
            on_event(Event::Update);
        }
        if self.cursor != start_cursor {
            on_event(Event::Moved(self.cursor));
        }
    }

    fn cline_row(&self) -> usize {
        self.cursor.row.min(self.grid.nline() - 1)
    }

    fn fix_cursor(&mut self) {
        self.cursor.row = self.cursor.row.min(self.grid.nline() - 1);
        self.cursor.col = self.cursor.col.min(self.grid.ncol() - 1);
    }

    fn tab_forward(&mut self) {
        let limit = self.grid.ncol() - 1;
        loop {
            self.cursor.col += 1;
            if self.cursor.col >= limit || self.grid.is_tab_stop(self.cursor.col) {
                break;
            }
        }
    }

    fn tab_backward(&mut self) {
        while self.cursor.col > 0 {
            self.cursor.col -= 1;
            if self.grid.is_tab_stop(self.cursor.col) {
                break;
            }
        }
    }

    fn newline(&mut self) {
        match self.hang {
            Hang::OffBottom => {
                self.grid.scroll_up(None, 1, self.attrs.attrs);
                self.hang = Hang::None;
                return;
            }
            Hang::SameLine => {
                self.hang = Hang::None;
                return;
            }
            Hang::None => {}
        }
        let maxline = self.grid.maxline();
        if self.cursor.row == maxline {
            self.grid.scroll_up(None, 1, self.attrs.attrs);
        } else if self.cursor.row < self.grid.nline() - 1 {
            self.cursor.row += 1;
        }
    }

    fn carriage_return(&mut self) {
        self.cursor.col = 0;
        if self.hang == Hang::SameLine {
            self.hang = Hang::None;
            if self.cursor.row > self.grid.minline() && self.cursor.row <= self.grid.maxline() {
                self.cursor.row -= 1;
            }
        }
    }

    fn reverse_newline(&mut self) {
        self.hang = Hang::None;
        if self.cursor.row == self.grid.minline() {
            self.grid.scroll_down(None, 1, self.attrs.attrs);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    fn save_cursor(&mut self) {
        self.attrs.saved = SavedCursor {
            cursor: self.cursor,
            attrs: self.attrs.attrs,
        };
    }

    fn restore_cursor(&mut self) {
        self.cursor = self.attrs.saved.cursor;
        self.attrs.attrs = self.attrs.saved.attrs;
    }

    /// Write one decoded character at the cursor, applying charset
    /// translation and the hanging-cursor wrap discipline. Grounded in
    /// `writecharatcurs` in `tmt.c`.
    fn write_char_at_cursor(&mut self, mut w: char) {
        if self.hang == Hang::OffBottom {
            self.grid.scroll_up(None, 1, self.attrs.attrs);
        }
        self.hang = Hang::None;

        if self.attrs.decode_unicode {
            if let Some(mapped) = self.attrs.unicode_to_acs(w) {
                w = mapped;
            }
        }
        if self.attrs.active_designation() == Designation::DecSpecialGraphics {
            w = self.attrs.dec_special_graphics_translate(w);
        }

        match UnicodeWidthChar::width(w) {
            Some(n) if n > 1 => w = char::REPLACEMENT_CHARACTER,
            None => return,
            _ => {}
        }

        let row = self.cline_row();
        self.grid.set_cell(row, self.cursor.col, w, self.attrs.attrs);

        if self.cursor.col < self.grid.ncol() - 1 {
            self.cursor.col += 1;
        } else {
            self.hang = Hang::SameLine;
            self.cursor.col = 0;
            self.cursor.row += 1;
        }

        if self.hang != Hang::None && self.cursor.row > self.grid.maxline() {
            self.cursor.row = self.grid.maxline();
            self.hang = Hang::OffBottom;
        }
    }

    /// `CSI Pn J` — erase in display.
    fn erase_in_display(&mut self) {
        let nline = self.grid.nline();
        let (mut begin, mut end) = (0, nline);
        match self.params.get(0) {
            0 => {
                begin = self.cursor.row + 1;
                self.grid
                    .clear_line_range(self.cursor.row, self.cursor.col, self.grid.ncol(), self.attrs.attrs);
            }
            1 => {
                end = self.cursor.row;
                self.grid.clear_line_range(self.cursor.row, 0, self.cursor.col, self.attrs.attrs);
            }
            2 => {}
            _ => return,
        }
        if end > begin {
            self.grid.clear_lines(begin, end - begin, self.attrs.attrs);
        }
    }

    /// `CSI Pn K` — erase in line.
    fn erase_in_line(&mut self) {
        let ncol = self.grid.ncol();
        let row = self.cursor.row;
        match self.params.get(0) {
            0 => self.grid.clear_line_range(row, self.cursor.col, ncol, self.attrs.attrs),
            1 => self
                .grid
                .clear_line_range(row, 0, (self.cursor.col + 1).min(ncol - 1), self.attrs.attrs),
            2 => self.grid.clear_line_range(row, 0, ncol, self.attrs.attrs),
            _ => {}
        }
    }

    /// `CSI Pn @` — insert blank characters at the cursor.
    fn insert_chars(&mut self) {
        let ncol = self.grid.ncol();
        let col = self.cursor.col;
        let n = self.params.get_or_one(0).min(ncol - col - 1);
        let row = self.cline_row();
        self.grid.insert_blanks(row, col, n, self.attrs.attrs);
    }

    /// `CSI Pn P` — delete characters at the cursor.
    ///
    /// The attribute used to blank the vacated tail is the attribute
    /// of the last cell shifted off the right edge, not the terminal's
    /// current default — an undocumented-as-correct but deliberately
    /// preserved quirk of the original implementation.
    fn delete_chars(&mut self) {
        let ncol = self.grid.ncol();
        let col = self.cursor.col;
        let n = self.params.get_or_one(0);
        if n == 0 || col >= ncol {
            return;
        }
        let n = n.min(ncol - col);
        let row = self.cline_row();
        let fill_attrs = self
            .grid
            .line(row)
            .cell(ncol - n)
            .map_or(self.attrs.attrs, |cell| cell.attrs);
        self.grid.delete_chars(row, col, n, fill_attrs);
    }

    /// `CSI Pn X` — erase `n` characters at the cursor without moving it.
    fn erase_chars(&mut self) {
        let n = self.params.get_or_one(0);
        let row = self.cursor.row;
        let col = self.cursor.col;
        self.grid.clear_line_range(row, col, col + n, self.attrs.attrs);
    }

    /// `CSI ... m` — select graphic rendition.
    fn select_graphic_rendition(&mut self) {
        if self.params.count() == 0 {
            self.attrs.attrs = CellAttrs::default();
            return;
        }
        let pars: SmallVec<[usize; parser::MAX_PARAMS]> = self.params.iter().collect();
        for &p in &pars {
            match p {
                0 => self.attrs.attrs = CellAttrs::default(),
                1 => self.attrs.attrs.set(CellAttrFlags::BOLD, true),
                22 => self.attrs.attrs.set(CellAttrFlags::BOLD, false),
                2 => self.attrs.attrs.set(CellAttrFlags::DIM, true),
                23 => self.attrs.attrs.set(CellAttrFlags::DIM, false),
                4 => self.attrs.attrs.set(CellAttrFlags::UNDERLINE, true),
                24 => self.attrs.attrs.set(CellAttrFlags::UNDERLINE, false),
                5 => self.attrs.attrs.set(CellAttrFlags::BLINK, true),
                25 => self.attrs.attrs.set(CellAttrFlags::BLINK, false),
                7 => self.attrs.attrs.set(CellAttrFlags::REVERSE, true),
                27 => self.attrs.attrs.set(CellAttrFlags::REVERSE, false),
                8 => self.attrs.attrs.set(CellAttrFlags::INVISIBLE, true),
                28 => self.attrs.attrs.set(CellAttrFlags::INVISIBLE, false),
                10 => self.attrs.acs = false,
                11 => self.attrs.acs = true,
                30..=37 | 39 => {
                    if let Some(c) = Color::from_sgr_fg(p) {
                        self.attrs.attrs.fg = c;
                    }
                }
                40..=47 | 49 => {
                    if let Some(c) = Color::from_sgr_bg(p) {
                        self.attrs.attrs.bg = c;
                    }
                }
                _ => {}
            }
        }
    }

    /// `CSI Pn b` — repeat the last written character `n` times.
    fn repeat_last_char(&mut self) {
        if self.cursor.col == 0 {
            return;
        }
        let row = self.cline_row();
        let Some(last) = self.grid.line(row).cell(self.cursor.col - 1) else {
            return;
        };
        let c = last.c;
        for _ in 0..self.params.get_or_one(0) {
            self.write_char_at_cursor(c);
        }
    }

    /// `CSI 6 n` (device status report / cursor position report).
    fn report_cursor_position(&mut self, on_event: &mut dyn FnMut(Event<'_>)) {
        if self.params.get(0) != 6 {
            return;
        }
        if let Ok(bytes) = answer::cursor_position_report(self.cursor.row + 1, self.cursor.col + 1) {
            let s = std::str::from_utf8(&bytes).expect("answerback is ASCII by construction");
            on_event(Event::Answer(s));
        }
    }

    /// `CSI Pn h` / `CSI ? Pn h` (set mode) and the `l` reset counterpart.
    fn set_mode(&mut self, set: bool, on_event: &mut dyn FnMut(Event<'_>)) {
        if self.params.get(0) == 25 {
            on_event(Event::CursorVisibility(set));
            return;
        }
        let mut modes = [None; parser::MAX_PARAMS];
        for (i, slot) in modes.iter_mut().enumerate().take(self.params.count()) {
            *slot = u16::try_from(self.params.get(i)).ok();
        }
        on_event(if set {
            Event::SetMode(modes)
        } else {
            Event::UnsetMode(modes)
        });
    }

    fn report_title(&mut self, on_event: &mut dyn FnMut(Event<'_>)) {
        if self.params.count() == 0 {
            return;
        }
        let kind = self.params.get(0);
        if kind == 0 || kind == 2 {
            if let Ok(s) = std::str::from_utf8(self.params.title()) {
                on_event(Event::Title(s));
            }
        }
    }

    fn send_secondary_da(&mut self, on_event: &mut dyn FnMut(Event<'_>)) {
        on_event(Event::Answer(answer::SECONDARY_DEVICE_ATTRIBUTES));
    }

    fn send_primary_da(&mut self, on_event: &mut dyn FnMut(Event<'_>)) {
        if !self.params.private {
            on_event(Event::Answer(answer::PRIMARY_DEVICE_ATTRIBUTES));
        }
    }

    fn send_xtversion(&mut self, on_event: &mut dyn FnMut(Event<'_>)) {
        if let Ok(bytes) = answer::xtversion_report(&self.terminal_name) {
            if let Ok(s) = String::from_utf8(bytes) {
                on_event(Event::Answer(&s));
            }
        }
    }

    /// `CSI top ; bot r` — set the scrolling region.
    fn set_margin(&mut self) {
        let top = self.params.get_or_one(0) - 1;
        let bot = self.params.get_or_one(1) - 1;
        self.grid.set_scroll_region(top, bot);
    }

    /// Dispatch one completed CSI/ESC operation: close the current
    /// parameter, run `action` unless the sequence was marked ignored,
    /// clamp the cursor back into range, and reset the parser — the
    /// same sequencing `tmt.c`'s `DO` macro performs.
    fn dispatch(&mut self, on_event: &mut dyn FnMut(Event<'_>), action: impl FnOnce(&mut Self, &mut dyn FnMut(Event<'_>))) {
        self.params.consume();
        if !self.params.ignored {
            action(self, on_event);
        }
        self.fix_cursor();
        self.params.reset();
        self.state = ParserState::Ground;
    }

    /// Advance the byte-level parser by one byte. Returns `true` if the
    /// byte was consumed by the state machine; `false` means it should
    /// fall through to the decoder and be written as a plain character
    /// — including, faithfully, bytes that abort a malformed escape
    /// sequence mid-flight, exactly as the original implementation does.
    fn handle_byte(&mut self, byte: u8, on_event: &mut dyn FnMut(Event<'_>)) -> bool {
        use ParserState::{Arg, Esc, GtArg, LParen, RParen, Title, TitleArg};

        match (self.state, byte) {
            (ParserState::Ground, 0x07) => {
                self.dispatch(on_event, |_, cb| cb(Event::Bell));
                true
            }
            (ParserState::Ground, 0x08) => {
                self.dispatch(on_event, |t, _| {
                    if t.cursor.col > 0 {
                        t.cursor.col -= 1;
                    }
                });
                true
            }
            (ParserState::Ground, 0x09) => {
                self.dispatch(on_event, |t, _| t.tab_forward());
                true
            }
            (ParserState::Ground, 0x0a) => {
                self.dispatch(on_event, |t, _| t.newline());
                true
            }
            (ParserState::Ground, 0x0d) => {
                self.dispatch(on_event, |t, _| t.carriage_return());
                true
            }
            (ParserState::Ground, 0x0e) => {
                self.dispatch(on_event, |t, _| t.attrs.active = CharsetSlot::G1);
                true
            }
            (ParserState::Ground, 0x0f) => {
                self.dispatch(on_event, |t, _| t.attrs.active = CharsetSlot::G0);
                true
            }
            (ParserState::Ground, 0x1b) | (Esc, 0x1b) => {
                self.state = Esc;
                true
            }
            (Esc, b'=' | b'>') => {
                self.dispatch(on_event, |_, _| {});
                true
            }
            (Esc, b'H') => {
                self.dispatch(on_event, |t, _| {
                    let col = t.cursor.col;
                    t.grid.set_tab_stop(col);
                });
                true
            }
            (Esc, b'7') => {
                self.dispatch(on_event, |t, _| t.save_cursor());
                true
            }
            (Esc, b'8') => {
                self.dispatch(on_event, |t, _| t.restore_cursor());
                true
            }
            (Esc, b'+' | b'*') => {
                self.params.ignored = true;
                self.state = Arg;
                true
            }
            (Esc, b'c') => {
                self.dispatch(on_event, |t, cb| t.reset(cb));
                true
            }
            (Esc, b'M') => {
                self.dispatch(on_event, |t, _| t.reverse_newline());
                true
            }
            (Esc, b'[') => {
                self.state = Arg;
                true
            }
            (Esc, b']') => {
                self.state = TitleArg;
                true
            }
            (Esc, b'(') => {
                self.state = LParen;
                true
            }
            (Esc, b')') => {
                self.state = RParen;
                true
            }
            (Arg, 0x1b) => {
                self.state = Esc;
                true
            }
            (Arg, b';') => {
                self.params.consume();
                true
            }
            (Arg, b'?') => {
                self.params.private = true;
                true
            }
            (Arg, b'0'..=b'9') => {
                self.params.push_digit(byte - b'0');
                true
            }
            (TitleArg, b'0'..=b'2') => {
                self.params.push_digit(byte - b'0');
                true
            }
            (TitleArg, b';') => {
                self.params.consume();
                self.state = Title;
                true
            }
            (Arg, b'A') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.row = t.cursor.row.saturating_sub(n);
                });
                true
            }
            (Arg, b'B') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.row = (t.cursor.row + n).min(t.grid.nline() - 1);
                });
                true
            }
            (Arg, b'C') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.col = (t.cursor.col + n).min(t.grid.ncol() - 1);
                });
                true
            }
            (Arg, b'D') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.col = t.cursor.col.saturating_sub(n);
                });
                true
            }
            (Arg, b'E') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.col = 0;
                    t.cursor.row = (t.cursor.row + n).min(t.grid.nline() - 1);
                });
                true
            }
            (Arg, b'F') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.col = 0;
                    t.cursor.row = t.cursor.row.saturating_sub(n);
                });
                true
            }
            (Arg, b'G') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.col = (n - 1).min(t.grid.ncol() - 1);
                });
                true
            }
            (Arg, b'd') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.cursor.row = (n - 1).min(t.grid.nline() - 1);
                });
                true
            }
            (Arg, b'r') => {
                self.dispatch(on_event, |t, _| t.set_margin());
                true
            }
            (Arg, b'H' | b'f') => {
                self.dispatch(on_event, |t, _| {
                    t.cursor.row = t.params.get_or_one(0) - 1;
                    t.cursor.col = t.params.get_or_one(1) - 1;
                });
                true
            }
            (Arg, b'I') => {
                self.dispatch(on_event, |t, _| t.tab_forward());
                true
            }
            (Arg, b'Z') => {
                self.dispatch(on_event, |t, _| t.tab_backward());
                true
            }
            (Arg, b'J') => {
                self.dispatch(on_event, |t, _| t.erase_in_display());
                true
            }
            (Arg, b'K') => {
                self.dispatch(on_event, |t, _| t.erase_in_line());
                true
            }
            (Arg, b'L') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    let row = t.cursor.row;
                    t.grid.scroll_down(Some(row), n, t.attrs.attrs);
                });
                true
            }
            (Arg, b'M') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    let row = t.cursor.row;
                    t.grid.scroll_up(Some(row), n, t.attrs.attrs);
                });
                true
            }
            (Arg, b'P') => {
                self.dispatch(on_event, |t, _| t.delete_chars());
                true
            }
            (Arg, b'S') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.grid.scroll_up(None, n, t.attrs.attrs);
                });
                true
            }
            (Arg, b'T') => {
                self.dispatch(on_event, |t, _| {
                    let n = t.params.get_or_one(0);
                    t.grid.scroll_down(None, n, t.attrs.attrs);
                });
                true
            }
            (Arg, b'X') => {
                self.dispatch(on_event, |t, _| t.erase_chars());
                true
            }
            (Arg, b'@') => {
                self.dispatch(on_event, |t, _| t.insert_chars());
                true
            }
            (Arg, b'b') => {
                self.dispatch(on_event, |t, _| t.repeat_last_char());
                true
            }
            (Arg, b'c') => {
                self.dispatch(on_event, Self::send_primary_da);
                true
            }
            (Arg, b'g') => {
                self.dispatch(on_event, |t, _| {
                    if t.params.get(0) == 3 {
                        t.grid.clear_all_tab_stops();
                    }
                });
                true
            }
            (Arg, b'm') => {
                self.dispatch(on_event, |t, _| t.select_graphic_rendition());
                true
            }
            (Arg, b'n') => {
                self.dispatch(on_event, Self::report_cursor_position);
                true
            }
            (Arg, b'h') => {
                self.dispatch(on_event, |t, cb| t.set_mode(true, cb));
                true
            }
            (Arg, b'l') => {
                self.dispatch(on_event, |t, cb| t.set_mode(false, cb));
                true
            }
            (Arg, b'i') => {
                self.dispatch(on_event, |_, _| {});
                true
            }
            (Arg, b's') => {
                self.dispatch(on_event, |t, _| t.save_cursor());
                true
            }
            (Arg, b'u') => {
                self.dispatch(on_event, |t, _| t.restore_cursor());
                true
            }
            (Arg, b'>') => {
                self.state = GtArg;
                true
            }
            (GtArg, b'c') => {
                self.dispatch(on_event, Self::send_secondary_da);
                true
            }
            (GtArg, b'q') => {
                self.dispatch(on_event, Self::send_xtversion);
                true
            }
            (Title, 0x07) => {
                self.dispatch(on_event, Self::report_title);
                true
            }
            (Title, b) if b >= 0x20 => {
                if self.params.push_title_byte(b) {
                    true
                } else {
                    self.params.reset();
                    self.state = ParserState::Ground;
                    false
                }
            }
            (LParen, b'A' | b'B' | b'1' | b'2') => {
                self.dispatch(on_event, |t, _| t.attrs.set_designation(CharsetSlot::G0, Designation::Ascii));
                true
            }
            (LParen, b'0') => {
                self.dispatch(on_event, |t, _| {
                    t.attrs.set_designation(CharsetSlot::G0, Designation::DecSpecialGraphics);
                });
                true
            }
            (RParen, b'A' | b'B' | b'1' | b'2') => {
                self.dispatch(on_event, |t, _| t.attrs.set_designation(CharsetSlot::G1, Designation::Ascii));
                true
            }
            (RParen, b'0') => {
                self.dispatch(on_event, |t, _| {
                    t.attrs.set_designation(CharsetSlot::G1, Designation::DecSpecialGraphics);
                });
                true
            }
            _ => {
                self.params.reset();
                self.state = ParserState::Ground;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_rejects_degenerate_dimensions() {
        assert!(Terminal::new(1, 10, None).is_err());
        assert!(Terminal::new(10, 1, None).is_err());
        assert!(Terminal::new(10, 10, None).is_ok());
    }

    #[test]
    fn writes_ascii_and_advances_cursor() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"Hi", |_| {});
        assert_eq!(term.cursor(), Cursor { row: 0, col: 2 });
        assert_eq!(term.screen().cell(0, 0).unwrap().c, 'H');
        assert_eq!(term.screen().cell(0, 1).unwrap().c, 'i');
    }

    #[test]
    fn carriage_return_and_linefeed_move_to_next_line_start() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"ab\r\ncd", |_| {});
        assert_eq!(term.cursor(), Cursor { row: 1, col: 2 });
        assert_eq!(term.screen().cell(1, 0).unwrap().c, 'c');
    }

    #[test]
    fn csi_cursor_position_moves_to_one_based_row_col() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"\x1b[3;4H", |_| {});
        assert_eq!(term.cursor(), Cursor { row: 2, col: 3 });
    }

    #[test]
    fn sgr_bold_sets_flag_until_reset() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"\x1b[1mX\x1b[0mY", |_| {});
        assert!(term.screen().cell(0, 0).unwrap().attrs.bold());
        assert!(!term.screen().cell(0, 1).unwrap().attrs.bold());
    }

    #[test]
    fn writing_full_line_hangs_cursor_instead_of_wrapping_immediately() {
        let mut term = Terminal::new(3, 4, None).unwrap();
        term.write(b"abcd", |_| {});
        // Cursor hangs at col 0 of the next row rather than having
        // wrapped while writing the 4th column.
        assert_eq!(term.cursor(), Cursor { row: 1, col: 0 });
        assert_eq!(term.screen().cell(0, 3).unwrap().c, 'd');
        assert_eq!(term.screen().cell(1, 0).unwrap().c, ' ');
    }

    #[test]
    fn hanging_cursor_at_bottom_scrolls_on_next_char_not_twice() {
        let mut term = Terminal::new(2, 2, None).unwrap();
        term.write(b"abcd", |_| {});
        // Row 0: "ab", row 1 hangs after "cd" since row 1 is maxline.
        term.write(b"e", |_| {});
        assert_eq!(term.screen().cell(1, 0).unwrap().c, 'e');
    }

    #[test]
    fn bell_emits_event() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        let mut bells = 0;
        term.write(b"\x07", |e| {
            if matches!(e, Event::Bell) {
                bells += 1;
            }
        });
        assert_eq!(bells, 1);
    }

    #[test]
    fn cpr_reports_one_based_position() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"\x1b[3;4H", |_| {});
        let mut answer = None;
        term.write(b"\x1b[6n", |e| {
            if let Event::Answer(s) = e {
                answer = Some(s.to_string());
            }
        });
        assert_eq!(answer.as_deref(), Some("\x1b[3;4R"));
    }

    #[test]
    fn primary_da_answers_unless_private_marker_set() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        let mut answer = None;
        term.write(b"\x1b[c", |e| {
            if let Event::Answer(s) = e {
                answer = Some(s.to_string());
            }
        });
        assert_eq!(answer.as_deref(), Some("\x1b[?6c"));
    }

    #[test]
    fn erase_in_display_clears_from_cursor_to_end() {
        let mut term = Terminal::new(3, 4, None).unwrap();
        term.write(b"abcd", |_| {});
        term.write(b"\x1b[H\x1b[0J", |_| {});
        assert_eq!(term.screen().cell(0, 0).unwrap().c, ' ');
        assert_eq!(term.screen().cell(1, 0).unwrap().c, ' ');
    }

    #[test]
    fn reset_clears_screen_and_cursor() {
        let mut term = Terminal::new(3, 4, None).unwrap();
        term.write(b"abcd", |_| {});
        term.reset(|_| {});
        assert_eq!(term.cursor(), Cursor::default());
        assert_eq!(term.screen().cell(0, 0).unwrap().c, ' ');
    }

    #[test]
    fn resize_rejects_degenerate_dimensions_and_preserves_state() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"X", |_| {});
        assert!(term.resize(1, 10).is_err());
        assert_eq!(term.screen().cell(0, 0).unwrap().c, 'X');
    }

    #[test]
    fn malformed_sequence_falls_through_and_writes_final_byte() {
        // 'q' is not a recognized CSI final; tmt.c falls through to
        // writing it as a literal character instead of dropping it.
        let mut term = Terminal::new(5, 10, None).unwrap();
        term.write(b"\x1b[1q", |_| {});
        assert_eq!(term.screen().cell(0, 0).unwrap().c, 'q');
    }

    #[test]
    fn any_consumed_byte_clears_a_hanging_cursor() {
        let mut term = Terminal::new(24, 80, None).unwrap();
        term.write(&[b'a'; 80], |_| {}); // fills row 0, hangs onto row 1
        term.write(b"\x1b[m", |_| {});
        term.write(b"\r", |_| {});
        // SGR reset consumed the hang; CR just moves to column 0 of
        // the row the cursor was already hanging onto.
        assert_eq!(term.cursor(), Cursor { row: 1, col: 0 });
    }

    #[test]
    fn set_mode_reports_none_for_unsupplied_parameter_slots() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        let mut modes = None;
        term.write(b"\x1b[4h", |e| {
            if let Event::SetMode(m) = e {
                modes = Some(m);
            }
        });
        let modes = modes.unwrap();
        assert_eq!(modes[0], Some(4));
        assert!(modes[1..].iter().all(Option::is_none));
    }

    #[test]
    fn zero_width_character_is_written_through_not_dropped() {
        let mut term = Terminal::new(5, 10, None).unwrap();
        // U+200B ZERO WIDTH SPACE: width 0, must not be silently dropped.
        term.write("\u{200b}".as_bytes(), |_| {});
        assert_eq!(term.screen().cell(0, 0).unwrap().c, '\u{200b}');
    }
}
