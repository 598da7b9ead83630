//! Answerback byte strings: the terminal's replies to device-status
//! and identification queries. Built with `vtenc`'s zero-allocation
//! `write_*!` macros, the same way the encoding side of the workspace
//! already builds outbound control sequences.

use vtenc::encode::EncodeError;
use vtenc::{write_csi, write_dcs};

/// Primary Device Attributes reply (`DA1`), sent for `CSI c` /
/// `CSI 0 c`. `tmt.c` answers as a VT102 with no extensions.
pub const PRIMARY_DEVICE_ATTRIBUTES: &str = "\x1b[?6c";

/// Secondary Device Attributes reply (`DA2`), sent for `CSI > c`.
pub const SECONDARY_DEVICE_ATTRIBUTES: &str = "\x1b[>0;95c";

/// Cursor Position Report (`CPR`), sent for `CSI 6 n` (`DSR`), using
/// 1-based row/column as the wire format requires.
///
/// # Errors
///
/// Returns an error only if the (stack-sized) output buffer is
/// somehow too small, which cannot happen for any in-range cursor
/// position.
pub fn cursor_position_report(row1: usize, col1: usize) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::with_capacity(16);
    write_csi!(&mut buf; row1, ";", col1, "R")?;
    Ok(buf)
}

/// `XTVERSION` reply (`DCS > | name ST`), sent for `CSI > q`.
///
/// # Errors
///
/// Returns an error only if the output buffer is too small, which
/// cannot happen for any reasonably sized terminal name.
pub fn xtversion_report(name: &str) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::with_capacity(name.len() + 8);
    write_dcs!(&mut buf; ">|", name)?;
    Ok(buf)
}
