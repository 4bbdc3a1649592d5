//! Serial report formatting
//!
//! One report is a clear-screen escape followed by
//! `ADC Result - AN_A<id>: 0x<hex>, ...` for the three sampled slots.

use core::fmt::{self, Write};

use simulsar_hal::{ChannelId, UartTx};

use crate::sampling::FRAME_SLOTS;

/// Erase the terminal and home the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[;H";

/// Longest possible report line is 63 bytes (three `AN_A15: 0xffff`)
pub const REPORT_CAPACITY: usize = 80;

/// Rendered report line
pub type ReportLine = heapless::String<REPORT_CAPACITY>;

/// Write the report line for `(channel, value)` pairs in slot order
pub fn write_report<W: Write>(
    out: &mut W,
    readings: &[(ChannelId, u16); FRAME_SLOTS],
) -> fmt::Result {
    out.write_str("ADC Result - ")?;
    for (slot, (channel, value)) in readings.iter().enumerate() {
        if slot > 0 {
            out.write_str(", ")?;
        }
        write!(out, "AN_A{}: 0x{:x}", channel, value)?;
    }
    out.write_str("\r\n\r\n")
}

/// Send a rendered report, preceded by the clear-screen escape
pub fn print_report<T: UartTx>(tx: &mut T, line: &str) -> Result<(), T::Error> {
    tx.write_str_blocking(CLEAR_SCREEN)?;
    tx.write_str_blocking(line)?;
    tx.flush()
}
