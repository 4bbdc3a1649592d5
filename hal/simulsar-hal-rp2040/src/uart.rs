//! Debug console UART
//!
//! The console only transmits, so any blocking `embedded_io::Write` sink
//! works; on the Pico that is `embassy_rp::uart::UartTx` on UART0 (GPIO0).

use embassy_rp::uart;
use embedded_io::{Error as _, ErrorKind, Write};

use simulsar_hal::uart::{DataBits, Parity, StopBits};
use simulsar_hal::{UartConfig, UartTx};

/// Translate a console setting into the embassy-rp UART config
pub fn embassy_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Five => uart::DataBits::DataBits5,
        DataBits::Six => uart::DataBits::DataBits6,
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

/// Console transmit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Written before the console was enabled
    Disabled,
    /// Sink accepted zero bytes
    WriteZero,
    /// Transfer interrupted
    Interrupted,
    /// Other error
    Other,
}

impl From<ErrorKind> for ConsoleError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::WriteZero => ConsoleError::WriteZero,
            ErrorKind::Interrupted => ConsoleError::Interrupted,
            _ => ConsoleError::Other,
        }
    }
}

/// Transmit-only console over a blocking byte sink
pub struct ConsoleUart<W> {
    tx: W,
    enabled: bool,
}

impl<W: Write> ConsoleUart<W> {
    /// Wrap a configured transmitter; output stays off until `enable`
    pub fn new(tx: W) -> Self {
        Self { tx, enabled: false }
    }

    /// Allow writes to reach the wire
    pub fn enable(&mut self) {
        self.enabled = true;
    }
}

impl<W: Write> UartTx for ConsoleUart<W> {
    type Error = ConsoleError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ConsoleError> {
        if !self.enabled {
            return Err(ConsoleError::Disabled);
        }
        self.tx
            .write_all(data)
            .map_err(|e| ConsoleError::from(e.kind()))
    }

    fn flush(&mut self) -> Result<(), ConsoleError> {
        if !self.enabled {
            return Err(ConsoleError::Disabled);
        }
        self.tx.flush().map_err(|e| ConsoleError::from(e.kind()))
    }
}
