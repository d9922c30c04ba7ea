//! The one error type that everything in a session can fail with.

use std::{borrow::Cow, error::Error, fmt};

/// Things that can go wrong while configuring or running a session. None of
/// these are recovered from; they end the session.
#[derive(Debug)]
pub enum BartError {
    /// Terminal, serial, or file io failed.
    IoError(std::io::Error),

    /// The trial log could not be written.
    CsvError(csv::Error),

    /// The config file could not be parsed.
    RonSpannedError(ron::de::SpannedError),

    /// The config file parsed but describes an impossible session.
    InvalidConfig(String),

    /// The trigger peripheral is enabled but no serial port exists.
    NoSerialPort,

    /// The participant or operator interrupted the session with Ctrl-C.
    Aborted,
}

impl fmt::Display for BartError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BartError as BE;
        let msg = match self {
            BE::IoError(error) => Cow::from(format!("io error: {}", error)),
            BE::CsvError(error) => Cow::from(format!("trial log error: {}", error)),
            BE::RonSpannedError(error) => Cow::from(format!("config error: {}", error)),
            BE::InvalidConfig(reason) => Cow::from(format!("invalid config: {}", reason)),
            BE::NoSerialPort => Cow::from("no serial port available"),
            BE::Aborted => Cow::from("session aborted, nothing was saved"),
        };

        write!(f, "{}", msg)
    }
}

impl Error for BartError {}

impl From<std::io::Error> for BartError {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}

impl From<csv::Error> for BartError {
    fn from(value: csv::Error) -> Self {
        Self::CsvError(value)
    }
}

impl From<ron::de::SpannedError> for BartError {
    fn from(value: ron::de::SpannedError) -> Self {
        Self::RonSpannedError(value)
    }
}
