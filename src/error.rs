use std::io::ErrorKind;

// errno values Linux I2C adapters report when the address or a data byte is not acknowledged
const ENXIO: i32 = 6;
const EREMOTEIO: i32 = 121;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("bus error: {0}")]
    Bus(ErrorKind),

    #[error("no acknowledgement from the i2c device")]
    Nack,

    #[error("checksum mismatch: received {received:#04x}, expected {expected:#04x}")]
    Checksum { received: u8, expected: u8 },

    #[error("unexpected response length: expected {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Bus(kind) => kind.into(),
            Error::Nack => ErrorKind::NotConnected.into(),
            Error::Checksum { .. } | Error::UnexpectedLength { .. } => {
                std::io::Error::new(ErrorKind::InvalidData, value)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        if matches!(value.raw_os_error(), Some(ENXIO | EREMOTEIO)) {
            return Error::Nack;
        }
        match value.kind() {
            ErrorKind::NotConnected => Error::Nack,
            kind => Error::Bus(kind),
        }
    }
}
