use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, Write};
use std::fmt;
use thiserror::Error as ThisError;

use super::{read_string, string_encode_size, write_string};
use super::{MAX_ADDRESS_LENGTH, MIN_ADDRESS_LENGTH};

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum AddressError {
    #[error("address too short (len={len}, min={min})")]
    TooShort { len: usize, min: usize },
    #[error("address too long (len={len}, max={max})")]
    TooLong { len: usize, max: usize },
}

/// Opaque player/bettor identifier supplied by the host environment.
///
/// The core never interprets the contents; it only requires length bounds so
/// keys stay well-formed in storage.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let len = raw.len();
        if len < MIN_ADDRESS_LENGTH {
            return Err(AddressError::TooShort {
                len,
                min: MIN_ADDRESS_LENGTH,
            });
        }
        if len > MAX_ADDRESS_LENGTH {
            return Err(AddressError::TooLong {
                len,
                max: MAX_ADDRESS_LENGTH,
            });
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Write for Address {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.0, writer);
    }
}

impl Read for Address {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let raw = read_string(reader, MAX_ADDRESS_LENGTH)?;
        if raw.len() < MIN_ADDRESS_LENGTH {
            return Err(Error::Invalid("Address", "too short"));
        }
        Ok(Self(raw))
    }
}

impl EncodeSize for Address {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.0)
    }
}
