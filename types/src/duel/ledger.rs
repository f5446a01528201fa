use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

/// Global GOT supply counters.
///
/// `total_supply` tracks every mint minus every burn; `total_burned` only ever
/// grows. Stakes held in room betting pools remain part of `total_supply`
/// even though they sit outside any address balance.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TokenStats {
    pub total_supply: u64,
    pub total_burned: u64,
}

impl Write for TokenStats {
    fn write(&self, writer: &mut impl BufMut) {
        self.total_supply.write(writer);
        self.total_burned.write(writer);
    }
}

impl Read for TokenStats {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            total_supply: u64::read(reader)?,
            total_burned: u64::read(reader)?,
        })
    }
}

impl EncodeSize for TokenStats {
    fn encode_size(&self) -> usize {
        self.total_supply.encode_size() + self.total_burned.encode_size()
    }
}
