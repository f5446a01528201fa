use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

use super::Seat;

/// A spectator's wager on one room. At most one per (room, bettor); the stake
/// is debited at placement and held in the room's pool until claimed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bet {
    pub side: Seat,
    pub amount: u64,
    pub claimed: bool,
}

impl Bet {
    pub fn new(side: Seat, amount: u64) -> Self {
        Self {
            side,
            amount,
            claimed: false,
        }
    }
}

impl Write for Bet {
    fn write(&self, writer: &mut impl BufMut) {
        self.side.write(writer);
        self.amount.write(writer);
        self.claimed.write(writer);
    }
}

impl Read for Bet {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            side: Seat::read(reader)?,
            amount: u64::read(reader)?,
            claimed: bool::read(reader)?,
        })
    }
}

impl EncodeSize for Bet {
    fn encode_size(&self) -> usize {
        self.side.encode_size() + self.amount.encode_size() + self.claimed.encode_size()
    }
}
