use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

use super::{read_string, string_encode_size, write_string, Address, MAX_LEAGUE_NAME_LENGTH};

/// League metadata. Membership and per-member stats are stored under their own
/// keys so a league's lifetime is independent of any single room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct League {
    pub name: String,
    pub creator: Address,
    pub created_at: u64,
    pub member_count: u32,
}

impl Write for League {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.name, writer);
        self.creator.write(writer);
        self.created_at.write(writer);
        self.member_count.write(writer);
    }
}

impl Read for League {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            name: read_string(reader, MAX_LEAGUE_NAME_LENGTH)?,
            creator: Address::read(reader)?,
            created_at: u64::read(reader)?,
            member_count: u32::read(reader)?,
        })
    }
}

impl EncodeSize for League {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.name)
            + self.creator.encode_size()
            + self.created_at.encode_size()
            + self.member_count.encode_size()
    }
}

/// Per-member standing within a league. Counters are monotonic;
/// `tokens_earned` is a running signed sum of caller-supplied deltas and may
/// go negative.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MemberStats {
    pub wins: u32,
    pub losses: u32,
    pub tokens_earned: i64,
    pub games: u32,
}

impl Write for MemberStats {
    fn write(&self, writer: &mut impl BufMut) {
        self.wins.write(writer);
        self.losses.write(writer);
        self.tokens_earned.write(writer);
        self.games.write(writer);
    }
}

impl Read for MemberStats {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            wins: u32::read(reader)?,
            losses: u32::read(reader)?,
            tokens_earned: i64::read(reader)?,
            games: u32::read(reader)?,
        })
    }
}

impl EncodeSize for MemberStats {
    fn encode_size(&self) -> usize {
        self.wins.encode_size()
            + self.losses.encode_size()
            + self.tokens_earned.encode_size()
            + self.games.encode_size()
    }
}
