use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};

use super::{read_string, string_encode_size, write_string, Address, MAX_ANIME_LENGTH};

/// Room lifecycle. A room is created `Waiting`, becomes `Active` exactly once
/// when the second seat fills, and becomes `Finished` exactly once via forfeit
/// or normal completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RoomState {
    #[default]
    Waiting = 0,
    Active = 1,
    Finished = 2,
}

impl RoomState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl Write for RoomState {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for RoomState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Self::Waiting),
            1 => Ok(Self::Active),
            2 => Ok(Self::Finished),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for RoomState {
    const SIZE: usize = 1;
}

/// Seat identifier within a room. Also identifies the side of a spectator bet.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Seat {
    P1 = 0,
    P2 = 1,
}

impl Seat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }
}

impl Write for Seat {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Seat {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Self::P1),
            1 => Ok(Self::P2),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Seat {
    const SIZE: usize = 1;
}

/// Single-use power-up slot, earned every three correct answers in a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PowerUp {
    #[default]
    None = 0,
    Shield = 1,
    Snipe = 2,
    DoubleDown = 3,
}

impl PowerUp {
    /// Fixed earn cycle: None -> Shield -> Snipe -> DoubleDown -> Shield -> ...
    pub fn next(&self) -> Self {
        match self {
            Self::None => Self::Shield,
            Self::Shield => Self::Snipe,
            Self::Snipe => Self::DoubleDown,
            Self::DoubleDown => Self::Shield,
        }
    }

    /// Projection string; the empty slot prints as the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Shield => "shield",
            Self::Snipe => "snipe",
            Self::DoubleDown => "double_down",
        }
    }
}

impl Write for PowerUp {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for PowerUp {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Self::None),
            1 => Ok(Self::Shield),
            2 => Ok(Self::Snipe),
            3 => Ok(Self::DoubleDown),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for PowerUp {
    const SIZE: usize = 1;
}

/// Recorded match result.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Winner {
    #[default]
    Undecided,
    Tie,
    Player(Address),
}

impl Winner {
    /// Projection string: empty while unresolved, the `tie` sentinel, or the
    /// winning address.
    pub fn projection(&self) -> &str {
        match self {
            Self::Undecided => "",
            Self::Tie => "tie",
            Self::Player(addr) => addr.as_str(),
        }
    }
}

impl Write for Winner {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Undecided => 0u8.write(writer),
            Self::Tie => 1u8.write(writer),
            Self::Player(addr) => {
                2u8.write(writer);
                addr.write(writer);
            }
        }
    }
}

impl Read for Winner {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Self::Undecided),
            1 => Ok(Self::Tie),
            2 => Ok(Self::Player(Address::read(reader)?)),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for Winner {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Undecided | Self::Tie => 0,
            Self::Player(addr) => addr.encode_size(),
        }
    }
}

/// Outcome tag of an answer submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AnswerOutcome {
    Correct = 0,
    Wrong = 1,
    WrongBurn = 2,
    StealSuccess = 3,
    StealBlocked = 4,
    StealFailedBurn = 5,
}

impl AnswerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
            Self::WrongBurn => "wrong_burn",
            Self::StealSuccess => "steal_success",
            Self::StealBlocked => "steal_blocked",
            Self::StealFailedBurn => "steal_failed_burn",
        }
    }
}

impl Write for AnswerOutcome {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for AnswerOutcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(Self::Correct),
            1 => Ok(Self::Wrong),
            2 => Ok(Self::WrongBurn),
            3 => Ok(Self::StealSuccess),
            4 => Ok(Self::StealBlocked),
            5 => Ok(Self::StealFailedBurn),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for AnswerOutcome {
    const SIZE: usize = 1;
}

/// Per-seat match state: identity, anime selection, progress counters,
/// streaks, and the power-up slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSeat {
    pub address: Address,
    pub anime: String,
    pub answered: u8,
    pub correct_streak: u32,
    pub wrong_streak: u32,
    pub power_up: PowerUp,
    pub snipe_active: bool,
}

impl PlayerSeat {
    pub fn new(address: Address, anime: String) -> Self {
        Self {
            address,
            anime,
            answered: 0,
            correct_streak: 0,
            wrong_streak: 0,
            power_up: PowerUp::None,
            snipe_active: false,
        }
    }
}

impl Write for PlayerSeat {
    fn write(&self, writer: &mut impl BufMut) {
        self.address.write(writer);
        write_string(&self.anime, writer);
        self.answered.write(writer);
        self.correct_streak.write(writer);
        self.wrong_streak.write(writer);
        self.power_up.write(writer);
        self.snipe_active.write(writer);
    }
}

impl Read for PlayerSeat {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            address: Address::read(reader)?,
            anime: read_string(reader, MAX_ANIME_LENGTH)?,
            answered: u8::read(reader)?,
            correct_streak: u32::read(reader)?,
            wrong_streak: u32::read(reader)?,
            power_up: PowerUp::read(reader)?,
            snipe_active: bool::read(reader)?,
        })
    }
}

impl EncodeSize for PlayerSeat {
    fn encode_size(&self) -> usize {
        self.address.encode_size()
            + string_encode_size(&self.anime)
            + self.answered.encode_size()
            + self.correct_streak.encode_size()
            + self.wrong_streak.encode_size()
            + self.power_up.encode_size()
            + self.snipe_active.encode_size()
    }
}

/// One two-player match instance. Keyed in storage by its room code, which is
/// assigned at creation and never reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub state: RoomState,
    pub league_code: String,
    pub player1: PlayerSeat,
    pub player2: Option<PlayerSeat>,
    pub winner: Winner,
    pub pool_p1: u64,
    pub pool_p2: u64,
}

impl Room {
    pub fn new(player1: Address, anime: String, league_code: String) -> Self {
        Self {
            state: RoomState::Waiting,
            league_code,
            player1: PlayerSeat::new(player1, anime),
            player2: None,
            winner: Winner::Undecided,
            pool_p1: 0,
            pool_p2: 0,
        }
    }

    /// Which seat an address occupies, if any.
    pub fn seat_of(&self, address: &Address) -> Option<Seat> {
        if self.player1.address == *address {
            return Some(Seat::P1);
        }
        match &self.player2 {
            Some(p2) if p2.address == *address => Some(Seat::P2),
            _ => None,
        }
    }

    pub fn seat(&self, seat: Seat) -> Option<&PlayerSeat> {
        match seat {
            Seat::P1 => Some(&self.player1),
            Seat::P2 => self.player2.as_ref(),
        }
    }

    pub fn seat_mut(&mut self, seat: Seat) -> Option<&mut PlayerSeat> {
        match seat {
            Seat::P1 => Some(&mut self.player1),
            Seat::P2 => self.player2.as_mut(),
        }
    }

    pub fn pool(&self, side: Seat) -> u64 {
        match side {
            Seat::P1 => self.pool_p1,
            Seat::P2 => self.pool_p2,
        }
    }
}

impl Write for Room {
    fn write(&self, writer: &mut impl BufMut) {
        self.state.write(writer);
        write_string(&self.league_code, writer);
        self.player1.write(writer);
        self.player2.write(writer);
        self.winner.write(writer);
        self.pool_p1.write(writer);
        self.pool_p2.write(writer);
    }
}

impl Read for Room {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            state: RoomState::read(reader)?,
            league_code: read_string(reader, super::MAX_CODE_LENGTH)?,
            player1: PlayerSeat::read(reader)?,
            player2: Option::<PlayerSeat>::read(reader)?,
            winner: Winner::read(reader)?,
            pool_p1: u64::read(reader)?,
            pool_p2: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Room {
    fn encode_size(&self) -> usize {
        self.state.encode_size()
            + string_encode_size(&self.league_code)
            + self.player1.encode_size()
            + self.player2.encode_size()
            + self.winner.encode_size()
            + self.pool_p1.encode_size()
            + self.pool_p2.encode_size()
    }
}
