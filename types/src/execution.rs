use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

use crate::duel::{
    read_string, string_encode_size, write_string, Address, AnswerOutcome, Bet, League,
    MemberStats, Room, Seat, TokenStats, Winner, MAX_ADDRESS_LENGTH, MAX_ANIME_LENGTH,
    MAX_ANSWER_LENGTH, MAX_CODE_LENGTH, MAX_LEAGUE_NAME_LENGTH, MAX_QUESTION_LENGTH,
};
use crate::oracle::GeneratedQuestion;

/// Maximum error message length carried in a DuelError event.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 256;

/// One state transition against the duel core.
///
/// Every instruction carries its caller address as a primitive string;
/// authentication and sequencing are the host's responsibility, so the core
/// only validates shape. A precondition violation journals a `DuelError`
/// event and stages no writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    // Room instructions (tags 10-17)
    /// Open a room in the waiting state.
    /// Binary: [10] [roomCode] [anime] [player] [leagueCode]
    CreateRoom {
        room_code: String,
        anime: String,
        player: String,
        league_code: String,
    },

    /// Fill the second seat, activate the room, and mint the join bonus to
    /// both players.
    /// Binary: [11] [roomCode] [anime] [player]
    JoinRoom {
        room_code: String,
        anime: String,
        player: String,
    },

    /// Consume a held snipe power-up, arming it against the opponent's next
    /// normal-round question.
    /// Binary: [12] [roomCode] [player]
    UseSnipe { room_code: String, player: String },

    /// Resolve the question context for a seat and obtain the agreed question
    /// from the oracle port.
    /// Binary: [13] [roomCode] [seat:u8] [questionNum:u8]
    GetQuestion {
        room_code: String,
        seat: Seat,
        question_num: u8,
    },

    /// Submit an answer (or a steal attempt) for verification and settlement.
    /// Binary: [14] [roomCode] [question] [answer] [isSteal:u8] [player]
    SubmitAnswer {
        room_code: String,
        question: String,
        answer: String,
        is_steal: bool,
        player: String,
    },

    /// Settle a rage-quit: the given address is the player still present.
    /// Binary: [15] [roomCode] [activePlayer]
    ForfeitGame {
        room_code: String,
        active_player: String,
    },

    /// Finish a complete match and record the winner by balance comparison.
    /// Binary: [16] [roomCode] [player]
    EndGame { room_code: String, player: String },

    /// Reset a participant's balance for a fresh AI match.
    /// Binary: [17] [roomCode] [player]
    ResetMatchBalance { room_code: String, player: String },

    // Betting instructions (tags 20-22)
    /// One-time spectator airdrop.
    /// Binary: [20] [address]
    SpectatorAirdrop { address: String },

    /// Stake tokens on a side while the room is open.
    /// Binary: [21] [roomCode] [bettor] [side:u8] [amount:u64 BE]
    PlaceBet {
        room_code: String,
        bettor: String,
        side: Seat,
        amount: u64,
    },

    /// Settle a bet after the room finishes.
    /// Binary: [22] [roomCode] [bettor]
    ClaimWinnings { room_code: String, bettor: String },

    // League instructions (tags 30-32)
    /// Create a league with the creator as its first member.
    /// Binary: [30] [leagueCode] [name] [creator] [createdAt:u64 BE]
    CreateLeague {
        league_code: String,
        name: String,
        creator: String,
        created_at: u64,
    },

    /// Join a league (once per address).
    /// Binary: [31] [leagueCode] [member]
    JoinLeague { league_code: String, member: String },

    /// Record a finished match's result against league standings. Deltas are
    /// caller-computed; non-members are skipped.
    /// Binary: [32] [leagueCode] [winner] [loser] [winnerDelta:i64 BE] [loserDelta:i64 BE]
    RecordLeagueResult {
        league_code: String,
        winner: String,
        loser: String,
        winner_delta: i64,
        loser_delta: i64,
    },
}

impl Write for Instruction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            // Room instructions (tags 10-17)
            Self::CreateRoom {
                room_code,
                anime,
                player,
                league_code,
            } => {
                10u8.write(writer);
                write_string(room_code, writer);
                write_string(anime, writer);
                write_string(player, writer);
                write_string(league_code, writer);
            }
            Self::JoinRoom {
                room_code,
                anime,
                player,
            } => {
                11u8.write(writer);
                write_string(room_code, writer);
                write_string(anime, writer);
                write_string(player, writer);
            }
            Self::UseSnipe { room_code, player } => {
                12u8.write(writer);
                write_string(room_code, writer);
                write_string(player, writer);
            }
            Self::GetQuestion {
                room_code,
                seat,
                question_num,
            } => {
                13u8.write(writer);
                write_string(room_code, writer);
                seat.write(writer);
                question_num.write(writer);
            }
            Self::SubmitAnswer {
                room_code,
                question,
                answer,
                is_steal,
                player,
            } => {
                14u8.write(writer);
                write_string(room_code, writer);
                write_string(question, writer);
                write_string(answer, writer);
                is_steal.write(writer);
                write_string(player, writer);
            }
            Self::ForfeitGame {
                room_code,
                active_player,
            } => {
                15u8.write(writer);
                write_string(room_code, writer);
                write_string(active_player, writer);
            }
            Self::EndGame { room_code, player } => {
                16u8.write(writer);
                write_string(room_code, writer);
                write_string(player, writer);
            }
            Self::ResetMatchBalance { room_code, player } => {
                17u8.write(writer);
                write_string(room_code, writer);
                write_string(player, writer);
            }

            // Betting (20-22)
            Self::SpectatorAirdrop { address } => {
                20u8.write(writer);
                write_string(address, writer);
            }
            Self::PlaceBet {
                room_code,
                bettor,
                side,
                amount,
            } => {
                21u8.write(writer);
                write_string(room_code, writer);
                write_string(bettor, writer);
                side.write(writer);
                amount.write(writer);
            }
            Self::ClaimWinnings { room_code, bettor } => {
                22u8.write(writer);
                write_string(room_code, writer);
                write_string(bettor, writer);
            }

            // League (30-32)
            Self::CreateLeague {
                league_code,
                name,
                creator,
                created_at,
            } => {
                30u8.write(writer);
                write_string(league_code, writer);
                write_string(name, writer);
                write_string(creator, writer);
                created_at.write(writer);
            }
            Self::JoinLeague {
                league_code,
                member,
            } => {
                31u8.write(writer);
                write_string(league_code, writer);
                write_string(member, writer);
            }
            Self::RecordLeagueResult {
                league_code,
                winner,
                loser,
                winner_delta,
                loser_delta,
            } => {
                32u8.write(writer);
                write_string(league_code, writer);
                write_string(winner, writer);
                write_string(loser, writer);
                winner_delta.write(writer);
                loser_delta.write(writer);
            }
        }
    }
}

impl Read for Instruction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let instruction = match reader.get_u8() {
            // Room instructions (tags 10-17)
            10 => Self::CreateRoom {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                anime: read_string(reader, MAX_ANIME_LENGTH)?,
                player: read_string(reader, MAX_ADDRESS_LENGTH)?,
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
            },
            11 => Self::JoinRoom {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                anime: read_string(reader, MAX_ANIME_LENGTH)?,
                player: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            12 => Self::UseSnipe {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            13 => Self::GetQuestion {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                seat: Seat::read(reader)?,
                question_num: u8::read(reader)?,
            },
            14 => Self::SubmitAnswer {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                question: read_string(reader, MAX_QUESTION_LENGTH)?,
                answer: read_string(reader, MAX_ANSWER_LENGTH)?,
                is_steal: bool::read(reader)?,
                player: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            15 => Self::ForfeitGame {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                active_player: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            16 => Self::EndGame {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            17 => Self::ResetMatchBalance {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },

            // Betting (20-22)
            20 => Self::SpectatorAirdrop {
                address: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            21 => Self::PlaceBet {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                bettor: read_string(reader, MAX_ADDRESS_LENGTH)?,
                side: Seat::read(reader)?,
                amount: u64::read(reader)?,
            },
            22 => Self::ClaimWinnings {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                bettor: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },

            // League (30-32)
            30 => Self::CreateLeague {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                name: read_string(reader, MAX_LEAGUE_NAME_LENGTH)?,
                creator: read_string(reader, MAX_ADDRESS_LENGTH)?,
                created_at: u64::read(reader)?,
            },
            31 => Self::JoinLeague {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                member: read_string(reader, MAX_ADDRESS_LENGTH)?,
            },
            32 => Self::RecordLeagueResult {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                winner: read_string(reader, MAX_ADDRESS_LENGTH)?,
                loser: read_string(reader, MAX_ADDRESS_LENGTH)?,
                winner_delta: i64::read(reader)?,
                loser_delta: i64::read(reader)?,
            },

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(instruction)
    }
}

impl EncodeSize for Instruction {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                // Room
                Self::CreateRoom {
                    room_code,
                    anime,
                    player,
                    league_code,
                } => {
                    string_encode_size(room_code)
                        + string_encode_size(anime)
                        + string_encode_size(player)
                        + string_encode_size(league_code)
                }
                Self::JoinRoom {
                    room_code,
                    anime,
                    player,
                } => {
                    string_encode_size(room_code)
                        + string_encode_size(anime)
                        + string_encode_size(player)
                }
                Self::UseSnipe { room_code, player } => {
                    string_encode_size(room_code) + string_encode_size(player)
                }
                Self::GetQuestion { room_code, .. } => {
                    string_encode_size(room_code) + Seat::SIZE + u8::SIZE
                }
                Self::SubmitAnswer {
                    room_code,
                    question,
                    answer,
                    player,
                    ..
                } => {
                    string_encode_size(room_code)
                        + string_encode_size(question)
                        + string_encode_size(answer)
                        + 1
                        + string_encode_size(player)
                }
                Self::ForfeitGame {
                    room_code,
                    active_player,
                } => string_encode_size(room_code) + string_encode_size(active_player),
                Self::EndGame { room_code, player }
                | Self::ResetMatchBalance { room_code, player } => {
                    string_encode_size(room_code) + string_encode_size(player)
                }

                // Betting
                Self::SpectatorAirdrop { address } => string_encode_size(address),
                Self::PlaceBet {
                    room_code,
                    bettor,
                    amount,
                    ..
                } => {
                    string_encode_size(room_code)
                        + string_encode_size(bettor)
                        + Seat::SIZE
                        + amount.encode_size()
                }
                Self::ClaimWinnings { room_code, bettor } => {
                    string_encode_size(room_code) + string_encode_size(bettor)
                }

                // League
                Self::CreateLeague {
                    league_code,
                    name,
                    creator,
                    created_at,
                } => {
                    string_encode_size(league_code)
                        + string_encode_size(name)
                        + string_encode_size(creator)
                        + created_at.encode_size()
                }
                Self::JoinLeague {
                    league_code,
                    member,
                } => string_encode_size(league_code) + string_encode_size(member),
                Self::RecordLeagueResult {
                    league_code,
                    winner,
                    loser,
                    winner_delta,
                    loser_delta,
                } => {
                    string_encode_size(league_code)
                        + string_encode_size(winner)
                        + string_encode_size(loser)
                        + winner_delta.encode_size()
                        + loser_delta.encode_size()
                }
            }
    }
}

/// Typed storage keys. Composite keys are explicit variants rather than
/// string concatenation so lookups cannot collide.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub enum Key {
    // Ledger keys (tags 0-1)
    Balance(Address),
    TokenStats,

    // Room/betting keys (tags 10-12)
    Room(String),
    Bet {
        room_code: String,
        bettor: Address,
    },
    AirdropClaim(Address),

    // League keys (tags 20-22)
    League(String),
    LeagueMember {
        league_code: String,
        member: Address,
    },
    LeagueMemberIndex {
        league_code: String,
        index: u32,
    },
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            // Ledger keys (tags 0-1)
            Self::Balance(addr) => {
                0u8.write(writer);
                addr.write(writer);
            }
            Self::TokenStats => 1u8.write(writer),

            // Room/betting keys (tags 10-12)
            Self::Room(code) => {
                10u8.write(writer);
                write_string(code, writer);
            }
            Self::Bet { room_code, bettor } => {
                11u8.write(writer);
                write_string(room_code, writer);
                bettor.write(writer);
            }
            Self::AirdropClaim(addr) => {
                12u8.write(writer);
                addr.write(writer);
            }

            // League keys (tags 20-22)
            Self::League(code) => {
                20u8.write(writer);
                write_string(code, writer);
            }
            Self::LeagueMember {
                league_code,
                member,
            } => {
                21u8.write(writer);
                write_string(league_code, writer);
                member.write(writer);
            }
            Self::LeagueMemberIndex { league_code, index } => {
                22u8.write(writer);
                write_string(league_code, writer);
                index.write(writer);
            }
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let key = match reader.get_u8() {
            // Ledger keys (tags 0-1)
            0 => Self::Balance(Address::read(reader)?),
            1 => Self::TokenStats,

            // Room/betting keys (tags 10-12)
            10 => Self::Room(read_string(reader, MAX_CODE_LENGTH)?),
            11 => Self::Bet {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                bettor: Address::read(reader)?,
            },
            12 => Self::AirdropClaim(Address::read(reader)?),

            // League keys (tags 20-22)
            20 => Self::League(read_string(reader, MAX_CODE_LENGTH)?),
            21 => Self::LeagueMember {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                member: Address::read(reader)?,
            },
            22 => Self::LeagueMemberIndex {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                index: u32::read(reader)?,
            },

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(key)
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                // Ledger keys
                Self::Balance(addr) => addr.encode_size(),
                Self::TokenStats => 0,

                // Room/betting keys
                Self::Room(code) => string_encode_size(code),
                Self::Bet { room_code, bettor } => {
                    string_encode_size(room_code) + bettor.encode_size()
                }
                Self::AirdropClaim(addr) => addr.encode_size(),

                // League keys
                Self::League(code) => string_encode_size(code),
                Self::LeagueMember {
                    league_code,
                    member,
                } => string_encode_size(league_code) + member.encode_size(),
                Self::LeagueMemberIndex { league_code, .. } => {
                    string_encode_size(league_code) + u32::SIZE
                }
            }
    }
}

/// Stored values, one variant per key family.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Value {
    // Ledger values (tags 0-1)
    Balance(u64),
    TokenStats(TokenStats),

    // Room/betting values (tags 10-12)
    Room(Room),
    Bet(Bet),
    AirdropClaim,

    // League values (tags 20-22)
    League(League),
    LeagueMember(MemberStats),
    LeagueMemberIndex(Address),
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            // Ledger values (tags 0-1)
            Self::Balance(balance) => {
                0u8.write(writer);
                balance.write(writer);
            }
            Self::TokenStats(stats) => {
                1u8.write(writer);
                stats.write(writer);
            }

            // Room/betting values (tags 10-12)
            Self::Room(room) => {
                10u8.write(writer);
                room.write(writer);
            }
            Self::Bet(bet) => {
                11u8.write(writer);
                bet.write(writer);
            }
            Self::AirdropClaim => 12u8.write(writer),

            // League values (tags 20-22)
            Self::League(league) => {
                20u8.write(writer);
                league.write(writer);
            }
            Self::LeagueMember(stats) => {
                21u8.write(writer);
                stats.write(writer);
            }
            Self::LeagueMemberIndex(addr) => {
                22u8.write(writer);
                addr.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = match reader.get_u8() {
            // Ledger values (tags 0-1)
            0 => Self::Balance(u64::read(reader)?),
            1 => Self::TokenStats(TokenStats::read(reader)?),

            // Room/betting values (tags 10-12)
            10 => Self::Room(Room::read(reader)?),
            11 => Self::Bet(Bet::read(reader)?),
            12 => Self::AirdropClaim,

            // League values (tags 20-22)
            20 => Self::League(League::read(reader)?),
            21 => Self::LeagueMember(MemberStats::read(reader)?),
            22 => Self::LeagueMemberIndex(Address::read(reader)?),

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(value)
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                // Ledger values
                Self::Balance(balance) => balance.encode_size(),
                Self::TokenStats(stats) => stats.encode_size(),

                // Room/betting values
                Self::Room(room) => room.encode_size(),
                Self::Bet(bet) => bet.encode_size(),
                Self::AirdropClaim => 0,

                // League values
                Self::League(league) => league.encode_size(),
                Self::LeagueMember(stats) => stats.encode_size(),
                Self::LeagueMemberIndex(addr) => addr.encode_size(),
            }
    }
}

/// Journaled results of applied instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Room events (tags 10-17)
    RoomCreated {
        room_code: String,
        player: Address,
    },
    RoomJoined {
        room_code: String,
        player: Address,
        join_bonus: u64,
    },
    SnipeActivated {
        room_code: String,
        player: Address,
    },
    QuestionIssued {
        room_code: String,
        seat: Seat,
        question_num: u8,
        question: GeneratedQuestion,
    },
    AnswerResolved {
        room_code: String,
        player: Address,
        outcome: AnswerOutcome,
        /// Tokens actually moved or burned; may be less than the nominal
        /// amount when a balance could not cover it.
        tokens_moved: u64,
    },
    GameForfeited {
        room_code: String,
        winner: Address,
        transferred: u64,
        burned: u64,
    },
    GameEnded {
        room_code: String,
        winner: Winner,
    },
    MatchBalanceReset {
        room_code: String,
        player: Address,
        previous_balance: u64,
    },

    // Betting events (tags 20-22)
    AirdropClaimed {
        address: Address,
        amount: u64,
    },
    BetPlaced {
        room_code: String,
        bettor: Address,
        side: Seat,
        amount: u64,
    },
    WinningsClaimed {
        room_code: String,
        bettor: Address,
        payout: u64,
    },

    // League events (tags 30-32)
    LeagueCreated {
        league_code: String,
        creator: Address,
    },
    LeagueJoined {
        league_code: String,
        member: Address,
        index: u32,
    },
    LeagueResultRecorded {
        league_code: String,
        winner_counted: bool,
        loser_counted: bool,
    },

    // Error event (tag 40)
    DuelError {
        address: String,
        room_code: Option<String>,
        error_code: u8,
        message: String,
    },
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            // Room events (tags 10-17)
            Self::RoomCreated { room_code, player } => {
                10u8.write(writer);
                write_string(room_code, writer);
                player.write(writer);
            }
            Self::RoomJoined {
                room_code,
                player,
                join_bonus,
            } => {
                11u8.write(writer);
                write_string(room_code, writer);
                player.write(writer);
                join_bonus.write(writer);
            }
            Self::SnipeActivated { room_code, player } => {
                12u8.write(writer);
                write_string(room_code, writer);
                player.write(writer);
            }
            Self::QuestionIssued {
                room_code,
                seat,
                question_num,
                question,
            } => {
                13u8.write(writer);
                write_string(room_code, writer);
                seat.write(writer);
                question_num.write(writer);
                question.write(writer);
            }
            Self::AnswerResolved {
                room_code,
                player,
                outcome,
                tokens_moved,
            } => {
                14u8.write(writer);
                write_string(room_code, writer);
                player.write(writer);
                outcome.write(writer);
                tokens_moved.write(writer);
            }
            Self::GameForfeited {
                room_code,
                winner,
                transferred,
                burned,
            } => {
                15u8.write(writer);
                write_string(room_code, writer);
                winner.write(writer);
                transferred.write(writer);
                burned.write(writer);
            }
            Self::GameEnded { room_code, winner } => {
                16u8.write(writer);
                write_string(room_code, writer);
                winner.write(writer);
            }
            Self::MatchBalanceReset {
                room_code,
                player,
                previous_balance,
            } => {
                17u8.write(writer);
                write_string(room_code, writer);
                player.write(writer);
                previous_balance.write(writer);
            }

            // Betting events (tags 20-22)
            Self::AirdropClaimed { address, amount } => {
                20u8.write(writer);
                address.write(writer);
                amount.write(writer);
            }
            Self::BetPlaced {
                room_code,
                bettor,
                side,
                amount,
            } => {
                21u8.write(writer);
                write_string(room_code, writer);
                bettor.write(writer);
                side.write(writer);
                amount.write(writer);
            }
            Self::WinningsClaimed {
                room_code,
                bettor,
                payout,
            } => {
                22u8.write(writer);
                write_string(room_code, writer);
                bettor.write(writer);
                payout.write(writer);
            }

            // League events (tags 30-32)
            Self::LeagueCreated {
                league_code,
                creator,
            } => {
                30u8.write(writer);
                write_string(league_code, writer);
                creator.write(writer);
            }
            Self::LeagueJoined {
                league_code,
                member,
                index,
            } => {
                31u8.write(writer);
                write_string(league_code, writer);
                member.write(writer);
                index.write(writer);
            }
            Self::LeagueResultRecorded {
                league_code,
                winner_counted,
                loser_counted,
            } => {
                32u8.write(writer);
                write_string(league_code, writer);
                winner_counted.write(writer);
                loser_counted.write(writer);
            }

            // Error event (tag 40)
            Self::DuelError {
                address,
                room_code,
                error_code,
                message,
            } => {
                40u8.write(writer);
                write_string(address, writer);
                match room_code {
                    Some(code) => {
                        true.write(writer);
                        write_string(code, writer);
                    }
                    None => false.write(writer),
                }
                error_code.write(writer);
                write_string(message, writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let event = match reader.get_u8() {
            // Room events (tags 10-17)
            10 => Self::RoomCreated {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: Address::read(reader)?,
            },
            11 => Self::RoomJoined {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: Address::read(reader)?,
                join_bonus: u64::read(reader)?,
            },
            12 => Self::SnipeActivated {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: Address::read(reader)?,
            },
            13 => Self::QuestionIssued {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                seat: Seat::read(reader)?,
                question_num: u8::read(reader)?,
                question: GeneratedQuestion::read(reader)?,
            },
            14 => Self::AnswerResolved {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: Address::read(reader)?,
                outcome: AnswerOutcome::read(reader)?,
                tokens_moved: u64::read(reader)?,
            },
            15 => Self::GameForfeited {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                winner: Address::read(reader)?,
                transferred: u64::read(reader)?,
                burned: u64::read(reader)?,
            },
            16 => Self::GameEnded {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                winner: Winner::read(reader)?,
            },
            17 => Self::MatchBalanceReset {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                player: Address::read(reader)?,
                previous_balance: u64::read(reader)?,
            },

            // Betting events (tags 20-22)
            20 => Self::AirdropClaimed {
                address: Address::read(reader)?,
                amount: u64::read(reader)?,
            },
            21 => Self::BetPlaced {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                bettor: Address::read(reader)?,
                side: Seat::read(reader)?,
                amount: u64::read(reader)?,
            },
            22 => Self::WinningsClaimed {
                room_code: read_string(reader, MAX_CODE_LENGTH)?,
                bettor: Address::read(reader)?,
                payout: u64::read(reader)?,
            },

            // League events (tags 30-32)
            30 => Self::LeagueCreated {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                creator: Address::read(reader)?,
            },
            31 => Self::LeagueJoined {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                member: Address::read(reader)?,
                index: u32::read(reader)?,
            },
            32 => Self::LeagueResultRecorded {
                league_code: read_string(reader, MAX_CODE_LENGTH)?,
                winner_counted: bool::read(reader)?,
                loser_counted: bool::read(reader)?,
            },

            // Error event (tag 40)
            40 => Self::DuelError {
                address: read_string(reader, MAX_ADDRESS_LENGTH)?,
                room_code: if bool::read(reader)? {
                    Some(read_string(reader, MAX_CODE_LENGTH)?)
                } else {
                    None
                },
                error_code: u8::read(reader)?,
                message: read_string(reader, MAX_ERROR_MESSAGE_LENGTH)?,
            },

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                // Room events (tags 10-17)
                Self::RoomCreated { room_code, player } => {
                    string_encode_size(room_code) + player.encode_size()
                }
                Self::RoomJoined {
                    room_code,
                    player,
                    join_bonus,
                } => {
                    string_encode_size(room_code)
                        + player.encode_size()
                        + join_bonus.encode_size()
                }
                Self::SnipeActivated { room_code, player } => {
                    string_encode_size(room_code) + player.encode_size()
                }
                Self::QuestionIssued {
                    room_code,
                    question,
                    ..
                } => {
                    string_encode_size(room_code) + Seat::SIZE + u8::SIZE + question.encode_size()
                }
                Self::AnswerResolved {
                    room_code,
                    player,
                    tokens_moved,
                    ..
                } => {
                    string_encode_size(room_code)
                        + player.encode_size()
                        + AnswerOutcome::SIZE
                        + tokens_moved.encode_size()
                }
                Self::GameForfeited {
                    room_code,
                    winner,
                    transferred,
                    burned,
                } => {
                    string_encode_size(room_code)
                        + winner.encode_size()
                        + transferred.encode_size()
                        + burned.encode_size()
                }
                Self::GameEnded { room_code, winner } => {
                    string_encode_size(room_code) + winner.encode_size()
                }
                Self::MatchBalanceReset {
                    room_code,
                    player,
                    previous_balance,
                } => {
                    string_encode_size(room_code)
                        + player.encode_size()
                        + previous_balance.encode_size()
                }

                // Betting events (tags 20-22)
                Self::AirdropClaimed { address, amount } => {
                    address.encode_size() + amount.encode_size()
                }
                Self::BetPlaced {
                    room_code,
                    bettor,
                    amount,
                    ..
                } => {
                    string_encode_size(room_code)
                        + bettor.encode_size()
                        + Seat::SIZE
                        + amount.encode_size()
                }
                Self::WinningsClaimed {
                    room_code,
                    bettor,
                    payout,
                } => string_encode_size(room_code) + bettor.encode_size() + payout.encode_size(),

                // League events (tags 30-32)
                Self::LeagueCreated {
                    league_code,
                    creator,
                } => string_encode_size(league_code) + creator.encode_size(),
                Self::LeagueJoined {
                    league_code,
                    member,
                    index,
                } => string_encode_size(league_code) + member.encode_size() + index.encode_size(),
                Self::LeagueResultRecorded { league_code, .. } => {
                    string_encode_size(league_code) + 1 + 1
                }

                // Error event (tag 40)
                Self::DuelError {
                    address,
                    room_code,
                    message,
                    ..
                } => {
                    string_encode_size(address)
                        + 1
                        + room_code
                            .as_ref()
                            .map(|c| string_encode_size(c))
                            .unwrap_or(0)
                        + u8::SIZE
                        + string_encode_size(message)
                }
            }
    }
}

/// Entries of the output journal produced by executing a batch: each applied
/// instruction is echoed after the events it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Event(Event),
    Instruction(Instruction),
}

impl Write for Output {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Event(event) => {
                0u8.write(writer);
                event.write(writer);
            }
            Self::Instruction(instruction) => {
                1u8.write(writer);
                instruction.write(writer);
            }
        }
    }
}

impl Read for Output {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Event(Event::read(reader)?)),
            1 => Ok(Self::Instruction(Instruction::read(reader)?)),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Output {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Event(event) => event.encode_size(),
            Self::Instruction(instruction) => instruction.encode_size(),
        }
    }
}
