//! Duel domain types.
//!
//! Defines ledger/room/betting/league state and constants used by the
//! execution layer and clients.

mod address;
mod betting;
mod codec;
mod constants;
mod league;
mod ledger;
pub mod question;
mod room;

pub use address::{Address, AddressError};
pub use betting::Bet;
pub use codec::{read_string, string_encode_size, write_string};
pub use constants::*;
pub use league::{League, MemberStats};
pub use ledger::TokenStats;
pub use room::{AnswerOutcome, PlayerSeat, PowerUp, Room, RoomState, Seat, Winner};
