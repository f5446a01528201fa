pub mod duel;
pub mod execution;
pub mod oracle;

pub use duel::Address;
pub use execution::{Event, Instruction, Key, Output, Value};
