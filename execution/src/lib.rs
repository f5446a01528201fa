//! Duelist execution layer.
//!
//! This crate contains the deterministic instruction execution logic
//! ([`Layer`]) for the trivia-duel core: the GOT ledger, room state machine,
//! spectator betting pool, and league registry.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution; timestamps arrive as
//!   instruction arguments.
//! - Do not use randomness; wild-card picks and category rotation derive from
//!   room codes and question numbers.
//! - Oracle results cross the [`oracle::QuestionOracle`] port already agreed;
//!   the core never re-runs or reconciles oracle executions.
//!
//! ## Transition invariants
//! Each instruction is one atomic transition: precondition violations journal
//! a `DuelError` event and stage nothing, internal errors abort the batch,
//! and `Layer::commit` is the only way writes reach the backing store.

pub mod oracle;
pub mod queries;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod layer;

mod state;

#[cfg(test)]
mod match_flow_tests;

pub use layer::Layer;
pub use oracle::QuestionOracle;
pub use state::{Adb, State, Status};

#[cfg(any(test, feature = "mocks"))]
pub use state::Memory;
