//! Dice-throw producer for dicelog.
//!
//! [`DiceThrow`] rolls two six-sided dice and reports its running throw
//! count through an [`EventSource`](dicelog_channel::EventSource) every
//! [`BATCH_SIZE`] throws. [`divide_by_zero`] is a deliberately failing
//! operation used to demonstrate exception-flagged events.

pub mod dice;
pub mod error;
pub mod tally;

pub use dice::{divide_by_zero, DiceThrow, Throw, BATCH_SIZE, LIBRARY_NAME};
pub use error::{DiceError, Result};
pub use tally::RollTally;
