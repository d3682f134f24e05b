use thiserror::Error;

/// Errors produced by the dice library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiceError {
    /// Integer division by zero.
    #[error("attempted to divide {dividend} by zero")]
    DivideByZero { dividend: i32 },

    /// A die face outside `1..=6`.
    #[error("die face {face} is outside 1..=6")]
    InvalidFace { face: u8 },
}

pub type Result<T> = std::result::Result<T, DiceError>;
