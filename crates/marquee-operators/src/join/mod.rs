//! Join operators.

pub mod hash;
