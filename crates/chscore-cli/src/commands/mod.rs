//! CLI command implementations.

pub mod dump;
pub mod export;
pub mod hash;
pub mod resolve;
pub mod watch;
