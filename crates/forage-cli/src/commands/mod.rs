//! CLI command implementations.

pub mod init;
pub mod distribute;
pub mod select;
