//! Live adapters backed by the host operating system.

pub mod noshell;
#[cfg(unix)]
pub mod posix;
