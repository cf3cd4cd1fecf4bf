//! Port traits defining the per-OS implementation boundary.
//!
//! The portable API layer in `osal` calls through these traits; the
//! host-specific implementations live in `src/adapters/`.

pub mod shell;

pub use shell::ShellBackend;
