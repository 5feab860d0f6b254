//! CLI commands

pub mod check;
pub mod fmt;
pub mod init;
pub mod list;
pub mod new;
pub mod show;
