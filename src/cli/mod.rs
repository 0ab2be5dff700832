//! CLI command implementations

pub mod init;
pub mod resolve;
pub mod scan;
pub mod script;
pub mod watch;
