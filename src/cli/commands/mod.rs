//! CLI command implementations

pub mod init_config;
pub mod sync;

pub use init_config::execute as init_config;
pub use sync::execute as sync;
