//! CLI command implementations

pub mod config;
pub mod key;
pub mod resolve;

pub use config::execute as config;
pub use key::execute as key;
pub use resolve::execute as resolve;
