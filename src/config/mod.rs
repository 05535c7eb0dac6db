pub mod chain;
pub mod cli;
pub mod consts;

// Re-export for convenience
pub use chain::ChainProfile;
pub use cli::{CliArgs, PlatformConfig};
