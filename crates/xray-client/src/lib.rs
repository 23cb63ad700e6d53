pub mod config;
pub mod duckduckgo;
pub mod replay;

pub use config::ProviderConfig;
pub use duckduckgo::DuckDuckGoProvider;
pub use replay::ReplayProvider;
