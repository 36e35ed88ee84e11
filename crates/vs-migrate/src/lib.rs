pub mod api_interfaces;
pub mod clean;
pub mod cms;
pub mod config;
pub mod constants;
pub mod download;
pub mod error;
pub mod export;
pub mod geocode;
pub mod import;
pub mod report;
pub mod source;
pub mod store;
pub mod telemetry;
pub mod throttle;
mod token;
pub mod util;
pub mod venue;

pub use token::ApiToken;
