//! Concrete classifier services and cross-cutting sink decorators.

pub mod geoip;
pub mod metered;
pub mod user_agent;

pub use geoip::MaxMindIpParser;
pub use metered::MeteredClickHandler;
pub use user_agent::WootheeUserAgentParser;
