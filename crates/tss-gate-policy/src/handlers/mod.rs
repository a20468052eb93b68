//! Request handlers for each ceremony kind

pub mod ceremony;
pub mod ping;
pub mod whitelist;

pub use ceremony::CeremonyHandler;
pub use ping::PingHandler;
pub use whitelist::AddressWhitelist;
