pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod tenant;
pub mod transport;

#[cfg(test)]
pub mod testing;
