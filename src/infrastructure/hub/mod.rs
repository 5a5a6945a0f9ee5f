pub mod client;
pub mod payload;

pub use client::HubClient;
