// appliance/mod.rs
// Management API client for the system under test

mod client;
mod datasets;
mod sharing;
mod users;

#[cfg(test)]
mod tests;

pub use client::{ApiAuth, ApiResponse, ApplianceClient};
