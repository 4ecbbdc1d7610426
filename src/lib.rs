pub mod audit;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod errors;
pub mod vault;

#[cfg(feature = "keyring-store")]
pub mod keyring;
