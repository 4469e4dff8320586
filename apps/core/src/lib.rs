// ACEE student portal core
// Help assistant and grade analytics over a locally persisted record store.

pub mod analytics;
pub mod assistant;
pub mod config;
pub mod error;
pub mod models;
pub mod portal;
pub mod store;
pub mod telemetry;

pub use error::AppError;
pub use portal::Portal;

#[cfg(test)]
mod tests;
