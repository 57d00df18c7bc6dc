pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;
pub mod storage;

pub use error::EvenlyError;
pub use logger::in_memory::InMemoryLogging;
pub use service::EvenlyService;
pub use storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
