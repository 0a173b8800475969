#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod cached_rest;
pub mod config;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod log;
pub mod rest;

pub use cached_rest::CachedREST;
pub use config::Config;
