//! Configuration loading
//!
//! Settings come from a TOML file, located either via `--config` or by
//! discovery in the working directory, with the auth token overridable from
//! the environment (Env > File).

pub mod loader;

pub use loader::{load_settings, Settings, AUTH_TOKEN_ENV};
