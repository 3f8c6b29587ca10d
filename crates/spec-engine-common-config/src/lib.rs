//! Configuration for spec-engine.
//!
//! API keys live in `.spec-engine/config.json` under a base directory; the
//! environment (optionally seeded from `.env` files) is the fallback source.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
