//! Configuration loading and schema definitions
//!
//! Loader settings: SDK floor, Flutter-provided defaults, implicit signing
//! configs and warning behaviour.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
