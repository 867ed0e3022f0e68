//! Configuration for the elmdev pipeline and dev server.
//!
//! Every field defaults to the constants the tool has always used (`src/elm`,
//! `public/elm-app.js`, port 8080, `/api` proxied to `localhost:8000`), so a
//! project without an `elmdev.toml` behaves exactly as before.

pub mod config;
pub mod discovery;
pub mod error;
pub mod validation;

pub use config::*;
pub use discovery::{ConfigDiscovery, CONFIG_FILE_NAME, ENV_PREFIX};
pub use error::*;
