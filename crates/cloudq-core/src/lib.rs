pub mod config;
pub mod error;
pub mod logging;

pub mod cloud;
pub mod filters;
pub mod inventory;
pub mod lookup;
pub mod retry;

pub use error::{LookupError, LookupResult};
