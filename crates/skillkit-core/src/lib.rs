pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod generators;
pub mod io;
pub mod types;

pub use error::{Result, SkillkitError};
