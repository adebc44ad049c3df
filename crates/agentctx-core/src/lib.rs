pub mod agent;
pub mod config;
pub mod error;
pub mod feature;
pub mod frontmatter;
pub mod io;
pub mod merge;
pub mod paths;
pub mod plan;
pub mod updater;

pub use error::{ContextError, Result};
