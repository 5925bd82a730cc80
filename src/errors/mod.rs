pub mod types;

pub use types::{AddonError, AddonResult, ResolveError};
