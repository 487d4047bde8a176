pub mod backend;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod mock;
pub mod normalize;
pub mod provider;
pub mod real;
pub mod sequence;
pub mod session;
pub mod settings;
pub mod token_store;
pub mod utils;

pub use error::{ApiError, Result};
pub use provider::ApiProvider;
