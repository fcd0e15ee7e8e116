//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod codec;
pub mod error;
pub mod error_ext;
pub mod services;

pub use codec::{decode_stored, encode_stored, leaf_name};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
