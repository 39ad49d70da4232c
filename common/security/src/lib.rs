pub mod error;
pub mod policy;

pub use error::SecurityError;
pub use policy::{
    authorize_collection, authorize_record, decide, ensure_allowed, AccessPolicy, Decision, Owned,
};
