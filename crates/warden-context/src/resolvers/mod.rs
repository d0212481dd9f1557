//! Stock identification strategies.
//!
//! Each strategy is independent of the others and side-effect-free on
//! failure: missing ambient input, a failed lookup, or a malformed value
//! all resolve to "unknown" so the chain can move on.

mod domain;
mod header;
mod session;

pub use domain::{DomainDirectory, DomainResolver};
pub use header::HeaderResolver;
pub use session::SessionResolver;
