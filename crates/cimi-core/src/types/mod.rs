//! Core CIMI types.
//!
//! These types enforce their invariants at construction time.

mod endpoint_url;
mod reference;

pub use endpoint_url::EndpointUrl;
pub use reference::Reference;
