//! Generic resource handles and the CRUD client built on them.

mod client;
mod handle;
mod outcome;

pub use client::ResourceClient;
pub use handle::ResourceHandle;
pub use outcome::{CreateResult, Outcome};
