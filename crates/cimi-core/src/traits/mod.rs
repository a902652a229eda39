//! Core traits.

mod kind;
mod transport;

pub use kind::ResourceKind;
pub use transport::Transport;
