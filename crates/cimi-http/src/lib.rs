//! cimi-http - HTTP transport for CIMI providers.
//!
//! ```no_run
//! use cimi_core::{CimiClient, EndpointUrl, Machine, QueryParams};
//! use cimi_http::{Credentials, HttpTransport};
//!
//! # async fn run() -> cimi_core::Result<()> {
//! let endpoint = EndpointUrl::new("https://cloud.example.com/cimi")?;
//! let transport = HttpTransport::new(endpoint)?
//!     .with_credentials(Credentials::new("admin", "secret"));
//! let client = CimiClient::connect(transport).await?;
//! for machine in client.resources::<Machine>().list(&QueryParams::none()).await? {
//!     println!("{}", machine.reference());
//! }
//! # Ok(())
//! # }
//! ```

mod credentials;
mod error;
mod transport;

pub use credentials::Credentials;
pub use transport::{HttpTransport, SPECIFICATION_VERSION};
