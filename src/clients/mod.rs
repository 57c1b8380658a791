//! HTTP clients for the Shopify Admin API.
//!
//! [`AdminClient`] executes REST and GraphQL calls for one shop; the error
//! taxonomy in [`errors`] is what every upstream failure collapses to.

mod admin;
pub mod errors;

pub use admin::{build_http_client, AdminClient, UPSTREAM_TIMEOUT};
pub use errors::{ClientError, UpstreamGraphQlError, UpstreamHttpError};
