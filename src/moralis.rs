//! Client and response shaping for the Moralis indexing API.

pub mod body;
pub mod client;
pub mod endpoints;
pub mod normalize;

pub use body::{ParseError, parse_upstream_body};
pub use client::{FailureKind, MoralisClient, UpstreamFailure};
pub use endpoints::Endpoint;
