//! Integration tests for the cloud disk adapter
//!
//! All tests run against a wiremock server standing in for the disk REST
//! API and the OAuth token endpoint.

mod common;
mod test_auth;
mod test_listing;
mod test_transfer;
