//! One method per REST operation
//!
//! Every method is a thin wrapper over [`BybitRestClient::call`] with its row
//! of the operation table; the typed helpers decode the `result` envelope.
//!
//! [`BybitRestClient::call`]: crate::BybitRestClient::call

pub mod funding;
pub mod market;
pub mod orders;
pub mod position;
