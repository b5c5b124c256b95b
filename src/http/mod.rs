//! Request parsing ([`request`]) and response building ([`response`]),
//! over the shared protocol vocabulary in [`types`] (C1/C3 of the design).

pub mod request;
pub mod response;
pub mod types;
