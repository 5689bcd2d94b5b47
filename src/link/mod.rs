//! Link plumbing shared by every pipeline device
//!
//! - [`DeviceId`] - stable identity of a device
//! - [`Endpoint`] - consumer side of a device, holding the source back-link
//! - [`VideoSource`] - the capability interface forwarded along the chain

pub mod endpoint;
pub mod id;
pub mod source;

pub use endpoint::{Endpoint, EndpointRef};
pub use id::DeviceId;
pub use source::{lock_source, shared_source, SharedSource, VideoSource};

#[cfg(test)]
pub use source::MockVideoSource;
