//! Service marker trait.

/// Marker trait for business logic services.
///
/// Services in `usermgmt-service` implement this trait so that they can be
/// held behind `Arc` and shared across request handlers.
pub trait Service: Send + Sync + 'static {}
