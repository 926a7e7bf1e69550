//! Endpoint admission policy.
//!
//! The relay appends whatever path the caller sent to the upstream base URL.
//! This trait is the single place a stricter mode plugs in; the default
//! admits everything.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::relay::error::ForwardError;

/// Decides whether an endpoint may be forwarded upstream.
pub trait EndpointPolicy: Send + Sync + Debug {
    /// Returns `Err(ForwardError::EndpointRejected)` to refuse the call.
    fn check(&self, endpoint: &str) -> Result<(), ForwardError>;
}

/// Forwards every endpoint unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl EndpointPolicy for AllowAll {
    fn check(&self, _endpoint: &str) -> Result<(), ForwardError> {
        Ok(())
    }
}

/// Forwards only endpoints that appear in a fixed list (exact match).
#[derive(Debug, Clone)]
pub struct AllowList {
    allowed: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: endpoints.into_iter().map(Into::into).collect(),
        }
    }
}

impl EndpointPolicy for AllowList {
    fn check(&self, endpoint: &str) -> Result<(), ForwardError> {
        if self.allowed.contains(endpoint) {
            Ok(())
        } else {
            Err(ForwardError::EndpointRejected(endpoint.to_string()))
        }
    }
}

/// Build the policy described by `upstream.allowed_endpoints`.
pub fn from_allowed(allowed: Option<&[String]>) -> Arc<dyn EndpointPolicy> {
    match allowed {
        Some(list) => Arc::new(AllowList::new(list.iter().cloned())),
        None => Arc::new(AllowAll),
    }
}
