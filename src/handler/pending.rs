//! Registry of permission requests waiting for an answer.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

use super::GeolocationRequestId;
use crate::proxy::{GeolocationCallback, RetainedGeolocationCallback};

#[derive(Debug)]
struct PendingRequest {
    origin: String,
    callback: RetainedGeolocationCallback,
}

/// Geolocation requests that were accepted for later answering, keyed by
/// request ID.
///
/// Each entry holds a native reference to its callback until the request is
/// resolved, canceled or replaced.
#[derive(Debug, Default)]
pub struct PendingPermissions {
    requests: Mutex<HashMap<GeolocationRequestId, PendingRequest>>,
}

impl PendingPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retains `callback` and stores it under `request_id`. A previous entry
    /// with the same ID is dropped without being answered.
    pub fn defer(
        &self,
        request_id: GeolocationRequestId,
        origin: impl Into<String>,
        callback: GeolocationCallback,
    ) {
        let request = PendingRequest {
            origin: origin.into(),
            callback: callback.retain(),
        };
        debug!(request_id, origin = %request.origin, "deferred geolocation request");
        let replaced = self.requests.lock().insert(request_id, request);
        drop(replaced);
    }

    /// Answers a pending request. Returns false if no such request exists.
    pub fn resolve(&self, request_id: GeolocationRequestId, allow: bool) -> bool {
        let request = self.requests.lock().remove(&request_id);
        match request {
            Some(request) => {
                debug!(request_id, allow, origin = %request.origin, "resolved geolocation request");
                request.callback.cont(allow);
                true
            }
            None => false,
        }
    }

    /// Forgets a pending request without answering it. Returns false if no
    /// such request exists.
    pub fn cancel(&self, request_id: GeolocationRequestId) -> bool {
        let request = self.requests.lock().remove(&request_id);
        if request.is_some() {
            debug!(request_id, "dropped canceled geolocation request");
        }
        request.is_some()
    }

    /// Origin that made the request, if it is still pending.
    pub fn origin(&self, request_id: GeolocationRequestId) -> Option<String> {
        self.requests
            .lock()
            .get(&request_id)
            .map(|request| request.origin.clone())
    }

    pub fn contains(&self, request_id: GeolocationRequestId) -> bool {
        self.requests.lock().contains_key(&request_id)
    }

    /// Pending request IDs in ascending order.
    pub fn request_ids(&self) -> Vec<GeolocationRequestId> {
        let mut ids: Vec<_> = self.requests.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}
