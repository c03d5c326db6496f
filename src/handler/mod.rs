//! Handler traits for native-originated events.
//!
//! Each handler family is a trait whose methods carry default behavior, so an
//! embedder overrides only what it needs. An adapter turns an implementation
//! into the native structure the library expects.
//!
//! # Example
//!
//! ```rust
//! use cef_embed::handler::{self, GeolocationHandler, GeolocationRequestId, PermissionAction};
//! use cef_embed::proxy::{Browser, GeolocationCallback};
//! use url::Url;
//!
//! struct SameSiteOnly;
//!
//! impl GeolocationHandler for SameSiteOnly {
//!     fn on_request_geolocation_permission(
//!         &self,
//!         _browser: &Browser,
//!         url: &Url,
//!         _request_id: GeolocationRequestId,
//!         callback: GeolocationCallback,
//!     ) -> PermissionAction {
//!         if url.host_str() == Some("maps.example.com") {
//!             callback.cont(true);
//!             PermissionAction::Allow
//!         } else {
//!             PermissionAction::Deny
//!         }
//!     }
//! }
//!
//! let native = handler::into_native(SameSiteOnly);
//! # unsafe {
//! #     let base = native as *mut cef_embed::sys::cef_base_t;
//! #     (*base).release.unwrap()(base);
//! # }
//! ```

mod geolocation;
mod pending;

pub use geolocation::{
    into_native, DeferringGeolocationHandler, GeolocationHandler, GeolocationRequestId,
    PermissionAction,
};
pub use pending::PendingPermissions;
