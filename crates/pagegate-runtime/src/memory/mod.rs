//! Reference collaborator implementations.
//!
//! These back the CLI and the test suite. Host applications replace
//! them with adapters over their own session storage, router and
//! event system.
//!
//! | Type | Implements |
//! |------|------------|
//! | [`MemoryAuthStore`] | [`AuthStore`](pagegate_auth::AuthStore) |
//! | [`StaticPageResolver`] | [`PageResolver`](pagegate_auth::PageResolver) |
//! | [`TracingEventBus`], [`RecordingEventBus`] | [`EventBus`](pagegate_auth::EventBus) |
//! | [`TracingNotifications`], [`RecordingNotifications`] | [`NotificationSink`](pagegate_auth::NotificationSink) |
//! | [`StaticRequest`] | [`RequestContext`](pagegate_auth::RequestContext) |

mod events;
mod notify;
mod pages;
mod request;
mod store;

pub use events::{RecordedEvent, RecordingEventBus, TracingEventBus};
pub use notify::{RecordingNotifications, TracingNotifications};
pub use pages::StaticPageResolver;
pub use request::StaticRequest;
pub use store::MemoryAuthStore;
