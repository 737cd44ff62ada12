#![forbid(unsafe_code)]

//! Event plumbing for Gloss components.
//!
//! - [`bus`]: document-level pointer listeners with RAII [`Subscription`]s.
//! - [`frame`]: next-paint callbacks with cancellable [`FrameHandle`]s.
//! - [`host`]: the [`Host`] that owns the document and drives both.

pub mod bus;
pub mod frame;
pub mod host;

pub use bus::{EventBus, PointerKinds, SubId, Subscription};
pub use frame::{FrameHandle, FrameScheduler};
pub use host::{EventOutcome, Host, HostConfig, Interactive};
