#![forbid(unsafe_code)]

//! Core: geometry, pointer events, style values, and deterministic timers.
//!
//! # Role in dragsort
//! `dragsort-core` holds the host-independent vocabulary the reorder
//! controller speaks. It knows nothing about any particular UI tree; hosts
//! convert their native events and bounding boxes into these types.
//!
//! # Primary responsibilities
//! - **Rect / Point**: pixel geometry snapshots and strict hit containment.
//! - **PointerEvent / Subscription**: input delivered by the host and the
//!   listeners a controller may hold.
//! - **StyleTable / StyleValue**: inline style writes with a vendor-prefix
//!   fallback resolved once.
//! - **TimerQueue / DeterministicClock**: deferred work without threads.

pub mod event;
pub mod geometry;
pub mod style;
pub mod timer;

pub use event::{PointerButton, PointerEvent, Subscription, Subscriptions, ViewportSignal};
pub use geometry::{Point, Rect};
pub use style::{StyleProperty, StyleTable, StyleValue};
pub use timer::{DeterministicClock, TimerId, TimerQueue};
