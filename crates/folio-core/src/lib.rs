#![forbid(unsafe_code)]

//! Core: element handles, DOM events, patches, and rate limiting.
//!
//! # Role in folio
//! `folio-core` is the vocabulary shared by the runtime and its hosts. The
//! host turns browser events into [`event::DomEvent`] values and applies the
//! [`dom::Patch`] values the runtime emits; the runtime only ever sees the
//! document through the [`dom::Dom`] trait.
//!
//! # Primary responsibilities
//! - **Events**: scroll, click, key, input, blur, submit, intersection, hover.
//! - **Dom**: layout reads plus a patch sink, implemented per host.
//! - **Rate limiting**: [`rate_limit::Throttle`] and [`rate_limit::Debounce`]
//!   driven by host time.

pub mod dom;
pub mod event;
pub mod rate_limit;

#[cfg(feature = "tracing-json")]
pub mod logging;

pub use dom::{Dom, EventOutcome, ObserverOptions, Patch, ScrollBehavior};
pub use event::{DomEvent, ElementId, IntersectionEntry, KeyCode, KeyEvent, Modifiers, ObserverKind};
