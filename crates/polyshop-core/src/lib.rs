//! Core infrastructure shared by the polyshop crates.
//!
//! The only thing living here is the event sink: stores and the cart
//! accumulator report named events (`store.connect.attempt`, `cart.increment`,
//! ...) to an [`EventListeners`] collection. An empty collection is a no-op,
//! so nothing downstream depends on a sink being installed.

pub mod events;

pub use events::{EventListener, EventListeners, FnListener, ObservedEvent};
