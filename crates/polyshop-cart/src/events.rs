use polyshop_core::events::ObservedEvent;
use std::time::Instant;

/// Events emitted by [`CartAccumulator`](crate::CartAccumulator).
#[derive(Debug, Clone)]
pub enum CartEvent {
    /// A quantity was added to a cart entry.
    Increment {
        source: String,
        timestamp: Instant,
        user_id: String,
        product_id: String,
        quantity: i64,
        total: i64,
    },
    /// A cart was read.
    Read {
        source: String,
        timestamp: Instant,
        user_id: String,
        items: usize,
    },
    /// A cart was cleared.
    Clear {
        source: String,
        timestamp: Instant,
        user_id: String,
    },
    /// A stored quantity could not be parsed and was left out of a read.
    CorruptEntry {
        source: String,
        timestamp: Instant,
        user_id: String,
        product_id: String,
        raw: String,
    },
}

impl ObservedEvent for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::Increment { .. } => "cart.increment",
            CartEvent::Read { .. } => "cart.read",
            CartEvent::Clear { .. } => "cart.clear",
            CartEvent::CorruptEntry { .. } => "cart.corrupt_entry",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CartEvent::Increment { timestamp, .. }
            | CartEvent::Read { timestamp, .. }
            | CartEvent::Clear { timestamp, .. }
            | CartEvent::CorruptEntry { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            CartEvent::Increment { source, .. }
            | CartEvent::Read { source, .. }
            | CartEvent::Clear { source, .. }
            | CartEvent::CorruptEntry { source, .. } => source,
        }
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            CartEvent::Increment {
                user_id,
                product_id,
                quantity,
                total,
                ..
            } => vec![
                ("user_id", user_id.clone()),
                ("product_id", product_id.clone()),
                ("quantity", quantity.to_string()),
                ("total", total.to_string()),
            ],
            CartEvent::Read { user_id, items, .. } => {
                vec![("user_id", user_id.clone()), ("items", items.to_string())]
            }
            CartEvent::Clear { user_id, .. } => vec![("user_id", user_id.clone())],
            CartEvent::CorruptEntry {
                user_id,
                product_id,
                raw,
                ..
            } => vec![
                ("user_id", user_id.clone()),
                ("product_id", product_id.clone()),
                ("raw", raw.clone()),
            ],
        }
    }
}
