//! Venue knowledge base for the Maitre kiosk.
//!
//! An immutable, in-memory record describing the restaurant: identity,
//! weekly hours, cuisine, specialties, pricing, dress code, and amenities.
//! Loaded once at startup and shared read-only; the dialogue engine only
//! ever reads one snapshot.

pub mod venue;

pub use venue::{KnowledgeBase, WeekHours};
