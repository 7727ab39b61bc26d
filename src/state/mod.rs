//! Conversation state module
//!
//! Tracks customers who are in the middle of placing an order.

pub mod drafts;

pub use drafts::{OrderDraft, OrderDrafts, DRAFT_TTL_MINUTES};
