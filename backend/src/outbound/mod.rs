//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **text_generation**: OpenAI-compatible chat completion client
//!
//! Adapters translate between domain types and wire or row formats. They
//! hold no business rules.

pub mod persistence;
pub mod text_generation;
