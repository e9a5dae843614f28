//! Domain types
//!
//! Entities and value objects of the Share Your Mind platform:
//! - Users, posts and comments as served by the REST API
//! - Paging queries and page envelopes
//! - Text measurement helpers for terminal rendering

pub mod comment;
pub mod post;
pub mod query;
pub mod session;
pub mod text;
pub mod user;

/// Numeric identifier shared by every API entity
pub type EntityId = u64;

/// Anything addressable by a stable numeric id.
///
/// The pagination core only ever looks at this id (for de-duplication and
/// in-place patches); everything else about an entity is opaque to it.
pub trait Entity {
    fn entity_id(&self) -> EntityId;
}
