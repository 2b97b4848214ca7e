//! Core types for Dachkammer: identifiers, world content, and game state.
//!
//! The world is split in two halves. [`GameContent`] holds the definitions
//! loaded once at startup and never touched again. [`GameState`] holds
//! everything a choice may change: the player's location, the inventory,
//! items lying around, per-object flags and the visited set.

/// Static world definitions (items, furniture, locations).
pub mod content;
/// Error types used throughout the crate.
pub mod error;
/// Typed identifiers for items, objects, and locations.
pub mod id;
/// Mutable runtime state.
pub mod state;

/// Re-export content definitions.
pub use content::{FurnitureDef, FurnitureKind, GameContent, ItemDef, LocationDef};
/// Re-export error types.
pub use error::{DomainError, DomainResult};
/// Re-export identifier types.
pub use id::{ItemId, LocationId, ObjectId};
/// Re-export state types.
pub use state::{GameState, Inventory, ObjectState};
