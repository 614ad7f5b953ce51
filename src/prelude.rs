//! # realmscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the realmscope library. Import this module to get quick access to the essential
//! types for building realm hierarchies and resolving units through them.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all realmscope operations
pub use crate::Error;

/// The result type used throughout realmscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The registry owning realms and wiring their hierarchy
pub use crate::world::World;

/// Loading scopes and the handles referencing them
pub use crate::realm::{LockingMode, Realm, RealmRc, ScopeHandle};

// ================================================================================================
// Resolved Handles
// ================================================================================================

/// Unit and resource handles with identity semantics
pub use crate::{Resource, ResourceId, ResourceRc, Unit, UnitRc};

// ================================================================================================
// Delegation Strategies
// ================================================================================================

/// The strategy contract and the shipped orderings
pub use crate::strategy::{Isolated, ParentFirst, SelfFirst, Strategy};

// ================================================================================================
// Collaborator Surfaces
// ================================================================================================

/// Search-path content locations
pub use crate::location::{DirectoryLocation, MemoryLocation, SearchLocation};

/// The fixed system scope consulted before any strategy
pub use crate::bootstrap::{BootstrapScope, EmptyBootstrap, MapBootstrap};

/// Read-only realm inspection
pub use crate::diagnostics::RealmSnapshot;
