// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
//#![deny(unsafe_code)]
// - 'location/directory.rs' uses mmap to map unit and resource files into memory

//! # realmscope
//!
//! Namespace-isolated dynamic loading of executable code units through *realms*.
//!
//! A realm is an independent loading scope: it sees only the units it is explicitly
//! permitted to see, composed from a private search path of its own, declared imports of
//! specific namespace prefixes routed to other realms, and an optional parent realm
//! providing gated fallback visibility. The resolution engine is ordered and pluggable:
//! a fixed bootstrap scope is always tried first, then the realm's
//! [`Strategy`](strategy::Strategy) orders the self/import/parent sources, and the first
//! definition wins.
//!
//! ## Features
//!
//! - **🔒 Namespace isolation** - Realms see only their search path, imports and gated parent
//! - **🧭 Most-specific routing** - Boundary-aware prefix matching, longest prefix wins
//! - **🧩 Pluggable delegation** - Swappable per-realm strategies over fixed search primitives
//! - **⚡ Concurrent resolution** - Per-`(realm, name)` locking, no global serialization
//! - **🔁 Cycle safe** - Import cycles between realms terminate as misses
//! - **📦 Mapped locations** - Directory-backed search locations use memory-mapped reads
//!
//! ## Quick Start
//!
//! ```rust
//! use realmscope::prelude::*;
//! use std::sync::Arc;
//!
//! let world = World::new();
//! let api = world.new_realm("api", Arc::new(SelfFirst))?;
//! let app = world.new_realm("app", Arc::new(SelfFirst))?;
//!
//! let mut units = MemoryLocation::new("api-units");
//! units.insert_unit("com.acme.api.Service", vec![0xCA, 0xFE]);
//! api.append_location(Arc::new(units));
//!
//! // `app` sees the `com.acme.api` namespace through `api`, nothing else.
//! app.add_import("com.acme.api", api.handle())?;
//!
//! let unit = app.resolve_unit("com.acme.api.Service")?;
//! assert_eq!(unit.origin_realm(), "api");
//! # Ok::<(), realmscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`world`] - The registry owning realms and wiring parent links
//! - [`realm`] - Loading scopes, import tables and the resolution engine
//! - [`strategy`] - The delegation policy contract and the shipped orderings
//! - [`location`] - Search-path content locations (in-memory, directory-backed)
//! - [`bootstrap`] - The fixed system scope consulted before any strategy
//! - [`diagnostics`] - Read-only snapshots of realm state
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Concurrency
//!
//! Any number of threads may resolve against any realms concurrently. The only blocking
//! point is the self-load path, keyed by `(realm, name)`: two threads racing for the same
//! name on the same realm perform the underlying read exactly once and observe the same
//! handle. Hosts without a reentrant loading primitive select
//! [`LockingMode::WholeScope`](realm::LockingMode) once at world construction instead.

pub mod bootstrap;
pub mod diagnostics;
pub mod location;
pub mod prelude;
pub mod realm;
pub mod strategy;
mod unit;
pub mod world;

mod error;

pub use error::Error;
pub use unit::{Resource, ResourceId, ResourceRc, Unit, UnitData, UnitRc};
pub use world::World;

/// The result type used throughout realmscope.
pub type Result<T> = std::result::Result<T, Error>;
