use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while building realm
/// hierarchies and resolving units and resources through them. Each variant provides specific
/// context about the failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Resolution Errors
/// - [`Error::NotFound`] - No source supplied the requested unit
/// - [`Error::ScopeClosed`] - Resolution attempted against a disposed realm
///
/// ## Setup Errors
/// - [`Error::DuplicatePrefix`] - Conflicting import registration for a namespace prefix
/// - [`Error::DuplicateRealm`] - Realm id already taken in the world
/// - [`Error::NoSuchRealm`] - Realm id not registered in the world
/// - [`Error::ParentAlreadySet`] - Attempted re-parenting of a realm
///
/// ## I/O and Synchronization Errors
/// - [`Error::FileError`] - Filesystem I/O errors from search locations
/// - [`Error::LockError`] - Thread synchronization failure
#[derive(Error, Debug)]
pub enum Error {
    /// No source supplied a definition for the requested unit.
    ///
    /// This is the expected miss outcome. Internal primitives report misses as
    /// `None`; only the top-level [`crate::realm::Realm::resolve_unit`] entry point
    /// raises the exhaustion of all sources as this hard failure.
    #[error("Unit '{0}' was not found by any source")]
    NotFound(String),

    /// An import with the same namespace prefix but a different target already exists.
    ///
    /// Registering the identical `(prefix, target)` pair twice is an idempotent no-op;
    /// registering the same prefix against a *different* target is rejected with this
    /// error so that prefix precedence stays deterministic.
    #[error("Import prefix '{prefix}' is already routed to '{existing}'")]
    DuplicatePrefix {
        /// The namespace prefix that collided
        prefix: String,
        /// Id of the scope the prefix is already routed to (`<parent>` for
        /// parent-inheritance entries)
        existing: String,
    },

    /// The realm has been disposed and no longer accepts resolution calls.
    ///
    /// Disposal releases cached units and underlying resource handles; any
    /// `resolve_*` call against the realm afterwards fails with this error.
    #[error("Realm '{0}' is closed")]
    ScopeClosed(String),

    /// A realm with this id is already registered in the world.
    #[error("Realm '{0}' already exists")]
    DuplicateRealm(String),

    /// No realm with this id is registered in the world.
    #[error("Realm '{0}' does not exist")]
    NoSuchRealm(String),

    /// The realm already has a parent.
    ///
    /// A parent link is set at most once for the lifetime of a realm;
    /// re-parenting is not supported.
    #[error("Realm '{0}' already has a parent")]
    ParentAlreadySet(String),

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically
    /// when trying to acquire a mutex that is in an invalid state.
    #[error("Failed to lock target")]
    LockError,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while search locations
    /// access their backing storage.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
