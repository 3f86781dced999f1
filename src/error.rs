/// Errors reported by the containers in this crate.
///
/// All of these describe misuse or a broken invariant rather than a transient condition, so none of them
/// is ever retried or recovered from internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A [`Token`][crate::Token] was used after the container it came from was structurally modified.
    #[error("stale token: issued at version {token_version} but the container is at version {map_version}")]
    StaleToken {
        /// Version stamped into the token when it was issued.
        token_version: u64,
        /// Current version of the container.
        map_version: u64,
    },
    /// A collision chain was longer than it can possibly be, which only happens when the table was
    /// mutated while it was being walked or its links are corrupted.
    #[error("concurrent modification: collision chain exceeded {hops} hops")]
    ConcurrentModification {
        /// Number of hops walked before giving up.
        hops: usize,
    },
    /// The token does not designate a live entry of this container.
    #[error("token does not designate a live entry")]
    InvalidToken,
    /// `trim` was asked to shrink below the number of stored entries.
    #[error("cannot trim to capacity {requested}: container holds {len} entries")]
    TrimBelowSize {
        /// Requested capacity.
        requested: usize,
        /// Number of entries currently stored.
        len: usize,
    },
    /// A deep copy did not reproduce the source container.
    #[error("clone failed: {0}")]
    CloneFailure(String),
    /// A structural invariant of the backing storage does not hold.
    #[error("corrupted storage: {0}")]
    Corrupted(String),
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cold]
#[inline(never)]
pub(crate) fn panic_chain_overrun(hops: usize) -> ! {
    panic!("{}", Error::ConcurrentModification { hops })
}
