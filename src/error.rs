use thiserror::Error;

/// Errors returned by the spatial index and the clusterer.
///
/// Misuse of the API (wrong add count, malformed index buffers, querying
/// before loading) fails loudly with a dedicated variant; a missing cluster
/// is a distinct not-found condition so callers can tell it apart from an
/// empty-but-valid result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `KdTreeBuilder::finish` was called with a different number of points
    /// than the builder was created for.
    #[error("added {added} points to an index expecting {expected}")]
    CountMismatch { expected: usize, added: usize },

    /// The byte buffer does not start with a serialized index header, or is
    /// shorter than the header claims.
    #[error("buffer is not a serialized spatial index")]
    InvalidIndexBuffer,

    /// The buffer was written by an incompatible format version.
    #[error("unsupported index format version {0}")]
    UnsupportedVersion(u8),

    /// The buffer declares a coordinate storage type this crate cannot read.
    #[error("unrecognized coordinate storage type {0}")]
    UnrecognizedCoordType(u8),

    /// A query method was called before `load`.
    #[error("no features loaded, call load() before querying")]
    NotLoaded,

    /// No cluster exists with the given id.
    #[error("no cluster with the specified id {0}")]
    ClusterNotFound(usize),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
