use mongodb::error::{Error as MongoError, ErrorKind, GridFsErrorKind};

use stowage_blob::BlobError;

/// The kind of GridFS operation that produced a driver error.
///
/// The same driver failure maps to different [`BlobError`] variants depending
/// on what was being attempted: a dropped connection mid-upload is a rejected
/// write, while the same failure during the initial ping is a connection error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Opening the client and verifying the session.
    Connect,
    /// Opening, writing or closing an upload stream.
    Write,
    /// Opening or draining a download stream.
    Read,
    /// Querying the files collection.
    Lookup,
    /// Removing file documents and their chunks.
    Delete,
}

/// Classify a MongoDB driver error into the appropriate [`BlobError`].
///
/// `path` is the logical path involved, used as the `NotFound` payload.
pub fn classify(err: &MongoError, op: Operation, path: &str) -> BlobError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Authentication { .. } => BlobError::Authentication(message),
        ErrorKind::GridFs(
            GridFsErrorKind::FileNotFound { .. } | GridFsErrorKind::RevisionNotFound { .. },
        ) if op != Operation::Write => BlobError::NotFound(path.to_owned()),
        _ => match op {
            Operation::Connect => BlobError::Connection(message),
            Operation::Write => BlobError::Write(message),
            Operation::Read if is_connection_failure(err) => BlobError::Connection(message),
            Operation::Read => BlobError::Read(message),
            Operation::Lookup | Operation::Delete if is_connection_failure(err) => {
                BlobError::Connection(message)
            }
            Operation::Lookup | Operation::Delete => BlobError::Backend(message),
        },
    }
}

/// Returns `true` if the error means the server could not be reached.
fn is_connection_failure(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
    )
}

// The driver's `Authentication` and `GridFs` error kinds cannot be built
// outside the driver, so those arms are covered by the live tests in
// `store.rs` (`missing_path_is_not_found`,
// `rejected_credentials_are_authentication_error`).
#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn io_error() -> MongoError {
        MongoError::from(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[test]
    fn io_failure_during_connect_is_connection() {
        let err = classify(&io_error(), Operation::Connect, "uploads/a");
        assert!(matches!(err, BlobError::Connection(_)));
    }

    #[test]
    fn io_failure_during_write_is_write() {
        let err = classify(&io_error(), Operation::Write, "uploads/a");
        assert!(matches!(err, BlobError::Write(_)));
    }

    #[test]
    fn io_failure_during_read_is_connection() {
        let err = classify(&io_error(), Operation::Read, "uploads/a");
        assert!(matches!(err, BlobError::Connection(_)));
    }

    #[test]
    fn io_failure_during_lookup_and_delete_is_connection() {
        assert!(matches!(
            classify(&io_error(), Operation::Lookup, "uploads/a"),
            BlobError::Connection(_)
        ));
        assert!(matches!(
            classify(&io_error(), Operation::Delete, "uploads/a"),
            BlobError::Connection(_)
        ));
    }

    #[test]
    fn message_is_preserved() {
        let err = classify(&io_error(), Operation::Connect, "uploads/a");
        assert!(err.to_string().contains("connection refused"));
    }
}
