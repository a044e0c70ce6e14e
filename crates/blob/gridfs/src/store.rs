use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use futures::io::{AsyncReadExt, AsyncWriteExt};
use mongodb::bson::{Bson, Document, doc};
use mongodb::gridfs::{FilesCollectionDocument, GridFsBucket};
use tracing::{debug, info, instrument, warn};

use stowage_blob::BlobError;
use stowage_blob::store::BlobStore;

use crate::config::GridFsConfig;
use crate::connection::GridFsConnection;
use crate::error::{Operation, classify};

/// Metadata key under which the content type is recorded.
const CONTENT_TYPE_KEY: &str = "contentType";

/// MongoDB GridFS implementation of [`BlobStore`].
///
/// The logical path is stored as the GridFS `filename` and the content type
/// in the file document's `metadata.contentType`. Each call opens its own
/// upload or download stream and finishes with it before returning.
#[derive(Debug)]
pub struct GridFsBlobStore {
    connection: GridFsConnection,
}

impl GridFsBlobStore {
    /// Create a new store. The database connection is opened on first use.
    pub fn new(config: GridFsConfig) -> Self {
        Self {
            connection: GridFsConnection::new(config),
        }
    }

    /// The connection provider backing this store.
    pub fn connection(&self) -> &GridFsConnection {
        &self.connection
    }

    /// All file documents stored under `path`, newest first.
    async fn revisions(
        &self,
        bucket: &GridFsBucket,
        path: &str,
    ) -> Result<Vec<FilesCollectionDocument>, BlobError> {
        bucket
            .find(doc! { "filename": path })
            .sort(doc! { "uploadDate": -1 })
            .await
            .map_err(|e| classify(&e, Operation::Lookup, path))?
            .try_collect()
            .await
            .map_err(|e| classify(&e, Operation::Lookup, path))
    }

    /// Delete the given file ids. Returns how many were actually removed.
    async fn delete_ids(
        &self,
        bucket: &GridFsBucket,
        path: &str,
        ids: impl IntoIterator<Item = Bson>,
    ) -> Result<usize, BlobError> {
        let mut removed = 0;
        for id in ids {
            match bucket.delete(id).await {
                Ok(()) => removed += 1,
                // Removed concurrently by another caller.
                Err(e) if classify(&e, Operation::Delete, path).is_not_found() => {}
                Err(e) => return Err(classify(&e, Operation::Delete, path)),
            }
        }
        Ok(removed)
    }

    /// Delete every revision of `path` except `keep`, returning how many were
    /// removed. The new revision is already committed, so a failure here is
    /// logged and leaves the older revisions in place.
    async fn prune_old_revisions(&self, bucket: &GridFsBucket, path: &str, keep: &Bson) -> usize {
        let pruned = match self.revisions(bucket, path).await {
            Ok(files) => {
                let old_ids = files.into_iter().map(|file| file.id).filter(|id| id != keep);
                self.delete_ids(bucket, path, old_ids).await
            }
            Err(e) => Err(e),
        };
        match pruned {
            Ok(removed) => {
                debug!(removed, "removed old GridFS revisions");
                removed
            }
            Err(e) => {
                warn!(error = %e, "failed to remove old GridFS revisions");
                0
            }
        }
    }
}

#[async_trait]
impl BlobStore for GridFsBlobStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(
        &self,
        path: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<(), BlobError> {
        let bucket = self.connection.bucket().await?;
        debug!("opening GridFS upload stream");

        let mut upload = bucket.open_upload_stream(path);
        if let Some(content_type) = content_type {
            upload = upload.metadata(content_type_metadata(content_type));
        }
        let mut stream = upload
            .await
            .map_err(|e| classify(&e, Operation::Write, path))?;

        if let Err(e) = stream.write_all(&data).await {
            warn!(error = %e, "GridFS write failed, aborting upload");
            if let Err(abort_err) = stream.abort().await {
                warn!(error = %abort_err, "failed to abort GridFS upload");
            }
            return Err(BlobError::Write(e.to_string()));
        }
        stream
            .close()
            .await
            .map_err(|e| BlobError::Write(e.to_string()))?;

        if self.connection.config().delete_old_revisions {
            self.prune_old_revisions(&bucket, path, stream.id()).await;
        }

        info!("blob stored in GridFS");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> Result<Bytes, BlobError> {
        let bucket = self.connection.bucket().await?;
        debug!("opening GridFS download stream");

        let mut stream = bucket
            .open_download_stream_by_name(path)
            .await
            .map_err(|e| classify(&e, Operation::Read, path))?;

        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|e| BlobError::Read(e.to_string()))?;

        debug!(size = buf.len(), "blob read from GridFS");
        Ok(Bytes::from(buf))
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<bool, BlobError> {
        let bucket = self.connection.bucket().await?;
        let ids = self
            .revisions(&bucket, path)
            .await?
            .into_iter()
            .map(|file| file.id);
        let removed = self.delete_ids(&bucket, path, ids).await?;

        if removed > 0 {
            info!(revisions = removed, "blob deleted from GridFS");
        } else {
            debug!("no GridFS blob to delete");
        }
        Ok(removed > 0)
    }

    #[instrument(skip(self))]
    async fn content_type(&self, path: &str) -> Result<Option<String>, BlobError> {
        let bucket = self.connection.bucket().await?;
        let newest = bucket
            .find_one(doc! { "filename": path })
            .sort(doc! { "uploadDate": -1 })
            .await
            .map_err(|e| classify(&e, Operation::Lookup, path))?
            .ok_or_else(|| BlobError::NotFound(path.to_owned()))?;
        Ok(content_type_of(&newest))
    }
}

fn content_type_metadata(content_type: &str) -> Document {
    let mut metadata = Document::new();
    metadata.insert(CONTENT_TYPE_KEY, content_type);
    metadata
}

fn content_type_of(file: &FilesCollectionDocument) -> Option<String> {
    file.metadata
        .as_ref()
        .and_then(|metadata| metadata.get_str(CONTENT_TYPE_KEY).ok())
        .map(ToOwned::to_owned)
}
