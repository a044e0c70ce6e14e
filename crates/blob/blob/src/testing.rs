use bytes::Bytes;

use crate::error::BlobError;
use crate::store::BlobStore;

/// Run the full blob store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any backend operation fails unexpectedly.
pub async fn run_store_conformance_tests(store: &dyn BlobStore) -> Result<(), BlobError> {
    test_get_missing(store).await?;
    test_content_type_missing(store).await?;
    test_put_and_get(store).await?;
    test_put_records_content_type(store).await?;
    test_put_without_content_type(store).await?;
    test_overwrite(store).await?;
    test_empty_blob(store).await?;
    test_binary_content(store).await?;
    test_delete(store).await?;
    test_delete_missing(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn BlobStore) -> Result<(), BlobError> {
    let err = store
        .get("conformance/missing.txt")
        .await
        .expect_err("get on missing path should fail");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    Ok(())
}

async fn test_content_type_missing(store: &dyn BlobStore) -> Result<(), BlobError> {
    let err = store
        .content_type("conformance/missing.txt")
        .await
        .expect_err("content_type on missing path should fail");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    Ok(())
}

async fn test_put_and_get(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/put-get.txt";
    store
        .put(path, Some("text/plain"), Bytes::from_static(b"this is stuff"))
        .await?;
    let data = store.get(path).await?;
    assert_eq!(data.as_ref(), b"this is stuff");
    Ok(())
}

async fn test_put_records_content_type(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/content-type.xml";
    store
        .put(path, Some("application/xml"), Bytes::from_static(b"<a/>"))
        .await?;
    let content_type = store.content_type(path).await?;
    assert_eq!(content_type.as_deref(), Some("application/xml"));
    Ok(())
}

async fn test_put_without_content_type(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/untyped.bin";
    store.put(path, None, Bytes::from_static(b"raw")).await?;
    let content_type = store.content_type(path).await?;
    assert!(
        content_type.is_none(),
        "blob stored without a content type should report None"
    );
    Ok(())
}

async fn test_overwrite(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/overwrite.txt";
    store
        .put(path, Some("text/plain"), Bytes::from_static(b"first"))
        .await?;
    store
        .put(path, Some("text/csv"), Bytes::from_static(b"second"))
        .await?;

    let data = store.get(path).await?;
    assert_eq!(data.as_ref(), b"second", "newest write should win");

    let content_type = store.content_type(path).await?;
    assert_eq!(content_type.as_deref(), Some("text/csv"));
    Ok(())
}

async fn test_empty_blob(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/empty.txt";
    store.put(path, Some("text/plain"), Bytes::new()).await?;
    let data = store.get(path).await?;
    assert!(data.is_empty(), "empty blob should read back empty");
    Ok(())
}

async fn test_binary_content(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/binary.bin";
    let payload: Vec<u8> = (0..=255u8).cycle().take(300_000).collect();
    store
        .put(path, Some("application/octet-stream"), Bytes::from(payload.clone()))
        .await?;
    let data = store.get(path).await?;
    assert_eq!(data.len(), payload.len());
    assert_eq!(data.as_ref(), payload.as_slice());
    Ok(())
}

async fn test_delete(store: &dyn BlobStore) -> Result<(), BlobError> {
    let path = "conformance/to-delete.txt";
    store
        .put(path, Some("text/plain"), Bytes::from_static(b"bye"))
        .await?;
    store
        .put(path, Some("text/plain"), Bytes::from_static(b"bye again"))
        .await?;

    let existed = store.delete(path).await?;
    assert!(existed, "delete should return true for an existing blob");

    let err = store
        .get(path)
        .await
        .expect_err("get after delete should fail");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    Ok(())
}

async fn test_delete_missing(store: &dyn BlobStore) -> Result<(), BlobError> {
    let existed = store.delete("conformance/never-stored.txt").await?;
    assert!(!existed, "delete on missing path should return false");
    Ok(())
}
