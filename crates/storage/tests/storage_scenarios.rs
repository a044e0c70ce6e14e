use std::sync::Arc;

use bytes::Bytes;
use stowage_blob::{BlobError, BlobStore};
use stowage_blob_memory::MemoryBlobStore;
use stowage_storage::{MemoryFile, Storage, UploaderConfig};

fn storage_with(uploader: UploaderConfig) -> (Storage, Arc<MemoryBlobStore>) {
    let store = Arc::new(MemoryBlobStore::new());
    let storage = Storage::new(Arc::new(uploader), store.clone());
    (storage, store)
}

#[tokio::test]
async fn store_read_describe_and_delete() {
    let (storage, store) = storage_with(UploaderConfig::new("uploads"));
    let file = MemoryFile::new("this is stuff")
        .with_filename("bar.txt")
        .with_content_type("application/xml");

    let handle = storage.store(&file).await.unwrap();

    assert_eq!(
        store.get("uploads/bar.txt").await.unwrap().as_ref(),
        b"this is stuff"
    );
    assert_eq!(handle.read().await.unwrap().as_ref(), b"this is stuff");
    assert!(handle.path().is_none());
    assert!(handle.url().is_none());
    assert_eq!(
        handle.content_type().await.unwrap().as_deref(),
        Some("application/xml")
    );

    assert!(handle.delete().await.unwrap());
    let err = handle.read().await.unwrap_err();
    assert!(matches!(err, BlobError::NotFound(ref p) if p == "uploads/bar.txt"));
    assert!(store.get("uploads/bar.txt").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn retrieve_reads_blob_written_directly() {
    let (storage, store) = storage_with(UploaderConfig::new("uploads"));
    store
        .put("uploads/bar.txt", None, Bytes::from_static(b"A test, 1234"))
        .await
        .unwrap();

    let handle = storage.retrieve("bar.txt");

    assert_eq!(handle.read().await.unwrap().as_ref(), b"A test, 1234");
    assert!(handle.path().is_none());
    assert!(handle.url().is_none());
}

#[tokio::test]
async fn retrieve_url_with_access_url() {
    let (storage, store) =
        storage_with(UploaderConfig::new("uploads").with_access_url("/image/show"));
    store
        .put("uploads/bar.txt", None, Bytes::from_static(b"A test, 1234"))
        .await
        .unwrap();

    let handle = storage.retrieve("bar.txt");
    assert_eq!(handle.url().as_deref(), Some("/image/show/uploads/bar.txt"));
}

#[tokio::test]
async fn retrieved_handle_is_deletable() {
    let (storage, store) = storage_with(UploaderConfig::new("uploads"));
    store
        .put("uploads/bar.txt", None, Bytes::from_static(b"A test, 1234"))
        .await
        .unwrap();

    let handle = storage.retrieve("bar.txt");
    assert!(handle.delete().await.unwrap());
    assert!(handle.read().await.unwrap_err().is_not_found());
    assert!(!handle.delete().await.unwrap(), "second delete is a no-op");
}

#[tokio::test]
async fn retrieve_of_missing_blob_fails_lazily() {
    let (storage, _store) = storage_with(UploaderConfig::new("uploads"));
    let handle = storage.retrieve("never-stored.txt");
    assert_eq!(handle.logical_path(), "uploads/never-stored.txt");
    assert!(handle.read().await.unwrap_err().is_not_found());
    assert!(handle.content_type().await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn content_type_round_trips_for_many_values() {
    let (storage, _store) = storage_with(UploaderConfig::new("uploads"));
    let content_types = [
        "application/xml",
        "image/jpeg",
        "text/plain; charset=utf-8",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "",
    ];
    for (i, content_type) in content_types.into_iter().enumerate() {
        let path = format!("uploads/typed-{i}");
        let handle = storage
            .store_at("body", Some(content_type), path)
            .await
            .unwrap();
        assert_eq!(
            handle.content_type().await.unwrap().as_deref(),
            Some(content_type)
        );
    }
}

#[tokio::test]
async fn store_then_retrieve_round_trip() {
    let (storage, _store) = storage_with(UploaderConfig::new("uploads"));
    let bodies: [&[u8]; 4] = [b"", b"x", b"\x00\xff\x10binary", &[7u8; 70_000]];
    for (i, body) in bodies.into_iter().enumerate() {
        let name = format!("round-trip-{i}.bin");
        let file = MemoryFile::new(Bytes::copy_from_slice(body)).with_filename(name.clone());
        storage.store(&file).await.unwrap();
        let read = storage.retrieve(&name).read().await.unwrap();
        assert_eq!(read.as_ref(), body);
    }
}

#[tokio::test]
async fn last_write_wins() {
    let (storage, _store) = storage_with(UploaderConfig::new("uploads"));
    let first = storage
        .store_at("first", Some("text/plain"), "uploads/bar.txt")
        .await
        .unwrap();
    storage
        .store_at("second", Some("text/csv"), "uploads/bar.txt")
        .await
        .unwrap();

    assert_eq!(first.read().await.unwrap().as_ref(), b"second");
    assert_eq!(first.content_type().await.unwrap().as_deref(), Some("text/csv"));
}

#[tokio::test]
async fn unnamed_uploads_do_not_share_a_path() {
    let (storage, store) = storage_with(UploaderConfig::new("uploads"));
    let first = storage
        .store(&MemoryFile::new("first upload").with_filename("a.txt"))
        .await
        .unwrap();

    let err = storage
        .store(&MemoryFile::new("second upload"))
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::Write(_)), "got {err:?}");

    assert_eq!(first.read().await.unwrap().as_ref(), b"first upload");
    assert_eq!(store.len(), 1);
    assert!(!store.contains("uploads"));
}
