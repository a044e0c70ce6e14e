use bytes::Bytes;

/// A blob as held by a backend: the raw content plus its recorded content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// The raw binary content.
    pub data: Bytes,
    /// MIME content type recorded at write time (e.g. `"application/xml"`).
    pub content_type: Option<String>,
}

impl StoredBlob {
    /// Create a new stored blob.
    pub fn new(data: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.map(ToOwned::to_owned),
        }
    }
}
