use std::io;
use std::path::PathBuf;

/// Per-file conversion errors. None of these abort the batch; the driver
/// records the reason and moves on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The .nfo document for a video does not exist.
    #[error("missing source document")]
    MissingSource,

    /// The .nfo document is not well-formed XML.
    #[error("malformed metadata document: {0}")]
    Parse(#[from] quick_xml::Error),

    /// An artwork file exists but could not be read. The asset is omitted
    /// from the sidecar; conversion still succeeds.
    #[error("asset unreadable: {}: {source}", .path.display())]
    AssetUnavailable { path: PathBuf, source: io::Error },

    /// The target sidecar could not be created or written.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}
