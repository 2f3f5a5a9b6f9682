use crate::hotspot::HotspotId;

/// Errors surfaced by core operations.
///
/// Per-frame paths (compositing, smoothing, marker visuals) never produce these;
/// only targeted edits, document parsing and save acknowledgements do.
#[derive(Debug, thiserror::Error)]
pub enum PanoError {
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unknown hotspot {0}")]
    UnknownHotspot(HotspotId),
    #[error("hotspot {id} is not a {expected} hotspot")]
    WrongKind { id: HotspotId, expected: &'static str },
    #[error("vertex {index} out of range for hotspot {id} ({len} points)")]
    VertexOutOfRange {
        id: HotspotId,
        index: usize,
        len: usize,
    },
    #[error("editing requires debug mode")]
    NotEditing,
    #[error("save failed: {0}")]
    Save(String),
}

pub type Result<T> = std::result::Result<T, PanoError>;
