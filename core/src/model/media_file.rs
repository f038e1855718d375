use super::{MediaFileId, MediaId};

/// The parts of a media file row storage engines need to store it and
/// build URIs for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaFile {
    pub id: MediaFileId,
    pub media_id: MediaId,
    /// Slug of the media item this file belongs to
    pub media_slug: String,
    /// File extension of the stored container, without the leading dot
    pub container: String,
    /// Whatever the storage engine returned from `store`
    pub unique_id: String,
}
