use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The subset of a media upload exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaItem {
    pub id: i64,
    pub media_type: String,
    pub file_path: String,
}
