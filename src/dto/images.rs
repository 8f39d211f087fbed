use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImageDto {
    pub id: i64,
    pub file_name: String,
    pub download_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadImagesQuery {
    pub product_id: i64,
}

/// A file pulled out of a multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
