use serde::{Deserialize, Serialize};

/// Body of a `POST /resize` call. Field names are part of the public API
/// and keep their original spelling.
///
/// A width or height of zero means "derive this dimension from the other
/// one, preserving the source aspect ratio". Both zero is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ResizeRequest {
    #[serde(rename = "ImageURL")]
    pub image_url: String,

    #[serde(rename = "Width", default)]
    pub width: u32,

    #[serde(rename = "Height", default)]
    pub height: u32,

    #[serde(rename = "Algorithm", default)]
    pub algorithm: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResizeResponse {
    #[serde(rename = "Resized")]
    pub resized: String,
}

/// Raw bytes plus the content type the origin reported for them.
///
/// The content type is trusted as-is; it drives both decode and encode so
/// the output format always equals the input format.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}
