use base64::{Engine, engine::general_purpose};

/// Package encoded image bytes and their content type as a self-contained
/// data URI: `data:<content_type>;base64,<payload>`. Standard alphabet,
/// padding kept.
pub fn to_data_uri(bytes: &[u8], content_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        general_purpose::STANDARD.encode(bytes)
    )
}
