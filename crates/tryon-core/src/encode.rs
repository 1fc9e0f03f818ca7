use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;

use crate::error::TryOnError;
use crate::input::BinaryResource;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Base64 of the whole resource, without a `data:` prefix.
pub async fn encode_as_base64(resource: &BinaryResource) -> Result<String, TryOnError> {
    let bytes = resource.read().await?;
    Ok(BASE64.encode(&bytes))
}

/// Full `data:<mime>;base64,...` URI for the resource.
pub async fn encode_as_data_uri(resource: &BinaryResource) -> Result<String, TryOnError> {
    let bytes = resource.read().await?;
    let mime = resource
        .declared_mime()
        .or_else(|| sniff_mime(&bytes))
        .unwrap_or(FALLBACK_MIME);
    Ok(data_uri(mime, &bytes))
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Splits a base64 data URI into its MIME type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = BASE64.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

pub(crate) fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Avif => "image/avif",
        _ => return None,
    };
    Some(mime)
}
