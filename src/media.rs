//! Media-type handling for staged files and data URIs.
//!
//! The workflow accepts anything whose declared media type starts with
//! `image/`. Browsers fill in a file's type from its extension, so the
//! client derives the declared type the same way: a lookup over the
//! extension, no content sniffing.

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;

/// Declared media type for a file name. Unknown extensions map to
/// `application/octet-stream` and will fail the image predicate.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// The intake acceptance predicate: the declared type begins with `image/`.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Encode raw bytes as a `data:` URI for inline display.
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, BASE64.encode(bytes))
}

/// Decode the payload of a base64 `data:` URI back into raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| anyhow!("not a base64 data uri"))?;
    Ok(BASE64.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn maps_common_image_extensions() {
        assert_eq!(media_type_for_path(Path::new("scan.jpg")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("scan.JPEG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("scan.png")), "image/png");
        assert_eq!(media_type_for_path(Path::new("scan.bmp")), "image/bmp");
    }

    #[test]
    fn non_image_extensions_fail_the_predicate() {
        for name in ["notes.txt", "archive.zip", "scan", "scan.jpg.exe"] {
            let media_type = media_type_for_path(&PathBuf::from(name));
            assert!(!is_image_media_type(media_type), "{name} accepted");
        }
    }

    #[test]
    fn data_uri_carries_media_type_and_payload() {
        let uri = to_data_uri("image/png", b"abc");
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), b"abc");
    }

    #[test]
    fn rejects_non_data_uris() {
        assert!(decode_data_uri("/get-image").is_err());
        assert!(decode_data_uri("data:image/jpeg,rawpayload").is_err());
    }
}
