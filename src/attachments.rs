use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::gateway::ImageAttachment;

/// Read an image file and encode it for the model gateway.
///
/// The mime type is taken from the file extension; unknown extensions are
/// sent as JPEG.
pub fn load_image(path: &Path) -> Result<ImageAttachment, std::io::Error> {
    let bytes = std::fs::read(path)?;
    Ok(ImageAttachment::new(mime_for(path), STANDARD.encode(bytes)))
}

/// Load several images, failing on the first unreadable file.
pub fn load_images<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ImageAttachment>, std::io::Error> {
    paths.iter().map(|path| load_image(path.as_ref())).collect()
}

/// Interpret a REPL argument as either a `data:` URI or a file path.
pub fn resolve_image(arg: &str) -> Result<ImageAttachment, std::io::Error> {
    if arg.starts_with("data:") {
        Ok(ImageAttachment::from_base64(arg))
    } else {
        load_image(Path::new(arg))
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
