use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Read a persisted image back and encode it for a `data:` URI.
pub(super) fn encode_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(STANDARD.encode(bytes))
}
