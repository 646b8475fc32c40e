//! Image capture
//!
//! Turns one user-selected file into an encoded [`ImagePayload`]. Paths may
//! come from the TUI prompt, a terminal paste/drag, or the command line, so
//! the raw input is cleaned up before it is resolved.

mod error;
mod format;

pub use error::CaptureError;
pub use format::ImageFormat;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::config::{CaptureConfig, expand_home};

/// Bytes read up front for signature sniffing
const SIGNATURE_LEN: usize = 16;

/// What the UI shows for the image while it is being analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub file_name: String,
    pub path: PathBuf,
    pub byte_len: u64,
}

impl ImagePreview {
    /// Human-readable size, e.g. "1.4 MB"
    pub fn size_label(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;
        let len = self.byte_len as f64;
        if len >= MB {
            format!("{:.1} MB", len / MB)
        } else if len >= KB {
            format!("{:.0} KB", len / KB)
        } else {
            format!("{} B", self.byte_len)
        }
    }
}

/// One encoded photograph, ready to send
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub format: ImageFormat,
    /// Base64 (standard alphabet, padded) of the file bytes
    pub data: String,
    pub preview: ImagePreview,
}

impl ImagePayload {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `data:` URL form, for providers that take image URLs
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime(), self.data)
    }
}

// The base64 body is large; keep it out of logs
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("format", &self.format)
            .field("data_len", &self.data.len())
            .field("preview", &self.preview)
            .finish()
    }
}

/// Normalize a typed, pasted or dropped path
///
/// Strips surrounding whitespace and quotes, percent-decodes `file://` URIs,
/// undoes shell backslash escapes, and expands `~/`. Returns None for empty
/// input.
pub fn clean_path_input(raw: &str) -> Option<PathBuf> {
    debug!(raw_len = raw.len(), "clean_path_input: called");
    let mut s = raw.trim();

    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            s = &s[1..s.len() - 1];
        }
    }

    let s = s.trim();
    if s.is_empty() {
        debug!("clean_path_input: empty input");
        return None;
    }

    let owned = match s.strip_prefix("file://") {
        Some(rest) => String::from_utf8_lossy(&urlencoding::decode_binary(rest.as_bytes())).into_owned(),
        None => unescape_shell(s),
    };

    Some(expand_home(&owned))
}

/// Capture from raw user input; empty input is a cancellation
pub fn capture_input(raw: &str, config: &CaptureConfig) -> Result<ImagePayload, CaptureError> {
    match clean_path_input(raw) {
        Some(path) => capture_file(&path, config),
        None => Err(CaptureError::Cancelled),
    }
}

/// Read, validate and encode one image file
pub fn capture_file(path: &Path, config: &CaptureConfig) -> Result<ImagePayload, CaptureError> {
    debug!(?path, "capture_file: called");

    let metadata = fs::metadata(path).map_err(|e| CaptureError::rejected(path, format!("cannot read file: {}", e)))?;

    if !metadata.is_file() {
        return Err(CaptureError::rejected(path, "not a file"));
    }

    let byte_len = metadata.len();
    if byte_len == 0 {
        return Err(CaptureError::rejected(path, "file is empty"));
    }
    if byte_len > config.max_image_bytes {
        return Err(CaptureError::rejected(
            path,
            format!(
                "image is {} bytes, larger than the {} byte limit",
                byte_len, config.max_image_bytes
            ),
        ));
    }

    let mut file = fs::File::open(path).map_err(|e| CaptureError::rejected(path, format!("cannot open file: {}", e)))?;
    let mut bytes = Vec::with_capacity(byte_len as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| CaptureError::rejected(path, format!("cannot read file: {}", e)))?;

    let head = &bytes[..bytes.len().min(SIGNATURE_LEN)];
    let format = ImageFormat::detect(head, path).ok_or_else(|| CaptureError::rejected(path, "not an image file"))?;

    if !format.is_supported() {
        return Err(CaptureError::rejected(
            path,
            format!("{} is not supported; use JPEG, PNG, GIF or WebP", format.mime()),
        ));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(%format, byte_len, "capture_file: encoded");
    Ok(ImagePayload {
        format,
        data: STANDARD.encode(&bytes),
        preview: ImagePreview {
            file_name,
            path: path.to_path_buf(),
            byte_len: bytes.len() as u64,
        },
    })
}

/// Characters a shell or terminal escapes with `\` when a path is dropped
const SHELL_ESCAPED: &[char] = &[
    ' ', '\'', '"', '(', ')', '[', ']', '{', '}', '&', ';', '|', '<', '>', '!', '$', '`', '*', '?', '#', '\\',
];

/// Undo `\ `-style escapes that shells and terminals add on drop
///
/// A backslash before any other character is part of the file name.
fn unescape_shell(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && SHELL_ESCAPED.contains(&next)
        {
            out.push(next);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_capture_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(b"rest-of-image");
        let path = write_file(dir.path(), "room.png", &bytes);

        let payload = capture_file(&path, &CaptureConfig::default()).unwrap();
        assert_eq!(payload.format, ImageFormat::Png);
        assert_eq!(payload.mime(), "image/png");
        assert_eq!(payload.data, STANDARD.encode(&bytes));
        assert_eq!(payload.preview.file_name, "room.png");
        assert_eq!(payload.preview.byte_len, bytes.len() as u64);
        assert!(payload.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_capture_rejects_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "notes.txt", b"just some notes");

        let err = capture_file(&path, &CaptureConfig::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Rejected { ref reason, .. } if reason == "not an image file"));
    }

    #[test]
    fn test_capture_text_starting_with_bm_is_not_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "notes.txt", b"BMW service notes");

        let err = capture_file(&path, &CaptureConfig::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Rejected { ref reason, .. } if reason == "not an image file"));
    }

    #[test]
    fn test_capture_rejects_unsupported_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "room.heic", b"\x00\x00\x00\x18ftypheic....");

        let err = capture_file(&path, &CaptureConfig::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Rejected { ref reason, .. } if reason.contains("image/heic")));
    }

    #[test]
    fn test_capture_rejects_empty_and_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_file(dir.path(), "empty.jpg", b"");
        assert!(matches!(
            capture_file(&empty, &CaptureConfig::default()),
            Err(CaptureError::Rejected { .. })
        ));

        let big = write_file(dir.path(), "big.png", &[&PNG_HEADER[..], &[0u8; 64][..]].concat());
        let config = CaptureConfig { max_image_bytes: 16 };
        let err = capture_file(&big, &config).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_capture_missing_file() {
        let err = capture_file(Path::new("/nonexistent/room.jpg"), &CaptureConfig::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Rejected { .. }));
    }

    #[test]
    fn test_capture_input_empty_is_cancelled() {
        let err = capture_input("   ", &CaptureConfig::default()).unwrap_err();
        assert!(err.is_cancelled());
        let err = capture_input("''", &CaptureConfig::default()).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_clean_path_input() {
        assert_eq!(clean_path_input("  /tmp/room.jpg \n"), Some(PathBuf::from("/tmp/room.jpg")));
        assert_eq!(clean_path_input("'/tmp/my room.jpg'"), Some(PathBuf::from("/tmp/my room.jpg")));
        assert_eq!(clean_path_input("\"/tmp/room.jpg\""), Some(PathBuf::from("/tmp/room.jpg")));
        assert_eq!(clean_path_input("/tmp/my\\ room.jpg"), Some(PathBuf::from("/tmp/my room.jpg")));
        assert_eq!(
            clean_path_input("file:///tmp/my%20room.jpg"),
            Some(PathBuf::from("/tmp/my room.jpg"))
        );
        assert_eq!(clean_path_input(""), None);
    }

    #[test]
    fn test_clean_path_input_keeps_literal_backslash() {
        assert_eq!(clean_path_input("/tmp/a\\b.png"), Some(PathBuf::from("/tmp/a\\b.png")));
        assert_eq!(clean_path_input("/tmp/a\\\\b.png"), Some(PathBuf::from("/tmp/a\\b.png")));
        assert_eq!(
            clean_path_input("/tmp/room\\(1\\).jpg"),
            Some(PathBuf::from("/tmp/room(1).jpg"))
        );
        assert_eq!(
            clean_path_input("file:///tmp/caf%C3%A9%20room.jpg"),
            Some(PathBuf::from("/tmp/café room.jpg"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_capture_input_backslash_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a\\b.png", &[&PNG_HEADER[..], &b"rest"[..]].concat());

        let raw = path.to_str().unwrap();
        let payload = capture_input(raw, &CaptureConfig::default()).unwrap();
        assert_eq!(payload.preview.file_name, "a\\b.png");
        assert_eq!(payload.preview.path, path);
    }

    #[test]
    fn test_payload_debug_hides_data() {
        let payload = ImagePayload {
            format: ImageFormat::Jpeg,
            data: "A".repeat(1000),
            preview: ImagePreview {
                file_name: "room.jpg".to_string(),
                path: PathBuf::from("room.jpg"),
                byte_len: 750,
            },
        };
        let debug = format!("{:?}", payload);
        assert!(debug.contains("data_len: 1000"));
        assert!(!debug.contains("AAAA"));
    }

    #[test]
    fn test_size_label() {
        let mut preview = ImagePreview {
            file_name: "a.jpg".to_string(),
            path: PathBuf::from("a.jpg"),
            byte_len: 512,
        };
        assert_eq!(preview.size_label(), "512 B");
        preview.byte_len = 2048;
        assert_eq!(preview.size_label(), "2 KB");
        preview.byte_len = 3 * 1024 * 1024 / 2;
        assert_eq!(preview.size_label(), "1.5 MB");
    }
}
