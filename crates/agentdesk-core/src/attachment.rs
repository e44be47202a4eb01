//! Company document attachments
//!
//! A selected document is checked against [`MAX_ATTACHMENT_BYTES`] and the
//! supported [`DocumentKind`]s, then carried to the agent as base64 text.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 5 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("File is too large. Maximum size is 5 MB.")]
    TooLarge { size: u64 },
    #[error("Unsupported file type. Please upload a PDF, TXT, DOC, or DOCX file.")]
    UnsupportedType { name: String },
    #[error("Could not read the selected file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Txt,
    Doc,
    Docx,
}

impl DocumentKind {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Txt => "txt",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Txt => "text/plain",
            DocumentKind::Doc => "application/msword",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn all() -> Vec<DocumentKind> {
        vec![
            DocumentKind::Pdf,
            DocumentKind::Txt,
            DocumentKind::Doc,
            DocumentKind::Docx,
        ]
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::all().into_iter().find(|kind| kind.extension() == ext)
    }

    /// Resolve the kind of a file from its name's extension.
    pub fn detect(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A validated document, held in memory until the ask is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Load a document from disk. The size is checked against the file's
    /// metadata first so oversized files are never read into memory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AttachmentError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let kind = DocumentKind::detect(&name)
            .ok_or_else(|| AttachmentError::UnsupportedType { name: name.clone() })?;
        check_size(std::fs::metadata(path)?.len())?;

        let bytes = std::fs::read(path)?;
        // The file may have grown between stat and read
        check_size(bytes.len() as u64)?;

        Ok(Self { name, kind, bytes })
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn encode(&self) -> EncodedAttachment {
        EncodedAttachment {
            name: self.name.clone(),
            mime_type: self.mime_type().to_string(),
            data: encode_bytes(&self.bytes),
        }
    }
}

/// Transport form of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAttachment {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

impl EncodedAttachment {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        decode_text(&self.data)
    }
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_text(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}

fn check_size(size: u64) -> Result<(), AttachmentError> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_uses_extension() {
        assert_eq!(DocumentKind::detect("Notes.TXT"), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::detect("plan.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::detect("archive.tar.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect("photo.png"), None);
        assert_eq!(DocumentKind::detect("README"), None);
    }

    fn sized_file(dir: &Path, name: &str, len: u64) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::File::create(&path).unwrap().set_len(len).unwrap();
        path
    }

    #[test]
    fn test_from_path_rejects_one_byte_over_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(dir.path(), "big.pdf", MAX_ATTACHMENT_BYTES + 1);

        let err = Attachment::from_path(&path).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { .. }));
        assert!(err.to_string().starts_with("File is too large"));
    }

    #[test]
    fn test_from_path_accepts_exact_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(dir.path(), "limit.txt", MAX_ATTACHMENT_BYTES);

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.size(), MAX_ATTACHMENT_BYTES);
        assert_eq!(attachment.mime_type(), "text/plain");
    }

    #[test]
    fn test_from_path_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"png").unwrap();

        let err = Attachment::from_path(&path).unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedType { .. }));
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Attachment::from_path(dir.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, AttachmentError::Io(_)));
    }

    #[test]
    fn test_encoded_attachment_decodes_to_original_bytes() {
        let mut file = tempfile::Builder::new().suffix(".doc").tempfile().unwrap();
        let original: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
        file.write_all(&original).unwrap();

        let attachment = Attachment::from_path(file.path()).unwrap();
        let encoded = attachment.encode();
        assert_eq!(encoded.mime_type, "application/msword");
        assert_eq!(encoded.decode().unwrap(), original);
    }
}
