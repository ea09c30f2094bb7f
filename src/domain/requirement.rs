use sha2::{Digest, Sha256};
use std::path::Path;

/// Uploaded requirement document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RequirementFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Content type sent with the multipart part, guessed from the extension.
    pub fn mime_type(&self) -> &'static str {
        let extension = Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "txt" | "md" => "text/plain",
            "pdf" => "application/pdf",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "xml" => "application/xml",
            _ => "application/octet-stream",
        }
    }
}

/// Source of the requirement: an uploaded file, typed text, or nothing yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequirementInput {
    #[default]
    None,
    File(RequirementFile),
    Text(String),
}

impl RequirementInput {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::File(_) => "file",
            Self::Text(_) => "text",
        }
    }

    /// True iff a file is present or the text is non-blank.
    pub fn has_requirement(&self) -> bool {
        match self {
            Self::None => false,
            Self::File(_) => true,
            Self::Text(content) => !content.trim().is_empty(),
        }
    }

    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        match self {
            Self::None => {}
            Self::File(file) => {
                hasher.update(b"file:");
                hasher.update(&file.bytes);
            }
            Self::Text(content) => {
                hasher.update(b"text:");
                hasher.update(content.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}
