use serde::{Deserialize, Serialize};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const ACCEPTED_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

/// Metadata of a selected file, as reported by the upload control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCandidate {
    pub file_name: String,
    #[serde(default)]
    pub media_type: Option<String>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Please choose a file first!")]
    MissingFile,
    #[error("Please upload a PDF, DOC, or DOCX file.")]
    UnsupportedType {
        file_name: String,
        media_type: Option<String>,
    },
    #[error("File size must be less than 10MB.")]
    TooLarge { size_bytes: u64 },
    #[error("An analysis is already in progress.")]
    AnalysisInProgress,
}

/// Accepts a document when either the media type or the extension is recognised,
/// and it does not exceed [`MAX_UPLOAD_BYTES`].
pub fn validate_upload(candidate: &UploadCandidate) -> Result<(), UploadRejection> {
    if candidate.file_name.trim().is_empty() {
        return Err(UploadRejection::MissingFile);
    }

    if !has_accepted_media_type(candidate.media_type.as_deref())
        && !has_accepted_extension(&candidate.file_name)
    {
        return Err(UploadRejection::UnsupportedType {
            file_name: candidate.file_name.clone(),
            media_type: candidate.media_type.clone(),
        });
    }

    if candidate.size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge {
            size_bytes: candidate.size_bytes,
        });
    }

    Ok(())
}

fn has_accepted_media_type(media_type: Option<&str>) -> bool {
    let Some(parsed) = media_type.and_then(|raw| raw.parse::<mime::Mime>().ok()) else {
        return false;
    };
    let essence = parsed.essence_str();
    ACCEPTED_MEDIA_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
}

fn has_accepted_extension(file_name: &str) -> bool {
    let lowered = file_name.to_lowercase();
    ACCEPTED_EXTENSIONS
        .iter()
        .any(|extension| lowered.ends_with(extension))
}
