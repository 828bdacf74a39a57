//! Request routing
//!
//! Pure decision over the raw inputs. No files are read and no requests are
//! sent here, so every branch can be checked without stubs.

use crate::extract::{FileKind, UploadedFile};
use crate::models::ModelRegistry;
use std::path::Path;

/// Raw inputs of one request
#[derive(Debug, Clone, Copy)]
pub struct RequestInput<'a> {
    pub file: Option<&'a UploadedFile>,
    pub query: &'a str,
    pub model: &'a str,
}

/// Document to extract before prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef<'a> {
    pub path: &'a Path,
    pub kind: FileKind,
}

/// What to do with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Nothing to answer; show the welcome text
    Help,
    /// A file with an extension we cannot read
    Unsupported,
    /// Extract (if a document is attached), then ask `model`
    Proceed {
        model: &'a str,
        document: Option<DocumentRef<'a>>,
    },
}

/// Decide how to handle a request
///
/// Checked in order: empty input, model override for attachments, file
/// extension.
pub fn route<'a>(input: &RequestInput<'a>, registry: &ModelRegistry) -> Route<'a> {
    let file = match input.file {
        None if input.query.trim().is_empty() => return Route::Help,
        None => {
            return Route::Proceed {
                model: input.model,
                document: None,
            }
        }
        Some(file) => file,
    };

    let model = registry.effective_model(input.model, true);
    if model != input.model {
        tracing::info!(
            "Document attached; switching model from {} to {}",
            input.model,
            model
        );
    }

    match file.kind() {
        Some(kind) => Route::Proceed {
            model,
            document: Some(DocumentRef {
                path: &file.path,
                kind,
            }),
        },
        None => Route::Unsupported,
    }
}
