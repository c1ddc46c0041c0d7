//! Static document injection into the system prompt.

use tracing::{error, info};

use crate::docstore::DocumentStore;
use crate::document::PromptSpec;
use crate::error::{RagError, Result};

/// Append the full text of every context document to `spec.prompt`.
///
/// The prompt becomes `prompt + "\n\n" + connecting + "\n\n" + texts`, where
/// `connecting` is `context_connecting_prompt` (or empty) and `texts` are the
/// document texts in reference order joined by blank lines. A spec without
/// `documents.context_documents` is left untouched.
///
/// # Errors
///
/// Returns [`RagError::MissingDocument`] for the first reference the store
/// cannot resolve. The prompt is only written once every document has been
/// fetched, so a failed call leaves `spec` unchanged.
///
/// # Example
///
/// ```rust,ignore
/// let mut spec: PromptSpec = serde_json::from_value(record)?;
/// inject_context_documents(&mut spec, &store).await?;
/// ```
pub async fn inject_context_documents(
    spec: &mut PromptSpec,
    store: &dyn DocumentStore,
) -> Result<()> {
    let Some(references) = spec.context_documents() else {
        info!("no context documents found in prompt spec");
        return Ok(());
    };
    info!(count = references.len(), "context documents found in prompt spec");

    let mut texts = Vec::with_capacity(references.len());
    for reference in references {
        match store.find_one(&reference.document_id).await? {
            Some(document) => texts.push(document.text),
            None => {
                error!(document_id = %reference.document_id, "context document not found");
                return Err(RagError::MissingDocument {
                    document_id: reference.document_id.clone(),
                });
            }
        }
    }

    let connecting = spec
        .documents
        .as_ref()
        .and_then(|d| d.context_connecting_prompt.as_deref())
        .unwrap_or_default();

    let prompt = format!("{}\n\n{connecting}\n\n{}", spec.prompt, texts.join("\n\n"));
    spec.prompt = prompt;
    Ok(())
}
