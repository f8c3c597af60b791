//! Events the dialog queues back to the host application's event loop.

use shared::domain::ModelSummary;

/// Delivered over the dialog's crossbeam channel. `SearchCompleted` is
/// routed back into [`crate::UploadDialog::on_search_completed`]; the
/// prompt variants are re-entry points the host handles after the dialog
/// has been disposed.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// A model search finished. Only the generation matching the current
    /// outstanding search may mutate the result list.
    SearchCompleted {
        generation: u64,
        models: Vec<ModelSummary>,
    },
    /// The session is gone; ask the user to log in again.
    PromptLogin,
    /// Reopen the upload dialog with this message pre-filled.
    PromptUpload { message: String },
    /// Show the upload-success dialog, optionally with a warning.
    PromptSuccess {
        model_name: String,
        model_url: Option<String>,
        warning: Option<String>,
    },
}
