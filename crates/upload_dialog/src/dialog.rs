//! The upload dialog controller: wires the form, the incremental search,
//! and the submission dispatch together.

use std::sync::Arc;

use anyhow::Result;
use client_core::{ModelService, ModelUpdate, NewModelUpload, PreviewImage, UploadOutcome};
use crossbeam_channel::Sender;
use shared::domain::{Group, ModelSummary, Person, UploadMode};
use shared::protocol::UploadStatus;
use tokio::runtime::Handle;
use tracing::warn;

use crate::events::DialogEvent;
use crate::form::{PreviewSelection, UploadForm};
use crate::search::ModelSearchField;

/// Supplies preview image bytes from the running workspace.
pub trait PreviewProvider: Send + Sync {
    /// Whether auto-generation can work at all (setup and go procedures
    /// are defined).
    fn auto_generation_available(&self) -> bool;
    fn current_view_png(&self) -> Result<Vec<u8>>;
    fn auto_generated_png(&self) -> Result<Vec<u8>>;
}

pub struct UploadDialog {
    service: Arc<dyn ModelService>,
    previews: Arc<dyn PreviewProvider>,
    events: Sender<DialogEvent>,
    runtime: Handle,
    person: Person,
    form: UploadForm,
    search: ModelSearchField,
    error_message: String,
    disposed: bool,
}

impl UploadDialog {
    pub fn new(
        service: Arc<dyn ModelService>,
        previews: Arc<dyn PreviewProvider>,
        events: Sender<DialogEvent>,
        runtime: Handle,
        person: Person,
        groups: Vec<Group>,
        initial_error: impl Into<String>,
    ) -> Self {
        let auto_available = previews.auto_generation_available();
        let mut dialog = Self {
            service,
            previews,
            events,
            runtime,
            person,
            form: UploadForm::new(groups, auto_available),
            search: ModelSearchField::new(),
            error_message: initial_error.into(),
            disposed: false,
        };
        // Seed the result selector with the empty-query placeholder.
        dialog.set_search_query("");
        dialog
    }

    pub fn greeting(&self) -> String {
        format!("Hello {}", self.person.display_name())
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    pub fn search(&self) -> &ModelSearchField {
        &self.search
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Explicit user mode selection. Every mode entry re-applies the
    /// enablement profile and resets the existing-model search field.
    pub fn set_mode(&mut self, mode: UploadMode) {
        self.form.set_mode(mode);
        self.set_search_query("");
    }

    /// Text-change handler for the existing-model search field.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let changeable_only = self.form.mode() == UploadMode::NewVersion;
        self.search.on_query_changed(
            query.into(),
            changeable_only,
            &self.service,
            &self.events,
            &self.runtime,
        );
    }

    /// Routes a [`DialogEvent::SearchCompleted`] back to the search field.
    pub fn on_search_completed(&mut self, generation: u64, models: Vec<ModelSummary>) {
        self.search.on_search_completed(generation, models);
    }

    pub fn select_search_result(&mut self, index: usize) -> bool {
        self.search.select_result(index)
    }

    pub fn set_search_focused(&mut self, focused: bool) {
        self.search.set_focused(focused);
    }

    fn validate(&mut self) -> bool {
        let mode = self.form.mode();

        if matches!(mode, UploadMode::New | UploadMode::Child)
            && self.form.model_name.trim().is_empty()
        {
            self.error_message = "Missing model name".to_string();
            return false;
        }

        if matches!(mode, UploadMode::NewVersion | UploadMode::Child)
            && self.search.selected_model().is_none()
        {
            self.error_message = if mode == UploadMode::NewVersion {
                "Must select an existing model to make a new version of".to_string()
            } else {
                "Must select an existing parent model".to_string()
            };
            return false;
        }

        if matches!(mode, UploadMode::NewVersion | UploadMode::Child)
            && self.form.description.trim().is_empty()
        {
            self.error_message = "Description cannot be blank".to_string();
            return false;
        }

        true
    }

    /// Submit. On validation failure the dialog stays open, one error
    /// message is shown, and no request is issued. On success the dialog
    /// is disposed immediately and the matching request is dispatched;
    /// whatever comes back surfaces as a prompt event.
    pub fn on_ok(&mut self) -> bool {
        if self.disposed || !self.validate() {
            return false;
        }
        self.disposed = true;
        self.search.abort_pending();

        let mode = self.form.mode();
        let name = self.form.model_name.trim().to_string();
        match mode {
            UploadMode::New => {
                let upload = NewModelUpload {
                    name: name.clone(),
                    group: self.form.selected_group().map(|group| group.group_id),
                    visibility: self.form.selected_visibility(),
                    changeability: self.form.selected_changeability(),
                    preview: self.resolve_preview(),
                };
                let service = Arc::clone(&self.service);
                let events = self.events.clone();
                self.runtime.spawn(async move {
                    let outcome = match service.upload_model(upload).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            warn!("upload request failed: {err:#}");
                            UploadOutcome {
                                status: UploadStatus::ConnectionError,
                                model: None,
                            }
                        }
                    };
                    let _ = events.send(followup_for_new_model(outcome, &name));
                });
            }
            UploadMode::NewVersion | UploadMode::Child => {
                let Some(existing) = self.search.selected_model() else {
                    // validate() guarantees a selection; bail rather than
                    // dispatch a request with no target.
                    return false;
                };
                let existing_name = existing.name.clone();
                let update = ModelUpdate {
                    model_id: existing.model_id,
                    name,
                    description: self.form.description.trim().to_string(),
                    mode,
                };
                // A new version keeps the existing model's name; a child
                // gets the name typed into the form.
                let prompt_name = if mode == UploadMode::Child {
                    update.name.clone()
                } else {
                    existing_name
                };
                let service = Arc::clone(&self.service);
                let events = self.events.clone();
                self.runtime.spawn(async move {
                    let outcome = match service.update_model(update).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            warn!("update request failed: {err:#}");
                            UploadOutcome {
                                status: UploadStatus::ConnectionError,
                                model: None,
                            }
                        }
                    };
                    let _ = events.send(followup_for_update(outcome, &prompt_name));
                });
            }
        }
        true
    }

    pub fn on_cancel(&mut self) {
        self.disposed = true;
        self.search.abort_pending();
    }

    /// Dispose, end the session, and hand the user back to the login
    /// prompt whatever the logout request says.
    pub fn on_logout(&mut self) {
        self.disposed = true;
        self.search.abort_pending();
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            if let Err(err) = service.logout().await {
                warn!("logout request failed: {err:#}");
            }
            let _ = events.send(DialogEvent::PromptLogin);
        });
    }

    fn resolve_preview(&self) -> Option<PreviewImage> {
        match self.form.preview() {
            PreviewSelection::CurrentView => match self.previews.current_view_png() {
                Ok(bytes) => Some(PreviewImage::Png(bytes)),
                Err(err) => {
                    warn!("current view snapshot unavailable: {err:#}");
                    None
                }
            },
            PreviewSelection::ImageFromFile => self
                .form
                .preview_file()
                .map(|path| PreviewImage::File(path.clone())),
            PreviewSelection::AutoGenerate => match self.previews.auto_generated_png() {
                Ok(bytes) => Some(PreviewImage::Png(bytes)),
                Err(err) => {
                    warn!("auto-generated preview unavailable: {err:#}");
                    None
                }
            },
            PreviewSelection::NoPreview => None,
        }
    }
}

fn success_prompt(
    model: Option<ModelSummary>,
    fallback_name: &str,
    warning: Option<String>,
) -> DialogEvent {
    let (model_name, model_url) = match model {
        Some(model) => (model.name, Some(model.url)),
        None => (fallback_name.to_string(), None),
    };
    DialogEvent::PromptSuccess {
        model_name,
        model_url,
        warning,
    }
}

/// Follow-up for the new-model upload path.
pub(crate) fn followup_for_new_model(outcome: UploadOutcome, submitted_name: &str) -> DialogEvent {
    match outcome.status {
        UploadStatus::NotLoggedIn => DialogEvent::PromptLogin,
        UploadStatus::MissingParameters => DialogEvent::PromptUpload {
            message: "Missing model name".to_string(),
        },
        UploadStatus::ModelNotSaved => DialogEvent::PromptUpload {
            message: "Server error".to_string(),
        },
        UploadStatus::ConnectionError => DialogEvent::PromptUpload {
            message: "Error connecting to Modeling Commons".to_string(),
        },
        UploadStatus::Success => success_prompt(outcome.model, submitted_name, None),
        UploadStatus::InvalidPreviewImage => DialogEvent::PromptUpload {
            message: "Invalid preview image".to_string(),
        },
        UploadStatus::SuccessPreviewNotSaved => success_prompt(
            outcome.model,
            submitted_name,
            Some("The model was uploaded, but the preview image was not saved".to_string()),
        ),
        UploadStatus::Unrecognized => DialogEvent::PromptUpload {
            message: "Unknown server error".to_string(),
        },
    }
}

/// Follow-up for the new-version/child update path. The preview statuses
/// cannot legitimately occur here, so they degrade to the generic message.
pub(crate) fn followup_for_update(outcome: UploadOutcome, fallback_name: &str) -> DialogEvent {
    match outcome.status {
        UploadStatus::NotLoggedIn => DialogEvent::PromptLogin,
        UploadStatus::MissingParameters => DialogEvent::PromptUpload {
            message: "Missing parameters".to_string(),
        },
        UploadStatus::ModelNotSaved => DialogEvent::PromptUpload {
            message: "Server error".to_string(),
        },
        UploadStatus::ConnectionError => DialogEvent::PromptUpload {
            message: "Error connecting to Modeling Commons".to_string(),
        },
        UploadStatus::Success => success_prompt(outcome.model, fallback_name, None),
        UploadStatus::InvalidPreviewImage
        | UploadStatus::SuccessPreviewNotSaved
        | UploadStatus::Unrecognized => DialogEvent::PromptUpload {
            message: "Unknown server error".to_string(),
        },
    }
}

#[cfg(test)]
#[path = "tests/dialog_tests.rs"]
mod tests;
