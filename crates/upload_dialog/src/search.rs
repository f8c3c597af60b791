//! Incremental search over existing Commons models: cancel-on-supersede,
//! at most one outstanding request, responses reconciled by generation.

use std::sync::Arc;

use client_core::{ModelService, RequestHandle};
use crossbeam_channel::Sender;
use shared::domain::ModelSummary;
use tokio::runtime::Handle;
use tracing::warn;

use crate::events::DialogEvent;
use crate::selector::{SelectorEntry, SelectorModel};

/// Server-side cap on search results per request.
pub const SEARCH_RESULT_CAP: u32 = 10;

pub const EMPTY_QUERY_NOTE: &str = "Enter name of existing model";
pub const SEARCHING_NOTE: &str = "Searching";
pub const NO_RESULTS_NOTE: &str = "No existing models found";

/// The search field plus its result selector. All mutation happens on the
/// host's event thread; the spawned request task only ever sends a
/// [`DialogEvent::SearchCompleted`] back through the queue.
pub struct ModelSearchField {
    query: String,
    results: SelectorModel<ModelSummary>,
    popup_open: bool,
    focused: bool,
    pending: Option<RequestHandle>,
    next_generation: u64,
}

impl ModelSearchField {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            results: SelectorModel::new(),
            popup_open: false,
            focused: false,
            pending: None,
            next_generation: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &SelectorModel<ModelSummary> {
        &self.results
    }

    pub fn popup_open(&self) -> bool {
        self.popup_open
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn select_result(&mut self, index: usize) -> bool {
        self.results.select(index)
    }

    pub fn selected_model(&self) -> Option<&ModelSummary> {
        self.results.selected_value()
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn abort_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Runs on every text change. Supersedes any outstanding search before
    /// anything else, so at most one is ever live.
    pub(crate) fn on_query_changed(
        &mut self,
        query: String,
        changeable_only: bool,
        service: &Arc<dyn ModelService>,
        events: &Sender<DialogEvent>,
        runtime: &Handle,
    ) {
        self.abort_pending();
        self.results.clear();
        self.popup_open = false;
        self.query = query;

        if self.query.is_empty() {
            self.results
                .push(SelectorEntry::Note(EMPTY_QUERY_NOTE.to_string()), false);
            return;
        }

        self.results
            .push(SelectorEntry::Note(SEARCHING_NOTE.to_string()), false);

        let generation = self.next_generation;
        self.next_generation += 1;
        let service = Arc::clone(service);
        let events = events.clone();
        let query = self.query.clone();
        let task = runtime.spawn(async move {
            let models = match service
                .search_models(&query, SEARCH_RESULT_CAP, changeable_only)
                .await
            {
                Ok(models) => models,
                Err(err) => {
                    warn!(query, "model search failed: {err:#}");
                    Vec::new()
                }
            };
            let _ = events.send(DialogEvent::SearchCompleted { generation, models });
        });
        self.pending = Some(RequestHandle::new(generation, task.abort_handle()));
    }

    /// Applies a search response. Responses that do not match the current
    /// outstanding generation belong to a superseded search and are
    /// silently discarded; that is the normal fate of an aborted request
    /// whose completion raced the abort.
    pub(crate) fn on_search_completed(&mut self, generation: u64, models: Vec<ModelSummary>) {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation() == generation);
        if !is_current {
            return;
        }
        self.pending = None;
        self.results.clear();

        if models.is_empty() {
            self.results
                .push(SelectorEntry::Note(NO_RESULTS_NOTE.to_string()), false);
            return;
        }

        for model in models {
            self.results.push(SelectorEntry::Value(model), true);
        }
        // Opening the popup moves focus onto the list; hand it back when
        // the field had it.
        let had_focus = self.focused;
        self.popup_open = true;
        self.focused = false;
        if had_focus {
            self.focused = true;
        }
    }
}
