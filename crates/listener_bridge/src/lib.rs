//! Fans internal workspace notifications out to external observers.
//!
//! The workspace produces [`WorkspaceEvent`]s; every registered
//! [`SimulationListener`] receives the matching notification, in
//! registration order. Widget and agent discrimination is carried by
//! closed enums, so an unhandled kind is a compile error rather than a
//! runtime fault.

use std::sync::Arc;

use serde_json::Value;
use shared::domain::{AgentKind, CompileError};
use tracing::debug;

/// External observer interface. One method per notification; implementors
/// that only care about a few can leave the rest as the provided no-ops.
#[allow(unused_variables)]
pub trait SimulationListener: Send + Sync {
    fn model_opened(&self, path: &str) {}
    fn button_pressed(&self, button_name: &str) {}
    fn button_stopped(&self, button_name: &str) {}
    fn slider_changed(
        &self,
        name: &str,
        value: f64,
        min: f64,
        increment: f64,
        max: f64,
        value_changed: bool,
        button_released: bool,
    ) {
    }
    fn switch_changed(&self, name: &str, on: bool, value_changed: bool) {}
    fn chooser_changed(&self, name: &str, value: &Value, value_changed: bool) {}
    fn input_box_changed(&self, name: &str, value: &Value, value_changed: bool) {}
    fn command_entered(
        &self,
        owner_name: &str,
        source: &str,
        agent_kind: char,
        error: Option<&CompileError>,
    ) {
    }
    fn code_tab_compiled(&self, source: &str, error: Option<&CompileError>) {}
    fn tick_counter_changed(&self, ticks: f64) {}
    fn possible_view_update(&self) {}
}

/// What owns a started or stopped job. Only buttons are reported to
/// listeners; the other owners exist so event producers do not have to
/// pre-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOwner {
    Button { display_name: String },
    Monitor { name: String },
    Plot { name: String },
}

/// The interface global whose value changed, by concrete widget kind.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalWidget {
    Slider {
        name: String,
        value: f64,
        min: f64,
        increment: f64,
        max: f64,
    },
    Switch {
        name: String,
        on: bool,
    },
    Chooser {
        name: String,
        value: Value,
    },
    InputBox {
        name: String,
        value: Value,
    },
}

/// What a compile notification is about: code run by a job owner (a
/// button or the command center) or the procedures tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileSubject {
    Job {
        owner_name: String,
        source: String,
        agent_kind: AgentKind,
        command_center: bool,
    },
    CodeTab {
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    ModelLoaded {
        path: String,
    },
    JobAdded {
        owner: JobOwner,
    },
    JobRemoved {
        owner: JobOwner,
    },
    GlobalChanged {
        widget: GlobalWidget,
        value_changed: bool,
        button_released: bool,
        /// Set while the workspace itself is writing the value back;
        /// such changes are not echoed to listeners.
        updating: bool,
    },
    Compiled {
        subject: CompileSubject,
        error: Option<CompileError>,
    },
}

/// Ordered set of listener registrations. Insertion order is dispatch
/// order; removal is by handle identity.
#[derive(Default)]
pub struct ListenerBridge {
    listeners: Vec<Arc<dyn SimulationListener>>,
}

impl ListenerBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SimulationListener>) {
        self.listeners.push(listener);
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn SimulationListener>) {
        self.listeners
            .retain(|registered| !Arc::ptr_eq(registered, listener));
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn handle(&self, event: &WorkspaceEvent) {
        debug!(?event, "dispatching workspace event");
        match event {
            WorkspaceEvent::ModelLoaded { path } => {
                for listener in &self.listeners {
                    listener.model_opened(path);
                }
            }
            WorkspaceEvent::JobAdded { owner } => match owner {
                JobOwner::Button { display_name } => {
                    for listener in &self.listeners {
                        listener.button_pressed(display_name);
                    }
                }
                JobOwner::Monitor { .. } | JobOwner::Plot { .. } => {}
            },
            WorkspaceEvent::JobRemoved { owner } => match owner {
                JobOwner::Button { display_name } => {
                    for listener in &self.listeners {
                        listener.button_stopped(display_name);
                    }
                }
                JobOwner::Monitor { .. } | JobOwner::Plot { .. } => {}
            },
            WorkspaceEvent::GlobalChanged {
                widget,
                value_changed,
                button_released,
                updating,
            } => {
                if *updating {
                    return;
                }
                for listener in &self.listeners {
                    match widget {
                        GlobalWidget::Slider {
                            name,
                            value,
                            min,
                            increment,
                            max,
                        } => listener.slider_changed(
                            name,
                            *value,
                            *min,
                            *increment,
                            *max,
                            *value_changed,
                            *button_released,
                        ),
                        GlobalWidget::Switch { name, on } => {
                            listener.switch_changed(name, *on, *value_changed)
                        }
                        GlobalWidget::Chooser { name, value } => {
                            listener.chooser_changed(name, value, *value_changed)
                        }
                        GlobalWidget::InputBox { name, value } => {
                            listener.input_box_changed(name, value, *value_changed)
                        }
                    }
                }
            }
            WorkspaceEvent::Compiled { subject, error } => match subject {
                CompileSubject::Job {
                    owner_name,
                    source,
                    agent_kind,
                    command_center,
                } => {
                    // Only code entered at the command center is echoed;
                    // button code compiles silently.
                    if *command_center {
                        for listener in &self.listeners {
                            listener.command_entered(
                                owner_name,
                                source,
                                agent_kind.code(),
                                error.as_ref(),
                            );
                        }
                    }
                }
                CompileSubject::CodeTab { source } => {
                    for listener in &self.listeners {
                        listener.code_tab_compiled(source, error.as_ref());
                    }
                }
            },
        }
    }

    pub fn tick_counter_changed(&self, ticks: f64) {
        for listener in &self.listeners {
            listener.tick_counter_changed(ticks);
        }
    }

    pub fn possible_view_update(&self) {
        for listener in &self.listeners {
            listener.possible_view_update();
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
