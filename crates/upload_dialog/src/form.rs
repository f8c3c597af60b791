//! Form state for the upload dialog: mode-driven field enablement, group
//! and permission selectors, and the preview image choice.

use std::path::PathBuf;

use shared::domain::{Group, PermissionLevel, UploadMode};

use crate::selector::{SelectorEntry, SelectorModel};

/// Which regions of the form accept input in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRegions {
    pub model_name: bool,
    pub existing_model: bool,
    pub description: bool,
    pub permissions: bool,
    pub preview_image: bool,
}

impl FieldRegions {
    fn for_mode(mode: UploadMode) -> Self {
        match mode {
            UploadMode::New => Self {
                model_name: true,
                existing_model: false,
                description: false,
                permissions: true,
                preview_image: true,
            },
            UploadMode::NewVersion => Self {
                model_name: false,
                existing_model: true,
                description: true,
                permissions: false,
                preview_image: false,
            },
            UploadMode::Child => Self {
                model_name: true,
                existing_model: true,
                description: true,
                permissions: false,
                preview_image: false,
            },
        }
    }
}

/// Where the preview image comes from. Mutually exclusive, radio-style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSelection {
    CurrentView,
    ImageFromFile,
    AutoGenerate,
    NoPreview,
}

pub struct UploadForm {
    mode: UploadMode,
    regions: FieldRegions,
    pub model_name: String,
    pub description: String,
    group_selector: SelectorModel<Group>,
    visibility: SelectorModel<PermissionLevel>,
    changeability: SelectorModel<PermissionLevel>,
    group_permission_index: usize,
    user_permission_index: usize,
    preview: PreviewSelection,
    preview_file: Option<PathBuf>,
    auto_preview_available: bool,
}

impl UploadForm {
    pub fn new(groups: Vec<Group>, auto_preview_available: bool) -> Self {
        let mut group_selector = SelectorModel::new();
        group_selector.push(SelectorEntry::Note("No group".to_string()), true);
        for group in groups {
            group_selector.push(SelectorEntry::Value(group), true);
        }

        let mut visibility = SelectorModel::new();
        let mut changeability = SelectorModel::new();
        let mut group_permission_index = 0;
        let mut user_permission_index = 0;
        for level in PermissionLevel::ALL {
            // "group" starts disabled: no group is chosen yet.
            let enabled = level != PermissionLevel::Group;
            let index = visibility.push(SelectorEntry::Value(level), enabled);
            changeability.push(SelectorEntry::Value(level), enabled);
            match level {
                PermissionLevel::Group => group_permission_index = index,
                PermissionLevel::UserOnly => user_permission_index = index,
                PermissionLevel::Everyone => {}
            }
        }

        Self {
            mode: UploadMode::New,
            regions: FieldRegions::for_mode(UploadMode::New),
            model_name: String::new(),
            description: String::new(),
            group_selector,
            visibility,
            changeability,
            group_permission_index,
            user_permission_index,
            preview: PreviewSelection::CurrentView,
            preview_file: None,
            auto_preview_available,
        }
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn regions(&self) -> FieldRegions {
        self.regions
    }

    pub(crate) fn set_mode(&mut self, mode: UploadMode) {
        self.mode = mode;
        self.regions = FieldRegions::for_mode(mode);
    }

    pub fn group_selector(&self) -> &SelectorModel<Group> {
        &self.group_selector
    }

    pub fn visibility(&self) -> &SelectorModel<PermissionLevel> {
        &self.visibility
    }

    pub fn changeability(&self) -> &SelectorModel<PermissionLevel> {
        &self.changeability
    }

    pub fn selected_group(&self) -> Option<&Group> {
        self.group_selector.selected_value()
    }

    pub fn selected_visibility(&self) -> PermissionLevel {
        self.visibility
            .selected_value()
            .copied()
            .unwrap_or(PermissionLevel::UserOnly)
    }

    pub fn selected_changeability(&self) -> PermissionLevel {
        self.changeability
            .selected_value()
            .copied()
            .unwrap_or(PermissionLevel::UserOnly)
    }

    /// Moves the group selection and reconciles the permission selectors.
    pub fn select_group(&mut self, index: usize) -> bool {
        let moved = self.group_selector.select(index);
        if moved {
            self.refresh_group_permission();
        }
        moved
    }

    pub fn select_visibility(&mut self, index: usize) -> bool {
        self.visibility.select(index)
    }

    pub fn select_changeability(&mut self, index: usize) -> bool {
        self.changeability.select(index)
    }

    /// Permission dependency resolver: the "group" permission is only
    /// selectable while a group is chosen; a selection resting on "group"
    /// when no group is chosen falls back to user-only. Idempotent.
    pub fn refresh_group_permission(&mut self) {
        let group_selected = self.group_selector.selected_value().is_some();
        self.visibility
            .set_index_enabled(self.group_permission_index, group_selected);
        self.changeability
            .set_index_enabled(self.group_permission_index, group_selected);

        if !group_selected {
            if self.visibility.selected_value() == Some(&PermissionLevel::Group) {
                self.visibility.select(self.user_permission_index);
            }
            if self.changeability.selected_value() == Some(&PermissionLevel::Group) {
                self.changeability.select(self.user_permission_index);
            }
        }
    }

    pub fn preview(&self) -> PreviewSelection {
        self.preview
    }

    pub fn preview_file(&self) -> Option<&PathBuf> {
        self.preview_file.as_ref()
    }

    pub fn auto_preview_available(&self) -> bool {
        self.auto_preview_available
    }

    /// Picks a preview source. Auto-generation is refused while the
    /// workspace cannot produce one (no setup/go procedures).
    pub fn set_preview(&mut self, selection: PreviewSelection) -> bool {
        if selection == PreviewSelection::AutoGenerate && !self.auto_preview_available {
            return false;
        }
        self.preview = selection;
        true
    }

    pub fn set_preview_file(&mut self, path: PathBuf) {
        self.preview_file = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::GroupId;

    fn group(id: i64, name: &str) -> Group {
        Group {
            group_id: GroupId(id),
            name: name.to_string(),
        }
    }

    fn form_with_group() -> UploadForm {
        UploadForm::new(vec![group(4, "Complexity Lab")], true)
    }

    #[test]
    fn starts_in_new_mode_with_new_profile() {
        let form = form_with_group();
        assert_eq!(form.mode(), UploadMode::New);
        assert_eq!(
            form.regions(),
            FieldRegions {
                model_name: true,
                existing_model: false,
                description: false,
                permissions: true,
                preview_image: true,
            }
        );
    }

    #[test]
    fn mode_profiles_match_the_enablement_table() {
        let mut form = form_with_group();
        form.set_mode(UploadMode::NewVersion);
        assert_eq!(
            form.regions(),
            FieldRegions {
                model_name: false,
                existing_model: true,
                description: true,
                permissions: false,
                preview_image: false,
            }
        );
        form.set_mode(UploadMode::Child);
        assert_eq!(
            form.regions(),
            FieldRegions {
                model_name: true,
                existing_model: true,
                description: true,
                permissions: false,
                preview_image: false,
            }
        );
    }

    #[test]
    fn defaults_to_no_group_and_everyone_visibility() {
        let form = form_with_group();
        assert_eq!(form.selected_group(), None);
        assert_eq!(form.selected_visibility(), PermissionLevel::Everyone);
        assert_eq!(form.selected_changeability(), PermissionLevel::Everyone);
    }

    #[test]
    fn group_permission_disabled_until_group_chosen() {
        let mut form = form_with_group();
        // Index 1 in both permission selectors is "group".
        assert!(!form.select_visibility(1));
        assert!(form.select_group(1));
        assert!(form.selected_group().is_some());
        assert!(form.select_visibility(1));
        assert_eq!(form.selected_visibility(), PermissionLevel::Group);
    }

    #[test]
    fn clearing_group_falls_back_to_user_only() {
        let mut form = form_with_group();
        form.select_group(1);
        form.select_visibility(1);
        form.select_changeability(1);
        // Back to "No group".
        form.select_group(0);
        assert_eq!(form.selected_group(), None);
        assert_eq!(form.selected_visibility(), PermissionLevel::UserOnly);
        assert_eq!(form.selected_changeability(), PermissionLevel::UserOnly);
        assert!(!form.visibility().is_index_enabled(1));
        assert!(!form.changeability().is_index_enabled(1));
    }

    #[test]
    fn resolver_is_idempotent() {
        let mut form = form_with_group();
        form.select_group(1);
        form.select_visibility(1);
        form.select_group(0);

        let after_first = (
            form.selected_visibility(),
            form.selected_changeability(),
            form.visibility().is_index_enabled(1),
        );
        form.refresh_group_permission();
        let after_second = (
            form.selected_visibility(),
            form.selected_changeability(),
            form.visibility().is_index_enabled(1),
        );
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn reselecting_group_does_not_restore_group_permission() {
        let mut form = form_with_group();
        form.select_group(1);
        form.select_visibility(1);
        form.select_group(0);
        assert_eq!(form.selected_visibility(), PermissionLevel::UserOnly);
        form.select_group(1);
        // Re-enabled, but the selection stays where the fallback left it.
        assert!(form.visibility().is_index_enabled(1));
        assert_eq!(form.selected_visibility(), PermissionLevel::UserOnly);
    }

    #[test]
    fn auto_generate_preview_requires_availability() {
        let mut form = UploadForm::new(Vec::new(), false);
        assert!(!form.set_preview(PreviewSelection::AutoGenerate));
        assert_eq!(form.preview(), PreviewSelection::CurrentView);
        assert!(form.set_preview(PreviewSelection::NoPreview));
        assert_eq!(form.preview(), PreviewSelection::NoPreview);
    }
}
