//! Session state: the selected file, its scrubbed result and the original
//! extension. Transitions consume the state and return the next one.

use crate::input::SelectedFile;
use crate::scrub::ScrubbedResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub selected: Option<SelectedFile>,
    pub scrubbed: Option<ScrubbedResult>,
    pub original_extension: Option<String>,
}

impl SessionState {
    /// A new selection replaces the old one and invalidates any scrubbed result.
    pub fn select(self, file: SelectedFile) -> Self {
        Self {
            original_extension: file.extension.clone(),
            selected: Some(file),
            scrubbed: None,
        }
    }

    /// The selection takes on the scrubbed bytes and output name, so later
    /// metadata reads and downloads see the cleaned file.
    pub fn apply_scrub(self, result: ScrubbedResult) -> Self {
        let Some(previous) = self.selected else {
            return self;
        };
        let renamed = SelectedFile {
            name: result.file_name.clone(),
            mime: previous.mime,
            bytes: result.bytes.clone(),
            extension: self.original_extension.clone(),
        };
        Self {
            selected: Some(renamed),
            scrubbed: Some(result),
            original_extension: self.original_extension,
        }
    }

    pub fn has_file(&self) -> bool {
        self.selected.is_some()
    }
}

/// Which actions the surface should offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionFlags {
    pub strip: bool,
    pub reset: bool,
    pub view_metadata: bool,
    /// Download/copy group.
    pub output: bool,
}

impl ActionFlags {
    pub fn for_state(state: &SessionState, strip_pending: bool) -> Self {
        let selected = state.has_file();
        Self {
            strip: selected && state.scrubbed.is_none() && !strip_pending,
            reset: selected,
            view_metadata: selected,
            output: state.scrubbed.is_some(),
        }
    }
}
