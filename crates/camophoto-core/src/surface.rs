use crate::present::MetadataSection;
use crate::session::ActionFlags;
use std::time::Duration;

/// The presentation surface the controller writes to.
///
/// Implementations hold no logic of their own; they only display what they
/// are given.
#[allow(async_fn_in_trait)]
pub trait Surface {
    fn show_status(&self, text: &str);
    fn show_file_name(&self, name: &str);
    fn set_actions(&self, actions: ActionFlags);
    /// Opens the metadata popup with these sections.
    fn render_metadata(&self, sections: &[MetadataSection]);
    fn close_metadata(&self);
    /// Clears the file picker so the same path can be chosen again.
    fn clear_picker(&self);
    fn pulse_drop_zone(&self, duration: Duration);
    fn highlight_download(&self, duration: Duration);
    /// Resolves once the changes pushed so far are on screen. Other handlers
    /// may run before it does.
    async fn repaint(&self);
}
