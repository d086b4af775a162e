//! Host dialogs used by the delete flow.

/// Confirmation and error prompts supplied by the host toolkit.
pub trait DialogHost {
    /// Ask a yes/no question. Dismissing the prompt counts as "No".
    fn confirm(&mut self, message: &str) -> bool;

    /// Show an error with a single OK button.
    fn error(&mut self, message: &str);
}

/// Host without interactive dialogs: declines every confirmation and logs
/// errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDialogs;

impl DialogHost for HeadlessDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        tracing::debug!("Declining confirmation without a dialog host: {message}");
        false
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}
