//! Browser clipboard access through a `ClipboardEvent`'s `DataTransfer`.

use web_sys::{ClipboardEvent, DataTransfer};

use super::{ClipboardPayload, ClipboardPort};

const HTML: &str = "text/html";
const TEXT: &str = "text/plain";

/// Clipboard port over the `DataTransfer` of a copy, cut or paste event.
pub struct DataTransferClipboard {
    transfer: DataTransfer,
}

impl DataTransferClipboard {
    pub fn new(transfer: DataTransfer) -> Self {
        Self { transfer }
    }

    /// Wrap the event's clipboard data, if the browser provided any.
    pub fn from_event(event: &ClipboardEvent) -> Option<Self> {
        event.clipboard_data().map(Self::new)
    }
}

impl ClipboardPort for DataTransferClipboard {
    fn read(&mut self) -> ClipboardPayload {
        // getData returns "" for a missing flavour.
        let html = self.transfer.get_data(HTML).ok().filter(|s| !s.is_empty());
        let text = self.transfer.get_data(TEXT).ok().filter(|s| !s.is_empty() || html.is_none());
        ClipboardPayload { html, text }
    }

    fn write(&mut self, html: &str, text: &str) {
        if self.transfer.set_data(HTML, html).is_err() || self.transfer.set_data(TEXT, text).is_err() {
            log::warn!("clipboard write rejected by the browser");
        }
    }
}
