use crate::app::App;
use crate::notification::Notification;
use crossclip::{Clipboard, ClipboardError, SystemClipboard};
use tokio::task;

pub async fn copy_selected_document_id(app: &mut App) {
    let Some(id) = app.selected_document().map(|d| d.id.clone()) else {
        app.notifications.push(Notification::warning("No document selected to copy"));
        return;
    };

    let result: Result<Result<String, ClipboardError>, task::JoinError> =
        task::spawn_blocking(move || {
            let clipboard = SystemClipboard::new()?;
            clipboard.set_string_contents(id.clone())?;
            Ok(id)
        })
        .await;

    let notification = match result {
        Ok(Ok(copied)) => {
            Notification::success(format!("Copied document id '{}' to clipboard", copied))
        }
        Ok(Err(e)) => Notification::error(format!("Failed to access clipboard: {}", e)),
        Err(e) => Notification::error(format!("Clipboard task failed: {}", e)),
    };
    app.notifications.push(notification);
}
