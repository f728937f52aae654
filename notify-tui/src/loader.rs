//! Initial-state loader: one GET per collection, run concurrently.

use crate::api_client::RestClient;
use crate::events::TuiEvent;
use notify_core::{WidgetEvent, WidgetKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Spawn a fetch task for every resource of `kind`. Each task reports
/// exactly one `FetchSucceeded` or `FetchFailed` for its slot; failures are
/// not retried.
pub fn spawn_fetches(
    rest: &RestClient,
    kind: WidgetKind,
    epoch: u64,
    sender: mpsc::Sender<TuiEvent>,
) -> Vec<JoinHandle<()>> {
    kind.resources()
        .iter()
        .enumerate()
        .map(|(slot, resource)| {
            let rest = rest.clone();
            let sender = sender.clone();
            let resource = *resource;
            tokio::spawn(async move {
                let url = rest.url_for(&resource);
                debug!(widget = ?kind, %url, "fetching collection");
                let event = match rest.fetch_collection(&resource).await {
                    Ok(items) => {
                        info!(widget = ?kind, %url, count = items.len(), "collection loaded");
                        WidgetEvent::FetchSucceeded { slot, items }
                    }
                    Err(err) => {
                        warn!(widget = ?kind, %url, error = %err, "collection fetch failed");
                        WidgetEvent::FetchFailed { slot }
                    }
                };
                let _ = sender.send(TuiEvent::widget(kind, epoch, event)).await;
            })
        })
        .collect()
}
