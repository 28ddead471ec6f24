//! 观察者事件流 (SSE)
//!
//! 连接时先发送 `initial_table_states` 快照，之后按发布顺序推送实时事件。
//! 先订阅再取快照，两者之间发生的变更不会丢失。

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use futures::stream::{self, StreamExt};
use shared::ObserverEvent;
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(stream_events))
}

/// ObserverEvent → SSE 帧，事件名取 `type` 标签
fn to_sse(event: &ObserverEvent) -> Option<Event> {
    match Event::default()
        .event(event.event_type().to_string())
        .json_data(event)
    {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(error = %e, event_type = %event.event_type(), "Failed to encode observer event");
            None
        }
    }
}

/// GET /api/events
async fn stream_events(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (snapshot, rx) = state.orchestrator().connect_observer();
    tracing::info!(
        observers = state.orchestrator().broadcaster().observer_count(),
        "Observer connected"
    );

    let initial = stream::iter(to_sse(&snapshot));
    let live = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((to_sse(&event), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Observer lagging, events skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .filter_map(|frame| async move { frame });

    let events = initial.chain(live).map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
