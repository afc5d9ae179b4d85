//! HTTP endpoints.
//!
//! The server holds one immutable show and its planned timeline; handlers
//! serve them as JSON. Planning is CPU-only and runs inline on the request
//! task for `POST /api/timeline`; concurrent requests plan disjoint shows
//! with no shared mutable state.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use showgraph::Show;
use showplan::{build_timeline, Timeline};
use std::sync::Arc;

/// Shared state for web handlers. Built once at startup, never mutated.
#[derive(Clone)]
pub struct WebState {
    pub show: Arc<Show>,
    pub timeline: Arc<Timeline>,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(serve_ui))
        .route("/api/show", get(get_show))
        .route("/api/timeline", get(get_timeline).post(plan_timeline))
        .with_state(state)
}

async fn get_show(State(state): State<WebState>) -> impl IntoResponse {
    Json(serde_json::to_value(state.show.as_ref()).unwrap_or_else(|e| {
        tracing::error!("failed to serialize show: {e}");
        serde_json::json!({"error": "serialization failed"})
    }))
}

async fn get_timeline(State(state): State<WebState>) -> impl IntoResponse {
    Json(serde_json::to_value(state.timeline.as_ref()).unwrap_or_else(|e| {
        tracing::error!("failed to serialize timeline: {e}");
        serde_json::json!({"error": "serialization failed"})
    }))
}

/// Plan a posted show. Planner errors surface as 500 with the detail string.
async fn plan_timeline(Json(show): Json<Show>) -> Response {
    match build_timeline(&show) {
        Ok(timeline) => Json(serde_json::to_value(&timeline).unwrap_or_else(|e| {
            tracing::error!("failed to serialize timeline: {e}");
            serde_json::json!({"error": "serialization failed"})
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("planning failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Bind and run the server. With `run_and_exit` set, the command runs once
/// the listener is up (`{port}` substituted with the bound port), then the
/// server shuts down and the command's status decides the exit code.
pub async fn serve(
    addr: &str,
    state: WebState,
    run_and_exit: Option<String>,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local_addr = listener.local_addr()?;
    tracing::info!("listening on {local_addr}");

    let app = router(state);

    if let Some(command) = run_and_exit {
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        let args: Vec<String> = command
            .split_whitespace()
            .map(|arg| arg.replace("{port}", &local_addr.port().to_string()))
            .collect();
        let Some((program, rest)) = args.split_first() else {
            anyhow::bail!("empty run-and-exit command");
        };
        let status = tokio::process::Command::new(program)
            .args(rest)
            .status()
            .await
            .with_context(|| format!("failed to run {program:?}"))?;
        server.abort();
        if !status.success() {
            anyhow::bail!("run-and-exit command failed: {status}");
        }
        return Ok(());
    }

    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_ui() -> impl IntoResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(UI_HTML.to_string())
        .unwrap()
}

/// Single-file timeline viewer.
const UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Callboard</title>
  <style>
    :root { --bg: #14141c; --card: #1e1e2a; --accent: #e9b145; --text: #eee; --muted: #888; }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); padding: 1rem; }
    h1 { font-size: 1.4rem; margin-bottom: 1rem; }
    table { border-collapse: collapse; }
    th { font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.05em; color: var(--muted); padding: 0.4rem 0.8rem; text-align: left; }
    td { min-width: 9rem; height: 1.8rem; padding: 0 0.4rem; font-size: 0.8rem; border-left: 1px solid #2a2a3a; }
    tr:nth-child(odd) td { background: rgba(255,255,255,0.02); }
    .event { background: var(--card); border-radius: 4px; padding: 0.1rem 0.4rem; display: inline-block; }
    .event.signal { outline: 1px solid var(--accent); }
    .event .sig { color: var(--accent); font-size: 0.7rem; margin-left: 0.3rem; }
    .title { color: var(--muted); font-style: italic; }
    .bar { border-left: 3px solid var(--accent); height: 100%; }
    .rownum { color: var(--muted); font-size: 0.7rem; min-width: 2rem; }
  </style>
</head>
<body>
  <h1>Callboard</h1>
  <table id="grid"><thead></thead><tbody></tbody></table>
  <script>
    async function load() {
      const res = await fetch('/api/timeline');
      const timeline = await res.json();
      const head = document.querySelector('#grid thead');
      const body = document.querySelector('#grid tbody');

      const header = document.createElement('tr');
      header.innerHTML = '<th></th>' +
        timeline.tracks.map(t => `<th>${t.name || t.id}</th>`).join('');
      head.appendChild(header);

      const rows = Math.max(...timeline.tracks.map(t => t.cells.length), 0);
      for (let r = 0; r < rows; r++) {
        const tr = document.createElement('tr');
        let html = `<td class="rownum">${r}</td>`;
        for (const track of timeline.tracks) {
          const cell = track.cells[r];
          html += `<td>${render(cell, timeline.blocks)}</td>`;
        }
        tr.innerHTML = html;
        body.appendChild(tr);
      }
    }

    function render(cell, blocks) {
      if (!cell || cell.type === 'gap') return '';
      const name = id => (blocks[id] && blocks[id].name) || id;
      if (cell.type === 'chain' || cell.type === 'continuation') {
        return '<div class="bar"></div>';
      }
      if (cell.is_title) {
        return `<span class="title">${name(cell.block_id)}</span>`;
      }
      const sig = cell.is_signal ? '<span class="sig">&#9654;</span>' : '';
      return `<span class="event${cell.is_signal ? ' signal' : ''}">${name(cell.block_id)} &middot; ${cell.event}${sig}</span>`;
    }

    load();
  </script>
</body>
</html>
"##;
