//! Demo web server: a chat page driving one orchestrator session per tab.
//!
//! Run with: cargo run -p web-server-demo
//!
//! Then open http://localhost:3000 in your browser. Point it at a model
//! service with `MODEL_SERVICE_URL` (default `http://localhost:8001`).

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, response::Html, routing::get};
use toolstack_client::HttpRemoteClient;
use toolstack_core::ServiceConfig;
use toolstack_session::SessionHost;
use toolstack_transport::websocket::create_ws_router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServiceConfig::from_env().context("loading model service configuration")?;
    let client = HttpRemoteClient::new(&config).context("building model service client")?;
    tracing::info!(url = %config.base_url, "using model service");

    let host = Arc::new(SessionHost::new(Arc::new(client), config));

    let app = Router::new()
        .route("/", get(index_handler))
        .merge(create_ws_router(host))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Toolstack - Agent Chat</title>
    <style>
        body { margin: 0; padding: 20px; background: #1e1e1e; color: #d4d4d4; font-family: system-ui, sans-serif; display: flex; gap: 20px; }
        #sidebar { width: 320px; }
        #chat { flex: 1; }
        #log { height: calc(100vh - 140px); overflow-y: auto; border: 1px solid #333; padding: 10px; }
        .user { color: #8ab4f8; }
        .assistant { color: #d4d4d4; }
        .status { font-size: 14px; margin-bottom: 10px; }
        .connected { color: #4a4; }
        .disconnected { color: #a44; }
        input, textarea { width: 100%; box-sizing: border-box; margin-bottom: 6px; background: #2a2a2a; color: #d4d4d4; border: 1px solid #444; }
        ul { padding-left: 18px; }
    </style>
</head>
<body>
    <div id="sidebar">
        <div class="status" id="status">Connecting...</div>
        <h3>Available Tools</h3>
        <ul id="tools"></ul>
        <h3>Custom Tool</h3>
        <input id="tool-name" placeholder="Tool name" />
        <textarea id="tool-description" placeholder="Description"></textarea>
        <textarea id="tool-source" placeholder="Source" rows="5"></textarea>
        <button onclick="registerTool()">Register Tool</button>
        <h3>Plugin Server</h3>
        <input id="plugin-name" placeholder="Server name" />
        <input id="plugin-endpoint" placeholder="http://localhost:8000/sse" />
        <input id="plugin-token" type="password" placeholder="Auth token (optional)" />
        <textarea id="plugin-description" placeholder="Description (optional)"></textarea>
        <button onclick="registerPlugin()">Register</button>
        <button onclick="unregisterPlugin()">Unregister</button>
        <div id="notice"></div>
    </div>
    <div id="chat">
        <div id="log"></div>
        <input id="prompt" placeholder="Ask me anything..." />
    </div>

    <script>
        const status = document.getElementById('status');
        const log = document.getElementById('log');
        const notice = document.getElementById('notice');
        const value = (id) => document.getElementById(id).value;
        let ws;

        function send(msg) {
            if (ws && ws.readyState === WebSocket.OPEN) {
                ws.send(JSON.stringify(msg));
            }
        }

        function refresh() {
            send({ type: 'status' });
            send({ type: 'list_tools' });
        }

        function append(role, text) {
            const div = document.createElement('div');
            div.className = role;
            div.textContent = `${role}: ${text}`;
            log.appendChild(div);
            log.scrollTop = log.scrollHeight;
        }

        function registerTool() {
            send({ type: 'register_tool', name: value('tool-name'), description: value('tool-description'), source: value('tool-source') });
        }

        function registerPlugin() {
            send({ type: 'register_plugin', name: value('plugin-name'), endpoint_url: value('plugin-endpoint'), description: value('plugin-description'), auth_token: value('plugin-token') });
        }

        function unregisterPlugin() {
            send({ type: 'unregister_plugin', name: value('plugin-name') });
        }

        function connect() {
            const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
            ws = new WebSocket(`${protocol}//${window.location.host}/ws`);

            ws.onopen = () => send({ type: 'connect' });

            ws.onclose = () => {
                status.textContent = 'Disconnected - reconnecting...';
                status.className = 'status disconnected';
                setTimeout(connect, 2000);
            };

            ws.onmessage = (event) => {
                const msg = JSON.parse(event.data);
                if (msg.type === 'outcome') {
                    notice.textContent = msg.message;
                    refresh();
                } else if (msg.type === 'status') {
                    status.textContent = msg.connected ? `Connected (${msg.model_id})` : 'Not connected';
                    status.className = msg.connected ? 'status connected' : 'status disconnected';
                } else if (msg.type === 'tools') {
                    const list = document.getElementById('tools');
                    list.innerHTML = '';
                    for (const name of msg.names) {
                        const li = document.createElement('li');
                        li.textContent = name;
                        list.appendChild(li);
                    }
                } else if (msg.type === 'reply') {
                    append('assistant', msg.content);
                    refresh();
                } else if (msg.type === 'error') {
                    notice.textContent = msg.message;
                }
            };
        }

        document.getElementById('prompt').addEventListener('keydown', (e) => {
            if (e.key === 'Enter' && e.target.value) {
                append('user', e.target.value);
                send({ type: 'chat', message: e.target.value });
                e.target.value = '';
            }
        });

        connect();
    </script>
</body>
</html>
"#;
