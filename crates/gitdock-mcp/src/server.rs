//! Line-delimited JSON-RPC server over stdio.
//!
//! Requests are handled strictly one at a time to completion: a request is
//! never interleaved with another's handler body, which keeps the shared
//! workspace configuration consistent for the duration of one operation.

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use gitdock_core::ToolResult;

use crate::dispatch::Dispatcher;
use crate::protocol::{
    INVALID_PARAMS, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR,
    PROTOCOL_VERSION,
};
use crate::registry;

/// Name reported in the `initialize` handshake.
pub const SERVER_NAME: &str = "gitdock";

/// The stdio MCP server.
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a server over the given dispatcher.
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Serve requests from process stdin, writing responses to process
    /// stdout, until EOF.
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader` until EOF, writing one encoded response
    /// line per request to `writer`. Nothing but protocol messages is ever
    /// written.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                debug!("stdin closed, shutting down");
                return Ok(());
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(trimmed).await {
                let encoded = serde_json::to_string(&response).map_err(std::io::Error::other)?;
                writer.write_all(encoded.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
    }

    /// Decode and handle one request line. Returns `None` for notifications,
    /// which never get a response.
    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Discarding undecodable request line");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let Some(id) = request.id else {
            debug!(method = %request.method, "Received notification");
            return None;
        };

        match request.method.as_str() {
            "initialize" => Some(JsonRpcResponse::result(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "capabilities": {
                        "tools": {}
                    },
                }),
            )),
            "tools/list" => {
                let tools: Vec<Value> = registry::TOOLS.iter().map(registry::ToolSpec::describe).collect();
                Some(JsonRpcResponse::result(id, json!({ "tools": tools })))
            }
            "tools/call" => Some(self.handle_tool_call(id, request.params).await),
            other => Some(JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params = params.unwrap_or(Value::Null);
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing tool name");
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let result = self.dispatcher.dispatch(name, &arguments).await;
        JsonRpcResponse::result(id, encode_tool_result(&result))
    }
}

/// MCP content envelope for a tool result: a single text item plus the
/// `isError` flag.
fn encode_tool_result(result: &ToolResult) -> Value {
    json!({
        "content": [{ "type": "text", "text": result.text() }],
        "isError": result.is_error(),
    })
}
