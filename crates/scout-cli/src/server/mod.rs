//! Stdio tool server
//!
//! Speaks newline-delimited JSON-RPC 2.0: one request per input line, one
//! response per output line. Responses are funnelled through a single writer
//! task, so tool calls can run as independent tasks and answer out of order.
//! The server stops reading at end of input and exits once every in-flight
//! call has been answered.

use std::io;
use std::sync::Arc;

use scout_core::types::{SearchOptions, SortBy, DEFAULT_LIMIT};
use scout_search::SearchExecutor;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Name of the single tool this server exposes
pub const TOOL_NAME: &str = "search_npm_packages";

const SERVER_NAME: &str = "scout";
const PROTOCOL_VERSION: &str = "2024-11-05";

// JSON-RPC error codes
const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct Request {
    /// Absent for notifications
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// Arguments of a `search_npm_packages` call
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArguments {
    // A missing query is reported by validation, not as malformed params
    #[serde(default)]
    query: String,
    limit: Option<u32>,
    offset: Option<u32>,
    sort_by: Option<SortBy>,
}

impl SearchArguments {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
            sort_by: self.sort_by,
        }
    }
}

/// Tool definition advertised by `tools/list`
pub fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Search for npm packages",
        "inputSchema": {
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 100,
                    "description": "Maximum number of results (1-100, default 20)"
                },
                "offset": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Number of results to skip"
                },
                "sortBy": {
                    "type": "string",
                    "enum": ["relevance", "popularity", "quality", "maintenance"],
                    "description": "Requested ordering"
                }
            },
            "required": ["query"]
        }
    })
}

fn response_ok(id: Value, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
    .to_string()
}

fn response_error(id: Value, code: i64, message: impl Into<String>) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        },
    })
    .to_string()
}

/// JSON-RPC front end for a [`SearchExecutor`]
pub struct ToolServer {
    executor: Arc<SearchExecutor>,
}

impl ToolServer {
    pub fn new(executor: SearchExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Serve on the process's stdin and stdout
    pub async fn run_stdio(self) -> io::Result<()> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        self.run(tokio::io::BufReader::new(stdin), tokio::io::BufWriter::new(stdout))
            .await
    }

    /// Serve until `reader` reaches end of input
    pub async fn run<R, W>(self, mut reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(line) = out_rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), io::Error>(())
        });

        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                break; // EOF
            }
            if line.trim().is_empty() {
                continue;
            }

            self.handle_line(&line, &out_tx);
        }

        // Spawned calls hold their own senders; the writer drains until the last one finishes
        drop(out_tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }

    fn handle_line(&self, line: &str, out_tx: &mpsc::UnboundedSender<String>) {
        let send = |message: String| {
            if out_tx.send(message).is_err() {
                error!("Tool server output closed");
            }
        };

        let parsed: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(err) => {
                warn!("Discarding unparseable message: {}", err);
                send(response_error(Value::Null, PARSE_ERROR, format!("Parse error: {}", err)));
                return;
            }
        };

        let request: Request = match serde_json::from_value(parsed) {
            Ok(request) => request,
            Err(err) => {
                send(response_error(Value::Null, INVALID_REQUEST, format!("Invalid request: {}", err)));
                return;
            }
        };

        let Some(id) = request.id else {
            debug!("Received notification: {}", request.method);
            return;
        };

        debug!("Received request {}: {}", id, request.method);

        match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(PROTOCOL_VERSION)
                    .to_string();
                info!("Client initialized session (protocol {})", protocol_version);
                send(response_ok(
                    id,
                    json!({
                        "protocolVersion": protocol_version,
                        "capabilities": { "tools": {} },
                        "serverInfo": {
                            "name": SERVER_NAME,
                            "version": env!("CARGO_PKG_VERSION"),
                        },
                    }),
                ));
            }
            "ping" => send(response_ok(id, json!({}))),
            "tools/list" => send(response_ok(id, json!({ "tools": [tool_definition()] }))),
            "tools/call" => self.call_tool(id, request.params, out_tx),
            other => {
                warn!("Unknown method: {}", other);
                send(response_error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)));
            }
        }
    }

    fn call_tool(&self, id: Value, params: Value, out_tx: &mpsc::UnboundedSender<String>) {
        let call: CallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(err) => {
                let _ = out_tx.send(response_error(id, INVALID_PARAMS, format!("Invalid params: {}", err)));
                return;
            }
        };

        if call.name != TOOL_NAME {
            let _ = out_tx.send(response_error(id, INVALID_PARAMS, format!("Unknown tool: {}", call.name)));
            return;
        }

        let arguments: SearchArguments = match call.arguments {
            Some(arguments) => match serde_json::from_value(arguments) {
                Ok(arguments) => arguments,
                Err(err) => {
                    let _ = out_tx.send(response_error(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid arguments: {}", err),
                    ));
                    return;
                }
            },
            None => SearchArguments::default(),
        };

        let executor = Arc::clone(&self.executor);
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            let output = executor.execute(&arguments.query, &arguments.options()).await;
            let message = match serde_json::to_value(&output) {
                Ok(result) => response_ok(id, result),
                Err(err) => response_error(id, INTERNAL_ERROR, format!("Failed to encode result: {}", err)),
            };
            let _ = out_tx.send(message);
        });
    }
}
