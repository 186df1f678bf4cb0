use crate::PROTOCOL_VERSION;
use crate::protocol::{RpcRequest, RpcResponse};
use crate::tools::{MdDirectory, ToolError};
use serde_json::{Map, Value, json};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Stdio MCP server for one [`MdDirectory`].
pub struct McpServer {
    desk: MdDirectory,
}

impl McpServer {
    pub fn new(desk: MdDirectory) -> Self {
        Self { desk }
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Read newline-delimited requests from `reader` and write one response
    /// line per request to `writer`. Notifications get no response.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(dir = %self.desk.root().display(), "Tool server listening on stdio");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(&line) else {
                continue;
            };
            let mut encoded = serde_json::to_string(&response)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            encoded.push('\n');
            writer.write_all(encoded.as_bytes()).await?;
            writer.flush().await?;
        }
        info!("Stdin closed, tool server exiting");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "Unparseable request line");
                return Some(RpcResponse::parse_error(format!("Parse error: {err}")));
            }
        };
        let id = value.get("id").cloned();
        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(err) => return Some(RpcResponse::invalid_request(id, err.to_string())),
        };
        if request.jsonrpc != "2.0" || request.method.is_empty() {
            return Some(RpcResponse::invalid_request(
                request.id,
                "Expected a JSON-RPC 2.0 request with a method",
            ));
        }
        if request.is_notification() {
            debug!(method = request.method.as_str(), "Notification received");
            return None;
        }
        Some(self.dispatch(request))
    }

    fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest {
            method, params, id, ..
        } = request;
        debug!(method = method.as_str(), "Request received");
        match method.as_str() {
            "initialize" => RpcResponse::success(id, self.initialize_result(params.as_ref())),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => RpcResponse::success(id, json!({ "tools": self.desk.definitions() })),
            "tools/call" => self.call_tool(id, params),
            other => RpcResponse::method_not_found(id, other),
        }
    }

    fn initialize_result(&self, params: Option<&Value>) -> Value {
        let version = params
            .and_then(|params| params.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);
        json!({
            "protocolVersion": version,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "instructions": format!(
                "Read-only access to the .md files in {}.",
                self.desk.root().display()
            ),
        })
    }

    fn call_tool(&self, id: Option<Value>, params: Option<Value>) -> RpcResponse {
        let Some(Value::Object(mut params)) = params else {
            return RpcResponse::invalid_params(id, "tools/call expects an object of params");
        };
        let Some(name) = params
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return RpcResponse::invalid_params(id, "tools/call requires a string 'name'");
        };
        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return RpcResponse::invalid_params(id, "'arguments' must be an object");
            }
        };

        match self.desk.call(&name, arguments) {
            Ok(text) => {
                info!(tool = name.as_str(), length = text.chars().count(), "Tool succeeded");
                RpcResponse::success(id, tool_content(text, false))
            }
            Err(ToolError::UnknownTool(tool)) => {
                RpcResponse::invalid_params(id, format!("Unknown tool: {tool}"))
            }
            Err(err) => {
                warn!(tool = name.as_str(), error = %err, "Tool failed");
                RpcResponse::success(id, tool_content(err.to_string(), true))
            }
        }
    }
}

fn tool_content(text: String, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "isError": is_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
    use std::fs;
    use tempfile::TempDir;

    fn server() -> (TempDir, McpServer) {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("todo.md"), "- buy milk").expect("write");
        fs::write(dir.path().join("ideas.md"), "rust").expect("write");
        let server = McpServer::new(MdDirectory::new(dir.path()));
        (dir, server)
    }

    fn respond(server: &McpServer, line: &str) -> Value {
        let response = server.handle_line(line).expect("response expected");
        serde_json::to_value(response).expect("serializes")
    }

    #[test]
    fn initialize_echoes_protocol_version() {
        let (_dir, server) = server();
        let response = respond(
            &server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{}}}"#,
        );
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "deskmd-server");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[test]
    fn notifications_are_silent() {
        let (_dir, server) = server();
        assert!(
            server
                .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .is_none()
        );
    }

    #[test]
    fn null_ids_still_get_answers() {
        let (_dir, server) = server();
        let response = respond(&server, r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#);
        assert!(response["id"].is_null());
        assert_eq!(response["result"], json!({}));
    }

    #[test]
    fn protocol_errors_use_standard_codes() {
        let (_dir, server) = server();
        assert_eq!(respond(&server, "{not json")["error"]["code"], PARSE_ERROR);
        assert_eq!(
            respond(&server, r#"{"jsonrpc":"1.0","id":2,"method":"ping"}"#)["error"]["code"],
            INVALID_REQUEST
        );
        assert_eq!(
            respond(&server, r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)["error"]
                ["code"],
            METHOD_NOT_FOUND
        );
        assert_eq!(
            respond(
                &server,
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"rm_rf"}}"#
            )["error"]["code"],
            INVALID_PARAMS
        );
    }

    #[test]
    fn ping_and_tools_list() {
        let (_dir, server) = server();
        assert_eq!(
            respond(&server, r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#)["result"],
            json!({})
        );
        let list = respond(&server, r#"{"jsonrpc":"2.0","id":5,"method":"tools/list"}"#);
        assert_eq!(list["result"]["tools"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn tool_calls_return_text_content() {
        let (_dir, server) = server();
        let count = respond(
            &server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"count_md_files","arguments":{}}}"#,
        );
        assert_eq!(count["result"]["isError"], false);
        assert_eq!(count["result"]["content"][0]["text"], "2");

        let read = respond(
            &server,
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"read_md_file","arguments":{"filename":"todo.md"}}}"#,
        );
        assert_eq!(read["result"]["content"][0]["text"], "- buy milk");
    }

    #[test]
    fn tool_failures_are_flagged_results() {
        let (_dir, server) = server();
        let response = respond(
            &server,
            r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"read_md_file","arguments":{"filename":"../../etc/passwd"}}}"#,
        );
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"]
            .as_str()
            .expect("text");
        assert!(text.contains("only .md files"));
    }

    #[tokio::test]
    async fn serve_writes_one_line_per_request() {
        let (_dir, server) = server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server
            .serve(input.as_bytes(), &mut output)
            .await
            .expect("serve");

        let text = String::from_utf8(output).expect("utf8");
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
    }
}
