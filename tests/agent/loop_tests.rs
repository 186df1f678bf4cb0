// Agent loop tests - the decision loop driving the real Markdown tools
// in-process, with a scripted oracle.

use async_trait::async_trait;
use deskmd_core::agent::{DecisionError, Session};
use deskmd_core::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use deskmd_core::tooling::{ToolArguments, ToolInvokeError, ToolProvider, ToolResult};
use deskmd_core::types::ToolDescriptor;
use deskmd_core::{Agent, AgentError, AgentOptions};
use deskmd_server::{MdDirectory, ToolError};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Serves an [`MdDirectory`] through the client's tool seam without a child
/// process.
struct InProcessDesk {
    desk: MdDirectory,
}

#[async_trait]
impl ToolProvider for InProcessDesk {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolInvokeError> {
        Ok(self
            .desk
            .definitions()
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: ToolArguments,
    ) -> Result<ToolResult, ToolInvokeError> {
        match self.desk.call(name, arguments) {
            Ok(text) => Ok(ToolResult::text_result(text)),
            Err(ToolError::UnknownTool(tool)) => Err(ToolInvokeError::Rpc {
                server: "in-process".into(),
                code: -32602,
                message: format!("Unknown tool: {tool}"),
            }),
            Err(err) => Err(ToolInvokeError::ToolFailed {
                tool: name.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

#[derive(Clone, Default)]
struct ScriptedOracle {
    replies: Arc<Mutex<VecDeque<String>>>,
    seen: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedOracle {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                replies.iter().map(|reply| reply.to_string()).collect(),
            )),
            seen: Arc::default(),
        }
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedOracle {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.seen.lock().expect("lock").push(request);
        let reply = self
            .replies
            .lock()
            .expect("lock")
            .pop_front()
            .expect("scripted reply available");
        Ok(ModelResponse::new(reply))
    }
}

fn notes() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("groceries.md"), "- eggs\n- bread").expect("write");
    fs::write(dir.path().join("plan.md"), "Ship the release on Friday.").expect("write");
    fs::write(dir.path().join("photo.png"), "binary").expect("write");
    dir
}

async fn session(dir: &Path) -> Session<InProcessDesk> {
    Session::start(InProcessDesk {
        desk: MdDirectory::new(dir),
    })
    .await
    .expect("session starts")
}

#[tokio::test]
async fn counts_then_answers() {
    let dir = notes();
    let session = session(dir.path()).await;
    let oracle = ScriptedOracle::new(&[
        r#"{"action":"call_tool","tool":"count_md_files","arguments":{}}"#,
        r#"{"action":"final","answer":"There are 2 Markdown files."}"#,
    ]);

    let outcome = Agent::new(oracle.clone(), AgentOptions::default())
        .run(&session, "How many .md files are there?")
        .await
        .expect("agent succeeds");

    assert_eq!(outcome.answer, "There are 2 Markdown files.");
    assert_eq!(outcome.transcript.entries()[0].result, "2");
    let second = &oracle.requests()[1];
    assert!(second.messages[1].content.contains("Tool call: count_md_files"));
    assert!(second.messages[1].content.contains("Tool result:\n2"));
}

#[tokio::test]
async fn lists_reads_then_answers() {
    let dir = notes();
    let session = session(dir.path()).await;
    let oracle = ScriptedOracle::new(&[
        r#"{"action":"call_tool","tool":"list_md_files","arguments":{}}"#,
        r#"{"action":"call_tool","tool":"read_md_file","arguments":{"filename":"plan.md"}}"#,
        r#"{"action":"final","answer":"Friday."}"#,
    ]);

    let outcome = Agent::new(oracle.clone(), AgentOptions::default())
        .run(&session, "When do we ship?")
        .await
        .expect("agent succeeds");

    assert_eq!(outcome.answer, "Friday.");
    assert_eq!(outcome.rounds, 3);
    let entries = outcome.transcript.entries();
    assert!(entries[0].result.ends_with("- groceries.md\n- plan.md"));
    assert_eq!(entries[1].result, "Ship the release on Friday.");
}

#[tokio::test]
async fn the_catalogue_reaches_the_oracle() {
    let dir = notes();
    let session = session(dir.path()).await;
    let oracle = ScriptedOracle::new(&[r#"{"action":"final","answer":"hi"}"#]);

    Agent::new(oracle.clone(), AgentOptions::default())
        .run(&session, "hello")
        .await
        .expect("agent succeeds");

    let system = &oracle.requests()[0].messages[0].content;
    for tool in ["count_md_files", "list_md_files", "read_md_file"] {
        assert!(system.contains(&format!("- {tool}: ")), "{tool} missing");
    }
}

#[tokio::test]
async fn traversal_attempts_never_read_outside_files() {
    let outer = TempDir::new().expect("tempdir");
    fs::write(outer.path().join("secret.md"), "TOP SECRET").expect("write");
    let inner = outer.path().join("desk");
    fs::create_dir(&inner).expect("dir");
    let session = session(&inner).await;

    for filename in ["../secret.md", "../../secret.md", "/tmp/../secret.md"] {
        let reply = format!(
            r#"{{"action":"call_tool","tool":"read_md_file","arguments":{{"filename":"{filename}"}}}}"#
        );
        let oracle = ScriptedOracle::new(&[reply.as_str()]);

        let err = Agent::new(oracle, AgentOptions::default())
            .run(&session, "read the secret")
            .await
            .expect_err("read must fail");

        assert!(matches!(err, AgentError::ToolInvocation { .. }));
        assert!(!err.user_message().contains("TOP SECRET"));
    }
}

#[tokio::test]
async fn step_limit_with_real_tools() {
    let dir = notes();
    let session = session(dir.path()).await;
    let call = r#"{"action":"call_tool","tool":"count_md_files","arguments":{}}"#;
    let oracle = ScriptedOracle::new(&[call, call, call]);

    let err = Agent::new(oracle.clone(), AgentOptions::default().with_max_steps(3))
        .run(&session, "count forever")
        .await
        .expect_err("step limit");

    assert!(matches!(err, AgentError::StepLimitExceeded(3)));
    assert_eq!(oracle.requests().len(), 3);
}

#[tokio::test]
async fn fenced_output_is_not_accepted() {
    let dir = notes();
    let session = session(dir.path()).await;
    let oracle = ScriptedOracle::new(&["```json\n{\"action\":\"final\",\"answer\":\"x\"}\n```"]);

    let err = Agent::new(oracle, AgentOptions::default())
        .run(&session, "q")
        .await
        .expect_err("strict json");

    assert!(matches!(
        err,
        AgentError::Decision(DecisionError::MalformedJson { .. })
    ));
}

#[tokio::test]
async fn bad_arguments_are_tool_failures() {
    let dir = notes();
    let session = session(dir.path()).await;
    let oracle = ScriptedOracle::new(&[
        r#"{"action":"call_tool","tool":"read_md_file","arguments":{"path":"plan.md"}}"#,
    ]);

    let err = Agent::new(oracle, AgentOptions::default())
        .run(&session, "read the plan")
        .await
        .expect_err("invalid arguments");

    match err {
        AgentError::ToolInvocation { tool, source } => {
            assert_eq!(tool, "read_md_file");
            assert!(source.user_message().contains("invalid arguments"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
