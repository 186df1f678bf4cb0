// Error rendering tests - every failure a question can end with becomes one
// readable message at the outer boundary.

use deskmd_core::agent::{Decision, DecisionError, Session, root_cause_message};
use deskmd_core::config::OracleConfig;
use deskmd_core::model::{ModelError, OpenAiCompatibleClient};
use deskmd_core::tooling::{ToolArguments, ToolInvokeError, ToolProvider, ToolResult};
use deskmd_core::types::ToolDescriptor;
use deskmd_core::{Agent, AgentError, AgentOptions};

struct NoTools;

#[async_trait::async_trait]
impl ToolProvider for NoTools {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolInvokeError> {
        Ok(Vec::new())
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: ToolArguments,
    ) -> Result<ToolResult, ToolInvokeError> {
        Err(ToolInvokeError::ToolFailed {
            tool: name.to_string(),
            message: "no tools here".into(),
        })
    }
}

#[tokio::test]
async fn missing_credential_fails_before_any_tool_runs() {
    let config = OracleConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".into(),
        ..OracleConfig::default()
    };
    let client = OpenAiCompatibleClient::from_config(&config).expect("client builds");
    let session = Session::start(NoTools).await.expect("session");

    let err = Agent::new(client, AgentOptions::default())
        .run(&session, "anything")
        .await
        .expect_err("no credential");

    assert!(matches!(
        err,
        AgentError::Oracle(ModelError::MissingApiKey { .. })
    ));
    assert!(!err.user_message().is_empty());
}

#[test]
fn decision_failures_render_as_single_lines() {
    let cases = [
        "not json at all",
        "[1, 2]",
        r#"{"action":"shrug"}"#,
        r#"{"action":"final","answer":""}"#,
    ];
    for raw in cases {
        let err: AgentError = Decision::parse(raw).expect_err(raw).into();
        let message = err.user_message();
        assert!(!message.is_empty(), "{raw}");
        assert!(!message.contains('\n'), "{raw}: {message}");
    }
}

#[test]
fn decision_errors_keep_their_kind() {
    assert!(matches!(
        Decision::parse("{"),
        Err(DecisionError::MalformedJson { .. })
    ));
    assert!(matches!(
        Decision::parse("\"final\""),
        Err(DecisionError::NonObject { .. })
    ));
    assert!(matches!(
        Decision::parse(r#"{"action":"CALL_TOOL"}"#),
        Err(DecisionError::InvalidTag { .. })
    ));
    assert!(matches!(
        Decision::parse(r#"{"action":"final"}"#),
        Err(DecisionError::EmptyFinalAnswer)
    ));
}

#[test]
fn step_limit_names_the_bound() {
    let message = AgentError::StepLimitExceeded(6).user_message();
    assert!(message.contains('6'));
}

#[test]
fn root_cause_reaches_the_innermost_error() {
    let err = AgentError::ToolInvocation {
        tool: "read_md_file".into(),
        source: ToolInvokeError::ToolFailed {
            tool: "read_md_file".into(),
            message: "file not found: notes.md".into(),
        },
    };
    assert_eq!(
        root_cause_message(&err),
        "tool 'read_md_file' failed: file not found: notes.md"
    );
    assert!(err.user_message().contains("file not found: notes.md"));
}
