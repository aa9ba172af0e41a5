//! Integration tests for BA Genie.
//!
//! These drive the full pipeline through the public API with the offline model
//! client and a few scripted clients standing in for the remote endpoint.

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ba_genie::{
    AppConfig, Backend, Container, ConversationSession, DomainError, ExportFormat, Intent,
    MockModelClient, ModelClient, ModelEnvelope, ReplyOutcome, ResponseNormalizer, Role,
    TaskLabel,
};

/// Counts calls and replays a raw JSON body as the endpoint would return it.
struct RawJsonClient {
    body: &'static str,
    calls: AtomicUsize,
}

impl RawJsonClient {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for RawJsonClient {
    async fn invoke(&self, _prompt: &str) -> Result<ModelEnvelope, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        serde_json::from_str(self.body).map_err(|e| DomainError::malformed(e.to_string()))
    }

    fn service_name(&self) -> &str {
        "Raw"
    }
}

fn mock_config() -> AppConfig {
    AppConfig {
        backend: Backend::Mock,
        ..AppConfig::default()
    }
}

fn container_with(client: Arc<dyn ModelClient>) -> Container {
    Container::with_client(client, mock_config())
}

#[tokio::test]
async fn user_story_request_end_to_end() {
    let container = Container::new(mock_config()).expect("mock container");
    let chat = container.chat_use_case();
    let mut session = ConversationSession::new();

    let reply = chat
        .execute(&mut session, "Generate a user story for login", None)
        .await;

    assert_eq!(reply.outcome(), ReplyOutcome::Generated);
    assert_eq!(reply.intent(), Some(Intent::UserStory));
    assert!(reply
        .content()
        .starts_with("Generate a detailed user story with the following format:"));
    assert!(reply.content().contains("E-commerce Website Login Page"));
    assert_eq!(
        reply
            .content()
            .lines()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()) && l.contains(". "))
            .count(),
        8
    );
    assert_eq!(reply.content(), reply.content().trim());

    let turns = session.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), Role::User);
    assert_eq!(turns[1].role(), Role::Assistant);
    assert_eq!(turns[1].content(), reply.content());
}

#[tokio::test]
async fn every_task_label_prefixes_the_prompt() {
    let container = container_with(Arc::new(MockModelClient::new()));
    let chat = container.chat_use_case();

    for label in TaskLabel::ALL {
        let mut session = ConversationSession::new();
        let text = "The quick brown fox jumps over the lazy dog";
        let reply = chat.execute(&mut session, text, Some(label)).await;
        assert_eq!(reply.content(), format!("{}: {}", label, text));
        assert_eq!(reply.intent(), None);
    }
}

#[tokio::test]
async fn short_input_short_circuits() {
    let client = Arc::new(RawJsonClient::new(r#"{"results":[{"outputText":"x"}]}"#));
    let container = container_with(client.clone());
    let mut session = ConversationSession::new();

    let reply = container
        .chat_use_case()
        .execute(&mut session, "login", None)
        .await;

    assert_eq!(reply.outcome(), ReplyOutcome::Rejected);
    assert_eq!(
        reply.content(),
        "Please provide a more detailed requirement, such as a user story or email template request."
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn reply_text_is_trimmed() {
    let client = Arc::new(RawJsonClient::new(r#"{"results":[{"outputText":"  hi  "}]}"#));
    let container = container_with(client.clone());
    let mut session = ConversationSession::new();

    let reply = container
        .chat_use_case()
        .execute(&mut session, "say hi to the whole team", None)
        .await;

    assert_eq!(reply.content(), "hi");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn empty_and_missing_results_use_the_task_fallback() {
    for body in [r#"{"results":[]}"#, r#"{"inputTextTokenCount":3}"#] {
        let container = container_with(Arc::new(RawJsonClient::new(body)));
        let mut session = ConversationSession::new();

        let reply = container
            .chat_use_case()
            .execute(
                &mut session,
                "Draft an email announcing the new release",
                Some(TaskLabel::GenerateEmail),
            )
            .await;

        assert_eq!(reply.outcome(), ReplyOutcome::Fallback);
        assert_eq!(
            Some(reply.content()),
            ResponseNormalizer::fallback_template(Some(TaskLabel::GenerateEmail), Intent::General)
        );
    }
}

#[tokio::test]
async fn history_prompts_are_stable_across_calls() {
    let config = AppConfig {
        include_history: true,
        ..mock_config()
    };
    let container = Container::with_client(Arc::new(MockModelClient::new()), config);
    let chat = container.chat_use_case();

    let mut first = ConversationSession::new();
    let mut second = ConversationSession::new();
    for session in [&mut first, &mut second] {
        chat.execute(session, "what is a product backlog?", None).await;
        chat.execute(session, "and who owns it usually?", None).await;
    }

    assert_eq!(
        first.last_assistant().map(|t| t.content().as_bytes().to_vec()),
        second.last_assistant().map(|t| t.content().as_bytes().to_vec())
    );
    let last = first.last_assistant().unwrap().content();
    assert!(last.starts_with("User: what is a product backlog?\nAssistant: "));
    assert!(last.ends_with("User: and who owns it usually?\nBA Genie:"));
}

#[tokio::test]
async fn exports_last_response_as_text_and_docx() {
    let container = container_with(Arc::new(RawJsonClient::new(
        r#"{"results":[{"outputText":"Dear team,\nThe release ships Friday & on time."}]}"#,
    )));
    let mut session = ConversationSession::new();
    container
        .chat_use_case()
        .execute(&mut session, "write an email about the release", None)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let export = container.export_use_case();

    let text_path = dir.path().join("out").join("response.txt");
    let artifact = export
        .write_to(&session, ExportFormat::Text, &text_path)
        .await
        .expect("text export");
    assert_eq!(artifact.mime_type(), "text/plain");
    assert_eq!(
        std::fs::read_to_string(&text_path).unwrap(),
        "Dear team,\nThe release ships Friday & on time."
    );

    let docx_path = dir.path().join("response.docx");
    let artifact = export
        .write_to(&session, ExportFormat::Docx, &docx_path)
        .await
        .expect("docx export");
    assert_eq!(
        artifact.mime_type(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );

    let bytes = std::fs::read(&docx_path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .expect("document part")
        .read_to_string(&mut document)
        .unwrap();
    assert!(document.contains("Dear team,</w:t><w:br/>"));
    assert!(document.contains("Friday &amp; on time."));
}

#[tokio::test]
async fn export_without_response_is_not_found() {
    let container = container_with(Arc::new(MockModelClient::new()));
    let session = ConversationSession::new();
    let err = container
        .export_use_case()
        .execute(&session, ExportFormat::Text)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn foundation_backend_without_credentials_is_rejected_at_startup() {
    let config = AppConfig {
        backend: Backend::Foundation,
        access_key_id: None,
        secret_access_key: None,
        ..AppConfig::default()
    };
    assert!(Container::new(config).is_err());
}
