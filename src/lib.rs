pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatReply, ChatUseCase, DocumentWriter, ExportResponseUseCase, FallbackPolicy,
    InputValidator, IntentDetector, ModelClient, PromptFormatter, ReplyOutcome,
    ResponseNormalizer,
};

pub use cli::Commands;

pub use connector::{
    AppConfig, AwsCredentials, Backend, CompletionClient, Container, DocxWriter,
    FoundationModelClient, MockModelClient, PlainTextWriter, Router, SigV4Signer,
};

pub use domain::{
    ConversationSession, DomainError, ExportArtifact, ExportFormat, Intent, ModelEnvelope,
    ModelOutput, Role, TaskLabel, Turn,
};
