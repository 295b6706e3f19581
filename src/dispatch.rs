use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

use crate::chat::{Message, build_conversation};
use crate::config::{Config, Credential};
use crate::error::ChatError;
use crate::providers;

pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a>>;

/// The single point of external I/O. Implemented for real by
/// [`OpenAiBackend`]; tests substitute stubs.
pub trait CompletionBackend {
    fn complete<'a>(
        &'a self,
        client: &'a Client,
        cfg: &'a Config,
        credential: &'a Credential,
        messages: &'a [Message],
    ) -> CompletionFuture<'a>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiBackend;

impl CompletionBackend for OpenAiBackend {
    fn complete<'a>(
        &'a self,
        client: &'a Client,
        cfg: &'a Config,
        credential: &'a Credential,
        messages: &'a [Message],
    ) -> CompletionFuture<'a> {
        Box::pin(async move { providers::openai::chat(client, cfg, credential, messages).await })
    }
}

/// Sends one prompt at a time to the completion backend. Owns the resolved
/// credential so no ambient environment state is consulted per call.
pub struct Dispatcher<'a, B = OpenAiBackend> {
    client: &'a Client,
    cfg: &'a Config,
    credential: Credential,
    backend: B,
}

impl<'a> Dispatcher<'a, OpenAiBackend> {
    pub fn new(client: &'a Client, cfg: &'a Config, credential: Credential) -> Self {
        Self {
            client,
            cfg,
            credential,
            backend: OpenAiBackend,
        }
    }
}

impl<'a, B> Dispatcher<'a, B> {
    pub fn with_backend(
        client: &'a Client,
        cfg: &'a Config,
        credential: Credential,
        backend: B,
    ) -> Self {
        Self {
            client,
            cfg,
            credential,
            backend,
        }
    }
}

impl<'a, B> Dispatcher<'a, B>
where
    B: CompletionBackend,
{
    /// Builds the conversation, performs the remote call, and returns the
    /// reply trimmed of surrounding whitespace. Every backend failure comes
    /// back as [`ChatError::Upstream`]; no fallback reply is synthesized.
    pub async fn dispatch(
        &self,
        prompt: &str,
        system_message: Option<&str>,
    ) -> Result<String, ChatError> {
        let messages = build_conversation(prompt, system_message);
        debug!(
            model = %self.cfg.model,
            message_count = messages.len(),
            "dispatching chat completion"
        );

        let content = self
            .backend
            .complete(self.client, self.cfg, &self.credential, &messages)
            .await
            .map_err(ChatError::Upstream)?;
        Ok(content.trim().to_string())
    }
}
