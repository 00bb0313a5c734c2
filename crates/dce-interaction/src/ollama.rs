//! OllamaChatClient - REST client for a local Ollama `/api/chat` endpoint.
//!
//! Configuration priority: CLI/env (`DCE_LLM_ENDPOINT`, `DCE_LLM_MODEL`) >
//! `~/.config/dce/config.toml` > defaults.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use dce_core::collaborator::{ChatChunk, ChatClient, ChatMessage, ChatStream};
use dce_core::config::LlmConfig;
use dce_core::error::{DceError, Result};

/// Chat client that talks to the Ollama HTTP API.
#[derive(Clone)]
pub struct OllamaChatClient {
    client: Client,
    endpoint: String,
    model: String,
    num_ctx: u32,
}

impl OllamaChatClient {
    /// Creates a client for `endpoint` (e.g. `http://localhost:11434`) and `model`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            num_ctx: dce_core::config::DEFAULT_NUM_CTX,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.endpoint, &config.model).with_num_ctx(config.num_ctx)
    }

    /// Sets the context window passed as `options.num_ctx`.
    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint)
    }

    fn request<'a>(&'a self, messages: &'a [ChatMessage], stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            stream,
            options: ChatOptions {
                num_ctx: self.num_ctx,
            },
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.chat_url())
            .json(body)
            .send()
            .await
            .map_err(|err| DceError::llm(format!("Ollama request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Ollama error body".to_string());
            return Err(DceError::llm(format!("Ollama returned {status}: {body_text}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatClient for OllamaChatClient {
    async fn get_response(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self.send(&self.request(messages, false)).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| DceError::llm(format!("Failed to read Ollama response: {err}")))?;
        let parsed = parse_response(&body)?;

        if let Some(error) = parsed.error {
            return Err(DceError::llm(error));
        }
        Ok(parsed.message.map(|m| m.content).unwrap_or_default())
    }

    async fn stream_response(&self, messages: &[ChatMessage]) -> Result<ChatStream> {
        let response = self.send(&self.request(messages, true)).await?;
        tracing::debug!("Streaming response from {} ({})", self.chat_url(), self.model);

        let state = StreamState {
            bytes: response
                .bytes_stream()
                .map(|chunk| chunk.map(|b| b.to_vec()))
                .boxed(),
            decoder: NdjsonDecoder::default(),
            pending: VecDeque::new(),
            finished: false,
        };

        Ok(stream::unfold(state, StreamState::next_item).boxed())
    }
}

// ============================================================================
// Streaming
// ============================================================================

struct StreamState {
    bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: NdjsonDecoder,
    pending: VecDeque<Result<ChatChunk>>,
    finished: bool,
}

impl StreamState {
    async fn next_item(mut self) -> Option<(Result<ChatChunk>, Self)> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some((item, self));
            }
            if self.finished {
                return None;
            }
            match self.bytes.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.decoder.push(&chunk)),
                Some(Err(err)) => {
                    self.pending
                        .push_back(Err(DceError::llm(format!("Ollama stream failed: {err}"))));
                    self.finished = true;
                }
                None => {
                    self.pending.extend(self.decoder.finish());
                    self.finished = true;
                }
            }
            if self.decoder.is_done() {
                self.finished = true;
            }
        }
    }
}

/// Incremental decoder for Ollama's newline-delimited JSON stream.
///
/// Raw bytes are buffered until a newline so that characters split across
/// network chunks decode intact. Lines that fail to decode are logged and
/// skipped. Nothing is emitted after the first `"done": true` line or error
/// line.
#[derive(Default)]
pub(crate) struct NdjsonDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl NdjsonDecoder {
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<Result<ChatChunk>> {
        self.buffer.extend_from_slice(bytes);
        let mut out = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=line_end).collect();
            self.decode_bytes(&line, &mut out);
        }
        out
    }

    /// Flushes a trailing unterminated line and reports a missing `done`.
    pub(crate) fn finish(&mut self) -> Vec<Result<ChatChunk>> {
        let mut out = Vec::new();
        let rest = std::mem::take(&mut self.buffer);
        self.decode_bytes(&rest, &mut out);
        if !self.done {
            self.done = true;
            out.push(Err(DceError::llm("Ollama stream ended before completion")));
        }
        out
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    fn decode_bytes(&mut self, line: &[u8], out: &mut Vec<Result<ChatChunk>>) {
        match std::str::from_utf8(line) {
            Ok(text) => self.decode_line(text.trim(), out),
            Err(err) => {
                if !self.done {
                    tracing::warn!("Skipping stream line with invalid UTF-8: {}", err);
                }
            }
        }
    }

    fn decode_line(&mut self, line: &str, out: &mut Vec<Result<ChatChunk>>) {
        if self.done || line.is_empty() {
            return;
        }
        let chunk: ChatResponse = match serde_json::from_str(line) {
            Ok(chunk) => chunk,
            Err(err) => {
                tracing::warn!("Skipping undecodable stream line: {} ({})", line, err);
                return;
            }
        };

        if let Some(error) = chunk.error {
            self.done = true;
            out.push(Err(DceError::llm(error)));
            return;
        }
        if let Some(message) = chunk.message {
            if !message.content.is_empty() {
                out.push(Ok(ChatChunk::Text(message.content)));
            }
        }
        if chunk.done {
            self.done = true;
            out.push(Ok(ChatChunk::Done));
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    num_ctx: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes a non-streamed reply body.
fn parse_response(body: &[u8]) -> Result<ChatResponse> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}
