//! Congratulatory message for the winner, from a text-generation service.
//!
//! Entirely outside the wheel: the request starts after a spin has resolved
//! and every failure collapses to "no message".

use std::{
    sync::Arc,
    thread,
    time::Duration,
};

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classroom::Level;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-3-flash-preview";
const TEMPERATURE: f32 = 0.8;
const TOP_P: f32 = 0.95;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("no API key configured")]
    NoKey,
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("service returned no text")]
    Empty,
}

/// Anything that turns a prompt into a short reply.
pub trait MessageSource: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, MessageError>;
}

/// Prompt asking for a short, upbeat "magic spell" for the chosen student.
pub fn build_prompt(name: &str, level: Level, subject: &str) -> String {
    format!(
        "Bạn là một trợ lý ảo phù thủy vui nhộn.\n\
         Nhiệm vụ: Tạo 1 lời chúc hoặc \"thần chú\" cực ngắn (tối đa 15 từ) cho học sinh \"{name}\" vừa được chọn trong môn \"{subject}\".\n\
         Phong cách: {voice}\n\
         Yêu cầu: Hài hước, tích cực, mang màu sắc phép thuật.\n\
         Ví dụ: \"Úm ba la! Chúc mừng phù thủy nhỏ [Tên] sẽ tỏa sáng rực rỡ!\"\n\
         Chỉ trả về nội dung câu dẫn, không thêm bất kỳ văn bản nào khác.",
        voice = level.voice(),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ReplyContent>,
}

#[derive(Deserialize, Debug)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize, Debug)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, trimmed; `None` if blank.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<String>();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, timeout: Duration) -> GeminiClient {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        GeminiClient {
            agent,
            api_key: api_key.trim().to_string(),
            url: format!("{GEMINI_API_URL}/{GEMINI_MODEL}:generateContent"),
        }
    }
}

impl MessageSource for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, MessageError> {
        if self.api_key.is_empty() {
            return Err(MessageError::NoKey);
        }
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };
        log::debug!("Requesting message from {}", self.url);
        let reply: GenerateResponse = self
            .agent
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(&request)?
            .into_body()
            .read_json()?;
        reply.text().ok_or(MessageError::Empty)
    }
}

/// A message being generated on a background thread.
pub struct PendingMessage {
    rx: Receiver<Option<String>>,
}

impl PendingMessage {
    /// Waits up to `timeout` for the message. Failures and timeouts give
    /// `None`.
    pub fn wait(self, timeout: Duration) -> Option<String> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("No congratulatory message after {:?}; skipping", timeout);
                None
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Starts generating a message for `name` without blocking the caller.
pub fn request_message(
    source: Arc<dyn MessageSource>,
    name: &str,
    level: Level,
    subject: &str,
) -> PendingMessage {
    let (tx, rx) = bounded(1);
    let prompt = build_prompt(name, level, subject);
    thread::spawn(move || {
        let msg = match source.generate(&prompt) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Congratulatory message unavailable: {e}");
                None
            }
        };
        // Receiver may have given up already
        let _ = tx.try_send(msg);
    });
    PendingMessage { rx }
}
