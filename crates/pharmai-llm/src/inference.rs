//! The inference capability and its test doubles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;

/// Inference errors.
///
/// Every variant is recoverable from the resolver's point of view: a failed
/// call degrades to the fail-safe "verify manually" answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Cannot reach inference service at {0}")]
    Connection(String),

    #[error("Inference request timed out after {0}s")]
    Timeout(u64),

    #[error("Inference service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Inference service returned no text")]
    EmptyResponse,

    #[error("Inference service not configured")]
    Unavailable,

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}

pub type InferenceResult<T> = Result<T, InferenceError>;

/// A generative-text service: one prompt in, free text out.
///
/// `context` carries the system instruction and may be empty. Implementations
/// must bound their own latency; callers never retry.
pub trait Inferencer: Send + Sync {
    fn infer(&self, prompt: &str, context: &str) -> InferenceResult<String>;

    /// Whether a real backend is wired in.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledInferencer;

impl Inferencer for DisabledInferencer {
    fn infer(&self, _prompt: &str, _context: &str) -> InferenceResult<String> {
        Err(InferenceError::Unavailable)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Mock inferencer for testing: replays scripted results and counts calls.
///
/// Once the script is exhausted the last result is repeated.
pub struct MockInferencer {
    script: Mutex<VecDeque<InferenceResult<String>>>,
    last: Mutex<Option<InferenceResult<String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockInferencer {
    /// Always reply with `text`.
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Ok(text.to_string())])
    }

    /// Always fail with `error`.
    pub fn failing(error: InferenceError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    pub fn scripted(results: Vec<InferenceResult<String>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `infer` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Inferencer for MockInferencer {
    fn infer(&self, prompt: &str, _context: &str) -> InferenceResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let mut last = self
            .last
            .lock()
            .map_err(|_| InferenceError::Http("mock lock poisoned".into()))?;

        match next {
            Some(result) => {
                *last = Some(result.clone());
                result
            }
            None => last.clone().unwrap_or(Err(InferenceError::EmptyResponse)),
        }
    }
}
