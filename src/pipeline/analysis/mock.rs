use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::CompletionService;
use super::AnalysisError;

/// One scripted outcome of a mock completion call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Simulates a refused connection (retryable).
    ConnectionRefused,
    /// Simulates an HTTP error status from the service.
    Status(u16),
}

/// Mock completion service for testing. Replays a script of replies.
///
/// Calls past the end of the script repeat the last entry.
pub struct MockCompletionService {
    script: Vec<MockReply>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockCompletionService {
    pub fn new(response: &str) -> Self {
        Self::with_script(vec![MockReply::Text(response.to_string())])
    }

    pub fn with_script(script: Vec<MockReply>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl CompletionService for MockCompletionService {
    fn complete(&self, prompt: &str, _system: &str) -> Result<String, AnalysisError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        let reply = self
            .script
            .get(index)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(MockReply::ConnectionRefused);

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::ConnectionRefused => {
                Err(AnalysisError::ServiceConnection("mock://completion".into()))
            }
            MockReply::Status(status) => Err(AnalysisError::ServiceError {
                status,
                body: "mock failure".into(),
            }),
        }
    }

    fn backend(&self) -> &str {
        "mock"
    }
}
