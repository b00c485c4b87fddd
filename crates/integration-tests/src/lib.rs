//! Shared fixtures for Core X integration tests.
//!
//! Scenario tests live in `tests/`; this crate provides the test doubles
//! they share, most importantly a scripted gateway that counts invocations
//! so tests can assert that intercepted intents never reach the remote
//! assistant.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use corex_storefront::chat::{AssistantGateway, ChatMessage, GatewayError};

/// Gateway double that serves scripted outcomes in order and counts calls.
///
/// Sessions borrow the gateway (`&ScriptedGateway` implements
/// [`AssistantGateway`]), so the test keeps the original handle for
/// assertions.
#[derive(Default)]
pub struct ScriptedGateway {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
}

impl ScriptedGateway {
    /// Gateway whose next call answers with `reply` (later calls fall back
    /// to a fixed placeholder).
    #[must_use]
    pub fn replying(reply: &str) -> Self {
        let gateway = Self::default();
        gateway.push(Ok(reply.to_string()));
        gateway
    }

    /// Queue the outcome of the next call.
    pub fn push(&self, outcome: Result<String, GatewayError>) {
        self.script().push_back(outcome);
    }

    /// Number of times the gateway has been invoked.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, GatewayError>>> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AssistantGateway for &ScriptedGateway {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script()
            .pop_front()
            .unwrap_or_else(|| Ok("scripted fallback".to_string()))
    }
}
