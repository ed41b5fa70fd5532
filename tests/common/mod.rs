#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use travel_planner::{TextGenerator, TravelRequest};

/// Replies with the same text to every prompt and remembers what it was asked.
#[derive(Debug, Default)]
pub struct StubGenerator {
    reply: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

/// Picks a reply by the first prompt marker it finds, `"{}"` otherwise.
#[derive(Debug)]
pub struct ScriptedGenerator {
    replies: Vec<(&'static str, String)>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<(&'static str, String)>) -> Self {
        Self { replies }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str) -> String {
        self.replies
            .iter()
            .find(|(marker, _)| prompt.contains(marker))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| "{}".to_string())
    }
}

pub fn paris_request() -> TravelRequest {
    TravelRequest::new("Paris", "2024-06-01", "2024-06-04", 2)
        .with_budget("1200")
        .with_interests(["food"])
}
