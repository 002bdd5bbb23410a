//! In-process model with canned answers, for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::model::{VisionError, VisionModel};

/// Answers keyed by the exact image bytes, with a fallback for anything else.
///
/// Tracks how many queries ran and the highest number that were in flight at once.
#[derive(Debug)]
pub struct ScriptedVisionModel {
    model_id: String,
    answers: Mutex<HashMap<Vec<u8>, Result<String, VisionError>>>,
    fallback: Result<String, VisionError>,
    delay: Duration,
    reachable: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedVisionModel {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self::with_fallback(Ok(fallback.into()))
    }

    pub fn failing(error: VisionError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<String, VisionError>) -> Self {
        Self {
            model_id: "scripted".to_string(),
            answers: Mutex::new(HashMap::new()),
            fallback,
            delay: Duration::ZERO,
            reachable: true,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn answer(self, image: impl Into<Vec<u8>>, answer: impl Into<String>) -> Self {
        self.script(image, Ok(answer.into()))
    }

    pub fn fail_on(self, image: impl Into<Vec<u8>>, error: VisionError) -> Self {
        self.script(image, Err(error))
    }

    fn script(self, image: impl Into<Vec<u8>>, outcome: Result<String, VisionError>) -> Self {
        if let Ok(mut answers) = self.answers.lock() {
            answers.insert(image.into(), outcome);
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for ScriptedVisionModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn query(&self, image: &[u8], _prompt: &str) -> Result<String, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = self
            .answers
            .lock()
            .ok()
            .and_then(|answers| answers.get(image).cloned())
            .unwrap_or_else(|| self.fallback.clone());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn ping(&self) -> bool {
        self.reachable
    }
}
