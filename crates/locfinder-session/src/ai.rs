//! AI insight generation for a resolved location.

use parking_lot::Mutex;
use std::sync::Arc;

use locfinder_ai::{GeminiClient, TextGenerator, LOCATION_STEREOTYPE_PROMPT};
use locfinder_core::{
    is_api_key_valid, AiConfig, EndpointsConfig, ResourceState, ServiceError, SharedResource,
};

/// Builds a generator from a validated API key.
type Connector = Box<dyn Fn(&str) -> Result<Arc<dyn TextGenerator>, ServiceError> + Send + Sync>;

pub struct AiFlow {
    connector: Connector,
    generator: Mutex<Option<Arc<dyn TextGenerator>>>,
    /// Why the last `initialize` failed, reported in place of
    /// "AI service not initialized"
    init_error: Mutex<Option<String>>,
    state: SharedResource<String>,
}

impl AiFlow {
    /// A flow that must be initialized with an API key before generating.
    pub fn new(
        connector: impl Fn(&str) -> Result<Arc<dyn TextGenerator>, ServiceError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            connector: Box::new(connector),
            generator: Mutex::new(None),
            init_error: Mutex::new(None),
            state: SharedResource::new("ai"),
        }
    }

    /// A flow backed by Gemini with the configured model.
    pub fn gemini(ai: &AiConfig, endpoints: &EndpointsConfig) -> Self {
        let model = ai.model.clone();
        let endpoints = endpoints.clone();
        Self::new(move |key| {
            let client = GeminiClient::new(key, model.as_str(), &endpoints)?;
            tracing::debug!(model = client.model(), "Gemini client ready");
            Ok(Arc::new(client) as Arc<dyn TextGenerator>)
        })
    }

    /// A flow that is ready without a key (mock mode).
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        let flow = Self::new(|_| Err(ServiceError::AiNotInitialized));
        *flow.generator.lock() = Some(generator);
        flow
    }

    pub fn state(&self) -> &SharedResource<String> {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.generator.lock().is_some()
    }

    /// Validate `api_key` and connect. No request is made here.
    ///
    /// On failure the AI resource is left `Failed` with the reason.
    pub fn initialize(&self, api_key: &str) -> bool {
        if !is_api_key_valid(api_key) {
            self.fail_init(ServiceError::InvalidApiKey.to_string());
            return false;
        }

        match (self.connector)(api_key) {
            Ok(generator) => {
                *self.generator.lock() = Some(generator);
                *self.init_error.lock() = None;
                self.state.reset();
                tracing::info!("AI service initialized");
                true
            }
            Err(e) => {
                self.fail_init(format!("Error initializing AI: {}", e));
                false
            }
        }
    }

    fn fail_init(&self, message: String) {
        *self.generator.lock() = None;
        self.state.fail_fast(message.clone());
        *self.init_error.lock() = Some(message);
    }

    /// Generate an insight for `location`, using the built-in stereotype
    /// prompt unless `custom_prompt` is given.
    pub async fn generate(
        &self,
        location: &str,
        custom_prompt: Option<&str>,
    ) -> ResourceState<String> {
        if location.trim().is_empty() {
            self.state
                .fail_fast(ServiceError::NoLocationProvided.to_string());
            return self.state.snapshot();
        }

        let generator = self.generator.lock().clone();
        let Some(generator) = generator else {
            let message = self
                .init_error
                .lock()
                .clone()
                .unwrap_or_else(|| ServiceError::AiNotInitialized.to_string());
            self.state.fail_fast(message);
            return self.state.snapshot();
        };

        let prompt = custom_prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(LOCATION_STEREOTYPE_PROMPT);

        let ticket = self.state.begin();
        let result = generator
            .generate(prompt, location)
            .await
            .map_err(|e| {
                tracing::error!("AI Error: {}", e);
                ServiceError::Generation(e.to_string())
            });
        self.state.settle(ticket, result);
        self.state.snapshot()
    }

    /// Return the resource to Idle. Generator and any initialization
    /// failure are kept.
    pub fn reset(&self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use locfinder_core::NetworkError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records calls and echoes the prompt tail.
    #[derive(Default)]
    struct Recording {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(
            &self,
            instructions: &str,
            location: &str,
        ) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}|{}", instructions.len(), location))
        }
    }

    struct Broken;

    #[async_trait]
    impl TextGenerator for Broken {
        async fn generate(&self, _: &str, _: &str) -> Result<String, ServiceError> {
            Err(NetworkError::HttpStatus { status: 429 }.into())
        }
    }

    fn connecting_to(generator: Arc<dyn TextGenerator>) -> AiFlow {
        AiFlow::new(move |_| Ok(Arc::clone(&generator)))
    }

    #[test]
    fn test_invalid_keys_rejected() {
        for key in ["", "your_api_key_here"] {
            let flow = connecting_to(Arc::new(Recording::default()));
            assert!(!flow.initialize(key));
            assert!(!flow.is_initialized());
            assert_eq!(
                flow.state().error(),
                Some(ServiceError::InvalidApiKey.to_string())
            );
        }
    }

    #[test]
    fn test_valid_key_initializes() {
        let flow = connecting_to(Arc::new(Recording::default()));
        assert!(flow.initialize("real-key"));
        assert!(flow.is_initialized());
        assert!(flow.state().snapshot().is_idle());
    }

    #[test]
    fn test_valid_key_after_invalid_clears_failure() {
        let flow = connecting_to(Arc::new(Recording::default()));
        assert!(!flow.initialize(""));
        assert!(flow.state().snapshot().is_failed());

        assert!(flow.initialize("real-key"));
        assert!(flow.is_initialized());
        assert!(flow.state().snapshot().is_idle());
    }

    #[tokio::test]
    async fn test_invalid_key_reported_on_generate() {
        let recording = Arc::new(Recording::default());
        let flow = connecting_to(recording.clone());
        flow.initialize("your_api_key_here");
        flow.reset();

        let state = flow.generate("Cambridge", None).await;
        assert_eq!(
            state.error(),
            Some(ServiceError::InvalidApiKey.to_string().as_str())
        );
        assert_eq!(recording.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_location_checked_before_key() {
        let flow = connecting_to(Arc::new(Recording::default()));
        flow.initialize("");
        let state = flow.generate("", None).await;
        assert_eq!(state.error(), Some("No location provided"));
    }

    #[test]
    fn test_connector_failure_reported() {
        let flow = AiFlow::new(|_| {
            Err(NetworkError::ConnectionFailed("bad client".into()).into())
        });
        assert!(!flow.initialize("real-key"));
        assert_eq!(
            flow.state().error().as_deref(),
            Some("Error initializing AI: Connection failed: bad client")
        );
    }

    #[tokio::test]
    async fn test_missing_location_checked_first() {
        let flow = connecting_to(Arc::new(Recording::default()));
        let state = flow.generate("  ", None).await;
        assert_eq!(state.error(), Some("No location provided"));
    }

    #[tokio::test]
    async fn test_uninitialized() {
        let recording = Arc::new(Recording::default());
        let flow = connecting_to(recording.clone());
        let state = flow.generate("Cambridge", None).await;
        assert_eq!(state.error(), Some("AI service not initialized"));
        assert_eq!(recording.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_uses_default_prompt() {
        let flow = AiFlow::with_generator(Arc::new(Recording::default()));
        let state = flow.generate("Cambridge", None).await;
        assert_eq!(
            state.value().map(String::as_str),
            Some(format!("{}|Cambridge", LOCATION_STEREOTYPE_PROMPT.len()).as_str())
        );
    }

    #[tokio::test]
    async fn test_generate_uses_custom_prompt() {
        let flow = AiFlow::with_generator(Arc::new(Recording::default()));
        let state = flow.generate("Cambridge", Some("abc")).await;
        assert_eq!(state.value().map(String::as_str), Some("3|Cambridge"));
    }

    #[tokio::test]
    async fn test_generation_error_is_prefixed() {
        let flow = AiFlow::with_generator(Arc::new(Broken));
        let state = flow.generate("Cambridge", None).await;
        assert_eq!(
            state.error(),
            Some("Error getting AI response: HTTP error! status: 429")
        );
        assert!(!flow.state().is_loading());
    }

    #[tokio::test]
    async fn test_reset() {
        let flow = AiFlow::with_generator(Arc::new(Recording::default()));
        flow.generate("Cambridge", None).await;
        flow.reset();
        assert!(flow.state().snapshot().is_idle());
    }
}
