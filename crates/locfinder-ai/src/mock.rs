//! Canned text generation for offline development.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use locfinder_core::ServiceError;

use crate::client::TextGenerator;

/// Stereotype endings appended to "Oh, you're from {location}. That means you probably ".
const CANNED_ENDINGS: [&str; 4] = [
    "spend your weekends debating the Oxford comma at coffee shops, own at least three tote bags from independent bookstores, and have strong opinions about which side of the river is superior.",
    "cycle everywhere in a tweed jacket, argue about the correct pronunciation of \"scone,\" and have a punt with a tragic love story attached to it.",
    "think Dunkin' is a food group, call it \"the T\" even though it's always late, and know exactly where Matt Damon's bench from Good Will Hunting is.",
    "have opinions about Harvard vs MIT, know which coffee shop has the best Wi-Fi for working, and can navigate the Red Line with your eyes closed.",
];

/// Canned response number `index` for `location`.
pub fn canned_response(location: &str, index: usize) -> String {
    let ending = CANNED_ENDINGS[index % CANNED_ENDINGS.len()];
    format!("Oh, you're from {}. That means you probably {}", location, ending)
}

/// Generator that answers with a canned response after a delay.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    delay: Duration,
    randomize: bool,
}

impl MockTextGenerator {
    pub fn new(delay: Duration, randomize: bool) -> Self {
        Self { delay, randomize }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, _instructions: &str, location: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(self.delay).await;

        let index = if self.randomize {
            rand::thread_rng().gen_range(0..CANNED_ENDINGS.len())
        } else {
            0
        };
        tracing::debug!(index, "Serving canned AI response");
        Ok(canned_response(location, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_response_uses_location() {
        let text = canned_response("Cambridge", 0);
        assert!(text.starts_with("Oh, you're from Cambridge. That means you probably"));
    }

    #[test]
    fn test_canned_index_wraps() {
        assert_eq!(canned_response("X", 1), canned_response("X", 5));
    }

    #[tokio::test]
    async fn test_deterministic_without_randomize() {
        let gen = MockTextGenerator::new(Duration::ZERO, false);
        let a = gen.generate("", "Boston").await.unwrap();
        let b = gen.generate("", "Boston").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, canned_response("Boston", 0));
    }

    #[tokio::test]
    async fn test_randomized_stays_within_canned_set() {
        let gen = MockTextGenerator::new(Duration::ZERO, true);
        let all: Vec<String> = (0..CANNED_ENDINGS.len())
            .map(|i| canned_response("Boston", i))
            .collect();
        for _ in 0..10 {
            let text = gen.generate("", "Boston").await.unwrap();
            assert!(all.contains(&text));
        }
    }
}
