//! # StubClassifier
//!
//! Deterministic stand-in for the hosted models. The lexicon mode scores
//! text by word lookup so offline runs still produce plausible labels.

use std::collections::HashSet;

use async_trait::async_trait;
use domains::{ClassifierError, Sentiment, SentimentClassifier, ToxicityClassifier, ToxicityScore};

const NEGATIVE_WORDS: &[&str] = &[
    "hate", "awful", "terrible", "horrible", "worst", "angry", "sad", "bad", "disgusting", "ugly",
];
const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "good", "excellent", "wonderful", "happy", "best", "awesome", "nice", "thanks",
];
const TOXIC_WORDS: &[&str] = &["idiot", "stupid", "moron", "loser", "dumb", "trash"];

#[derive(Debug, Clone)]
enum Behavior {
    Lexicon,
    Fixed {
        sentiment: Sentiment,
        toxicity: ToxicityScore,
    },
    Failing,
}

#[derive(Debug, Clone)]
pub struct StubClassifier {
    behavior: Behavior,
}

impl StubClassifier {
    /// Word-lookup scoring.
    pub fn lexicon() -> Self {
        Self {
            behavior: Behavior::Lexicon,
        }
    }

    /// Same answer for every text.
    pub fn fixed(sentiment: Sentiment, toxic_label: &str, toxic_score: f64) -> Self {
        Self {
            behavior: Behavior::Fixed {
                sentiment,
                toxicity: ToxicityScore {
                    label: toxic_label.to_string(),
                    score: toxic_score,
                },
            },
        }
    }

    /// Every call fails, as an unreachable model would.
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Failing,
        }
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::lexicon()
    }
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn hits(words: &HashSet<String>, lexicon: &[&str]) -> usize {
    lexicon.iter().filter(|w| words.contains(**w)).count()
}

#[async_trait]
impl SentimentClassifier for StubClassifier {
    async fn classify_sentiment(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        match &self.behavior {
            Behavior::Fixed { sentiment, .. } => Ok(*sentiment),
            Behavior::Failing => Err(ClassifierError::Transport("stub classifier offline".into())),
            Behavior::Lexicon => {
                let words = words(text);
                let label = match (hits(&words, NEGATIVE_WORDS), hits(&words, POSITIVE_WORDS)) {
                    (0, 0) => Sentiment::Neutral,
                    (_, 0) => Sentiment::Negative,
                    (0, _) => Sentiment::Positive,
                    _ => Sentiment::Mixed,
                };
                Ok(label)
            }
        }
    }
}

#[async_trait]
impl ToxicityClassifier for StubClassifier {
    async fn score_toxicity(&self, text: &str) -> Result<ToxicityScore, ClassifierError> {
        match &self.behavior {
            Behavior::Fixed { toxicity, .. } => Ok(toxicity.clone()),
            Behavior::Failing => Err(ClassifierError::Transport("stub classifier offline".into())),
            Behavior::Lexicon => {
                let found = hits(&words(text), TOXIC_WORDS);
                let score = if found == 0 { 0.02 } else { (0.6 + 0.2 * found as f64).min(0.99) };
                Ok(ToxicityScore {
                    label: "toxic".to_string(),
                    score,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_count_distinct_lexicon_words() {
        let text = words("Hate, HATE and more hate. Awful!");
        assert_eq!(hits(&text, &["hate", "awful", "love"]), 2);
        assert_eq!(hits(&text, &[]), 0);
    }

    #[tokio::test]
    async fn lexicon_scores_are_deterministic() {
        let stub = StubClassifier::lexicon();
        assert_eq!(stub.classify_sentiment("I hate this").await.unwrap(), Sentiment::Negative);
        assert_eq!(stub.classify_sentiment("Love it!").await.unwrap(), Sentiment::Positive);
        assert_eq!(stub.classify_sentiment("love and hate").await.unwrap(), Sentiment::Mixed);
        assert_eq!(stub.classify_sentiment("a table").await.unwrap(), Sentiment::Neutral);

        let one = stub.score_toxicity("you idiot").await.unwrap();
        assert!(one.score > 0.7);
        assert!(stub.score_toxicity("hello").await.unwrap().score < 0.1);
    }

    #[tokio::test]
    async fn fixed_and_failing_modes() {
        let fixed = StubClassifier::fixed(Sentiment::Negative, "toxic", 0.9);
        assert_eq!(fixed.classify_sentiment("anything").await.unwrap(), Sentiment::Negative);
        assert_eq!(fixed.score_toxicity("anything").await.unwrap().score, 0.9);

        let failing = StubClassifier::failing();
        assert!(failing.classify_sentiment("x").await.is_err());
        assert!(failing.score_toxicity("x").await.is_err());
    }
}
