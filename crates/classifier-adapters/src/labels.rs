//! Model output shapes and label mapping.

use domains::{ClassifierError, Sentiment, ToxicityScore};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Inference endpoints answer either `[{..}]` or `[[{..}]]` for one input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClassificationOutput {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationOutput {
    /// Highest-scoring label for the first input.
    pub fn top(self) -> Result<LabelScore, ClassifierError> {
        let candidates = match self {
            ClassificationOutput::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            ClassificationOutput::Flat(labels) => labels,
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| ClassifierError::UnexpectedOutput("empty label list".into()))
    }
}

/// Maps a sentiment model label. `LABEL_n` follows the twitter-roberta order.
pub fn sentiment_from_label(label: &str) -> Result<Sentiment, ClassifierError> {
    match label.to_ascii_uppercase().as_str() {
        "LABEL_0" | "NEGATIVE" => Ok(Sentiment::Negative),
        "LABEL_1" | "NEUTRAL" => Ok(Sentiment::Neutral),
        "LABEL_2" | "POSITIVE" => Ok(Sentiment::Positive),
        "LABEL_3" | "MIXED" => Ok(Sentiment::Mixed),
        other => Err(ClassifierError::UnexpectedOutput(format!("sentiment label {other}"))),
    }
}

impl From<LabelScore> for ToxicityScore {
    fn from(value: LabelScore) -> Self {
        ToxicityScore {
            label: value.label,
            score: value.score,
        }
    }
}
