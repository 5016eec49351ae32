//! Flag decision engine: one boolean plus ordered, human-readable reasons.
//!
//! The `error` sentinel from a classifier is "no signal", never a trigger.

use domains::{FlagDecision, Sentiment, SignalBundle, Toxicity};

pub fn decide(signals: &SignalBundle) -> FlagDecision {
    let mut reasons = Vec::new();

    if !signals.keywords.is_empty() {
        reasons.push(format!("KEYWORD: {}", signals.keywords.join(", ")));
    }
    if signals.sentiment == Sentiment::Negative {
        reasons.push("SENTIMENT: NEGATIVE".to_string());
    }
    if signals.toxicity == Toxicity::Toxic {
        reasons.push("TOXICITY: TOXIC".to_string());
    }

    FlagDecision {
        flagged: !reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(keywords: &[&str], sentiment: Sentiment, toxicity: Toxicity) -> SignalBundle {
        SignalBundle {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            sentiment,
            toxicity,
        }
    }

    #[test]
    fn reasons_follow_keyword_sentiment_toxicity_order() {
        let decision = decide(&bundle(&["hate", "awful"], Sentiment::Negative, Toxicity::Toxic));
        assert!(decision.flagged);
        assert_eq!(
            decision.reasons,
            vec!["KEYWORD: hate, awful", "SENTIMENT: NEGATIVE", "TOXICITY: TOXIC"]
        );
    }

    #[test]
    fn absent_triggers_are_omitted() {
        let decision = decide(&bundle(&[], Sentiment::Positive, Toxicity::Toxic));
        assert_eq!(decision.reasons, vec!["TOXICITY: TOXIC"]);
    }

    #[test]
    fn error_sentinels_never_flag() {
        let decision = decide(&bundle(&[], Sentiment::Error, Toxicity::Error));
        assert!(!decision.flagged);
        assert!(decision.reasons.is_empty());
        assert_eq!(decision.reason_line(), domains::NOT_FLAGGED);
    }

    #[test]
    fn flagged_iff_any_trigger_holds() {
        let sentiments = [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Mixed,
            Sentiment::Error,
        ];
        let toxicities = [Toxicity::Toxic, Toxicity::NonToxic, Toxicity::Error];

        for keywords in [&[][..], &["slur"][..]] {
            for &s in &sentiments {
                for &t in &toxicities {
                    let expected = !keywords.is_empty()
                        || s == Sentiment::Negative
                        || t == Toxicity::Toxic;
                    assert_eq!(decide(&bundle(keywords, s, t)).flagged, expected);
                }
            }
        }
    }
}
