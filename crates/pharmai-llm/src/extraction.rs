//! Structured interaction replies from model output.

use serde::{Deserialize, Serialize};

use crate::inference::{InferenceError, InferenceResult};

/// An interaction verdict as returned by the model.
///
/// Labels are kept as free text here; the resolver maps them onto its own
/// enumerations and drops anything it does not recognise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReply {
    pub interaction: bool,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub effects: Option<String>,
    #[serde(default, alias = "mech")]
    pub mechanism: Option<String>,
    #[serde(default, alias = "rec")]
    pub recommendation: Option<String>,
}

/// Parse model output into an [`InteractionReply`].
///
/// Models wrap JSON in markdown fences or add a sentence before it, so the
/// outermost `{ ... }` span is extracted first.
pub fn parse_interaction_reply(text: &str) -> InferenceResult<InteractionReply> {
    let cleaned = text.replace("```json", "").replace("```", "");

    let json_start = cleaned.find('{').ok_or_else(|| {
        InferenceError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = cleaned.rfind('}').ok_or_else(|| {
        InferenceError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(InferenceError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let reply: InteractionReply = serde_json::from_str(&cleaned[json_start..=json_end])?;
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_reply() {
        let json = r#"{"interaction":true,"severity":"Major","risk":"High","mechanism":"CYP3A4 inhibition.","recommendation":"Avoid."}"#;

        let reply = parse_interaction_reply(json).unwrap();
        assert!(reply.interaction);
        assert_eq!(reply.severity.as_deref(), Some("Major"));
        assert_eq!(reply.effects, None);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let text = "```json\n{\"interaction\": false, \"risk\": null}\n```";

        let reply = parse_interaction_reply(text).unwrap();
        assert!(!reply.interaction);
        assert_eq!(reply.risk, None);
    }

    #[test]
    fn test_parse_reply_with_prefix() {
        let text = r#"Here is the analysis:
{"interaction":true,"rec":"Monitor INR.","mech":"Unknown."}"#;

        let reply = parse_interaction_reply(text).unwrap();
        assert_eq!(reply.recommendation.as_deref(), Some("Monitor INR."));
        assert_eq!(reply.mechanism.as_deref(), Some("Unknown."));
    }

    #[test]
    fn test_parse_rejects_prose() {
        let result = parse_interaction_reply("These drugs are generally fine together.");
        assert!(matches!(result, Err(InferenceError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_rejects_missing_verdict() {
        let result = parse_interaction_reply(r#"{"risk":"High"}"#);
        assert!(matches!(result, Err(InferenceError::JsonParse(_))));
    }

    #[test]
    fn test_parse_rejects_reversed_braces() {
        let result = parse_interaction_reply("} nothing {");
        assert!(matches!(result, Err(InferenceError::InvalidFormat(_))));
    }

    proptest::proptest! {
        #[test]
        fn prop_parse_never_panics(text in "\\PC{0,200}") {
            let _ = parse_interaction_reply(&text);
        }

        #[test]
        fn prop_surrounding_prose_is_ignored(prefix in "[a-zA-Z .:]{0,40}", suffix in "[a-zA-Z .]{0,40}", verdict in proptest::bool::ANY) {
            let text = format!("{}```json\n{{\"interaction\": {}}}\n```{}", prefix, verdict, suffix);
            let reply = parse_interaction_reply(&text).unwrap();
            proptest::prop_assert_eq!(reply.interaction, verdict);
        }
    }
}
