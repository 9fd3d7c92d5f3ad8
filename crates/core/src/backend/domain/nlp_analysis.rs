use serde::{Deserialize, Serialize};

/// What the NLP backend reports about a submitted text.
///
/// Informational only; playback never waits on it. Every field is optional
/// so partial or older responses still decode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpAnalysis {
    pub message: Option<String>,
    pub input_text: Option<String>,
    pub tokens: Vec<String>,
    pub filtered_tokens: Vec<String>,
    /// `(token, tag)` pairs, e.g. `("morning", "NN")`.
    pub pos_tags: Vec<(String, String)>,
    /// `(text, label)` pairs, e.g. `("Dublin", "GPE")`.
    pub entities: Vec<(String, String)>,
    pub lemmas: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_full_backend_response() {
        let json = r#"{
            "message": "Text successfully processed",
            "input_text": "Good morning Dublin",
            "tokens": ["good", "morning", "dublin"],
            "filtered_tokens": ["good", "morning", "dublin"],
            "pos_tags": [["good", "JJ"], ["morning", "NN"], ["dublin", "NN"]],
            "entities": [["Dublin", "GPE"]],
            "lemmas": ["good", "morning", "Dublin"]
        }"#;

        let analysis: NlpAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.input_text.as_deref(), Some("Good morning Dublin"));
        assert_eq!(analysis.tokens.len(), 3);
        assert_eq!(analysis.pos_tags[1], ("morning".to_string(), "NN".to_string()));
        assert_eq!(analysis.entities, vec![("Dublin".to_string(), "GPE".to_string())]);
    }

    #[test]
    fn test_missing_fields_default() {
        let analysis: NlpAnalysis = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert_eq!(analysis.message.as_deref(), Some("ok"));
        assert!(analysis.tokens.is_empty());
        assert!(analysis.pos_tags.is_empty());
    }
}
