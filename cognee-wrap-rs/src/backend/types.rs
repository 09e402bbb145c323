//! Uniform operation arguments shared by all backend variants
//!
//! Every variant accepts the same argument structs; only the wire encoding
//! differs. Defaults that the wire contract specifies (search mode, result
//! cap) are applied inside the adapters, not here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments for the ingest (`add`) operation
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    /// Raw text payloads to ingest
    pub payload: Vec<String>,
    /// Target dataset name
    pub dataset_name: Option<String>,
    /// Target dataset id
    pub dataset_id: Option<String>,
    /// Node-set labels attached to the ingested text
    pub node_set: Option<Vec<String>>,
}

/// Arguments for the processing (`cognify`) operation
#[derive(Debug, Clone, Default)]
pub struct CognifyArgs {
    /// Dataset names to process
    pub datasets: Option<Vec<String>>,
    /// Dataset ids to process
    pub dataset_ids: Option<Vec<String>>,
    /// Run processing in the background. Adapters default this to `false`
    /// so memory availability is deterministic for the next query.
    pub run_in_background: Option<bool>,
    /// Custom processing prompt
    pub custom_prompt: Option<String>,
    /// Enable temporal processing (ignored by variants that predate it)
    pub temporal_cognify: Option<bool>,
}

/// Arguments for the query (`search`) operation
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,
    /// Search mode. Adapters default to [`SearchMode::GraphCompletion`].
    pub search_type: Option<SearchMode>,
    /// Dataset names to search
    pub datasets: Option<Vec<String>>,
    /// Dataset ids to search
    pub dataset_ids: Option<Vec<String>>,
    /// System prompt applied to completion-style modes
    pub system_prompt: Option<String>,
    /// Node-name filter
    pub node_name: Option<Vec<String>>,
    /// Result-count cap. Adapters default to 10.
    pub top_k: Option<u32>,
    /// Return only the retrieved context, without a completion
    pub only_context: Option<bool>,
}

/// Search modes understood by the cognee backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMode {
    /// Pre-computed summaries
    Summaries,
    /// Raw text chunks
    Chunks,
    /// Retrieval-augmented completion
    RagCompletion,
    /// Graph-aware completion (the default)
    #[default]
    GraphCompletion,
    /// Graph-aware completion over summaries
    GraphSummaryCompletion,
    /// Code-oriented retrieval
    Code,
    /// Raw Cypher queries against the graph
    Cypher,
    /// Natural-language graph queries
    NaturalLanguage,
    /// Graph completion with chain-of-thought
    GraphCompletionCot,
    /// Graph completion with extended context
    GraphCompletionContextExtension,
    /// Backend-chosen best mode
    FeelingLucky,
    /// Feedback submission
    Feedback,
    /// Time-aware retrieval
    Temporal,
    /// Coding-rule retrieval
    CodingRules,
    /// Lexical chunk matching
    ChunksLexical,
}

/// Extract a free-text context blob from a backend search result.
///
/// The result shape is heterogeneous across modes and versions; recognized
/// shapes are handled with a fixed precedence and anything else is
/// serialized verbatim rather than rejected. An empty string means "no
/// context".
pub fn extract_context(result: &Value) -> String {
    match result {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(item_text)
            .collect::<Vec<_>>()
            .join("\n\n"),
        Value::Object(map) => {
            if let Some(Value::String(answer)) = map.get("answer") {
                answer.clone()
            } else if let Some(Value::String(context)) = map.get("context") {
                context.clone()
            } else {
                result.to_string()
            }
        }
        other => other.to_string(),
    }
}

/// Text for one item of a sequence-shaped result, by field precedence.
fn item_text(item: &Value) -> String {
    if let Value::String(text) = item {
        return text.clone();
    }
    if let Value::Object(map) = item {
        for field in ["text", "content", "answer"] {
            if let Some(Value::String(text)) = map.get(field) {
                return text.clone();
            }
        }
    }
    item.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_mode_serialization() {
        assert_eq!(
            serde_json::to_value(SearchMode::GraphCompletion).unwrap(),
            json!("GRAPH_COMPLETION")
        );
        assert_eq!(
            serde_json::to_value(SearchMode::RagCompletion).unwrap(),
            json!("RAG_COMPLETION")
        );
        assert_eq!(
            serde_json::to_value(SearchMode::GraphCompletionCot).unwrap(),
            json!("GRAPH_COMPLETION_COT")
        );
        assert_eq!(
            serde_json::to_value(SearchMode::ChunksLexical).unwrap(),
            json!("CHUNKS_LEXICAL")
        );

        let back: SearchMode = serde_json::from_value(json!("FEELING_LUCKY")).unwrap();
        assert_eq!(back, SearchMode::FeelingLucky);
    }

    #[test]
    fn test_search_mode_default() {
        assert_eq!(SearchMode::default(), SearchMode::GraphCompletion);
    }

    #[test]
    fn test_extract_context_object_answer() {
        assert_eq!(extract_context(&json!({"answer": "foo"})), "foo");
    }

    #[test]
    fn test_extract_context_object_context() {
        assert_eq!(
            extract_context(&json!({"context": "past notes"})),
            "past notes"
        );
    }

    #[test]
    fn test_extract_context_array_mixed_fields() {
        let result = json!([{"text": "a"}, {"content": "b"}]);
        assert_eq!(extract_context(&result), "a\n\nb");
    }

    #[test]
    fn test_extract_context_array_of_strings() {
        let result = json!(["first", "second"]);
        assert_eq!(extract_context(&result), "first\n\nsecond");
    }

    #[test]
    fn test_extract_context_field_precedence() {
        // `text` wins over `content` and `answer` within one item.
        let result = json!([{"answer": "c", "content": "b", "text": "a"}]);
        assert_eq!(extract_context(&result), "a");
    }

    #[test]
    fn test_extract_context_unrecognized_item_serialized() {
        let result = json!([{"score": 0.9}]);
        assert_eq!(extract_context(&result), r#"{"score":0.9}"#);
    }

    #[test]
    fn test_extract_context_unrecognized_object_serialized() {
        let result = json!({"nodes": [1, 2]});
        assert_eq!(extract_context(&result), r#"{"nodes":[1,2]}"#);
    }

    #[test]
    fn test_extract_context_empty_inputs() {
        assert_eq!(extract_context(&Value::Null), "");
        assert_eq!(extract_context(&json!([])), "");
    }

    #[test]
    fn test_extract_context_bare_string() {
        assert_eq!(extract_context(&json!("just text")), "just text");
    }
}
