use serde_json::Value;

/// Pick the first text segment out of a detect-intent response.
///
/// Walks `queryResult.responseMessages` in order and returns `text.text[0]`
/// of the first message carrying a non-empty text list. Any other shape
/// yields `fallback`.
pub fn extract_reply(response: &Value, fallback: &str) -> String {
    response
        .get("queryResult")
        .and_then(|r| r.get("responseMessages"))
        .and_then(|m| m.as_array())
        .into_iter()
        .flatten()
        .find_map(|message| {
            message
                .get("text")
                .and_then(|t| t.get("text"))
                .and_then(|t| t.as_array())
                .and_then(|segments| segments.first())
                .and_then(|first| first.as_str())
        })
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FALLBACK: &str = "I didn’t get a response from the agent.";

    #[test]
    fn takes_first_text_segment() {
        let response = json!({
            "queryResult": {
                "responseMessages": [
                    { "payload": { "richContent": [] } },
                    { "text": { "text": [] } },
                    { "text": { "text": ["The London scene opens the film.", "second"] } },
                    { "text": { "text": ["later message"] } }
                ]
            }
        });
        assert_eq!(
            extract_reply(&response, FALLBACK),
            "The London scene opens the film."
        );
    }

    #[test]
    fn missing_structure_falls_back() {
        for response in [
            json!({}),
            json!({ "queryResult": {} }),
            json!({ "queryResult": { "responseMessages": [] } }),
            json!({ "queryResult": { "responseMessages": "oops" } }),
            json!({ "queryResult": { "responseMessages": [{ "text": { "text": "flat" } }] } }),
        ] {
            assert_eq!(extract_reply(&response, FALLBACK), FALLBACK);
        }
    }
}
