use serde::{Deserialize, Serialize};

/// Reply body of the model endpoint: `{"results": [{"outputText": "..."}]}`.
///
/// Every field is optional; the normalizer decides what counts as usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ModelOutput>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    #[serde(rename = "outputText", default, skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,

    #[serde(rename = "completionReason", default, skip_serializing_if = "Option::is_none")]
    pub completion_reason: Option<String>,
}

impl ModelEnvelope {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            results: Some(vec![ModelOutput {
                output_text: Some(text.into()),
                completion_reason: None,
            }]),
        }
    }

    pub fn empty() -> Self {
        Self {
            results: Some(Vec::new()),
        }
    }

    pub fn first_output(&self) -> Option<&str> {
        self.results
            .as_ref()
            .and_then(|r| r.first())
            .and_then(|o| o.output_text.as_deref())
    }
}
