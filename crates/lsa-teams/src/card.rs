//! The `MessageCard` webhook payload.

use serde::Serialize;

const SCHEMA_CONTEXT: &str = "https://schema.org/extensions";

/// Legacy Office 365 connector card with a markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageCard {
  #[serde(rename = "type")]
  pub kind:    &'static str,
  pub context: &'static str,
  pub summary: String,
  pub text:    String,
}

impl MessageCard {
  pub fn new(text: impl Into<String>, summary: impl Into<String>) -> Self {
    Self {
      kind:    "MessageCard",
      context: SCHEMA_CONTEXT,
      summary: summary.into(),
      text:    text.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn serialises_connector_fields() {
    let card = MessageCard::new("## Upcoming BSL Class", "1 STEM BSL class");
    assert_eq!(
      serde_json::to_value(&card).unwrap(),
      json!({
        "type": "MessageCard",
        "context": "https://schema.org/extensions",
        "summary": "1 STEM BSL class",
        "text": "## Upcoming BSL Class",
      })
    );
  }
}
