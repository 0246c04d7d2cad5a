//! Current date lookup for temporally accurate reports.

use super::Tool;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

/// Tells the model what day it is. Models are routinely confused about the
/// current date and produce stale recency filters without this.
pub struct CurrentDate;

#[async_trait]
impl Tool for CurrentDate {
    fn name(&self) -> &'static str {
        "current_date"
    }

    fn description(&self) -> &'static str {
        "Returns the current date and time in UTC. Use it before reasoning about recency."
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn invoke(&self, _args: Value) -> Value {
        json!({ "status": "success", "date": Utc::now().to_rfc3339() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn returns_a_parseable_rfc3339_timestamp() {
        let result = CurrentDate.invoke(json!({})).await;

        assert_eq!(result["status"], "success");
        let date = result["date"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(date).is_ok());
    }
}
