use serde::{Deserialize, Deserializer, Serialize};

/// Response of the plant classification endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub log_id: u64,
    #[serde(default)]
    pub result: Vec<PlantItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantItem {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: f64,
    #[serde(default)]
    pub baike_info: Option<BaikeInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaikeInfo {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RecognitionResult {
    /// Candidates come back ranked, so the first one is the best guess.
    pub fn best_match(&self) -> Option<&PlantItem> {
        self.result.first()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

impl PlantItem {
    pub fn confidence_percent(&self) -> f64 {
        (self.score * 100.0).clamp(0.0, 100.0)
    }

    pub fn description(&self) -> Option<&str> {
        self.baike_info
            .as_ref()
            .and_then(|b| b.description.as_deref())
            .filter(|d| !d.is_empty())
    }
}

/// The API sends scores as numbers or numeric strings; anything else is 0.
fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_id_beyond_i64_parses() {
        let result: RecognitionResult =
            serde_json::from_str(r#"{"log_id": 18446744073709551615, "result": []}"#).unwrap();
        assert_eq!(result.log_id, u64::MAX);
        assert!(result.is_empty());
    }

    #[test]
    fn parses_api_response() {
        let json = r#"{
            "log_id": 1234567890,
            "result": [
                {"name": "月季花", "score": 0.83, "baike_info": {
                    "image_url": "https://example.com/rose.jpg",
                    "description": "常绿灌木"
                }},
                {"name": "玫瑰", "score": "0.12"},
                {"name": "非植物", "score": null}
            ]
        }"#;

        let result: RecognitionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.log_id, 1234567890);
        assert_eq!(result.result.len(), 3);

        let best = result.best_match().unwrap();
        assert_eq!(best.name, "月季花");
        assert!((best.score - 0.83).abs() < 1e-9);
        assert_eq!(best.description(), Some("常绿灌木"));

        assert!((result.result[1].score - 0.12).abs() < 1e-9);
        assert!(result.result[1].baike_info.is_none());
        assert_eq!(result.result[2].score, 0.0);
    }

    #[test]
    fn unparseable_score_string_is_zero() {
        let item: PlantItem = serde_json::from_str(r#"{"name": "x", "score": "high"}"#).unwrap();
        assert_eq!(item.score, 0.0);
    }

    #[test]
    fn empty_result_has_no_best_match() {
        let result: RecognitionResult = serde_json::from_str(r#"{"log_id": 1}"#).unwrap();
        assert!(result.is_empty());
        assert!(result.best_match().is_none());
    }

    #[test]
    fn confidence_is_clamped() {
        let item = PlantItem {
            name: "x".into(),
            score: 1.7,
            baike_info: None,
        };
        assert_eq!(item.confidence_percent(), 100.0);
    }
}
