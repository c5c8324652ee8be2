use crate::logic::season_matcher;
use crate::models::Season;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, alias = "seasonSowing")]
    pub season_sowing: Option<String>,
    #[serde(default, alias = "seasonBloom")]
    pub season_bloom: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub water: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn non_empty(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

impl Plant {
    /// Whether any of the care/season attributes are filled in.
    pub fn has_details(&self) -> bool {
        non_empty(&self.category)
            || non_empty(&self.season_sowing)
            || non_empty(&self.season_bloom)
            || non_empty(&self.zone)
            || non_empty(&self.water)
    }

    pub fn blooms_in(&self, season: Season) -> bool {
        season_matcher::matches_opt(self.season_bloom.as_deref(), season)
    }

    /// Case-insensitive substring match over the searchable text fields.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        let hit = |field: Option<&str>| {
            field.is_some_and(|s| s.to_lowercase().contains(needle_lower))
        };
        hit(Some(&self.name))
            || hit(self.description.as_deref())
            || hit(self.season_sowing.as_deref())
            || hit(self.season_bloom.as_deref())
    }
}

// Builders for fixtures.
#[cfg(test)]
impl Plant {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_bloom(mut self, bloom: &str) -> Self {
        self.season_bloom = Some(bloom.to_string());
        self
    }

    pub fn with_sowing(mut self, sowing: &str) -> Self {
        self.season_sowing = Some(sowing.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_details_ignores_empty_strings() {
        let mut plant = Plant::new("玫瑰");
        assert!(!plant.has_details());

        plant.season_bloom = Some(String::new());
        plant.description = Some("only a description".into());
        assert!(!plant.has_details());

        plant.water = Some("适量".into());
        assert!(plant.has_details());
    }

    #[test]
    fn blooms_in_uses_descriptor() {
        let plant = Plant::new("跨年花").with_bloom("冬-春");
        assert!(plant.blooms_in(Season::Winter));
        assert!(plant.blooms_in(Season::Spring));
        assert!(!plant.blooms_in(Season::Summer));
        assert!(!Plant::new("无花期植物").blooms_in(Season::Spring));
    }

    #[test]
    fn accepts_table_column_names() {
        let plant: Plant = serde_json::from_str(
            r#"{"name": "荷花", "seasonSowing": "春", "seasonBloom": "夏", "zone": "水生"}"#,
        )
        .unwrap();
        assert_eq!(plant.season_sowing.as_deref(), Some("春"));
        assert_eq!(plant.season_bloom.as_deref(), Some("夏"));
        assert!(plant.blooms_in(Season::Summer));

        let yaml: Vec<Plant> = serde_yaml::from_str("- name: 梅花\n  seasonBloom: 冬\n").unwrap();
        assert_eq!(yaml[0].season_bloom.as_deref(), Some("冬"));
    }

    #[test]
    fn search_covers_text_fields() {
        let plant = Plant::new("Rose")
            .with_description("Thorny shrub")
            .with_bloom("春、夏");
        assert!(plant.matches_search("rose"));
        assert!(plant.matches_search("thorny"));
        assert!(plant.matches_search("夏"));
        assert!(!plant.matches_search("tulip"));
    }
}
