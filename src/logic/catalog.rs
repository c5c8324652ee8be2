use crate::db::Database;
use crate::error::Result;
use crate::models::Plant;

/// Pseudo-category meaning "no category filter".
pub const ALL_CATEGORIES: &str = "全部";

/// Read side of the plant encyclopedia.
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn all_plants(&self) -> Result<Vec<Plant>> {
        self.db.get_all_plants()
    }

    pub fn distinct_categories(&self) -> Result<Vec<String>> {
        self.db.get_distinct_categories()
    }

    /// Categories prefixed with the "all" option, as shown in the picker.
    pub fn categories_with_all(&self) -> Result<Vec<String>> {
        let mut result = vec![ALL_CATEGORIES.to_string()];
        result.extend(self.distinct_categories()?);
        Ok(result)
    }

    pub fn filtered_plants(&self, search: &str, category: &str) -> Result<Vec<Plant>> {
        let plants = self.all_plants()?;
        Ok(filter_plants(&plants, search, category))
    }
}

/// Apply the encyclopedia filters to an already-loaded plant list.
///
/// An empty category or [`ALL_CATEGORIES`] disables the category filter; an
/// empty search disables text search. Results are ordered by name.
pub fn filter_plants(plants: &[Plant], search: &str, category: &str) -> Vec<Plant> {
    let search_lower = search.to_lowercase();

    let mut filtered: Vec<Plant> = plants
        .iter()
        .filter(|p| {
            category.is_empty()
                || category == ALL_CATEGORIES
                || p.category.as_deref() == Some(category)
        })
        .filter(|p| search_lower.is_empty() || p.matches_search(&search_lower))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| a.name.cmp(&b.name));
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CatalogService {
        let db = Database::open_in_memory().unwrap();
        db.insert_plants(&[
            Plant::new("Tulip")
                .with_category("Bulb")
                .with_bloom("春")
                .with_description("Cup-shaped flowers"),
            Plant::new("Aster").with_category("Perennial").with_bloom("秋"),
            Plant::new("Daffodil")
                .with_category("Bulb")
                .with_bloom("冬-春"),
            Plant::new("Mystery"),
        ])
        .unwrap();
        CatalogService::new(db)
    }

    fn names(plants: &[Plant]) -> Vec<&str> {
        plants.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn categories_are_sorted_with_all_first() {
        let svc = service();
        assert_eq!(svc.distinct_categories().unwrap(), vec!["Bulb", "Perennial"]);
        assert_eq!(
            svc.categories_with_all().unwrap(),
            vec![ALL_CATEGORIES, "Bulb", "Perennial"]
        );
    }

    #[test]
    fn no_filters_returns_everything_by_name() {
        let svc = service();
        let plants = svc.filtered_plants("", ALL_CATEGORIES).unwrap();
        assert_eq!(names(&plants), vec!["Aster", "Daffodil", "Mystery", "Tulip"]);
        assert_eq!(svc.filtered_plants("", "").unwrap().len(), 4);
    }

    #[test]
    fn category_filter_is_exact() {
        let svc = service();
        let plants = svc.filtered_plants("", "Bulb").unwrap();
        assert_eq!(names(&plants), vec!["Daffodil", "Tulip"]);
        assert!(svc.filtered_plants("", "bulb").unwrap().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let svc = service();
        assert_eq!(names(&svc.filtered_plants("TULIP", "").unwrap()), vec!["Tulip"]);
        assert_eq!(names(&svc.filtered_plants("cup", "").unwrap()), vec!["Tulip"]);
        assert_eq!(
            names(&svc.filtered_plants("春", "").unwrap()),
            vec!["Daffodil", "Tulip"]
        );
    }

    #[test]
    fn search_and_category_combine() {
        let svc = service();
        assert_eq!(
            names(&svc.filtered_plants("春", "Bulb").unwrap()),
            vec!["Daffodil", "Tulip"]
        );
        assert!(svc.filtered_plants("春", "Perennial").unwrap().is_empty());
    }
}
