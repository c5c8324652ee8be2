use crate::db::Database;
use crate::error::Result;
use crate::models::{Plant, Season};
use chrono::{Datelike, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Picks the plant of the day.
pub struct DailyService {
    db: Database,
}

impl DailyService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Uniformly random plant, or `None` for an empty database.
    pub fn random_plant<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<Plant>> {
        let total = self.db.count_plants()?;
        if total == 0 {
            return Ok(None);
        }

        let offset = rng.random_range(0..total);
        self.db.get_plant_at_offset(offset)
    }

    /// Random plant blooming in `season`, falling back to any plant.
    pub fn plant_for_season<R: Rng + ?Sized>(
        &self,
        season: Season,
        rng: &mut R,
    ) -> Result<Option<Plant>> {
        let plants = self.db.get_all_plants()?;
        let candidates: Vec<&Plant> = plants.iter().filter(|p| p.blooms_in(season)).collect();

        match candidates.choose(rng) {
            Some(plant) => {
                tracing::debug!(
                    season = %season,
                    candidates = candidates.len(),
                    plant = %plant.name,
                    "Picked seasonal plant"
                );
                Ok(Some((*plant).clone()))
            }
            None => {
                tracing::debug!(season = %season, "No plant blooms this season, picking at random");
                self.random_plant(rng)
            }
        }
    }

    pub fn plant_of_the_day<R: Rng + ?Sized>(
        &self,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Option<Plant>> {
        self.plant_for_season(Season::from_month(today.month()), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_plants(&[
            Plant::new("玫瑰").with_bloom("春、夏"),
            Plant::new("菊花").with_bloom("秋"),
            Plant::new("梅花").with_bloom("冬"),
            Plant::new("向日葵").with_bloom("夏"),
            Plant::new("四季海棠").with_bloom("四季"),
            Plant::new("跨年花").with_bloom("冬-春"),
            Plant::new("无花期植物").with_bloom(""),
            Plant::new("多季节花").with_bloom("春、秋"),
        ])
        .unwrap();
        db
    }

    fn picks(service: &DailyService, season: Season, rounds: usize) -> HashSet<String> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..rounds)
            .map(|_| service.plant_for_season(season, &mut rng).unwrap().unwrap().name)
            .collect()
    }

    #[test]
    fn seasonal_picks_come_from_matching_set() {
        let service = DailyService::new(seeded_db());

        let expected: [(Season, &[&str]); 4] = [
            (Season::Spring, &["玫瑰", "四季海棠", "跨年花", "多季节花"]),
            (Season::Summer, &["玫瑰", "向日葵", "四季海棠"]),
            (Season::Autumn, &["菊花", "四季海棠", "多季节花"]),
            (Season::Winter, &["梅花", "四季海棠", "跨年花"]),
        ];

        for (season, allowed) in expected {
            let seen = picks(&service, season, 50);
            for name in &seen {
                assert!(
                    allowed.contains(&name.as_str()),
                    "{} is not in bloom in {}",
                    name,
                    season
                );
            }
        }
    }

    #[test]
    fn cross_year_range_matches_winter_and_spring() {
        let db = Database::open_in_memory().unwrap();
        db.insert_plant(&Plant::new("跨年花").with_bloom("冬-春")).unwrap();
        db.insert_plant(&Plant::new("菊花").with_bloom("秋")).unwrap();
        let service = DailyService::new(db);

        assert_eq!(picks(&service, Season::Winter, 10), HashSet::from(["跨年花".to_string()]));
        assert_eq!(picks(&service, Season::Spring, 10), HashSet::from(["跨年花".to_string()]));
    }

    #[test]
    fn falls_back_to_random_when_nothing_blooms() {
        let db = Database::open_in_memory().unwrap();
        db.insert_plant(&Plant::new("无花植物1").with_bloom("")).unwrap();
        db.insert_plant(&Plant::new("无花植物2")).unwrap();
        let service = DailyService::new(db);

        let mut rng = StdRng::seed_from_u64(7);
        for season in Season::all() {
            let plant = service.plant_for_season(*season, &mut rng).unwrap();
            assert!(plant.is_some());
        }
    }

    #[test]
    fn empty_database_yields_none() {
        let service = DailyService::new(Database::open_in_memory().unwrap());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(service.random_plant(&mut rng).unwrap().is_none());
        assert!(service
            .plant_for_season(Season::Spring, &mut rng)
            .unwrap()
            .is_none());
    }

    #[test]
    fn random_plant_covers_table() {
        let service = DailyService::new(seeded_db());
        let mut rng = StdRng::seed_from_u64(3);
        let seen: HashSet<String> = (0..200)
            .filter_map(|_| service.random_plant(&mut rng).unwrap())
            .map(|p| p.name)
            .collect();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn plant_of_the_day_uses_month_season() {
        let db = Database::open_in_memory().unwrap();
        db.insert_plant(&Plant::new("菊花").with_bloom("秋")).unwrap();
        db.insert_plant(&Plant::new("梅花").with_bloom("冬")).unwrap();
        let service = DailyService::new(db);
        let mut rng = StdRng::seed_from_u64(9);

        let october = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        let january = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        for _ in 0..10 {
            assert_eq!(
                service.plant_of_the_day(october, &mut rng).unwrap().unwrap().name,
                "菊花"
            );
            assert_eq!(
                service.plant_of_the_day(january, &mut rng).unwrap().unwrap().name,
                "梅花"
            );
        }
    }
}
