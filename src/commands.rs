use crate::config::Config;
use crate::datasources::PlantApiClient;
use crate::db::Database;
use crate::error::{DailyPlantError, Result};
use crate::logic::{CameraCapture, CatalogService, DailyService, RecognitionService, ALL_CATEGORIES};
use crate::models::{Plant, RecognitionResult, Season};
use chrono::Local;
use std::path::{Path, PathBuf};

pub async fn check(config: &Config, db: &Database) -> Result<()> {
    println!("Database: {}", db.path().display());
    println!("  {} plants", db.count_plants()?);
    println!("  {} categories", db.get_distinct_categories()?.len());

    if config.recognition.is_configured() {
        let client = PlantApiClient::new(config.recognition.clone())?;
        match client.fetch_access_token().await {
            Ok(_) => println!("Recognition API: OK"),
            Err(e) => println!("Recognition API: FAILED ({})", e),
        }
    } else {
        println!("Recognition API: not configured");
    }

    let camera = CameraCapture::new(config.camera.clone());
    if camera.is_configured() {
        match camera.watch_dir().await {
            Ok(dir) => println!("Camera: watching {}", dir.display()),
            Err(e) => println!("Camera: FAILED ({})", e),
        }
    } else {
        println!("Camera: not configured");
    }

    Ok(())
}

pub fn today(db: &Database, season: Option<&str>) -> Result<()> {
    let daily = DailyService::new(db.clone());
    let mut rng = rand::rng();

    let plant = match season {
        Some(s) => {
            let season = Season::from_str(s)
                .ok_or_else(|| DailyPlantError::NotFound(format!("season '{}'", s)))?;
            daily.plant_for_season(season, &mut rng)?
        }
        None => daily.plant_of_the_day(Local::now().date_naive(), &mut rng)?,
    };

    match plant {
        Some(plant) => print_plant(&plant),
        None => println!("No plants in the database. Run `dailyplant import <file>` first."),
    }
    Ok(())
}

pub fn search(db: &Database, query: &str, category: Option<&str>) -> Result<()> {
    let catalog = CatalogService::new(db.clone());
    let plants = catalog.filtered_plants(query, category.unwrap_or(ALL_CATEGORIES))?;

    if plants.is_empty() {
        println!("No matching plants");
        return Ok(());
    }

    for plant in &plants {
        println!(
            "{:>5}  {:<20} {:<12} {}",
            plant.id.unwrap_or_default(),
            plant.name,
            plant.category.as_deref().unwrap_or("-"),
            plant.season_bloom.as_deref().unwrap_or("-"),
        );
    }
    println!("{} plants", plants.len());
    Ok(())
}

pub fn show(db: &Database, id: i64) -> Result<()> {
    let plant = db
        .get_plant(id)?
        .ok_or_else(|| DailyPlantError::NotFound(format!("plant #{}", id)))?;
    print_plant(&plant);
    Ok(())
}

pub fn categories(db: &Database) -> Result<()> {
    let catalog = CatalogService::new(db.clone());
    for category in catalog.categories_with_all()? {
        println!("{}", category);
    }
    Ok(())
}

pub async fn identify(config: &Config, image: Option<PathBuf>, camera: bool) -> Result<()> {
    if !config.recognition.is_configured() {
        return Err(DailyPlantError::Config(
            "Recognition API key and secret are not configured. Run `dailyplant init`.".into(),
        ));
    }

    let path = if camera {
        let capture = CameraCapture::new(config.camera.clone());
        println!("Opening camera, take a photo...");
        capture.capture().await?.ok_or_else(|| {
            DailyPlantError::Camera("No photo was taken before the timeout".into())
        })?
    } else {
        image.ok_or_else(|| DailyPlantError::InvalidImage("No image path given".into()))?
    };

    let service = RecognitionService::new(PlantApiClient::new(config.recognition.clone())?);
    let result = service.recognize_file(&path).await?;
    print_recognition(&result);
    Ok(())
}

pub fn import(db: &Database, file: &Path, replace: bool) -> Result<()> {
    let plants = read_plants_file(file)?;

    let inserted = if replace {
        let (removed, inserted) = db.replace_plants(&plants)?;
        tracing::info!(removed, "Cleared existing plants");
        inserted
    } else {
        db.insert_plants(&plants)?
    };

    println!("Imported {} plants into {}", inserted, db.path().display());
    Ok(())
}

pub fn read_plants_file(file: &Path) -> Result<Vec<Plant>> {
    let content = std::fs::read_to_string(file)?;
    let is_json = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    parse_plants(&content, is_json)
}

fn parse_plants(content: &str, is_json: bool) -> Result<Vec<Plant>> {
    let mut plants: Vec<Plant> = if is_json {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };

    // Ids are assigned by the database.
    for plant in &mut plants {
        plant.id = None;
    }

    if let Some(unnamed) = plants.iter().position(|p| p.name.trim().is_empty()) {
        return Err(DailyPlantError::Config(format!(
            "Plant #{} has no name",
            unnamed + 1
        )));
    }

    Ok(plants)
}

fn print_plant(plant: &Plant) {
    println!("{}", plant.name);
    let fields = [
        ("Category", &plant.category),
        ("Sowing", &plant.season_sowing),
        ("Bloom", &plant.season_bloom),
        ("Zone", &plant.zone),
        ("Water", &plant.water),
        ("Image", &plant.image),
    ];
    for (label, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            println!("  {:<9} {}", label, value);
        }
    }
    if let Some(desc) = plant.description.as_deref().filter(|d| !d.is_empty()) {
        println!();
        println!("{}", desc);
    }
}

fn print_recognition(result: &RecognitionResult) {
    let Some(best) = result.best_match() else {
        println!("No matching plant found");
        return;
    };

    println!("Best match: {} ({:.1}%)", best.name, best.confidence_percent());
    if let Some(desc) = best.description() {
        println!("{}", desc);
    }

    if result.result.len() > 1 {
        println!();
        println!("Other candidates:");
        for item in result.result.iter().skip(1) {
            println!("  {:>5.1}% {}", item.confidence_percent(), item.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_plants() {
        let yaml = r#"
- name: 玫瑰
  season_bloom: 春、夏
  category: 灌木
- name: 梅花
  season_bloom: 冬
  water: 少量
"#;
        let plants = parse_plants(yaml, false).unwrap();
        assert_eq!(plants.len(), 2);
        assert_eq!(plants[0].season_bloom.as_deref(), Some("春、夏"));
        assert_eq!(plants[1].water.as_deref(), Some("少量"));
        assert!(plants[1].category.is_none());
    }

    #[test]
    fn parses_json_and_drops_ids() {
        let json = r#"[{"id": 99, "name": "荷花", "season_bloom": "夏"}]"#;
        let plants = parse_plants(json, true).unwrap();
        assert_eq!(plants[0].id, None);
        assert_eq!(plants[0].name, "荷花");
    }

    #[test]
    fn rejects_unnamed_plants() {
        let err = parse_plants(r#"[{"name": "a"}, {"name": " "}]"#, true).unwrap_err();
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn import_inserts_into_database() {
        let dir = std::env::temp_dir().join(format!("dailyplant-import-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("plants.json");
        std::fs::write(&file, r#"[{"name": "菊花", "season_bloom": "秋"}]"#).unwrap();

        let db = Database::open_in_memory().unwrap();
        db.insert_plant(&Plant::new("旧植物")).unwrap();

        import(&db, &file, true).unwrap();
        let plants = db.get_all_plants().unwrap();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "菊花");
    }

    #[test]
    fn failed_replace_import_keeps_database() {
        let dir = std::env::temp_dir().join(format!("dailyplant-import-fail-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("plants.yaml");
        std::fs::write(&file, "- name: 菊花\n  seasonBloom: 秋\n").unwrap();

        let db = Database::open_in_memory().unwrap();
        db.insert_plant(&Plant::new("旧植物")).unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER no_inserts BEFORE INSERT ON Plant
                 BEGIN SELECT RAISE(ABORT, 'read only'); END;",
            )?;
            Ok(())
        })
        .unwrap();

        assert!(import(&db, &file, true).is_err());
        let plants = db.get_all_plants().unwrap();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "旧植物");
    }
}
