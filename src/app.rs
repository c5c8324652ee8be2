use crate::db::Database;
use crate::error::Result;
use crate::logic::catalog::filter_plants;
use crate::logic::{CatalogService, DailyService, ALL_CATEGORIES};
use crate::models::{Plant, RecognitionResult, Season};
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Today,
    Encyclopedia,
    Detail,
    Identify,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Today),
            '2' => Some(Screen::Encyclopedia),
            '3' => Some(Screen::Identify),
            _ => None,
        }
    }
}

pub struct EncyclopediaState {
    pub selected_index: usize,
    pub category_index: usize,
    pub search: String,
    pub searching: bool,
}

impl EncyclopediaState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            category_index: 0,
            search: String::new(),
            searching: false,
        }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn next_category(&mut self, count: usize) {
        if count > 0 {
            self.category_index = (self.category_index + 1) % count;
            self.selected_index = 0;
        }
    }

    pub fn prev_category(&mut self, count: usize) {
        if count > 0 {
            self.category_index = (self.category_index + count - 1) % count;
            self.selected_index = 0;
        }
    }
}

pub struct IdentifyState {
    pub path_buffer: String,
    pub editing: bool,
    pub result: Option<RecognitionResult>,
    pub selected_index: usize,
    pub processing: bool,
}

impl IdentifyState {
    pub fn new() -> Self {
        Self {
            path_buffer: String::new(),
            editing: false,
            result: None,
            selected_index: 0,
            processing: false,
        }
    }

    pub fn next(&mut self) {
        let max = self.result.as_ref().map(|r| r.result.len()).unwrap_or(0);
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn set_result(&mut self, result: RecognitionResult) {
        self.result = Some(result);
        self.selected_index = 0;
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,

    // Data
    pub season: Season,
    pub today_plant: Option<Plant>,
    pub plants: Vec<Plant>,
    pub categories: Vec<String>,
    pub detail_plant: Option<Plant>,

    // Screen states
    pub encyclopedia_state: EncyclopediaState,
    pub identify_state: IdentifyState,
    detail_return: Screen,

    // Services
    pub catalog: CatalogService,
    pub daily: DailyService,

    // UI state
    pub status_message: Option<String>,
    pub needs_recognition: bool,
    pub needs_capture: bool,
}

impl App {
    pub fn new(db: Database) -> Result<Self> {
        let catalog = CatalogService::new(db.clone());
        let daily = DailyService::new(db);

        let plants = catalog.all_plants()?;
        let categories = catalog.categories_with_all()?;
        tracing::info!(plants = plants.len(), categories = categories.len() - 1, "Loaded encyclopedia");

        Ok(Self {
            screen: Screen::Today,
            should_quit: false,
            season: Season::current(),
            today_plant: None,
            plants,
            categories,
            detail_plant: None,
            encyclopedia_state: EncyclopediaState::new(),
            identify_state: IdentifyState::new(),
            detail_return: Screen::Encyclopedia,
            catalog,
            daily,
            status_message: None,
            needs_recognition: false,
            needs_capture: false,
        })
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Pick a new plant of the day for today's season.
    pub fn load_today_plant(&mut self) -> Result<()> {
        let mut rng = rand::rng();
        self.today_plant = self
            .daily
            .plant_of_the_day(Local::now().date_naive(), &mut rng)?;
        if self.today_plant.is_none() {
            self.set_status("The plant database is empty - run `dailyplant import`");
        }
        Ok(())
    }

    pub fn reload_plants(&mut self) -> Result<()> {
        self.plants = self.catalog.all_plants()?;
        self.categories = self.catalog.categories_with_all()?;
        if self.encyclopedia_state.category_index >= self.categories.len() {
            self.encyclopedia_state.category_index = 0;
        }
        self.encyclopedia_state.selected_index = 0;
        Ok(())
    }

    pub fn selected_category(&self) -> &str {
        self.categories
            .get(self.encyclopedia_state.category_index)
            .map(String::as_str)
            .unwrap_or(ALL_CATEGORIES)
    }

    pub fn filtered_plants(&self) -> Vec<Plant> {
        filter_plants(
            &self.plants,
            &self.encyclopedia_state.search,
            self.selected_category(),
        )
    }

    pub fn show_detail(&mut self, plant: Plant) {
        self.detail_return = self.screen;
        self.detail_plant = Some(plant);
        self.screen = Screen::Detail;
    }

    pub fn close_detail(&mut self) {
        self.screen = self.detail_return;
    }

    pub fn open_selected_plant(&mut self) {
        let plants = self.filtered_plants();
        if let Some(plant) = plants.get(self.encyclopedia_state.selected_index) {
            self.show_detail(plant.clone());
        }
    }

    pub fn request_recognition(&mut self) {
        if self.identify_state.path_buffer.trim().is_empty() {
            self.set_status("Enter an image path first");
            return;
        }
        self.needs_recognition = true;
        self.identify_state.processing = true;
        self.set_status("Recognizing...");
    }

    pub fn request_capture(&mut self) {
        self.needs_capture = true;
        self.identify_state.processing = true;
        self.set_status("Starting camera...");
    }

    /// Look up the selected recognition candidate in the local encyclopedia.
    pub fn open_selected_candidate(&mut self) {
        let Some(name) = self
            .identify_state
            .result
            .as_ref()
            .and_then(|r| r.result.get(self.identify_state.selected_index))
            .map(|item| item.name.clone())
        else {
            return;
        };

        match self.plants.iter().find(|p| p.name == name).cloned() {
            Some(plant) => self.show_detail(plant),
            None => self.set_status(&format!("{} is not in the encyclopedia", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlantItem;

    fn app() -> App {
        let db = Database::open_in_memory().unwrap();
        db.insert_plants(&[
            Plant::new("Tulip").with_category("Bulb").with_bloom("春"),
            Plant::new("Aster").with_category("Perennial").with_bloom("秋"),
            Plant::new("Crocus").with_category("Bulb").with_bloom("冬-春"),
        ])
        .unwrap();
        App::new(db).unwrap()
    }

    #[test]
    fn screen_keys() {
        assert_eq!(Screen::from_key('1'), Some(Screen::Today));
        assert_eq!(Screen::from_key('2'), Some(Screen::Encyclopedia));
        assert_eq!(Screen::from_key('3'), Some(Screen::Identify));
        assert_eq!(Screen::from_key('x'), None);
    }

    #[test]
    fn category_cycling_filters_plants() {
        let mut app = app();
        assert_eq!(app.selected_category(), ALL_CATEGORIES);
        assert_eq!(app.filtered_plants().len(), 3);

        let count = app.categories.len();
        app.encyclopedia_state.next_category(count);
        assert_eq!(app.selected_category(), "Bulb");
        let names: Vec<String> = app.filtered_plants().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Crocus", "Tulip"]);

        app.encyclopedia_state.prev_category(count);
        app.encyclopedia_state.prev_category(count);
        assert_eq!(app.selected_category(), "Perennial");
    }

    #[test]
    fn detail_returns_to_previous_screen() {
        let mut app = app();
        app.switch_screen(Screen::Encyclopedia);
        app.encyclopedia_state.next(3);
        app.open_selected_plant();
        assert_eq!(app.screen, Screen::Detail);
        assert_eq!(app.detail_plant.as_ref().unwrap().name, "Crocus");

        app.close_detail();
        assert_eq!(app.screen, Screen::Encyclopedia);
    }

    #[test]
    fn recognition_requires_a_path() {
        let mut app = app();
        app.request_recognition();
        assert!(!app.needs_recognition);

        app.identify_state.path_buffer = "/tmp/photo.jpg".into();
        app.request_recognition();
        assert!(app.needs_recognition);
        assert!(app.identify_state.processing);
    }

    #[test]
    fn candidate_lookup_uses_encyclopedia() {
        let mut app = app();
        app.switch_screen(Screen::Identify);
        app.identify_state.set_result(RecognitionResult {
            log_id: 1,
            result: vec![
                PlantItem {
                    name: "Sunflower".into(),
                    score: 0.9,
                    baike_info: None,
                },
                PlantItem {
                    name: "Aster".into(),
                    score: 0.1,
                    baike_info: None,
                },
            ],
        });

        app.open_selected_candidate();
        assert_eq!(app.screen, Screen::Identify);
        assert!(app.status_message.as_deref().unwrap().contains("Sunflower"));

        app.identify_state.next();
        app.open_selected_candidate();
        assert_eq!(app.screen, Screen::Detail);
        app.close_detail();
        assert_eq!(app.screen, Screen::Identify);
    }

    #[test]
    fn today_plant_is_loaded() {
        let mut app = app();
        app.load_today_plant().unwrap();
        assert!(app.today_plant.is_some());
    }
}
