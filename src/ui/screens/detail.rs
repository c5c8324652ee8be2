use crate::models::{Plant, Season};
use crate::ui::components::PlantCard;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct DetailScreen<'a> {
    pub plant: &'a Plant,
    pub season: Season,
}

impl<'a> DetailScreen<'a> {
    pub fn new(plant: &'a Plant, season: Season) -> Self {
        Self { plant, season }
    }
}

impl Widget for DetailScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(1)])
            .split(area);

        PlantCard::new(self.plant, "Plant Details")
            .in_season(self.season)
            .render(chunks[0], buf);

        let nav = Line::from(vec![
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[1], buf);
    }
}
