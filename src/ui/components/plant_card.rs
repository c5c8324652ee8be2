use crate::models::{Plant, Season};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Attributes panel plus description for a single plant.
pub struct PlantCard<'a> {
    plant: &'a Plant,
    title: &'a str,
    season: Option<Season>,
}

impl<'a> PlantCard<'a> {
    pub fn new(plant: &'a Plant, title: &'a str) -> Self {
        Self {
            plant,
            title,
            season: None,
        }
    }

    /// Mark whether the plant is in bloom for this season.
    pub fn in_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }
}

impl Widget for PlantCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(self.title, Theme::title()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let details_height = if self.plant.has_details() { 8 } else { 2 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(details_height), Constraint::Min(3)])
            .split(inner);

        self.render_details(chunks[0], buf);
        self.render_description(chunks[1], buf);
    }
}

impl PlantCard<'_> {
    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(&self.plant.name, Theme::header()))];

        if let Some(season) = self.season {
            let (text, style) = if self.plant.blooms_in(season) {
                (format!("In bloom this {}", season), Theme::season(season))
            } else {
                (format!("Not in bloom this {}", season), Theme::dim())
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        if self.plant.has_details() {
            let fields = [
                ("Category", &self.plant.category),
                ("Sowing", &self.plant.season_sowing),
                ("Bloom", &self.plant.season_bloom),
                ("Zone", &self.plant.zone),
                ("Water", &self.plant.water),
            ];
            for (label, value) in fields {
                if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{:<10}", label), Theme::dim()),
                        Span::styled(value, Theme::normal()),
                    ]));
                }
            }
        }

        Paragraph::new(lines).render(area, buf);
    }

    fn render_description(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();
        match self.plant.description.as_deref().filter(|d| !d.is_empty()) {
            Some(desc) => lines.push(Line::from(Span::styled(desc, Theme::normal()))),
            None => lines.push(Line::from(Span::styled("No description", Theme::dim()))),
        }
        if let Some(image) = self.plant.image.as_deref().filter(|i| !i.is_empty()) {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Image: ", Theme::dim()),
                Span::styled(image, Theme::highlight()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled("Description", Theme::header()))
            .borders(Borders::TOP)
            .border_style(Theme::border());

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
