use crate::models::{Plant, Season};
use crate::ui::components::PlantCard;
use crate::ui::Theme;
use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct TodayScreen<'a> {
    pub plant: Option<&'a Plant>,
    pub season: Season,
    pub date: NaiveDate,
    pub status_message: Option<&'a str>,
}

impl<'a> TodayScreen<'a> {
    pub fn new(plant: Option<&'a Plant>, season: Season, date: NaiveDate) -> Self {
        Self {
            plant,
            season,
            date,
            status_message: None,
        }
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for TodayScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Plant card
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);

        match self.plant {
            Some(plant) => {
                PlantCard::new(plant, "Plant of the Day")
                    .in_season(self.season)
                    .render(chunks[1], buf);
            }
            None => {
                let block = Block::default()
                    .title(Span::styled("Plant of the Day", Theme::title()))
                    .borders(Borders::ALL)
                    .border_style(Theme::border());
                Paragraph::new(Span::styled("No plants available", Theme::dim()))
                    .block(block)
                    .render(chunks[1], buf);
            }
        }

        if let Some(msg) = self.status_message {
            let style = if msg.contains("failed") {
                Theme::error()
            } else if msg.contains("empty") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(chunks[2], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Today ", Theme::nav_label()),
            Span::styled("[2]", Theme::nav_key()),
            Span::styled("Encyclopedia ", Theme::nav_label()),
            Span::styled("[3]", Theme::nav_key()),
            Span::styled("Identify ", Theme::nav_label()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Another ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Details ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl TodayScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("DailyPlant", Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let info = Line::from(vec![
            Span::styled(self.date.format("%Y-%m-%d").to_string(), Theme::dim()),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", self.season.token(), self.season),
                Theme::season(self.season),
            ),
        ]);
        Paragraph::new(info).block(block).render(area, buf);
    }
}
