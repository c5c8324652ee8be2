use crate::models::{Plant, Season};
use crate::ui::components::{InputWidget, SelectWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Widget},
};

pub struct EncyclopediaScreen<'a> {
    pub plants: &'a [Plant],
    pub categories: &'a [String],
    pub category_index: usize,
    pub search: &'a str,
    pub searching: bool,
    pub selected_index: usize,
    pub season: Season,
}

impl<'a> EncyclopediaScreen<'a> {
    pub fn new(plants: &'a [Plant], categories: &'a [String], season: Season) -> Self {
        Self {
            plants,
            categories,
            category_index: 0,
            search: "",
            searching: false,
            selected_index: 0,
            season,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_category(mut self, index: usize) -> Self {
        self.category_index = index;
        self
    }

    pub fn with_search(mut self, search: &'a str, searching: bool) -> Self {
        self.search = search;
        self.searching = searching;
        self
    }
}

impl Widget for EncyclopediaScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search + category
                Constraint::Min(10),   // Table
                Constraint::Length(1), // Nav
            ])
            .split(area);

        self.render_filters(chunks[0], buf);
        self.render_table(chunks[1], buf);

        let nav = if self.searching {
            Line::from(vec![
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Done ", Theme::nav_label()),
                Span::styled("[Esc]", Theme::nav_key()),
                Span::styled("Clear", Theme::nav_label()),
            ])
        } else {
            Line::from(vec![
                Span::styled("[/]", Theme::nav_key()),
                Span::styled("Search ", Theme::nav_label()),
                Span::styled("[←→]", Theme::nav_key()),
                Span::styled("Category ", Theme::nav_label()),
                Span::styled("[↑↓]", Theme::nav_key()),
                Span::styled("Navigate ", Theme::nav_label()),
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Details ", Theme::nav_label()),
                Span::styled("[Esc]", Theme::nav_key()),
                Span::styled("Back", Theme::nav_label()),
            ])
        };
        Paragraph::new(nav).render(chunks[2], buf);
    }
}

impl EncyclopediaScreen<'_> {
    fn render_filters(&self, area: Rect, buf: &mut Buffer) {
        let parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        InputWidget::new("Search", self.search)
            .placeholder("name, description or season")
            .focused(self.searching)
            .render(parts[0], buf);

        SelectWidget::new("Category", self.categories, self.category_index)
            .focused(!self.searching)
            .render(parts[1], buf);
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let header_cells = ["Name", "Category", "Bloom", "Water"]
            .iter()
            .map(|h| Cell::from(*h).style(Theme::header()));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .plants
            .iter()
            .enumerate()
            .map(|(i, plant)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Theme::normal()
                };

                let bloom_style = if plant.blooms_in(self.season) {
                    Style::default().fg(self.season.color())
                } else {
                    Theme::dim()
                };

                Row::new(vec![
                    Cell::from(plant.name.as_str()),
                    Cell::from(plant.category.as_deref().unwrap_or("-")),
                    Cell::from(plant.season_bloom.as_deref().unwrap_or("-")).style(bloom_style),
                    Cell::from(truncate(plant.water.as_deref().unwrap_or("-"), 20)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(22),
        ];

        let title = format!("Plants ({})", self.plants.len());
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(Span::styled(title, Theme::title()))
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        state.select(Some(self.selected_index));

        ratatui::widgets::StatefulWidget::render(table, area, buf, &mut state);
    }
}

/// Truncate on character boundaries; plant data is mostly CJK text.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
