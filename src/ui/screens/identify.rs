use crate::models::RecognitionResult;
use crate::ui::components::InputWidget;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

pub struct IdentifyScreen<'a> {
    pub path: &'a str,
    pub editing: bool,
    pub result: Option<&'a RecognitionResult>,
    pub selected_index: usize,
    pub processing: bool,
    pub camera_available: bool,
    pub status_message: Option<&'a str>,
}

impl<'a> IdentifyScreen<'a> {
    pub fn new(path: &'a str, result: Option<&'a RecognitionResult>) -> Self {
        Self {
            path,
            editing: false,
            result,
            selected_index: 0,
            processing: false,
            camera_available: false,
            status_message: None,
        }
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn processing(mut self, processing: bool) -> Self {
        self.processing = processing;
        self
    }

    pub fn camera_available(mut self, available: bool) -> Self {
        self.camera_available = available;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for IdentifyScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Path input
                Constraint::Min(8),    // Candidates + description
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        InputWidget::new("Image path", self.path)
            .placeholder("press [e] to enter a .jpg/.png/.bmp path")
            .focused(self.editing)
            .render(chunks[0], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);
        self.render_candidates(middle[0], buf);
        self.render_description(middle[1], buf);

        let status = if self.processing {
            Some("Working...")
        } else {
            self.status_message
        };
        if let Some(msg) = status {
            let style = if msg.contains("failed") {
                Theme::error()
            } else if msg.contains("not") || msg.contains("cancelled") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(chunks[2], buf);
        }

        let mut nav = vec![
            Span::styled("[e]", Theme::nav_key()),
            Span::styled("Edit path ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Identify ", Theme::nav_label()),
        ];
        if self.camera_available {
            nav.push(Span::styled("[c]", Theme::nav_key()));
            nav.push(Span::styled("Camera ", Theme::nav_label()));
        }
        nav.extend([
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Candidates ", Theme::nav_label()),
            Span::styled("[d]", Theme::nav_key()),
            Span::styled("Details ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back", Theme::nav_label()),
        ]);
        Paragraph::new(Line::from(nav)).render(chunks[3], buf);
    }
}

impl IdentifyScreen<'_> {
    fn render_candidates(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Candidates", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let Some(result) = self.result.filter(|r| !r.is_empty()) else {
            let text = if self.result.is_some() {
                "No matching plant found"
            } else {
                "Choose an image to identify"
            };
            Paragraph::new(Span::styled(text, Theme::dim()))
                .block(block)
                .render(area, buf);
            return;
        };

        let items: Vec<ListItem> = result
            .result
            .iter()
            .map(|item| {
                let score_style = Style::default().fg(Theme::confidence_color(item.score));
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>5.1}% ", item.confidence_percent()), score_style),
                    Span::styled(item.name.as_str(), Theme::normal()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Theme::selected());

        let mut state = ListState::default();
        state.select(Some(self.selected_index));
        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_description(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("About", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let item = self
            .result
            .and_then(|r| r.result.get(self.selected_index));

        let mut lines = Vec::new();
        if let Some(item) = item {
            lines.push(Line::from(Span::styled(item.name.as_str(), Theme::title())));
            lines.push(Line::from(""));
            match item.description() {
                Some(desc) => lines.push(Line::from(Span::styled(desc, Theme::normal()))),
                None => lines.push(Line::from(Span::styled("No encyclopedia entry", Theme::dim()))),
            }
            if let Some(url) = item
                .baike_info
                .as_ref()
                .and_then(|b| b.image_url.as_deref())
                .filter(|u| !u.is_empty())
            {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Image: ", Theme::dim()),
                    Span::styled(url, Theme::highlight()),
                ]));
            }
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
