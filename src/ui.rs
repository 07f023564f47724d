use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

use crate::domain::LVConfig;
use crate::model::{Model, PanelState, UIData};

pub const TOGGLE_HEIGHT: usize = 1;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const STATUSLINE_HEIGHT: usize = 1;
pub const MIN_CONTENT_HEIGHT: usize = 3;

pub struct PanelUI;

struct PanelView<'a> {
    data: &'a UIData,
}

impl PanelUI {
    pub fn new(_config: &LVConfig) -> Self {
        Self
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame<'_>) {
        frame.render_widget(
            PanelView {
                data: model.get_uidata(),
            },
            frame.area(),
        );
    }
}

impl Widget for PanelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let panel_height = std::cmp::min(self.data.layout.panel_height as u16, area.height);
        let [panel_area, content_area, status_area] = Layout::vertical([
            Constraint::Length(panel_height),
            Constraint::Min(0),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
        ])
        .areas(area);

        self.render_panel(panel_area, buf);
        self.render_content(content_area, buf);
        self.render_statusline(status_area, buf);

        if self.data.show_popup {
            self.render_popup(area, buf);
        }
    }
}

impl PanelView<'_> {
    fn render_panel(&self, area: Rect, buf: &mut Buffer) {
        let toggle = match self.data.panel {
            PanelState::SHOWN => "▲ Hide ".blue().bold(),
            PanelState::HIDDEN => "▼ Show ".blue().bold(),
        };
        let mut lines = vec![Line::from(vec![
            toggle,
            self.data.name.clone().yellow(),
        ])];

        if self.data.panel == PanelState::SHOWN && !self.data.table.is_empty() {
            let header = self
                .data
                .table
                .iter()
                .map(|c| Span::from(cell_text(&c.name, c.width)).bold())
                .collect::<Vec<Span<'_>>>();
            lines.push(Line::from(header));

            let visible_rows = self.data.table[0].data.len();
            for ridx in 0..visible_rows {
                let row = self
                    .data
                    .table
                    .iter()
                    .map(|c| Span::from(cell_text(&c.data[ridx], c.width)))
                    .collect::<Vec<Span<'_>>>();
                let mut line = Line::from(row);
                if ridx == self.data.selected_row {
                    line = line.reversed();
                }
                lines.push(line);
            }
        }

        Paragraph::new(Text::from(lines)).render(area, buf);
    }

    fn render_content(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.data.content.as_str())
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    fn render_statusline(&self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            self.data.status_message.clone().dim(),
            "  ? Help  q Quit".into(),
        ]);
        Paragraph::new(line).render(area, buf);
    }

    fn render_popup(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(40, 14, area);
        Clear.render(popup, buf);
        Paragraph::new(self.data.popup_message.as_str())
            .block(Block::bordered().title(Line::from(" Help ".bold()).centered()))
            .render(popup, buf);
    }
}

// Pad or truncate a cell to its column width plus one spacer character
fn cell_text(value: &str, width: usize) -> String {
    let truncated = value.chars().take(width).collect::<String>();
    format!("{truncated:<width$} ")
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = std::cmp::min(width, area.width);
    let height = std::cmp::min(height, area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
