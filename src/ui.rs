use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use dynimg::domain::PlaceholderKind;

use crate::model::{Model, UIData};

pub const STATUSLINE_HEIGHT: u16 = 1;

#[derive(Debug, Default)]
pub struct TableUI {
    state: TableState,
}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let data = model.get_uidata();
        let [main, statusline] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        let block = Block::bordered()
            .title(Line::from(data.title.clone().bold()).centered())
            .title_bottom(Line::from(vec![
                " Help ".into(),
                "<?>".blue().bold(),
                " Quit ".into(),
                "<q> ".blue().bold(),
            ]).centered())
            .border_set(border::THICK);

        match &data.placeholder {
            Some(placeholder) => {
                let text = match placeholder.kind {
                    PlaceholderKind::NoData => placeholder.message.clone().italic(),
                    PlaceholderKind::Error => placeholder.message.clone().red().bold(),
                };
                frame.render_widget(Paragraph::new(Line::from(text).centered()).block(block), main);
            }
            None => self.draw_table(&data, block, frame, main),
        }

        frame.render_widget(Paragraph::new(data.status_message.clone().yellow()), statusline);

        if data.show_popup {
            Self::draw_popup(&data.popup_message, frame);
        }
    }

    fn draw_table(&mut self, data: &UIData, block: Block, frame: &mut Frame, area: Rect) {
        let header = Row::new(data.header.iter().map(|h| Cell::from(h.bold())));
        let rows = data
            .rows
            .iter()
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));
        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(12),
            Constraint::Percentage(22),
            Constraint::Percentage(10),
            Constraint::Percentage(10),
            Constraint::Percentage(16),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::new().reversed());

        self.state.select(Some(data.selected_row));
        frame.render_stateful_widget(table, area, &mut self.state);
    }

    fn draw_popup(message: &str, frame: &mut Frame) {
        let [area] = Layout::vertical([Constraint::Percentage(60)])
            .flex(Flex::Center)
            .areas(frame.area());
        let [area] = Layout::horizontal([Constraint::Percentage(50)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(message.to_string())
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(" Help ").border_set(border::THICK)),
            area,
        );
    }
}
