use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Widget},
};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::{App, Mode, Notice};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const HISTORY_ROWS: usize = 4;

/// Truncate `text` to at most `max_width` terminal columns, appending an
/// ellipsis when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1),                     // title
                    Constraint::Length(1),                     // settings
                    Constraint::Length(2),                     // countdown display
                    Constraint::Length(1),                     // status / task entry
                    Constraint::Min(3),                        // task checklist
                    Constraint::Length(HISTORY_ROWS as u16 + 3), // history
                    Constraint::Length(1),                     // key help
                ]
                .as_ref(),
            )
            .split(area);

        let title = Paragraph::new(Span::styled(
            "benkyo ⏳ study timer",
            Style::default().patch(bold_style).fg(Color::Magenta),
        ))
        .alignment(Alignment::Center);
        title.render(chunks[0], buf);

        let durations = &self.session.durations;
        let settings = Paragraph::new(Span::styled(
            format!(
                "focus {} min / break {} min",
                durations.focus_minutes(),
                durations.break_minutes()
            ),
            italic_style,
        ))
        .alignment(Alignment::Center);
        settings.render(chunks[1], buf);

        self.render_countdown(chunks[2], buf);
        self.render_status(chunks[3], buf);
        self.render_tasks(chunks[4], buf);
        self.render_history(chunks[5], buf);

        let help_text = match self.mode {
            Mode::EnteringTask => "(enter) add task / (esc) cancel",
            Mode::Normal => {
                "(s)tart (r)eset (w) save (a)dd task (space) done (j/k) select (+/-) focus ([/]) break (q)uit"
            }
        };
        let help = Paragraph::new(Span::styled(
            help_text,
            Style::default().patch(dim_style).patch(italic_style),
        ))
        .alignment(Alignment::Center);
        help.render(chunks[6], buf);
    }
}

impl App {
    fn render_countdown(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let line = if let Some(remaining) = self.remaining {
            Span::styled(
                remaining.to_string(),
                Style::default().patch(bold).fg(Color::Cyan),
            )
        } else if matches!(self.notice, Some(Notice::BreakTime)) {
            Span::styled(
                "⏰ 集中時間終了！休憩時間に入りましょう。",
                Style::default().patch(bold).fg(Color::Red),
            )
        } else {
            Span::styled(
                "タイマーが停止中です",
                Style::default().add_modifier(Modifier::DIM),
            )
        };

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let line = match (&self.mode, &self.notice) {
            (Mode::EnteringTask, _) => Span::styled(
                format!("new task: {}▏", self.task_input),
                Style::default().fg(Color::Yellow),
            ),
            (_, Some(Notice::Saved)) => Span::styled(
                format!("session saved to {}", self.store.path().display()),
                Style::default().fg(Color::Green),
            ),
            (_, Some(Notice::SaveFailed(reason))) => Span::styled(
                format!("save failed: {reason}"),
                Style::default().fg(Color::Red),
            ),
            _ => Span::raw(""),
        };

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_tasks(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title("tasks");

        if self.session.tasks.is_empty() {
            Paragraph::new(Span::styled(
                "no tasks yet - press (a) to add one",
                Style::default().add_modifier(Modifier::DIM),
            ))
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let max_text_width = area.width.saturating_sub(6) as usize;
        let items: Vec<ListItem> = self
            .session
            .tasks
            .iter()
            .map(|task| {
                let text = truncate_to_width(&task.text, max_text_width);
                if task.completed {
                    ListItem::new(Line::from(Span::styled(
                        format!("[x] {text}"),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )))
                } else {
                    ListItem::new(Line::from(Span::raw(format!("[ ] {text}"))))
                }
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected.min(self.session.tasks.len() - 1)));
        ratatui::widgets::StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let log = &self.session.log;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("history ({} sessions)", log.len()));

        if log.is_empty() {
            Paragraph::new(Span::styled(
                "no saved sessions",
                Style::default().add_modifier(Modifier::DIM),
            ))
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let header = Row::new(vec![Cell::from("date"), Cell::from("focus (min)")]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        // Most recent sessions at the bottom, matching the on-load sort.
        let rows: Vec<Row> = log
            .iter()
            .skip(log.len().saturating_sub(HISTORY_ROWS))
            .map(|record| {
                Row::new(vec![
                    Cell::from(record.date.format("%Y-%m-%d %H:%M").to_string()),
                    Cell::from(record.focus_time.to_string()),
                ])
            })
            .collect();

        Table::new(rows, &[Constraint::Length(18), Constraint::Length(12)])
            .header(header)
            .block(block)
            .render(area, buf);
    }
}
