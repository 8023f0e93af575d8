use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use throbber_widgets_tui::Throbber;

use super::App;
use super::fields::Row;

const KEY_HINTS: &str = "↑/↓ move · Enter select · Esc close/quit · Ctrl-U clear";

fn muted() -> Style {
	Style::default().fg(Color::DarkGray)
}

impl App {
	pub(crate) fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});
		let banner = self.field.banner().map(str::to_string);

		let layout = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(3),
				Constraint::Length(u16::from(banner.is_some())),
				Constraint::Min(1),
				Constraint::Length(1),
			])
			.split(area);

		self.render_input(frame, layout[0]);
		if let Some(text) = banner {
			let line = Line::from(vec![
				Span::styled(text, Style::default().fg(Color::Red)),
				Span::styled("  (Ctrl-D to dismiss)", muted()),
			]);
			frame.render_widget(Paragraph::new(line), layout[1]);
		}
		let lines: Vec<Line> = self.field.rows().into_iter().map(row_line).collect();
		frame.render_widget(Paragraph::new(lines), layout[2]);
		frame.render_widget(Paragraph::new(Span::styled(KEY_HINTS, muted())), layout[3]);
	}

	fn render_input(&self, frame: &mut Frame, area: Rect) {
		let block = Block::default()
			.borders(Borders::ALL)
			.title(format!(" {} ", self.title));
		let inner = block.inner(area);
		frame.render_widget(block, area);

		let mut line = Line::from(vec![
			Span::raw(self.field.query().to_string()),
			Span::styled("▏", muted()),
		]);
		if self.field.is_loading() {
			let spinner = Throbber::default().style(muted()).throbber_style(muted());
			line.spans.push(Span::raw(" "));
			line.spans.push(spinner.to_symbol_span(&self.throbber_state));
		}
		frame.render_widget(Paragraph::new(line), inner);
	}
}

fn row_line(row: Row) -> Line<'static> {
	match row {
		Row::Header(label) => Line::from(Span::styled(
			label,
			Style::default().add_modifier(Modifier::BOLD),
		)),
		Row::Hint(text) => Line::from(Span::styled(text, muted())),
		Row::Item {
			label,
			detail,
			highlighted,
			create,
		} => {
			let marker = if highlighted { "> " } else { "  " };
			let mut label_style = Style::default();
			if create {
				label_style = label_style.add_modifier(Modifier::ITALIC);
			}
			if highlighted {
				label_style = label_style.add_modifier(Modifier::REVERSED);
			}
			let mut spans = vec![Span::raw(marker), Span::styled(label, label_style)];
			if let Some(detail) = detail {
				spans.push(Span::styled(format!("  {detail}"), muted()));
			}
			Line::from(spans)
		}
	}
}
