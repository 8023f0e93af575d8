use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use seekbox_engine::NavKey;

/// What a terminal key means to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyAction {
	Nav(NavKey),
	Insert(char),
	Backspace,
	ClearQuery,
	DismissBanner,
	ClearHistory,
	Quit,
	Ignore,
}

pub(crate) fn map_key(key: KeyEvent) -> KeyAction {
	if key.modifiers.contains(KeyModifiers::CONTROL) {
		return match key.code {
			KeyCode::Char('c') => KeyAction::Quit,
			KeyCode::Char('u') => KeyAction::ClearQuery,
			KeyCode::Char('d') => KeyAction::DismissBanner,
			KeyCode::Char('r') => KeyAction::ClearHistory,
			KeyCode::Char('n') => KeyAction::Nav(NavKey::Down),
			KeyCode::Char('p') => KeyAction::Nav(NavKey::Up),
			_ => KeyAction::Ignore,
		};
	}

	match key.code {
		KeyCode::Up => KeyAction::Nav(NavKey::Up),
		KeyCode::Down => KeyAction::Nav(NavKey::Down),
		KeyCode::Enter => KeyAction::Nav(NavKey::Enter),
		KeyCode::Esc => KeyAction::Nav(NavKey::Escape),
		KeyCode::Tab => KeyAction::Nav(NavKey::Tab),
		KeyCode::Backspace => KeyAction::Backspace,
		KeyCode::Char(ch) => KeyAction::Insert(ch),
		_ => KeyAction::Ignore,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn plain(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	#[test]
	fn arrows_and_enter_become_navigation() {
		assert_eq!(map_key(plain(KeyCode::Down)), KeyAction::Nav(NavKey::Down));
		assert_eq!(map_key(plain(KeyCode::Enter)), KeyAction::Nav(NavKey::Enter));
		assert_eq!(map_key(plain(KeyCode::Esc)), KeyAction::Nav(NavKey::Escape));
	}

	#[test]
	fn control_chords_do_not_type() {
		let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
		assert_eq!(map_key(ctrl_c), KeyAction::Quit);
		let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
		assert_eq!(map_key(shifted), KeyAction::Insert('A'));
	}
}
