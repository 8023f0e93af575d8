/// Keys the engines react to. Everything else is text input handled by the
/// host's editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
	Up,
	Down,
	Enter,
	Escape,
	Tab,
}
