mod shortcut;

pub use shortcut::{resolve_shortcut, ShortcutAction, ShortcutKey};
