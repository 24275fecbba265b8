/// Keyboard equivalents for the viewer's buttons, resolved independently of
/// the toolkit's key event types.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Escape,
    F1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Accept,
    Rotate,
    Clear,
    Skip,
    Help,
    Exit,
}

pub fn resolve_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Character('a') => Some(ShortcutAction::Accept),
        ShortcutKey::Character('r') => Some(ShortcutAction::Rotate),
        ShortcutKey::Character('c') => Some(ShortcutAction::Clear),
        ShortcutKey::Character('q') => Some(ShortcutAction::Skip),
        ShortcutKey::Character('h') => Some(ShortcutAction::Help),
        ShortcutKey::F1 => Some(ShortcutAction::Help),
        ShortcutKey::Escape => Some(ShortcutAction::Exit),
        ShortcutKey::Character(_) => None,
    }
}
