use eframe::egui;

/// Cmd+Enter on macOS, Ctrl+Enter elsewhere.
pub fn is_submit_chord(modifiers: egui::Modifiers, key: egui::Key) -> bool {
    key == egui::Key::Enter && modifiers.command && !modifiers.alt && !modifiers.shift
}

/// Removes a pending submit chord from this frame's input so the focused text
/// editor does not also insert a newline. Returns whether one was pressed.
pub fn take_submit_shortcut(input: &mut egui::InputState) -> bool {
    let before = input.events.len();
    input.events.retain(|event| {
        !matches!(
            event,
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } if is_submit_chord(*modifiers, *key)
        )
    });
    input.events.len() != before
}
