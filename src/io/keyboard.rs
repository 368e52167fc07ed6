//! Default computer-keyboard piano layout.
//!
//! The bottom two letter rows cover the octave below A440 (`n` is A), and
//! the number row with the top letter row continues upward like the black
//! and white keys of a piano.

use crossterm::event::KeyCode;

/// `(key, half steps from A440)` for every bound key.
pub fn default_layout() -> Vec<(KeyCode, i32)> {
    const LOWER: [char; 12] = ['z', 's', 'x', 'd', 'c', 'v', 'g', 'b', 'h', 'n', 'j', 'm'];
    const MIDDLE: [char; 12] = ['q', '2', 'w', '3', 'e', 'r', '5', 't', '6', 'y', '7', 'u'];
    const UPPER: [char; 8] = ['i', '9', 'o', '0', 'p', '[', '=', ']'];

    let chars = LOWER.iter().chain(&MIDDLE).chain(&UPPER);
    let mut layout: Vec<(KeyCode, i32)> = chars
        .zip(-9..)
        .map(|(&c, offset)| (KeyCode::Char(c), offset))
        .collect();

    layout.push((KeyCode::Backspace, 23));
    // Keyboards disagree on what sits beside ']'; both reach the top C.
    layout.push((KeyCode::Char('\\'), 24));
    layout.push((KeyCode::Enter, 24));
    layout
}

/// Fold shifted letters onto their unshifted key.
pub fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Short human-readable name for a key.
pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn layout_spans_three_octaves() {
        let layout = default_layout();
        assert_eq!(layout.len(), 35);

        let map: HashMap<_, _> = layout.into_iter().collect();
        assert_eq!(map[&KeyCode::Char('z')], -9);
        assert_eq!(map[&KeyCode::Char('n')], 0);
        assert_eq!(map[&KeyCode::Char('m')], 2);
        assert_eq!(map[&KeyCode::Char('q')], 3);
        assert_eq!(map[&KeyCode::Char('u')], 14);
        assert_eq!(map[&KeyCode::Char('i')], 15);
        assert_eq!(map[&KeyCode::Char(']')], 22);
        assert_eq!(map[&KeyCode::Backspace], 23);
        assert_eq!(map[&KeyCode::Char('\\')], 24);
        assert_eq!(map[&KeyCode::Enter], 24);
    }

    #[test]
    fn shifted_letters_fold_down() {
        assert_eq!(normalize(KeyCode::Char('N')), KeyCode::Char('n'));
        assert_eq!(normalize(KeyCode::Char('[')), KeyCode::Char('['));
        assert_eq!(normalize(KeyCode::Enter), KeyCode::Enter);
    }
}
