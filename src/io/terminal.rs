//! crossterm-backed keyboard input.
//!
//! Most terminals only report key presses. Where the keyboard enhancement
//! protocol is available we ask for release events too. A key that has never
//! reported a release is treated as released once its auto-repeat stops
//! arriving.

use std::{
    collections::{HashMap, HashSet},
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use tracing::{debug, warn};

use crate::{
    error::Result,
    io::{
        input::{InputEvent, InputSource},
        keyboard::normalize,
    },
};

/// How long a key without release reporting stays down after its last repeat.
///
/// Longer than the usual 500 ms initial auto-repeat delay.
pub const DEFAULT_HOLD_TIMEOUT: Duration = Duration::from_millis(600);

pub struct TerminalInput {
    /// Focus reporting was enabled and must be disabled on drop.
    focus_enabled: bool,
    /// Keyboard enhancement flags were pushed and must be popped on drop.
    flags_pushed: bool,
    /// Keys that have produced a real release; they never time out.
    releasing: HashSet<KeyCode>,
    hold_timeout: Duration,
    /// Held keys and when they were last pressed or repeated.
    held: HashMap<KeyCode, Instant>,
}

impl TerminalInput {
    /// Attach to the terminal. Raw mode should already be enabled.
    pub fn new() -> Result<Self> {
        let mut input = Self::detached();

        execute!(io::stdout(), EnableFocusChange)?;
        input.focus_enabled = true;

        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            // Without escape codes for all keys, Enter and Backspace send no release.
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )?;
            input.flags_pushed = true;
            debug!("keyboard enhancement enabled, using release events");
        } else {
            warn!(
                timeout_ms = DEFAULT_HOLD_TIMEOUT.as_millis() as u64,
                "terminal does not report key releases, inferring them from auto-repeat"
            );
        }

        Ok(input)
    }

    /// State machine only; touches no terminal.
    fn detached() -> Self {
        Self {
            focus_enabled: false,
            flags_pushed: false,
            releasing: HashSet::new(),
            hold_timeout: DEFAULT_HOLD_TIMEOUT,
            held: HashMap::new(),
        }
    }

    pub fn with_hold_timeout(mut self, timeout: Duration) -> Self {
        self.hold_timeout = timeout;
        self
    }

    fn translate(&mut self, event: Event, now: Instant, out: &mut Vec<InputEvent<KeyCode>>) {
        match event {
            Event::Key(key) => self.translate_key(key, now, out),
            Event::FocusLost => {
                out.extend(self.held.drain().map(|(code, _)| InputEvent::KeyUp(code)));
            }
            _ => {}
        }
    }

    fn translate_key(&mut self, key: KeyEvent, now: Instant, out: &mut Vec<InputEvent<KeyCode>>) {
        let is_ctrl_c = matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.kind == KeyEventKind::Press && (is_ctrl_c || key.code == KeyCode::Esc) {
            out.push(InputEvent::Quit);
            return;
        }

        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press => {
                // Without release reporting, auto-repeat arrives as presses.
                if self.held.insert(code, now).is_none() {
                    out.push(InputEvent::KeyDown(code));
                }
            }
            KeyEventKind::Repeat => {
                if let Some(seen) = self.held.get_mut(&code) {
                    *seen = now;
                }
            }
            KeyEventKind::Release => {
                self.releasing.insert(code);
                if self.held.remove(&code).is_some() {
                    out.push(InputEvent::KeyUp(code));
                }
            }
        }
    }

    /// Release keys whose auto-repeat has gone quiet.
    fn expire(&mut self, now: Instant, out: &mut Vec<InputEvent<KeyCode>>) {
        let timeout = self.hold_timeout;
        let releasing = &self.releasing;
        self.held.retain(|&code, &mut seen| {
            if !releasing.contains(&code) && now.duration_since(seen) >= timeout {
                out.push(InputEvent::KeyUp(code));
                false
            } else {
                true
            }
        });
    }
}

impl InputSource for TerminalInput {
    type Key = KeyCode;

    fn poll_events(&mut self) -> Result<Vec<InputEvent<KeyCode>>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.translate(event, Instant::now(), &mut events);
        }
        self.expire(Instant::now(), &mut events);
        Ok(events)
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        if self.flags_pushed {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        if self.focus_enabled {
            let _ = execute!(io::stdout(), DisableFocusChange);
        }
    }
}
