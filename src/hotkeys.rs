//! Hotkey command table
//!
//! Translates raw key/mouse events delivered by the global input hook
//! into semantic commands, independent of the delivery mechanism so the
//! mapping is testable on its own. Every command except quit is gated on
//! the held modifier key. Key commands fire on release so holding a chord
//! does not auto-repeat.

use crate::capture::CaptureRect;

/// Keys the recorder reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The gating modifier (Ctrl on the reference hook)
    Modifier,
    Space,
    Enter,
    PageUp,
    PageDown,
    Left,
    Right,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Raw events as delivered by the global input hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    KeyDown(Key),
    KeyUp(Key),
    ButtonDown { button: MouseButton, x: i32, y: i32 },
    ButtonUp { button: MouseButton, x: i32, y: i32 },
}

/// Semantic commands produced by the table in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleRecording,
    ToggleVisibility,
    CycleFormatForward,
    CycleFormatBackward,
    RateDown,
    RateUp,
    /// Carries the unaligned bounding box of the drag; alignment happens
    /// when the region is written into the configuration.
    SelectRegion(CaptureRect),
    Quit,
}

/// Stateful event interpreter: tracks the modifier and a pending region
/// selection origin between button down and up.
#[derive(Debug, Default)]
pub struct CommandMap {
    modifier_held: bool,
    pending_origin: Option<(MouseButton, i32, i32)>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }

    /// Feed one raw event; returns the command it completes, if any.
    pub fn interpret(&mut self, event: RawInputEvent) -> Option<Command> {
        match event {
            RawInputEvent::KeyDown(Key::Modifier) => {
                self.modifier_held = true;
                None
            }
            RawInputEvent::KeyDown(_) => None,
            RawInputEvent::KeyUp(key) => self.key_released(key),
            RawInputEvent::ButtonDown { button, x, y } => {
                if self.modifier_held {
                    self.pending_origin = Some((button, x, y));
                }
                None
            }
            RawInputEvent::ButtonUp { button, x, y } => self.button_released(button, x, y),
        }
    }

    fn key_released(&mut self, key: Key) -> Option<Command> {
        if key == Key::Modifier {
            self.modifier_held = false;
            return None;
        }
        if key == Key::Escape {
            return Some(Command::Quit);
        }
        if !self.modifier_held {
            return None;
        }
        match key {
            Key::Space => Some(Command::ToggleRecording),
            Key::Enter => Some(Command::ToggleVisibility),
            Key::PageDown => Some(Command::CycleFormatForward),
            Key::PageUp => Some(Command::CycleFormatBackward),
            Key::Left => Some(Command::RateDown),
            Key::Right => Some(Command::RateUp),
            Key::Modifier | Key::Escape => None,
        }
    }

    fn button_released(&mut self, button: MouseButton, x: i32, y: i32) -> Option<Command> {
        let (origin_button, ox, oy) = self.pending_origin?;
        if origin_button != button {
            return None;
        }
        // The matching release always consumes the pending origin.
        self.pending_origin = None;
        if !self.modifier_held || (ox, oy) == (x, y) {
            return None;
        }
        Some(Command::SelectRegion(CaptureRect::from_corners(
            (ox, oy),
            (x, y),
        )))
    }
}
