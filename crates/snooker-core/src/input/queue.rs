/// Raw input as the page reports it, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// `held` is true while a button is down (a drag).
    PointerMove { x: f32, y: f32, held: bool },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
}

/// A keyboard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    StandardLayout,
    RandomReds,
    AllRandom,
    ToggleAimAssist,
    Reset,
}

impl KeyAction {
    /// Map a DOM key code (or character code) to a command.
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match char::from_u32(key_code)?.to_ascii_uppercase() {
            '1' => Some(KeyAction::StandardLayout),
            '2' => Some(KeyAction::RandomReds),
            '3' => Some(KeyAction::AllRandom),
            'A' => Some(KeyAction::ToggleAimAssist),
            'R' => Some(KeyAction::Reset),
            _ => None,
        }
    }
}

/// Events pushed by the page between frames, drained once per frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
