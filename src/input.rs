/// Point-in-time input snapshot consumed by the simulation.
///
/// The host records which keys are currently down; `InputTracker` turns
/// successive level states into edge-triggered "pressed this frame" flags.

/// One flag per logical control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub shield: bool,
    pub pause: bool,
    pub confirm: bool,
}

impl Keys {
    /// Flags set in `self` but not in `previous`.
    pub fn rising_from(&self, previous: &Keys) -> Keys {
        Keys {
            up: self.up && !previous.up,
            down: self.down && !previous.down,
            left: self.left && !previous.left,
            right: self.right && !previous.right,
            fire: self.fire && !previous.fire,
            shield: self.shield && !previous.shield,
            pause: self.pause && !previous.pause,
            confirm: self.confirm && !previous.confirm,
        }
    }
}

/// Cursor position in world pixels and primary button state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub primary: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keys down right now.
    pub held: Keys,
    /// Keys that went down since the previous snapshot.
    pub pressed: Keys,
    pub pointer: Option<Pointer>,
}

impl InputSnapshot {
    /// Snapshot with `held` keys down and no edges.
    pub fn holding(held: Keys) -> Self {
        InputSnapshot { held, pressed: Keys::default(), pointer: None }
    }

    /// Snapshot where `keys` were pressed this very frame.
    pub fn pressing(keys: Keys) -> Self {
        InputSnapshot { held: keys, pressed: keys, pointer: None }
    }

    /// Shield control: the shield key or the primary pointer button.
    pub fn shield_held(&self) -> bool {
        self.held.shield || self.pointer.map(|p| p.primary).unwrap_or(false)
    }
}

/// Derives edges from consecutive level states.
#[derive(Debug, Default)]
pub struct InputTracker {
    previous: Keys,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&mut self, held: Keys, pointer: Option<Pointer>) -> InputSnapshot {
        let pressed = held.rising_from(&self.previous);
        self.previous = held;
        InputSnapshot { held, pressed, pointer }
    }
}
