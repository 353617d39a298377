use crate::geometry::Vec3;

/// Logical keys the session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    NextPlatform,
    ToggleObstacles,
}

impl Key {
    /// Map a host key label (DOM `KeyboardEvent.key` style) to a binding.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "ArrowUp" | "w" | "W" => Some(Key::Forward),
            "ArrowDown" | "s" | "S" => Some(Key::Back),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "n" | "N" => Some(Key::NextPlatform),
            "o" | "O" => Some(Key::ToggleObstacles),
            _ => None,
        }
    }
}

/// Held state of the four movement keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    /// Returns `false` for keys that are not movement keys.
    pub fn key_down(&mut self, key: Key) -> bool {
        self.set(key, true)
    }

    pub fn key_up(&mut self, key: Key) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: Key, held: bool) -> bool {
        match key {
            Key::Forward => self.up = held,
            Key::Back => self.down = held,
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::NextPlatform | Key::ToggleObstacles => return false,
        }
        true
    }

    /// Collapse the held keys into an intention.
    ///
    /// Opposing keys do not cancel: up wins over down, right wins over left.
    pub fn intention(&self) -> MovementIntention {
        let forward_back = if self.up {
            1
        } else if self.down {
            -1
        } else {
            0
        };
        let left_right = if self.right {
            1
        } else if self.left {
            -1
        } else {
            0
        };
        MovementIntention {
            forward_back,
            left_right,
        }
    }
}

/// Per-tick movement request; recomputed every tick and never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntention {
    /// +1 forward (-Z), -1 back (+Z).
    pub forward_back: i8,
    /// +1 right (+X), -1 left (-X).
    pub left_right: i8,
}

impl MovementIntention {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.forward_back == 0 && self.left_right == 0
    }

    /// Unit world-space travel direction on the XZ plane.
    pub fn direction(&self) -> Option<Vec3> {
        if self.is_idle() {
            return None;
        }
        let v = Vec3::new(f32::from(self.left_right), 0.0, -f32::from(self.forward_back));
        Some(v.normalize())
    }

    /// Torque that rolls a ball resting on a +Y floor toward `direction()`.
    ///
    /// Rolling along a direction `d` needs spin about `up x d`, so Z travel is
    /// driven by torque about X and X travel by torque about Z.
    pub fn torque(&self, speed: f32) -> Option<Vec3> {
        self.direction()
            .map(|d| Vec3::y().cross(&d) * speed)
            .filter(|t| t.iter().all(|v| v.is_finite()))
    }
}
