//! Input intents
//!
//! Keyboard and on-screen controls feed the same intents. Each source keeps
//! its own held set so releasing a key doesn't cancel a finger still on a
//! button. Start is one-shot and cleared after every frame; a fresh press of any
//! control also requests it, so the first interaction starts a game.

use crate::sim::TickInput;

/// A steering/firing intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    RotateLeft,
    RotateRight,
    Thrust,
    Fire,
    Start,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::RotateLeft,
        Control::RotateRight,
        Control::Thrust,
        Control::Fire,
        Control::Start,
    ];

    /// DOM id of the on-screen button for this control
    pub fn element_id(&self) -> &'static str {
        match self {
            Control::RotateLeft => "btn-left",
            Control::RotateRight => "btn-right",
            Control::Thrust => "btn-thrust",
            Control::Fire => "btn-fire",
            Control::Start => "btn-start",
        }
    }

    /// Keyboard binding (`KeyboardEvent.key` values)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Control::RotateLeft),
            "ArrowRight" | "d" | "D" => Some(Control::RotateRight),
            "ArrowUp" | "w" | "W" => Some(Control::Thrust),
            " " | "Spacebar" => Some(Control::Fire),
            "Enter" => Some(Control::Start),
            _ => None,
        }
    }

    fn held_index(&self) -> Option<usize> {
        match self {
            Control::RotateLeft => Some(0),
            Control::RotateRight => Some(1),
            Control::Thrust => Some(2),
            Control::Fire => Some(3),
            Control::Start => None,
        }
    }
}

/// Where an input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Pointer,
}

/// Current intents, accumulated from DOM events between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keyboard: [bool; 4],
    pointer: [bool; 4],
    start: bool,
}

impl InputState {
    /// Hold `control`. A fresh press (not a key repeat) also requests start,
    /// which the game only acts on outside of play.
    pub fn press(&mut self, source: InputSource, control: Control) {
        match control.held_index() {
            Some(idx) => {
                let held = self.held_mut(source);
                let fresh = !held[idx];
                held[idx] = true;
                if fresh {
                    self.start = true;
                }
            }
            None => self.start = true,
        }
    }

    pub fn release(&mut self, source: InputSource, control: Control) {
        if let Some(idx) = control.held_index() {
            self.held_mut(source)[idx] = false;
        }
    }

    /// Handle a `keydown`. Returns true if the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.press(InputSource::Keyboard, control);
                true
            }
            None => false,
        }
    }

    /// Handle a `keyup`. Returns true if the key is bound.
    pub fn key_up(&mut self, key: &str) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.release(InputSource::Keyboard, control);
                true
            }
            None => false,
        }
    }

    /// Drop every held intent (focus lost)
    pub fn release_all(&mut self) {
        self.keyboard = [false; 4];
        self.pointer = [false; 4];
    }

    pub fn is_held(&self, control: Control) -> bool {
        control
            .held_index()
            .is_some_and(|idx| self.keyboard[idx] || self.pointer[idx])
    }

    /// Snapshot for this frame's tick
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            rotate_left: self.is_held(Control::RotateLeft),
            rotate_right: self.is_held(Control::RotateRight),
            thrust: self.is_held(Control::Thrust),
            fire: self.is_held(Control::Fire),
            start: self.start,
        }
    }

    /// Clear one-shot inputs after they have been ticked
    pub fn clear_one_shots(&mut self) {
        self.start = false;
    }

    fn held_mut(&mut self, source: InputSource) -> &mut [bool; 4] {
        match source {
            InputSource::Keyboard => &mut self.keyboard,
            InputSource::Pointer => &mut self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        let mut input = InputState::default();
        assert!(input.key_down("ArrowLeft"));
        assert!(input.key_down("w"));
        assert!(input.key_down(" "));
        assert!(!input.key_down("q"));

        input.clear_one_shots();
        let tick = input.to_tick_input();
        assert!(tick.rotate_left && tick.thrust && tick.fire);
        assert!(!tick.rotate_right && !tick.start);

        input.key_up("ArrowLeft");
        assert!(!input.to_tick_input().rotate_left);
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut input = InputState::default();
        input.key_down("Enter");
        assert!(input.to_tick_input().start);
        input.clear_one_shots();
        assert!(!input.to_tick_input().start);
    }

    #[test]
    fn test_sources_are_independent() {
        let mut input = InputState::default();
        input.press(InputSource::Pointer, Control::Fire);
        input.key_down(" ");
        input.key_up(" ");
        assert!(input.to_tick_input().fire);
        input.release(InputSource::Pointer, Control::Fire);
        assert!(!input.to_tick_input().fire);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::default();
        input.key_down("ArrowUp");
        input.press(InputSource::Pointer, Control::RotateRight);
        input.release_all();
        input.clear_one_shots();
        assert_eq!(input.to_tick_input(), TickInput::default());
    }

    #[test]
    fn test_first_press_of_any_control_requests_start() {
        let mut input = InputState::default();
        input.key_down(" ");
        assert!(input.to_tick_input().start);
        input.clear_one_shots();

        // Auto-repeat keydowns while held do not
        input.key_down(" ");
        assert!(!input.to_tick_input().start);

        input.key_up(" ");
        input.key_down(" ");
        assert!(input.to_tick_input().start);
        input.clear_one_shots();

        input.press(InputSource::Pointer, Control::Thrust);
        assert!(input.to_tick_input().start);
    }

    #[test]
    fn test_every_control_has_a_button() {
        let mut ids: Vec<&str> = Control::ALL.iter().map(|c| c.element_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Control::ALL.len());
    }
}
