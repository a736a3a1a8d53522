//! Global engine state shared by systems.

/// Whether the game is running or being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Play,
    Edit,
}

/// Engine-wide flags, stored as a [`World`](crate::ecs::World) resource.
///
/// Gameplay systems (particles included) do nothing while `paused` is set or
/// while in [`Mode::Edit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    pub paused: bool,
    pub mode: Mode,
    pub time_scale: f32,
}

impl EngineState {
    /// True when gameplay systems should step.
    pub fn is_running(&self) -> bool {
        !self.paused && self.mode == Mode::Play
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            paused: false,
            mode: Mode::Play,
            time_scale: 1.0,
        }
    }
}
