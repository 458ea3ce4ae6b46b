use crate::state::Tick;

/// Tunable parameters for driving action lifecycles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Elapsed time handed to `maintain` on every scheduler tick.
    pub tick_millis: u64,
    /// Action points each actor gets back at the start of its turn.
    pub default_action_points: u32,
    /// Ticks an action may wait for input before it is cancelled. Zero disables the limit.
    pub max_input_polls: u32,
}

impl GameConfig {
    pub const DEFAULT_TICK_MILLIS: u64 = 100;
    pub const DEFAULT_ACTION_POINTS: u32 = 10;
    pub const DEFAULT_MAX_INPUT_POLLS: u32 = 0;

    pub fn new() -> Self {
        Self {
            tick_millis: Self::DEFAULT_TICK_MILLIS,
            default_action_points: Self::DEFAULT_ACTION_POINTS,
            max_input_polls: Self::DEFAULT_MAX_INPUT_POLLS,
        }
    }

    pub fn tick(&self) -> Tick {
        Tick(self.tick_millis)
    }

    /// Returns true once `polls` has used up the input budget.
    pub fn input_exhausted(&self, polls: u32) -> bool {
        self.max_input_polls != 0 && polls >= self.max_input_polls
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
