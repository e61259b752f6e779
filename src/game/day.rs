use crate::game::final_event::FinalEvent;
use serde::{Deserialize, Serialize};

/// Progress of a day's simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayState {
    #[default]
    Idle,
    Running,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// -1 before the game starts, 0 for the bloodbath
    pub num: i32,
    pub state: DayState,
    pub events: Vec<FinalEvent>,
}

impl Default for Day {
    fn default() -> Self {
        Self {
            num: -1,
            state: DayState::Idle,
            events: Vec::new(),
        }
    }
}

impl Day {
    pub fn new(num: i32) -> Self {
        Self {
            num,
            ..Default::default()
        }
    }

    pub fn is_bloodbath(&self) -> bool {
        self.num == 0
    }
}
