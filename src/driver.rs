//! Fixed-step driver
//!
//! Turns irregular display-frame timestamps into whole simulation steps.
//! The browser loop feeds it `requestAnimationFrame` times; the native demo
//! and tests feed it synthetic ones.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameEvent, GameState, RandomSource, TickInput, tick};

/// Accumulates frame time and runs whole `SIM_DT` steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Last frame timestamp in milliseconds
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp (after a long suspension)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Number of steps owed for a frame at `time_ms`
    ///
    /// The first frame always runs one step. Deltas are clamped to
    /// `MAX_FRAME_DT` and at most `MAX_SUBSTEPS` steps are returned.
    pub fn steps_for(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (((time_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        steps
    }

    /// Run every owed step for a frame
    ///
    /// One-shot inputs (`start`, `pause`) apply to the first step and are
    /// cleared; a frame that owes no step leaves them pending.
    pub fn advance<R: RandomSource>(
        &mut self,
        state: &mut GameState,
        input: &mut TickInput,
        time_ms: f64,
        rng: &mut R,
    ) -> Vec<GameEvent> {
        let steps = self.steps_for(time_ms);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(tick(state, input, SIM_DT, rng));
            input.start = false;
            input.pause = false;
        }
        events
    }
}
