//! Cancellable one-shot timers expressed as generations.
//!
//! The engine never owns a real timer. Arming a [`TimerSlot`] hands out a
//! [`TimerToken`]; the adapter schedules a callback carrying that token and
//! the engine accepts the callback only if the token is still current.
//! Re-arming or cancelling makes every earlier token stale.

/// Identifies one arming of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    generation: u64,
    armed: bool,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot, implicitly cancelling any earlier arming.
    pub fn arm(&mut self) -> TimerToken {
        self.generation += 1;
        self.armed = true;
        TimerToken(self.generation)
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consume a fire. Returns `true` only for the current, still armed token.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.armed && token.0 == self.generation {
            self.armed = false;
            true
        } else {
            false
        }
    }
}
