/// Timekeeping primitives.
///
/// The simulation never schedules callbacks.  Every delayed effect (cooldowns,
/// spawn batches, boss reset, staged explosions) is a timestamp stored in the
/// session state and compared against the `now` injected into each tick.

/// Wall-clock milliseconds since an arbitrary, monotonic origin.
pub type Millis = u64;

/// A one-shot deadline that can be re-armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    at: Millis,
}

impl Deadline {
    pub fn at(at: Millis) -> Self {
        Deadline { at }
    }

    /// Deadline `delay` milliseconds after `now`.
    pub fn after(now: Millis, delay: Millis) -> Self {
        Deadline { at: now.saturating_add(delay) }
    }

    pub fn is_due(&self, now: Millis) -> bool {
        now >= self.at
    }

    pub fn rearm(&mut self, now: Millis, delay: Millis) {
        self.at = now.saturating_add(delay);
    }

    pub fn when(&self) -> Millis {
        self.at
    }
}

/// Milliseconds elapsed from `since` to `now`, zero when `since` lies in the future.
pub fn elapsed(now: Millis, since: Millis) -> Millis {
    now.saturating_sub(since)
}
