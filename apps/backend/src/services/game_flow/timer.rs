//! Single cancellable deadline per session.
//!
//! The engine drives this with a 1 Hz tick. Arming replaces whatever was
//! armed, so two deadlines for the same session never coexist.

/// What an armed deadline is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    GameStart,
    Nomination,
    Voting,
    TokenSelection,
    Kill,
    GodGuess,
    TurnSettle,
    Teardown,
}

impl TimerKind {
    /// Phase deadlines are visible to players as countdown ticks.
    pub const fn is_phase_deadline(self) -> bool {
        matches!(
            self,
            TimerKind::Nomination
                | TimerKind::Voting
                | TimerKind::TokenSelection
                | TimerKind::Kill
                | TimerKind::GodGuess
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub kind: TimerKind,
    pub remaining: u32,
    /// Bumped on every arm; lets tests tell a re-armed deadline apart.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Running { kind: TimerKind, remaining: u32 },
    Expired(TimerKind),
}

#[derive(Debug, Default)]
pub struct PhaseTimer {
    armed: Option<Deadline>,
    generation: u64,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a deadline `secs` ticks from now, replacing any armed deadline.
    pub fn arm(&mut self, kind: TimerKind, secs: u32) -> Option<Deadline> {
        self.generation += 1;
        self.armed.replace(Deadline {
            kind,
            remaining: secs,
            generation: self.generation,
        })
    }

    pub fn cancel(&mut self) -> Option<Deadline> {
        self.armed.take()
    }

    pub fn armed(&self) -> Option<Deadline> {
        self.armed
    }

    pub fn kind(&self) -> Option<TimerKind> {
        self.armed.map(|d| d.kind)
    }

    /// Advance one second. An expired deadline is disarmed before it is reported.
    pub fn tick(&mut self) -> Option<TimerTick> {
        let deadline = self.armed.as_mut()?;
        deadline.remaining = deadline.remaining.saturating_sub(1);
        if deadline.remaining == 0 {
            let kind = deadline.kind;
            self.armed = None;
            return Some(TimerTick::Expired(kind));
        }
        Some(TimerTick::Running {
            kind: deadline.kind,
            remaining: deadline.remaining,
        })
    }
}
