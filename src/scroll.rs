//! Proportional scroll synchronization between the source and preview panes.
//!
//! A scroll in one pane moves the other pane to the same fraction of its
//! scrollable range. Moving the other pane produces a scroll event of its
//! own, so a guard suppresses all scroll events until the move has landed.
//! Each sync carries a generation number; the event loop settles the guard
//! with that number after drawing, and a stale number does nothing.

use std::time::{Duration, Instant};

use tracing::debug;

/// Upper bound on how long a sync may hold the guard.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Source,
    Preview,
}

impl Pane {
    pub const fn other(self) -> Self {
        match self {
            Self::Source => Self::Preview,
            Self::Preview => Self::Source,
        }
    }
}

/// Scroll geometry of one pane, in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub offset: usize,
    pub content_len: usize,
    pub viewport_len: usize,
}

impl ScrollMetrics {
    pub const fn new(offset: usize, content_len: usize, viewport_len: usize) -> Self {
        Self {
            offset,
            content_len,
            viewport_len,
        }
    }

    /// Distance the offset can travel: content minus viewport, or 0.
    pub const fn scrollable_range(&self) -> usize {
        self.content_len.saturating_sub(self.viewport_len)
    }

    /// Offset as a fraction of the scrollable range, in `[0, 1]`.
    ///
    /// A pane that cannot scroll reports 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        let range = self.scrollable_range();
        if range == 0 {
            return 0.0;
        }
        (self.offset as f64 / range as f64).clamp(0.0, 1.0)
    }

    /// The offset that puts this pane at `fraction` of its range.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn offset_for(&self, fraction: f64) -> usize {
        let range = self.scrollable_range();
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((fraction * range as f64).round() as usize).min(range)
    }
}

/// Instruction to move the other pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncCommand {
    pub target: Pane,
    pub offset: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Syncing {
        origin: Pane,
        generation: u64,
        since: Instant,
    },
}

#[derive(Debug, Clone)]
pub struct ScrollSync {
    state: State,
    next_generation: u64,
    settle_delay: Duration,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSync {
    pub const fn new() -> Self {
        Self::with_settle_delay(DEFAULT_SETTLE_DELAY)
    }

    pub const fn with_settle_delay(settle_delay: Duration) -> Self {
        Self {
            state: State::Idle,
            next_generation: 1,
            settle_delay,
        }
    }

    pub const fn is_syncing(&self) -> bool {
        matches!(self.state, State::Syncing { .. })
    }

    /// Pane whose scroll started the sync in progress.
    pub const fn origin(&self) -> Option<Pane> {
        match self.state {
            State::Syncing { origin, .. } => Some(origin),
            State::Idle => None,
        }
    }

    /// React to `pane` having scrolled to `source`.
    ///
    /// Returns where the other pane should go, or `None` while a previous
    /// sync is still in flight.
    pub fn on_scroll(
        &mut self,
        pane: Pane,
        source: ScrollMetrics,
        target: ScrollMetrics,
    ) -> Option<SyncCommand> {
        self.on_scroll_at(pane, source, target, Instant::now())
    }

    pub fn on_scroll_at(
        &mut self,
        pane: Pane,
        source: ScrollMetrics,
        target: ScrollMetrics,
        now: Instant,
    ) -> Option<SyncCommand> {
        if self.is_syncing() {
            return None;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.state = State::Syncing {
            origin: pane,
            generation,
            since: now,
        };

        let fraction = source.fraction();
        let offset = target.offset_for(fraction);
        debug!(?pane, fraction, offset, generation, "scroll sync");
        Some(SyncCommand {
            target: pane.other(),
            offset,
            generation,
        })
    }

    /// Release the guard if `generation` is the sync in progress.
    pub fn settle(&mut self, generation: u64) -> bool {
        match self.state {
            State::Syncing {
                generation: current,
                ..
            } if current == generation => {
                self.state = State::Idle;
                true
            }
            _ => false,
        }
    }

    /// Release a guard held longer than the settle delay.
    pub fn settle_if_stale(&mut self, now: Instant) -> bool {
        match self.state {
            State::Syncing { since, .. }
                if now.saturating_duration_since(since) >= self.settle_delay =>
            {
                self.state = State::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fraction_zero_range_is_zero() {
        assert!(ScrollMetrics::new(5, 10, 10).fraction().abs() < f64::EPSILON);
        assert!(ScrollMetrics::new(0, 3, 10).fraction().abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction_is_clamped() {
        let metrics = ScrollMetrics::new(500, 110, 10);
        assert!((metrics.fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_on_scroll_maps_fraction_to_other_pane() {
        let mut sync = ScrollSync::new();
        let command = sync
            .on_scroll(
                Pane::Source,
                ScrollMetrics::new(50, 110, 10),
                ScrollMetrics::new(0, 220, 20),
            )
            .unwrap();
        assert_eq!(command.target, Pane::Preview);
        assert_eq!(command.offset, 100);
        assert!(sync.is_syncing());
        assert_eq!(sync.origin(), Some(Pane::Source));
    }

    #[test]
    fn test_events_ignored_while_syncing() {
        let mut sync = ScrollSync::new();
        let metrics = ScrollMetrics::new(1, 100, 10);
        let first = sync.on_scroll(Pane::Source, metrics, metrics).unwrap();
        assert!(sync.on_scroll(Pane::Preview, metrics, metrics).is_none());
        assert!(sync.on_scroll(Pane::Source, metrics, metrics).is_none());
        assert!(sync.settle(first.generation));
        assert!(sync.on_scroll(Pane::Preview, metrics, metrics).is_some());
    }

    #[test]
    fn test_stale_generation_does_not_settle() {
        let mut sync = ScrollSync::new();
        let metrics = ScrollMetrics::new(1, 100, 10);
        let first = sync.on_scroll(Pane::Source, metrics, metrics).unwrap();
        assert!(sync.settle(first.generation));
        let second = sync.on_scroll(Pane::Source, metrics, metrics).unwrap();
        assert!(second.generation > first.generation);
        assert!(!sync.settle(first.generation));
        assert!(sync.is_syncing());
    }

    #[test]
    fn test_settle_if_stale_releases_after_delay() {
        let mut sync = ScrollSync::with_settle_delay(Duration::from_millis(100));
        let start = Instant::now();
        let metrics = ScrollMetrics::new(1, 100, 10);
        sync.on_scroll_at(Pane::Preview, metrics, metrics, start);
        assert!(!sync.settle_if_stale(start + Duration::from_millis(50)));
        assert!(sync.settle_if_stale(start + Duration::from_millis(100)));
        assert!(!sync.is_syncing());
    }

    #[test]
    fn test_settle_when_idle_is_noop() {
        let mut sync = ScrollSync::new();
        assert!(!sync.settle(1));
        assert!(!sync.settle_if_stale(Instant::now()));
    }

    proptest! {
        #[test]
        fn test_fraction_always_in_unit_range(
            offset in 0usize..10_000,
            content in 0usize..10_000,
            viewport in 0usize..10_000,
        ) {
            let fraction = ScrollMetrics::new(offset, content, viewport).fraction();
            prop_assert!((0.0..=1.0).contains(&fraction));
        }

        #[test]
        fn test_target_offset_within_range(
            offset in 0usize..10_000,
            source_len in 0usize..10_000,
            target_len in 0usize..10_000,
            viewport in 0usize..200,
        ) {
            let mut sync = ScrollSync::new();
            let target = ScrollMetrics::new(0, target_len, viewport);
            let command = sync
                .on_scroll(Pane::Preview, ScrollMetrics::new(offset, source_len, viewport), target)
                .unwrap();
            prop_assert!(command.offset <= target.scrollable_range());
        }
    }
}
