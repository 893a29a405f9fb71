use crate::layout::Targets;

/// Edge the toast slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Left when `source_key` contains `marker`, right otherwise. An empty
    /// marker never matches.
    pub fn for_source(source_key: &str, marker: &str) -> Self {
        if !marker.is_empty() && source_key.contains(marker) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Where the toast is in its show cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    SlidingIn,
    Holding,
    SlidingOut,
}

/// Countdown and horizontal position of the toast.
///
/// `position == None` is the reset state: nothing is drawn and the next show
/// starts from the offscreen target of whatever side applies then.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    remaining_secs: f32,
    position: Option<f32>,
    onscreen: Option<f32>,
}

impl AnimationState {
    /// Seconds left before the toast starts sliding out.
    pub fn remaining_secs(&self) -> f32 {
        self.remaining_secs
    }

    pub fn position(&self) -> Option<f32> {
        self.position
    }

    pub fn phase(&self) -> Phase {
        match (self.position, self.remaining_secs > 0.0) {
            (None, false) => Phase::Idle,
            (None, true) => Phase::SlidingIn,
            (Some(position), true) if Some(position) == self.onscreen => Phase::Holding,
            (Some(_), true) => Phase::SlidingIn,
            (Some(_), false) => Phase::SlidingOut,
        }
    }

    /// Starts a fresh show of `duration_secs`, even mid-animation.
    pub fn restart(&mut self, duration_secs: f32) {
        self.remaining_secs = duration_secs;
        self.position = None;
        self.onscreen = None;
    }

    /// Advances by `delta_secs` of wall-clock time, moving at most
    /// `speed * delta_secs` pixels toward the current target without
    /// overshooting. Returns the position to draw at, or `None` once the toast
    /// is fully offscreen.
    pub fn advance(&mut self, delta_secs: f32, targets: Targets, speed: f32) -> Option<f32> {
        if self.phase() == Phase::Idle {
            return None;
        }

        let delta_secs = if delta_secs.is_finite() { delta_secs.max(0.0) } else { 0.0 };
        let step = speed * delta_secs;
        let current = self.position.unwrap_or(targets.offscreen);
        self.onscreen = Some(targets.onscreen);

        if self.remaining_secs > 0.0 {
            self.position = Some(approach(current, targets.onscreen, step));
            self.remaining_secs = (self.remaining_secs - delta_secs).max(0.0);
        } else {
            let next = approach(current, targets.offscreen, step);
            self.position = if next == targets.offscreen {
                None
            } else {
                Some(next)
            };
        }
        self.position
    }
}

fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT: Targets = Targets {
        onscreen: 800.0,
        offscreen: 1010.0,
    };
    const LEFT: Targets = Targets {
        onscreen: 10.0,
        offscreen: -200.0,
    };

    #[test]
    fn side_follows_marker() {
        assert_eq!(Side::for_source("y8_title/title.ogg", "y8_title"), Side::Left);
        assert_eq!(Side::for_source("bgm/town.ogg", "y8_title"), Side::Right);
        assert_eq!(Side::for_source("bgm/town.ogg", ""), Side::Right);
    }

    #[test]
    fn idle_state_stays_idle() {
        let mut state = AnimationState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.advance(0.5, RIGHT, 1500.0), None);
        assert_eq!(state, AnimationState::default());
    }

    #[test]
    fn slides_in_from_the_right_without_overshoot() {
        let mut state = AnimationState::default();
        state.restart(5.0);
        assert_eq!(state.phase(), Phase::SlidingIn);

        assert_eq!(state.advance(0.1, RIGHT, 1500.0), Some(860.0));
        assert_eq!(state.phase(), Phase::SlidingIn);

        assert_eq!(state.advance(0.1, RIGHT, 1500.0), Some(800.0));
        assert_eq!(state.phase(), Phase::Holding);
        assert!((state.remaining_secs() - 4.8).abs() < 1e-4);
    }

    #[test]
    fn slides_in_from_the_left() {
        let mut state = AnimationState::default();
        state.restart(5.0);
        assert_eq!(state.advance(0.1, LEFT, 1500.0), Some(-50.0));
        assert_eq!(state.advance(0.1, LEFT, 1500.0), Some(10.0));
    }

    #[test]
    fn countdown_uses_wall_clock_time() {
        let mut fast = AnimationState::default();
        let mut slow = AnimationState::default();
        fast.restart(1.0);
        slow.restart(1.0);

        for _ in 0..10 {
            fast.advance(0.05, RIGHT, 1500.0);
        }
        slow.advance(0.5, RIGHT, 1500.0);

        assert!((fast.remaining_secs() - slow.remaining_secs()).abs() < 1e-4);
    }

    #[test]
    fn slides_out_and_resets_only_at_the_offscreen_target() {
        let mut state = AnimationState::default();
        state.restart(0.2);
        state.advance(0.2, RIGHT, 1500.0);
        assert_eq!(state.remaining_secs(), 0.0);
        assert_eq!(state.position(), Some(800.0));

        assert_eq!(state.advance(0.05, RIGHT, 1500.0), Some(875.0));
        assert_eq!(state.phase(), Phase::SlidingOut);
        assert_eq!(state.advance(0.05, RIGHT, 1500.0), Some(950.0));
        assert_eq!(state.advance(0.0, RIGHT, 1500.0), Some(950.0));
        assert_eq!(state.advance(0.05, RIGHT, 1500.0), None);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn restart_mid_animation_begins_a_new_slide_in() {
        let mut state = AnimationState::default();
        state.restart(5.0);
        state.advance(1.0, RIGHT, 1500.0);
        assert_eq!(state.phase(), Phase::Holding);

        state.restart(5.0);
        assert_eq!(state.position(), None);
        assert_eq!(state.advance(0.1, RIGHT, 1500.0), Some(860.0));
        assert!((state.remaining_secs() - 4.9).abs() < 1e-4);
    }

    #[test]
    fn bad_deltas_do_not_move_anything() {
        let mut state = AnimationState::default();
        state.restart(5.0);
        assert_eq!(state.advance(-1.0, RIGHT, 1500.0), Some(1010.0));
        assert_eq!(state.advance(f32::NAN, RIGHT, 1500.0), Some(1010.0));
        assert_eq!(state.remaining_secs(), 5.0);
    }
}
