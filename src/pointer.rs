use crate::vectors::Vector2D;

/// Raw pointer coordinate the browser-era hosts used for "no pointer".
pub const ABSENT_SENTINEL: f32 = -1.;

/// What the host knows about the pointer right now. Input handlers overwrite
/// it at whatever rate events arrive; the simulation only ever reads the
/// latest value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    pub position: Option<Vector2D>,
    pub pressed: bool,
}

impl PointerInput {
    pub fn at(x: f32, y: f32, pressed: bool) -> Self {
        Self {
            position: Some(Vector2D::new(x, y)),
            pressed,
        }
    }

    /// Builds an input from raw coordinates, treating an `x` of `-1` as absent.
    pub fn from_raw(x: f32, y: f32, pressed: bool) -> Self {
        if x == ABSENT_SENTINEL {
            Self {
                position: None,
                pressed,
            }
        } else {
            Self::at(x, y, pressed)
        }
    }
}

/// Per-frame pointer snapshot handed to every particle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub position: Option<Vector2D>,
    pub pressed: bool,
    /// Milliseconds since the current continuous press began.
    pub held: f32,
}

impl PointerState {
    pub const ABSENT: Self = Self {
        position: None,
        pressed: false,
        held: 0.,
    };

    #[inline]
    pub fn held_seconds(&self) -> f32 {
        self.held / 1000.
    }
}

/// Coalesces window events into the latest [`PointerInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    input: PointerInput,
}

impl PointerTracker {
    pub fn moved(&mut self, position: Vector2D) {
        self.input.position = Some(position);
    }

    pub fn left(&mut self) {
        self.input.position = None;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.input.pressed = pressed;
    }

    #[inline]
    pub fn snapshot(&self) -> PointerInput {
        self.input
    }
}

/// Tracks how long the button has been held, sampled once per tick.
///
/// The press start is re-armed on every tick where either this tick or the
/// previous one saw the button up, so the first pressed tick reports zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldTimer {
    first_pressed: f64,
    last_pressed: bool,
}

impl HoldTimer {
    pub fn observe(&mut self, timestamp: f64, input: PointerInput) -> PointerState {
        if !input.pressed || !self.last_pressed {
            self.first_pressed = timestamp;
        }
        self.last_pressed = input.pressed;

        PointerState {
            position: input.position,
            pressed: input.pressed,
            held: (timestamp - self.first_pressed).max(0.) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sentinel_means_absent() {
        assert_eq!(PointerInput::from_raw(-1., -1., false).position, None);
        assert_eq!(PointerInput::from_raw(-1., 300., true).position, None);
        assert_eq!(
            PointerInput::from_raw(0., -1., false).position,
            Some(Vector2D::new(0., -1.))
        );
    }

    #[test]
    fn tracker_keeps_latest_event_only() {
        let mut tracker = PointerTracker::default();
        tracker.moved(Vector2D::new(1., 2.));
        tracker.moved(Vector2D::new(3., 4.));
        tracker.set_pressed(true);
        assert_eq!(tracker.snapshot(), PointerInput::at(3., 4., true));
        tracker.left();
        assert_eq!(tracker.snapshot().position, None);
        assert!(tracker.snapshot().pressed);
    }

    #[test]
    fn hold_timer_starts_at_zero_and_resets_on_release() {
        let mut timer = HoldTimer::default();
        let down = PointerInput::at(10., 10., true);
        let up = PointerInput::at(10., 10., false);

        assert_eq!(timer.observe(100., up).held, 0.);
        assert_eq!(timer.observe(116., down).held, 0.);
        assert_eq!(timer.observe(132., down).held, 16.);
        assert_eq!(timer.observe(1116., down).held, 1000.);
        assert_eq!(timer.observe(1132., up).held, 0.);
        assert_eq!(timer.observe(1148., down).held, 0.);
        assert_eq!(timer.observe(1164., down).held, 16.);
    }

    #[test]
    fn hold_timer_first_tick_pressed_is_zero() {
        let mut timer = HoldTimer::default();
        let state = timer.observe(5000., PointerInput::at(0., 0., true));
        assert_eq!(state.held, 0.);
        assert!((timer.observe(7000., PointerInput::at(0., 0., true)).held_seconds() - 2.).abs() < 1e-6);
    }
}
