use std::time::{Duration, Instant};

/// elapsed time since the current evaluator went live
///
/// The clock starts on the first frame that reads a new generation from the
/// slot, so `t` is 0 on that frame no matter how long the evaluator was
/// waiting. Idle frames never ask, so idle time is not counted.
#[derive(Debug, Default)]
pub struct AnimationClock {
    epoch: Option<Epoch>,
}

#[derive(Debug, Clone, Copy)]
struct Epoch {
    generation: u64,
    started: Instant,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// seconds since the first frame of `generation`
    pub fn elapsed(&mut self, generation: u64, now: Instant) -> f64 {
        match self.epoch {
            Some(epoch) if epoch.generation == generation => {
                now.saturating_duration_since(epoch.started).as_secs_f64()
            }
            _ => {
                self.epoch = Some(Epoch {
                    generation,
                    started: now,
                });
                0.0
            }
        }
    }
}

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

/// paces the main loop at a fixed frame rate
///
/// Stands in for the display refresh callback: `wait` sleeps until the next
/// tick is due. If a frame overran, the schedule restarts from now rather
/// than firing a burst of catch-up ticks.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(MIN_FPS, MAX_FPS);
        Ticker {
            period: Duration::from_secs(1) / fps,
            next: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// block until the next tick; returns the time the tick fired
    pub fn wait(&mut self) -> Instant {
        let now = Instant::now();
        if self.next > now {
            spin_sleep::sleep(self.next - now);
        }
        let fired = Instant::now();
        self.next += self.period;
        if self.next < fired {
            self.next = fired + self.period;
        }
        fired
    }
}
