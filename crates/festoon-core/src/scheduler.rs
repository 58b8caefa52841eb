//! Timed falling-spawn runs: dense at first, then a sparse tail until the run expires.

use std::time::Duration;

use crate::config::{SpawnBatch, SpawnConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Spawn(SpawnBatch),
    Finished,
}

/// One activation of the spawn scheduler. Times are host-clock instants as `Duration`s.
#[derive(Debug, Clone)]
pub struct FallingRun {
    id: u64,
    started_at: Duration,
    duration: Duration,
    next_tick: Duration,
    interval: Duration,
    intense_threshold: Duration,
    intense: SpawnBatch,
    tapered: SpawnBatch,
}

impl FallingRun {
    pub fn new(id: u64, started_at: Duration, duration: Duration, spawn: &SpawnConfig) -> Self {
        let interval = spawn.interval();
        Self {
            id,
            started_at,
            duration,
            next_tick: started_at + interval,
            interval,
            intense_threshold: spawn.intense_threshold(),
            intense: spawn.intense,
            tapered: spawn.tapered,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    /// The next tick if one is due at `now`. Late ticks re-arm from `now`, so missed ticks are skipped.
    pub fn poll(&mut self, now: Duration) -> Option<Tick> {
        if now < self.next_tick {
            return None;
        }
        self.next_tick += self.interval;
        if self.next_tick <= now {
            self.next_tick = now + self.interval;
        }
        Some(self.tick(self.elapsed(now)))
    }

    /// What a tick fired `elapsed` after the start does.
    pub fn tick(&self, elapsed: Duration) -> Tick {
        if elapsed >= self.duration {
            Tick::Finished
        } else if elapsed < self.intense_threshold {
            Tick::Spawn(self.intense)
        } else {
            Tick::Spawn(self.tapered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn run(duration_ms: u64) -> FallingRun {
        FallingRun::new(1, ms(1_000), ms(duration_ms), &SpawnConfig::default())
    }

    #[test]
    fn intense_then_tapered_then_finished() {
        let run = run(3_000);
        assert_eq!(run.tick(ms(0)), Tick::Spawn(SpawnBatch { trees: 3, stars: 4 }));
        assert_eq!(run.tick(ms(2_799)), Tick::Spawn(SpawnBatch { trees: 3, stars: 4 }));
        assert_eq!(run.tick(ms(2_800)), Tick::Spawn(SpawnBatch { trees: 1, stars: 2 }));
        assert_eq!(run.tick(ms(2_999)), Tick::Spawn(SpawnBatch { trees: 1, stars: 2 }));
        assert_eq!(run.tick(ms(3_000)), Tick::Finished);
        assert_eq!(run.tick(ms(3_120)), Tick::Finished);
    }

    #[test]
    fn first_poll_is_one_interval_after_start() {
        let mut run = run(3_000);
        assert_eq!(run.poll(ms(1_000)), None);
        assert_eq!(run.poll(ms(1_119)), None);
        assert!(matches!(run.poll(ms(1_120)), Some(Tick::Spawn(_))));
        assert_eq!(run.poll(ms(1_200)), None);
        assert!(matches!(run.poll(ms(1_240)), Some(Tick::Spawn(_))));
    }

    #[test]
    fn late_poll_fires_once_and_skips_missed_ticks() {
        let mut run = run(10_000);
        assert!(run.poll(ms(2_000)).is_some());
        assert_eq!(run.poll(ms(2_050)), None);
        assert!(run.poll(ms(2_120)).is_some());
    }

    #[test]
    fn poll_past_the_window_finishes() {
        let mut run = run(3_000);
        assert_eq!(run.poll(ms(4_000)), Some(Tick::Finished));
    }

    #[test]
    fn tick_count_follows_the_interval() {
        let mut run = run(3_000);
        let mut spawns = 0;
        let mut finished_at = None;
        for frame in 0..400u64 {
            let now = ms(1_000 + frame * 10);
            match run.poll(now) {
                Some(Tick::Spawn(_)) => spawns += 1,
                Some(Tick::Finished) => {
                    finished_at = Some(now);
                    break;
                }
                None => {}
            }
        }
        // Ticks at 120, 240, ..., 2880 ms spawn; the one at 3000 ms finishes.
        assert_eq!(spawns, 24);
        assert_eq!(finished_at, Some(ms(4_000)));
    }
}
