//! Stroke Animation Timing
//!
//! Strokes are revealed one after another along their medians. Progress is
//! a pure function of elapsed time, so surfaces can render at whatever frame
//! rate they like and restarting is just resetting the start instant.

use std::time::{Duration, Instant};

/// Fixed lead-in added to every stroke length, in data units
const STROKE_LENGTH_PADDING: f64 = 600.0;

/// Timeline of one playthrough
#[derive(Clone, Debug)]
pub struct StrokeAnimation {
    /// Duration of each stroke
    durations: Vec<Duration>,
    /// Pause between consecutive strokes
    delay: Duration,
    /// When the playthrough started
    started: Instant,
}

impl StrokeAnimation {
    /// Plan a playthrough for strokes with the given median lengths
    ///
    /// A stroke of length `l` takes `(l + 600) / (3 * speed)` milliseconds.
    #[must_use]
    pub fn new(median_lengths: &[f64], speed: f64, delay: Duration, started: Instant) -> Self {
        let speed = if speed > 0.0 { speed } else { 1.0 };
        let durations = median_lengths
            .iter()
            .map(|len| {
                let ms = (len.max(0.0) + STROKE_LENGTH_PADDING) / (3.0 * speed);
                Duration::from_micros((ms * 1000.0).round() as u64)
            })
            .collect();

        Self {
            durations,
            delay,
            started,
        }
    }

    /// Restart from the first stroke
    pub fn restart(&mut self, now: Instant) {
        self.started = now;
    }

    /// Length of a full playthrough
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        let strokes: Duration = self.durations.iter().sum();
        let gaps = self.delay * (self.durations.len().saturating_sub(1) as u32);
        strokes + gaps
    }

    /// Reveal fraction (0.0..=1.0) of every stroke at `now`
    #[must_use]
    pub fn progress_at(&self, now: Instant) -> Vec<f32> {
        let mut remaining = now.saturating_duration_since(self.started);
        let mut out = Vec::with_capacity(self.durations.len());

        for duration in &self.durations {
            if remaining >= *duration {
                out.push(1.0);
                remaining = remaining.saturating_sub(*duration).saturating_sub(self.delay);
            } else {
                out.push((remaining.as_secs_f64() / duration.as_secs_f64()) as f32);
                remaining = Duration::ZERO;
            }
        }
        out
    }

    /// Index of the stroke being drawn at `now`, `None` once finished
    #[must_use]
    pub fn active_stroke(&self, now: Instant) -> Option<usize> {
        self.progress_at(now).iter().position(|p| *p < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_durations_follow_length() {
        let start = Instant::now();
        // (300 + 600) / 3 = 300ms per stroke at speed 1
        let anim = StrokeAnimation::new(&[300.0, 300.0], 1.0, ms(200), start);
        assert_eq!(anim.total_duration(), ms(800));

        let fast = StrokeAnimation::new(&[300.0], 2.0, ms(200), start);
        assert_eq!(fast.total_duration(), ms(150));
    }

    #[test]
    fn test_progress_is_sequential() {
        let start = Instant::now();
        let anim = StrokeAnimation::new(&[300.0, 300.0], 1.0, ms(200), start);

        assert_eq!(anim.progress_at(start), vec![0.0, 0.0]);

        let mid_first = anim.progress_at(start + ms(150));
        assert!((mid_first[0] - 0.5).abs() < 0.01);
        assert_eq!(mid_first[1], 0.0);

        // In the gap between strokes
        assert_eq!(anim.progress_at(start + ms(400)), vec![1.0, 0.0]);
        assert_eq!(anim.active_stroke(start + ms(400)), Some(1));

        assert_eq!(anim.progress_at(start + ms(900)), vec![1.0, 1.0]);
        assert_eq!(anim.active_stroke(start + ms(900)), None);
    }

    #[test]
    fn test_restart_resets_progress() {
        let start = Instant::now();
        let mut anim = StrokeAnimation::new(&[300.0], 1.0, ms(200), start);
        assert_eq!(anim.progress_at(start + ms(500)), vec![1.0]);

        anim.restart(start + ms(500));
        assert_eq!(anim.progress_at(start + ms(500)), vec![0.0]);
        assert!(anim.progress_at(start + ms(600))[0] < 1.0);
    }

    #[test]
    fn test_non_positive_speed_falls_back() {
        let start = Instant::now();
        let anim = StrokeAnimation::new(&[300.0], 0.0, ms(0), start);
        assert_eq!(anim.total_duration(), ms(300));
    }
}
