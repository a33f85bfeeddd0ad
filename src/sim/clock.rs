/// One simulation interval handed out by [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Tick index, starting at 0.
    pub index: usize,
    /// Elapsed simulated hours at the start of this tick.
    pub time_hr: f64,
}

/// A simulation clock that hands out a fixed number of ticks.
///
/// # Examples
///
/// ```
/// use mps_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 0.5);
/// let mut hours = Vec::new();
///
/// clock.run(|tick| hours.push(tick.time_hr));
/// assert_eq!(hours, vec![0.0, 0.5, 1.0]);
/// ```
pub struct Clock {
    /// Next tick index to hand out
    current: usize,
    /// Total ticks in the run
    total: usize,
    /// Tick length in hours
    dt_hours: f64,
}

impl Clock {
    /// Creates a new clock.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of ticks the clock will hand out
    /// * `dt_hours` - Length of one tick in hours
    pub fn new(total: usize, dt_hours: f64) -> Self {
        Self {
            current: 0,
            total,
            dt_hours,
        }
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick about to be simulated
    /// * `None` - If all ticks have been handed out
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current < self.total {
            let index = self.current;
            self.current += 1;
            Some(Tick {
                index,
                time_hr: index as f64 * self.dt_hours,
            })
        } else {
            None
        }
    }

    /// Number of ticks not yet handed out.
    pub fn remaining(&self) -> usize {
        self.total - self.current
    }

    /// Runs a function for each remaining tick, in order.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}
