use crate::error::AppError;
use crate::model::tick::Tick;

/// Ordered snapshot of the live window, oldest first. Times are serial-day
/// floats, prices parallel to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotData {
    pub times: Vec<f64>,
    pub prices: Vec<f64>,
}

impl PlotData {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Fixed-capacity ring buffer over ticks, tuned for the case where ticks
/// arrive faster than the chart redraws: insertion is O(1) and leaves data
/// unordered, extraction is O(count) and re-linearizes.
///
/// Parallel serial-day/price arrays are maintained on insert so extraction
/// is a straight copy instead of a per-element conversion.
#[derive(Debug, Clone)]
pub struct TickBuffer {
    buffer: Vec<Tick>,
    plot_times: Vec<f64>,
    plot_prices: Vec<f64>,
    capacity: usize,
    start: usize,
    count: usize,
    full: bool,
}

impl TickBuffer {
    pub fn new(capacity: usize) -> Result<Self, AppError> {
        if capacity == 0 {
            return Err(AppError::InvalidCapacity);
        }
        Ok(Self {
            buffer: vec![Tick::new(0, 0.0); capacity],
            plot_times: vec![0.0; capacity],
            plot_prices: vec![0.0; capacity],
            capacity,
            start: 0,
            count: 0,
            full: false,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Oldest surviving tick.
    pub fn head(&self) -> Option<&Tick> {
        if self.count == 0 {
            return None;
        }
        Some(&self.buffer[self.start])
    }

    /// Newest tick.
    pub fn tail(&self) -> Option<&Tick> {
        if self.count == 0 {
            return None;
        }
        let tail_index = (self.start + self.count - 1) % self.capacity;
        Some(&self.buffer[tail_index])
    }

    /// Insert a tick. Always succeeds; once the buffer is full the oldest
    /// tick is overwritten and `start` advances.
    pub fn add(&mut self, tick: Tick) {
        let position = (self.start + self.count) % self.capacity;

        self.plot_times[position] = tick.serial_day();
        self.plot_prices[position] = tick.price;
        self.buffer[position] = tick;

        if self.full {
            self.start = (self.start + 1) % self.capacity;
        } else {
            self.count += 1;
            self.full = self.count == self.capacity;
        }
    }

    /// Drop all elements. Backing storage is retained for reuse.
    pub fn clear(&mut self) {
        self.start = 0;
        self.count = 0;
        self.full = false;
    }

    /// Copy the live window out in oldest-to-newest order. When the buffer
    /// has wrapped the copy walks from `start` around the ring; otherwise
    /// the data is already contiguous from index 0.
    pub fn plot_data(&self) -> PlotData {
        if self.count == 0 {
            return PlotData::default();
        }

        let mut times = Vec::with_capacity(self.count);
        let mut prices = Vec::with_capacity(self.count);

        if self.full {
            for i in 0..self.count {
                let source = (self.start + i) % self.capacity;
                times.push(self.plot_times[source]);
                prices.push(self.plot_prices[source]);
            }
        } else {
            times.extend_from_slice(&self.plot_times[..self.count]);
            prices.extend_from_slice(&self.plot_prices[..self.count]);
        }

        PlotData { times, prices }
    }

    /// Build a new buffer of `new_capacity` seeded with the most recent
    /// `min(count, new_capacity)` ticks of this one, oldest first. This
    /// buffer is left untouched; the caller decides when to retire it.
    pub fn resize(&self, new_capacity: usize) -> Result<Self, AppError> {
        let mut resized = Self::new(new_capacity)?;

        let elements_to_keep = self.count.min(new_capacity);
        let elements_to_drop = self.count - elements_to_keep;

        for i in 0..elements_to_keep {
            let source = (self.start + elements_to_drop + i) % self.capacity;
            resized.add(self.buffer[source]);
        }

        Ok(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(i: u64) -> Tick {
        Tick::new(i, i as f64 * 10.0)
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            TickBuffer::new(0),
            Err(AppError::InvalidCapacity)
        ));
    }

    #[test]
    fn capacity_one_always_holds_newest() {
        let mut buf = TickBuffer::new(1).unwrap();
        for i in 1..=5 {
            buf.add(tick(i));
            assert_eq!(buf.count(), 1);
            assert_eq!(buf.head().unwrap().price, i as f64 * 10.0);
            assert_eq!(buf.tail().unwrap().price, i as f64 * 10.0);
        }
    }

    #[test]
    fn wrap_positions_follow_start() {
        let mut buf = TickBuffer::new(3).unwrap();
        for i in 1..=7 {
            buf.add(tick(i));
        }
        // survivors: 5, 6, 7
        assert!(buf.is_full());
        assert_eq!(buf.head().unwrap().timestamp_ms, 5);
        assert_eq!(buf.tail().unwrap().timestamp_ms, 7);
    }
}
