/// Fixed-capacity sliding window over the most recent audio samples.
///
/// Writers append; readers copy the newest samples without consuming them.
/// Wrap in `parking_lot::Mutex` for cross-thread access.
///
/// Overflow behavior: drops oldest samples.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<f32>,
    write_index: usize,
    filled: usize,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0.0; capacity],
            write_index: 0,
            filled: 0,
            capacity,
        }
    }

    /// Append samples, overwriting the oldest once full.
    ///
    /// If `samples` is larger than capacity, only the last `capacity` samples are kept.
    pub fn write(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }

        let samples = if samples.len() > self.capacity {
            &samples[samples.len() - self.capacity..]
        } else {
            samples
        };

        for &sample in samples {
            self.buffer[self.write_index] = sample;
            self.write_index = (self.write_index + 1) % self.capacity;
        }
        self.filled = (self.filled + samples.len()).min(self.capacity);
    }

    /// Fill `out` with the newest `out.len()` samples, oldest first.
    ///
    /// Positions older than what has been written are zeroed.
    pub fn copy_into(&self, out: &mut [f32]) {
        let wanted = out.len().min(self.capacity);
        let available = self.filled.min(wanted);
        let silent = out.len() - available;

        out[..silent].fill(0.0);
        let start = (self.write_index + self.capacity - available) % self.capacity;
        for (i, slot) in out[silent..].iter_mut().enumerate() {
            *slot = self.buffer[(start + i) % self.capacity];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn newest(buf: &RingBuffer, n: usize) -> Vec<f32> {
        let mut out = vec![f32::NAN; n];
        buf.copy_into(&mut out);
        out
    }

    #[test]
    fn pads_front_until_full() {
        let mut buf = RingBuffer::new(5);
        buf.write(&[1.0, 2.0, 3.0]);

        assert_eq!(newest(&buf, 5), vec![0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn reads_are_not_consuming() {
        let mut buf = RingBuffer::new(3);
        buf.write(&[1.0, 2.0, 3.0]);

        assert_eq!(newest(&buf, 3), newest(&buf, 3));
    }

    #[test]
    fn overflow_keeps_newest() {
        let mut buf = RingBuffer::new(4);
        buf.write(&[1.0, 2.0, 3.0, 4.0]);
        buf.write(&[5.0, 6.0]);

        assert_eq!(newest(&buf, 4), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn write_larger_than_capacity() {
        let mut buf = RingBuffer::new(3);
        buf.write(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(newest(&buf, 3), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn shorter_slice_takes_newest() {
        let mut buf = RingBuffer::new(6);
        buf.write(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        assert_eq!(newest(&buf, 3), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn longer_slice_is_zero_padded() {
        let mut buf = RingBuffer::new(2);
        buf.write(&[1.0, 2.0, 3.0]);

        assert_eq!(newest(&buf, 4), vec![0.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_write_is_ignored() {
        let mut buf = RingBuffer::new(4);
        buf.write(&[]);
        assert_eq!(newest(&buf, 4), vec![0.0; 4]);
    }
}
