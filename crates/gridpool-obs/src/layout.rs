//! Flattened descriptor layout.
//!
//! A descriptor is `channels` consecutive blocks of `n * n` values, one
//! block per feature channel. Within a block, coarse cells are row-major
//! with the row running along grid axis 0 and the column along axis 1:
//!
//! ```text
//! index = channel * n * n + row * n + col
//! ```

/// Index arithmetic for a descriptor of `channels` channels on an
/// `n x n` coarse grid.
///
/// # Examples
///
/// ```
/// use gridpool_obs::DescriptorLayout;
///
/// let layout = DescriptorLayout::new(4, 2);
/// assert_eq!(layout.len(), 32);
/// assert_eq!(layout.index(1, 2, 3), 16 + 8 + 3);
/// assert_eq!(layout.coords(27), (1, 2, 3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorLayout {
    n: usize,
    channels: usize,
}

impl DescriptorLayout {
    /// Layout for an `n x n` grid with `channels` channels.
    pub fn new(n: usize, channels: usize) -> Self {
        Self { n, channels }
    }

    /// Coarse cells per axis.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Feature channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Total descriptor length.
    pub fn len(&self) -> usize {
        self.channels * self.n * self.n
    }

    /// Whether the descriptor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `(channel, row, col)`.
    pub fn index(&self, channel: usize, row: usize, col: usize) -> usize {
        debug_assert!(channel < self.channels && row < self.n && col < self.n);
        channel * self.n * self.n + row * self.n + col
    }

    /// Inverse of [`index`](Self::index).
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let block = self.n * self.n;
        let channel = index / block;
        let rem = index % block;
        (channel, rem / self.n, rem % self.n)
    }

    /// The `n * n` block of one channel.
    pub fn channel<'a>(&self, descriptor: &'a [f32], channel: usize) -> &'a [f32] {
        let block = self.n * self.n;
        &descriptor[channel * block..(channel + 1) * block]
    }

    /// Indices of all non-zero entries, in ascending order.
    pub fn nonzero(&self, descriptor: &[f32]) -> Vec<(usize, usize, usize)> {
        descriptor
            .iter()
            .take(self.len())
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, _)| self.coords(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_coords_agree() {
        let layout = DescriptorLayout::new(3, 2);
        for i in 0..layout.len() {
            let (c, r, col) = layout.coords(i);
            assert_eq!(layout.index(c, r, col), i);
        }
    }

    #[test]
    fn channel_slices_are_contiguous_blocks() {
        let layout = DescriptorLayout::new(2, 2);
        let d: Vec<f32> = (0..8).map(|v| v as f32).collect();
        assert_eq!(layout.channel(&d, 0), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(layout.channel(&d, 1), &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn nonzero_reports_cells() {
        let layout = DescriptorLayout::new(4, 1);
        let mut d = vec![0.0f32; 16];
        d[layout.index(0, 2, 2)] = 1.0;
        assert_eq!(layout.nonzero(&d), vec![(0, 2, 2)]);
    }

    #[test]
    fn empty_layout() {
        assert!(DescriptorLayout::new(0, 3).is_empty());
        assert!(!DescriptorLayout::new(1, 1).is_empty());
    }
}
