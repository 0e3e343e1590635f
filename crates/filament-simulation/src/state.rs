//! Double-buffered grid state
//!
//! Each simulated quantity lives in a `filament_count x segment_count`
//! grid, stored as two buffers that trade roles every sub-step: kernels
//! read "current" and fully rewrite the scratch buffer, which becomes
//! "current" on swap. The buffers are never aliased within one pass.

/// Fixed-size 2D array indexed by `(filament, segment)`.
///
/// Layout is one row per segment (`index = segment * filament_count +
/// filament`), matching the original simulation textures.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    filament_count: u32,
    segment_count: u32,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(filament_count: u32, segment_count: u32, fill: T) -> Self {
        let len = filament_count as usize * segment_count as usize;
        Self {
            filament_count,
            segment_count,
            data: vec![fill; len],
        }
    }

    pub fn filament_count(&self) -> u32 {
        self.filament_count
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }

    #[inline]
    fn index(&self, filament: u32, segment: u32) -> usize {
        debug_assert!(filament < self.filament_count && segment < self.segment_count);
        segment as usize * self.filament_count as usize + filament as usize
    }

    #[inline]
    pub fn get(&self, filament: u32, segment: u32) -> T {
        self.data[self.index(filament, segment)]
    }

    #[inline]
    pub fn set(&mut self, filament: u32, segment: u32, value: T) {
        let i = self.index(filament, segment);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// A current/scratch buffer pair with an explicit swap.
#[derive(Clone, Debug)]
pub struct DoubleBuffered<T> {
    current: Grid<T>,
    scratch: Grid<T>,
}

impl<T: Copy> DoubleBuffered<T> {
    pub fn new(filament_count: u32, segment_count: u32, fill: T) -> Self {
        Self {
            current: Grid::new(filament_count, segment_count, fill),
            scratch: Grid::new(filament_count, segment_count, fill),
        }
    }

    /// The most recently completed buffer; what consumers snapshot.
    pub fn current(&self) -> &Grid<T> {
        &self.current
    }

    /// Mutable access to the current buffer, for reset seeding only.
    pub fn current_mut(&mut self) -> &mut Grid<T> {
        &mut self.current
    }

    /// Read view of current plus write view of scratch, for one pass.
    pub fn split_mut(&mut self) -> (&Grid<T>, &mut Grid<T>) {
        (&self.current, &mut self.scratch)
    }

    /// Promote the fully written scratch buffer to current.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_row_per_segment_layout() {
        let mut grid = Grid::new(3, 2, 0i32);
        grid.set(0, 0, 1);
        grid.set(2, 0, 2);
        grid.set(0, 1, 3);
        assert_eq!(grid.as_slice(), &[1, 0, 2, 3, 0, 0]);
    }

    #[test]
    fn test_grid_get_set_round_trip() {
        let mut grid = Grid::new(4, 8, 0.0f32);
        grid.set(3, 7, 1.5);
        assert_eq!(grid.get(3, 7), 1.5);
        assert_eq!(grid.get(0, 0), 0.0);
    }

    #[test]
    fn test_double_buffer_swap_promotes_scratch() {
        let mut buffer = DoubleBuffered::new(1, 1, 0u32);
        {
            let (current, scratch) = buffer.split_mut();
            assert_eq!(current.get(0, 0), 0);
            scratch.set(0, 0, 7);
        }
        assert_eq!(buffer.current().get(0, 0), 0);
        buffer.swap();
        assert_eq!(buffer.current().get(0, 0), 7);
    }
}
