/// A row-major 2D grid. Used for the raw per-pixel value output.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Wrap row-major data. Returns `None` if the length doesn't match.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self { width, height, data })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width.max(1))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }
}

impl Tilemap<f64> {
    /// Smallest and largest value, `None` for an empty grid
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut map = Tilemap::new(3, 2);
        map.as_mut_slice()[5] = 9u8;
        assert_eq!(map.as_slice()[5], 9);
        assert_eq!(*map.get(2, 1), 9);

        let rows: Vec<&[u8]> = map.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0, 0, 9]);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Tilemap::from_vec(2, 2, vec![1, 2, 3]).is_none());
        let map = Tilemap::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(map.iter().last(), Some((1, 1, &4)));
    }

    #[test]
    fn test_min_max() {
        let map = Tilemap::from_vec(2, 2, vec![0.5, 0.1, 0.9, 0.3]).unwrap();
        assert_eq!(map.min_max(), Some((0.1, 0.9)));
        assert_eq!(Tilemap::<f64>::new(0, 0).min_max(), None);
    }
}
