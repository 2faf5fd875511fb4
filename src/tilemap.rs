/// A plain rectangular 2D raster, the output of a surface projection.
///
/// Unlike [`crate::surface::SurfaceGrid`] every cell is meaningful, so it can be
/// handed straight to image encoders or a window buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T> Tilemap<T> {
    /// Wrap an existing row-major buffer. `data.len()` must equal `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), width * height, "tilemap buffer size mismatch");
        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Borrow one row of the raster.
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_contiguous() {
        let map = Tilemap::from_vec(4, 2, vec![0, 0, 0, 0, 1, 2, 3, 4]);

        assert_eq!(map.row(0), &[0, 0, 0, 0]);
        assert_eq!(*map.get(2, 1), 3);
        assert_eq!(map.iter().filter(|(_, y, _)| *y == 1).count(), 4);
    }
}
