use std::rc::Rc;

use ndarray::{Array2, ArrayView2, Zip};
use serde::{Serialize, Serializer};

use crate::*;

/// Input value marking a pixel of the guessed flag as equal to the target's.
pub const MATCHED: u8 = 1;

/// Pixels of the comparison grid that matched the target flag in at least one guess of the round.
///
/// A bitmap is never mutated once created; merging produces a new allocation, so holders of an older
/// bitmap can detect the change with [`MatchBitmap::same_allocation`].
#[derive(Clone, Debug, PartialEq)]
pub struct MatchBitmap {
    cells: Rc<Array2<u8>>,
}

impl MatchBitmap {
    /// Starts a bitmap from the first comparison of the round.
    pub fn from_matches(grid: GridSize, matches: &[u8]) -> Result<Self> {
        let matches = view(grid, matches)?;
        Ok(Self {
            cells: Rc::new(matches.mapv(|cell| u8::from(cell == MATCHED))),
        })
    }

    /// Union of this bitmap with a new comparison, in a fresh allocation.
    pub fn merged(&self, matches: &[u8]) -> Result<Self> {
        let matches = view(self.grid(), matches)?;
        let cells = Zip::from(&*self.cells)
            .and(&matches)
            .map_collect(|&old, &new| u8::from(old == MATCHED || new == MATCHED));
        Ok(Self {
            cells: Rc::new(cells),
        })
    }

    pub fn grid(&self) -> GridSize {
        let (height, width) = self.cells.dim();
        GridSize::new(
            width.try_into().unwrap_or(Px::MAX),
            height.try_into().unwrap_or(Px::MAX),
        )
    }

    pub fn is_matched(&self, coords: Px2) -> bool {
        self.cells
            .get(coords.to_nd_index())
            .is_some_and(|&cell| cell == MATCHED)
    }

    pub fn matched_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == MATCHED).count()
    }

    /// Share of the grid matched so far, `0.0..=1.0`.
    pub fn matched_ratio(&self) -> f64 {
        match self.cells.len() {
            0 => 0.0,
            total => self.matched_count() as f64 / total as f64,
        }
    }

    /// Row-major cells, one byte per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        self.cells.as_slice().expect("layout should be standard")
    }

    pub fn same_allocation(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }
}

fn view(grid: GridSize, matches: &[u8]) -> Result<ArrayView2<'_, u8>> {
    let mismatch = || GameError::BitmapSizeMismatch {
        expected: grid.total_cells(),
        actual: matches.len(),
    };
    if matches.len() != grid.total_cells() {
        return Err(mismatch());
    }
    ArrayView2::from_shape(grid.to_nd_index(), matches).map_err(|_| mismatch())
}

impl Serialize for MatchBitmap {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: GridSize = GridSize::new(3, 2);

    #[test]
    fn merge_is_a_union() {
        let first = MatchBitmap::from_matches(GRID, &[1, 0, 0, 1, 0, 0]).unwrap();
        let merged = first.merged(&[0, 1, 0, 0, 0, 1]).unwrap();

        assert_eq!(merged.as_bytes(), [1, 1, 0, 1, 0, 1]);
        assert_eq!(first.as_bytes(), [1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn merge_never_unmatches() {
        let mut bitmap = MatchBitmap::from_matches(GRID, &[1, 1, 0, 0, 0, 0]).unwrap();
        let mut previous = bitmap.matched_count();

        for matches in [[0; 6], [0, 0, 1, 0, 0, 0], [0; 6], [1; 6]] {
            bitmap = bitmap.merged(&matches).unwrap();
            assert!(bitmap.matched_count() >= previous);
            assert!(bitmap.is_matched((0, 0)));
            assert!(bitmap.is_matched((1, 0)));
            previous = bitmap.matched_count();
        }

        assert_eq!(bitmap.matched_ratio(), 1.0);
    }

    #[test]
    fn merge_allocates_new_bitmap() {
        let first = MatchBitmap::from_matches(GRID, &[0; 6]).unwrap();
        let merged = first.merged(&[0; 6]).unwrap();

        assert_eq!(first, merged);
        assert!(!first.same_allocation(&merged));
        assert!(first.same_allocation(&first.clone()));
    }

    #[test]
    fn only_exact_match_value_counts() {
        let bitmap = MatchBitmap::from_matches(GRID, &[2, 1, 0, 255, 0, 0]).unwrap();

        assert_eq!(bitmap.as_bytes(), [0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn coordinates_are_row_major() {
        let bitmap = MatchBitmap::from_matches(GRID, &[0, 0, 0, 0, 1, 0]).unwrap();

        assert!(bitmap.is_matched((1, 1)));
        assert!(!bitmap.is_matched((0, 1)));
        assert!(!bitmap.is_matched((7, 7)));
        assert_eq!(bitmap.grid(), GRID);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = MatchBitmap::from_matches(GRID, &[0; 5]).unwrap_err();
        assert_eq!(
            err,
            GameError::BitmapSizeMismatch {
                expected: 6,
                actual: 5
            }
        );

        let bitmap = MatchBitmap::from_matches(GRID, &[0; 6]).unwrap();
        assert!(bitmap.merged(&[0; 7]).is_err());
    }

    #[test]
    fn serializes_as_byte_list() {
        let bitmap = MatchBitmap::from_matches(GridSize::new(2, 1), &[1, 0]).unwrap();

        assert_eq!(serde_json::to_string(&bitmap).unwrap(), "[1,0]");
    }
}
