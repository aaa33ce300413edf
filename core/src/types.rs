use serde::{Deserialize, Serialize};

/// Single axis of the flag comparison grid.
pub type Px = u16;

/// Two-dimensional grid position `(x, y)`.
pub type Px2 = (Px, Px);

/// Count type used for attempts.
pub type Attempt = u8;

/// Similarity percentage between a guessed flag and the target flag, as reported by the comparison step.
pub type Accuracy = f64;

/// Dimensions of the canonical grid both flags are resampled to before being compared pixel by pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: Px,
    pub height: Px,
}

impl GridSize {
    pub const fn new(width: Px, height: Px) -> Self {
        Self { width, height }
    }

    pub const fn total_cells(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(300, 200)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Bitmaps are stored row-major, so the first axis is `y`.
impl ToNdIndex for Px2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

impl ToNdIndex for GridSize {
    type Output = (usize, usize);

    fn to_nd_index(self) -> Self::Output {
        (self.height.into(), self.width.into())
    }
}
