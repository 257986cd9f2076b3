/// Default half-width of the square stage, in world units.
pub const DEFAULT_HALF_EXTENT: f32 = 5.0;

/// Axis-aligned square on the XZ plane, centred at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageBounds {
    pub half_extent: f32,
}

impl Default for StageBounds {
    fn default() -> Self {
        Self {
            half_extent: DEFAULT_HALF_EXTENT,
        }
    }
}

impl StageBounds {
    pub fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    /// Full side length of the square.
    pub fn size(&self) -> f32 {
        self.half_extent * 2.0
    }

    /// True once a position has left the stage. The border itself is inside.
    /// NaN coordinates count as outside.
    pub fn exceeded(&self, x: f32, z: f32) -> bool {
        !(x.abs() <= self.half_extent && z.abs() <= self.half_extent)
    }
}
