//! Fill colors for agent rendering.

use std::fmt;

/// Fill of the self-overlap.
pub(crate) const SELF_OVERLAP: &str = "#ade6ad";

/// Fill of the covered part of the region.
pub(crate) const COVERED: &str = "#e6ade6";

/// Fill of the overflow outside the region.
pub(crate) const OVERFLOW: &str = "#e6adad";

/// Background tint of the bounding box.
pub(crate) const FRAME: &str = "#ade6e6";

/// HSL color: h in degrees, s and l in [0.0, 1.0].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Hsl {
    pub(crate) h: f64,
    pub(crate) s: f64,
    pub(crate) l: f64,
}

impl fmt::Display for Hsl {
    /// Format as CSS HSL:
    ///   hsl({h:.1},{s:.0}%,{l:.0}%)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // normalize hue into [0,360)
        let h = (self.h % 360.0 + 360.0) % 360.0;
        let s = (self.s * 100.0).clamp(0.0, 100.0);
        let l = (self.l * 100.0).clamp(0.0, 100.0);
        write!(f, "hsl({:.1},{:.0}%,{:.0}%)", h, s, l)
    }
}

const GOLDEN_ANGLE: f64 = 137.50776405;

/// Well-separated hues for consecutive Voronoi cells.
pub(crate) fn cell_color(index: usize) -> Hsl {
    Hsl { h: ((index as f64) * GOLDEN_ANGLE) % 360.0, s: 0.55, l: 0.75 }
}
