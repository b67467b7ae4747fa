//! Per-node dirty flags.
//!
//! Every node carries one [`DirtyFlags`] set. A flag is raised by the setter
//! of the attribute it covers, read by the renderer, and cleared by
//! `flag_reset` once the frame has been consumed. Construction raises
//! [`DirtyFlags::ALL`] so the first frame emits everything.
//!
//! Flags fall into three groups:
//!
//! - **Attribute** flags ([`TRANSFORM`](DirtyFlags::TRANSFORM),
//!   [`FILL`](DirtyFlags::FILL), ...) describe the node's own render state.
//! - [`SHAPE`](DirtyFlags::SHAPE) marks changed geometry inputs; the next
//!   update regenerates the anchors and raises
//!   [`VERTICES`](DirtyFlags::VERTICES).
//! - **Structural** flags: [`CHILDREN`](DirtyFlags::CHILDREN) for insertions,
//!   removals and reorders, and [`SUBTREE`](DirtyFlags::SUBTREE), raised on
//!   every ancestor of a changed node.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of "needs update" bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirtyFlags(u32);

impl DirtyFlags {
    pub const EMPTY: Self = Self(0);
    /// Position, attitude or scale changed.
    pub const TRANSFORM: Self = Self(1 << 0);
    pub const OPACITY: Self = Self(1 << 1);
    pub const VISIBILITY: Self = Self(1 << 2);
    pub const FILL: Self = Self(1 << 3);
    pub const STROKE: Self = Self(1 << 4);
    pub const LINEWIDTH: Self = Self(1 << 5);
    /// Cap, join, miter limit or dash pattern changed.
    pub const STROKE_STYLE: Self = Self(1 << 6);
    /// The anchor chain (or the closed/curved flags) changed.
    pub const VERTICES: Self = Self(1 << 7);
    /// Geometry inputs changed; anchors are regenerated on the next update.
    pub const SHAPE: Self = Self(1 << 8);
    /// Text content or font attributes changed.
    pub const TEXT: Self = Self(1 << 9);
    pub const CHILDREN: Self = Self(1 << 10);
    pub const SUBTREE: Self = Self(1 << 11);
    pub const ALL: Self = Self((1 << 12) - 1);

    const NAMES: [(Self, &'static str); 12] = [
        (Self::TRANSFORM, "TRANSFORM"),
        (Self::OPACITY, "OPACITY"),
        (Self::VISIBILITY, "VISIBILITY"),
        (Self::FILL, "FILL"),
        (Self::STROKE, "STROKE"),
        (Self::LINEWIDTH, "LINEWIDTH"),
        (Self::STROKE_STYLE, "STROKE_STYLE"),
        (Self::VERTICES, "VERTICES"),
        (Self::SHAPE, "SHAPE"),
        (Self::TEXT, "TEXT"),
        (Self::CHILDREN, "CHILDREN"),
        (Self::SUBTREE, "SUBTREE"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any flag in `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Names of the set flags, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for DirtyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for DirtyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl BitAnd for DirtyFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("DirtyFlags(EMPTY)");
        }
        let names: Vec<&str> = self.names().collect();
        write!(f, "DirtyFlags({})", names.join(" | "))
    }
}
