use glam::{IVec3, Vec3};

/// Convert a world position to the coordinate of the cell containing it.
///
/// Floor division per axis, so positions in `[-cell_size, 0)` land in
/// cell -1, not cell 0.
#[inline]
pub fn cell_of(position: Vec3, cell_size: f32) -> IVec3 {
    IVec3::new(
        (position.x / cell_size).floor() as i32,
        (position.y / cell_size).floor() as i32,
        (position.z / cell_size).floor() as i32,
    )
}

/// The 27 cells (3x3x3) surrounding and including `center`.
#[inline]
pub fn neighborhood(center: IVec3) -> CellCube {
    CellCube::new(center, 1)
}

/// Iterator over the axis-aligned cube of cells within `reach` cells of a
/// center, in x-outer, y-middle, z-inner ascending order. The order is
/// fixed so query results are reproducible.
pub struct CellCube {
    min: IVec3,
    max: IVec3,
    next: Option<IVec3>,
}

impl CellCube {
    pub fn new(center: IVec3, reach: i32) -> Self {
        debug_assert!(reach >= 0, "cube reach must be non-negative");
        let min = center - IVec3::splat(reach);
        let max = center + IVec3::splat(reach);
        Self {
            min,
            max,
            next: Some(min),
        }
    }
}

impl Iterator for CellCube {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        let current = self.next?;
        let mut n = current;
        n.z += 1;
        if n.z > self.max.z {
            n.z = self.min.z;
            n.y += 1;
            if n.y > self.max.y {
                n.y = self.min.y;
                n.x += 1;
            }
        }
        self.next = (n.x <= self.max.x).then_some(n);
        Some(current)
    }
}
