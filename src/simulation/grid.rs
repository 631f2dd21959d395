//! Grid geometry for the city block simulation
//!
//! A `width x height` array of intersections, each owning a 2x2 group of
//! corners on a `(2 * width) x (2 * height)` lattice.

use super::error::SimError;
use super::types::CornerPos;

/// A lattice point. Four corners make up one intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corner {
    pub name: String,
    pub pos: CornerPos,
}

impl Corner {
    pub fn new(pos: CornerPos) -> Self {
        Self {
            name: format!("C{}{}", pos.x, pos.y),
            pos,
        }
    }
}

/// Corner layout and cell lookup for a rectangular block grid
#[derive(Debug, Clone)]
pub struct CityGrid {
    /// Intersections along the x axis
    width: u32,
    /// Intersections along the y axis
    height: u32,
    /// Corners stored x-major: index = x * lattice_height + y
    corners: Vec<Corner>,
}

impl CityGrid {
    pub fn new(width: u32, height: u32) -> Result<Self, SimError> {
        // Every lattice index must fit in a u32
        let lattice = width
            .checked_mul(2)
            .zip(height.checked_mul(2))
            .and_then(|(w, h)| w.checked_mul(h).map(|total| (w, h, total)));
        let (lattice_width, lattice_height, total) = match lattice {
            Some(dims) if width > 0 && height > 0 => dims,
            _ => return Err(SimError::InvalidDimensions { width, height }),
        };

        let mut corners = Vec::with_capacity(total as usize);
        for x in 0..lattice_width {
            for y in 0..lattice_height {
                corners.push(Corner::new(CornerPos::new(x, y)));
            }
        }

        Ok(Self {
            width,
            height,
            corners,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn lattice_width(&self) -> u32 {
        self.width * 2
    }

    pub fn lattice_height(&self) -> u32 {
        self.height * 2
    }

    pub fn intersection_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn contains(&self, pos: CornerPos) -> bool {
        pos.x < self.lattice_width() && pos.y < self.lattice_height()
    }

    pub fn corner(&self, pos: CornerPos) -> Option<&Corner> {
        if !self.contains(pos) {
            return None;
        }
        self.corners
            .get((pos.x * self.lattice_height() + pos.y) as usize)
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    /// Index of the intersection owning `pos`, matching the order of `cells()`
    pub fn intersection_index(&self, pos: CornerPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let (cx, cy) = pos.cell();
        Some((cx * self.height + cy) as usize)
    }

    /// Intersection cells in creation order (x-major, then y), each with its
    /// four corners ordered `(x, y), (x+1, y), (x, y+1), (x+1, y+1)`
    pub fn cells(&self) -> impl Iterator<Item = [CornerPos; 4]> + '_ {
        (0..self.width).flat_map(move |cx| {
            (0..self.height).map(move |cy| {
                let (x, y) = (cx * 2, cy * 2);
                [
                    CornerPos::new(x, y),
                    CornerPos::new(x + 1, y),
                    CornerPos::new(x, y + 1),
                    CornerPos::new(x + 1, y + 1),
                ]
            })
        })
    }
}
