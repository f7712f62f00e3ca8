//! Core placement data structures.
//!
//! Defines the geometric netlist the optimizer works on: rectangular
//! [`Cell`]s on an integer grid, [`Net`]s connecting [`Pin`]s on those
//! cells, and the [`Grid`] occupancy map. The [`Placement`] owns all three
//! and is the single mutable resource that flows through the pipeline.
//!
//! Between stages the placement is *legal*: every grid position covered by
//! exactly one cell carries that cell's id, uncovered positions are empty,
//! and no two cell rectangles intersect. During annealing the invariant is
//! relaxed: overlaps are permitted and the grid is advisory (one id per
//! position, last writer wins); the authoritative state is the cells'
//! positions.

use crate::ids::{CellId, NetId};
use mosaic_common::Rect;
use serde::{Deserialize, Serialize};

/// A rectangular module to be placed on the grid.
///
/// `(x, y)` is the lower-left corner; the cell covers the half-open region
/// `[x, x + w) × [y, y + h)`. A fixed cell's position is immutable to all
/// optimizer stages; only I/O may set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The unique ID of this cell.
    pub id: CellId,
    /// X coordinate of the lower-left corner.
    pub x: i32,
    /// Y coordinate of the lower-left corner.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
    /// Whether this cell's position is fixed.
    #[serde(default)]
    pub fixed: bool,
}

impl Cell {
    /// Creates a movable cell.
    pub fn new(id: CellId, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id,
            x,
            y,
            w,
            h,
            fixed: false,
        }
    }

    /// Creates a fixed cell.
    pub fn fixed(id: CellId, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id,
            x,
            y,
            w,
            h,
            fixed: true,
        }
    }

    /// Returns the footprint rectangle of this cell.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Returns the integer center of this cell, `(x + w/2, y + h/2)`.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// A connection point on a cell at a fixed offset from its lower-left corner.
///
/// A pin whose `cell_id` does not resolve to any cell contributes the
/// absolute position `(0, 0)` to wirelength. This is a defined fallback,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// The cell this pin sits on.
    pub cell_id: CellId,
    /// X offset from the cell's lower-left corner.
    pub offset_x: i32,
    /// Y offset from the cell's lower-left corner.
    pub offset_y: i32,
}

impl Pin {
    /// Creates a pin on the given cell at the given offset.
    pub fn new(cell_id: CellId, offset_x: i32, offset_y: i32) -> Self {
        Self {
            cell_id,
            offset_x,
            offset_y,
        }
    }
}

/// A set of pins to be electrically connected.
///
/// Its wirelength proxy is the half-perimeter of the bounding box of its
/// pins' absolute positions. Empty nets contribute zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// The pins on this net.
    pub pins: Vec<Pin>,
}

impl Net {
    /// Creates a net with the given pins.
    pub fn new(id: NetId, pins: Vec<Pin>) -> Self {
        Self { id, pins }
    }
}

/// The discrete `width × height` occupancy lattice.
///
/// Each position carries the id of the cell covering it or nothing.
/// Positions outside `[0, width) × [0, height)` are treated as occupied by
/// every query. The occupancy map is derived state: it is skipped during
/// serialization and rebuilt from cell positions afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Width of the grid.
    pub width: i32,
    /// Height of the grid.
    pub height: i32,
    #[serde(skip)]
    occ: Vec<Option<CellId>>,
}

impl Grid {
    /// Creates an empty grid of the given dimensions.
    ///
    /// Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            occ: vec![None; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns `true` if `(x, y)` lies inside the grid.
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Returns `true` if `(x, y)` is outside the grid or carries a cell id.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if !self.is_inside(x, y) {
            return true;
        }
        self.occ[self.index(x, y)].is_some()
    }

    /// Returns the cell id at `(x, y)`, or `None` if the position is empty
    /// or outside the grid.
    pub fn occupant(&self, x: i32, y: i32) -> Option<CellId> {
        if !self.is_inside(x, y) {
            return None;
        }
        self.occ[self.index(x, y)]
    }

    /// Writes `id` at `(x, y)`. Positions outside the grid are silently
    /// dropped.
    pub fn set(&mut self, x: i32, y: i32, id: CellId) {
        if self.is_inside(x, y) {
            let i = self.index(x, y);
            self.occ[i] = Some(id);
        }
    }

    /// Clears the position `(x, y)`. Positions outside the grid are
    /// silently dropped.
    pub fn clear(&mut self, x: i32, y: i32) {
        if self.is_inside(x, y) {
            let i = self.index(x, y);
            self.occ[i] = None;
        }
    }

    /// Clears every position and restores the backing store to the grid's
    /// dimensions (needed after deserialization, which skips the map).
    pub fn reset(&mut self) {
        self.occ.clear();
        self.occ
            .resize(self.width as usize * self.height as usize, None);
    }

    /// Writes `id` into every in-bounds position covered by `rect`.
    pub fn fill(&mut self, rect: Rect, id: CellId) {
        for dy in 0..rect.h {
            for dx in 0..rect.w {
                self.set(rect.x + dx, rect.y + dy, id);
            }
        }
    }

    /// Clears every position currently carrying `id`.
    pub fn clear_cell(&mut self, id: CellId) {
        for slot in &mut self.occ {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

/// A complete placement problem and its current solution state.
///
/// Owns the cells, the nets, and the grid occupancy map. Each optimizer
/// stage borrows the placement mutably and must leave the grid consistent
/// with the cell positions when it returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The occupancy grid.
    pub grid: Grid,
    /// All cells, in input order.
    pub cells: Vec<Cell>,
    /// All nets, in input order.
    pub nets: Vec<Net>,
}

impl Placement {
    /// Creates an empty placement on a grid of the given dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: Grid::new(width, height),
            cells: Vec::new(),
            nets: Vec::new(),
        }
    }

    /// Adds a cell.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Adds a net.
    pub fn add_net(&mut self, net: Net) {
        self.nets.push(net);
    }

    /// Returns the cell with the given id, if any.
    ///
    /// Linear scan; the cell counts this engine targets make an index
    /// unnecessary.
    pub fn find_cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    /// Returns a mutable reference to the cell with the given id, if any.
    pub fn find_cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.id == id)
    }

    /// Returns the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns the indices of all movable (non-fixed) cells.
    pub fn movable_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.fixed)
            .map(|(i, _)| i)
            .collect()
    }

    /// Rebuilds the grid occupancy map from the current cell positions.
    ///
    /// Clears every position, then stamps each cell's in-bounds footprint
    /// in cell order. Where footprints overlap, the last cell wins; out of
    /// bounds portions are silently dropped.
    pub fn refresh_grid(&mut self) {
        self.grid.reset();
        for cell in &self.cells {
            self.grid.fill(cell.rect(), cell.id);
        }
    }
}
