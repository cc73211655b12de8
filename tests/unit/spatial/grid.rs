//! Tests for sparse grid storage and world/cell mapping

#[cfg(test)]
mod tests {
    use crate::skewed_grid;
    use paratile::spatial::coords::{CellCoord, Vec3};
    use paratile::spatial::grid::{CellBounds, ParallelogramGrid, TileData};

    // Tests exact round trip over a skewed basis and a range of cells
    // Verified by pairing local x with the column output
    #[test]
    fn test_world_to_cell_inverts_cell_to_world() {
        let grid = skewed_grid();
        for row in -20..=20 {
            for col in -20..=20 {
                let cell = CellCoord::new(row, col);
                assert_eq!(
                    grid.world_to_cell(grid.cell_to_world(cell)),
                    Some(cell),
                    "round trip failed for {cell}"
                );
            }
        }
    }

    // Tests that points near a cell center resolve to that cell
    #[test]
    fn test_world_to_cell_near_center() {
        let grid = skewed_grid();
        let cell = CellCoord::new(4, -7);
        let center = grid.cell_to_world(cell);
        let nudge = (grid.axis_row() + grid.axis_col()) * 0.2;

        assert_eq!(grid.world_to_cell(center + nudge), Some(cell));
        assert_eq!(grid.world_to_cell(center - nudge), Some(cell));
    }

    // Tests half-up rounding on the cell boundary
    #[test]
    fn test_world_to_cell_rounds_half_up() {
        let grid = ParallelogramGrid::default();
        assert_eq!(
            grid.world_to_cell(Vec3::new(0.5, -0.5, 0.0)),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            grid.world_to_cell(Vec3::new(0.49, -0.51, 0.0)),
            Some(CellCoord::new(0, -1))
        );
    }

    #[test]
    fn test_world_to_cell_degenerate_basis_returns_none() {
        let grid = ParallelogramGrid::with_basis(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-2.0, 0.0, 0.0),
        );
        assert!(grid.is_degenerate());
        assert_eq!(grid.world_to_cell(Vec3::new(0.25, 3.0, 0.0)), None);
    }

    #[test]
    fn test_world_to_cell_out_of_range_returns_none() {
        let grid = ParallelogramGrid::default();
        assert_eq!(grid.world_to_cell(Vec3::new(1e12, 0.0, 0.0)), None);
        assert_eq!(grid.world_to_cell(Vec3::new(f32::NAN, 0.0, 0.0)), None);
    }

    // Tests that only new keys and removals advance the membership revision
    // Verified by bumping the revision on every set_tile
    #[test]
    fn test_membership_revision_tracks_key_changes() {
        let mut grid = ParallelogramGrid::default();
        let start = grid.membership_revision();
        let cell = CellCoord::new(1, 1);

        assert_eq!(grid.set_tile(TileData::new(cell, 0)), None);
        let after_insert = grid.membership_revision();
        assert!(after_insert > start);

        assert_eq!(
            grid.set_tile(TileData::new(cell, 3)),
            Some(TileData::new(cell, 0))
        );
        assert_eq!(grid.membership_revision(), after_insert);

        assert_eq!(grid.remove_tile(CellCoord::new(9, 9)), None);
        assert_eq!(grid.membership_revision(), after_insert);

        assert_eq!(grid.remove_tile(cell), Some(TileData::new(cell, 3)));
        assert!(grid.membership_revision() > after_insert);
    }

    #[test]
    fn test_initialize_clears_cells_and_bumps_revision() {
        let mut grid = skewed_grid();
        grid.set_tile(TileData::new(CellCoord::new(0, 0), 1));
        let before = grid.membership_revision();

        grid.initialize(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));

        assert_eq!(grid.cell_count(), 0);
        assert!(grid.membership_revision() > before);
        assert_eq!(grid.cell_size(), Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_has_tile_and_lookup() {
        let mut grid = ParallelogramGrid::default();
        let cell = CellCoord::new(2, 3);
        grid.set_tile(TileData::new(cell, 5));

        assert!(grid.has_tile(cell));
        assert!(!grid.has_tile(CellCoord::new(3, 2)));
        assert_eq!(grid.tile(cell).map(|t| t.sprite_index), Some(5));
        assert_eq!(grid.cell_count(), 1);
    }

    // Tests inclusive bounds over scattered cells
    #[test]
    fn test_bounds_cover_all_cells() {
        let mut grid = ParallelogramGrid::default();
        for (row, col) in [(-2, 5), (3, -1), (0, 0)] {
            grid.set_tile(TileData::new(CellCoord::new(row, col), 0));
        }

        let bounds = grid.bounds();
        assert_eq!(bounds.min, CellCoord::new(-2, -1));
        assert_eq!(bounds.size, [6, 7]);
        assert_eq!(bounds.max(), Some(CellCoord::new(3, 5)));
        assert!(bounds.contains(CellCoord::new(1, 4)));
        assert!(!bounds.contains(CellCoord::new(4, 0)));
    }

    // Tests bounds spanning the full i32 row range
    // Verified by computing the extent in i32 arithmetic
    #[test]
    fn test_bounds_at_coordinate_extremes() {
        let mut grid = ParallelogramGrid::default();
        grid.set_tile(TileData::new(CellCoord::new(i32::MIN, 0), 0));
        grid.set_tile(TileData::new(CellCoord::new(i32::MAX, 0), 0));

        let bounds = grid.bounds();
        assert_eq!(bounds.min, CellCoord::new(i32::MIN, 0));
        assert_eq!(bounds.size, [1u64 << 32, 1]);
        assert!(!bounds.is_empty());
        assert_eq!(bounds.max(), Some(CellCoord::new(i32::MAX, 0)));
        assert!(bounds.contains(CellCoord::new(0, 0)));
        assert!(!bounds.contains(CellCoord::new(0, 1)));
        assert_eq!(
            CellBounds::from_corners(CellCoord::new(i32::MIN, 0), CellCoord::new(i32::MAX, 0)),
            bounds
        );

        let mut grid = ParallelogramGrid::default();
        grid.set_tile(TileData::new(CellCoord::new(-10, 0), 0));
        grid.set_tile(TileData::new(CellCoord::new(i32::MAX, 0), 0));

        let bounds = grid.bounds();
        assert_eq!(bounds.rows(), (1u64 << 31) + 10);
        assert_eq!(bounds.max(), Some(CellCoord::new(i32::MAX, 0)));
        assert!(bounds.contains(CellCoord::new(i32::MAX, 0)));
    }

    #[test]
    fn test_bounds_of_empty_grid() {
        let grid = ParallelogramGrid::default();
        let bounds = grid.bounds();

        assert_eq!(bounds, CellBounds::EMPTY);
        assert!(bounds.is_empty());
        assert_eq!(bounds.max(), None);
        assert!(!bounds.contains(CellCoord::new(0, 0)));
    }

    #[test]
    fn test_tiles_sorted_is_row_major() {
        let mut grid = ParallelogramGrid::default();
        for (row, col) in [(1, 0), (0, 2), (0, -1)] {
            grid.set_tile(TileData::new(CellCoord::new(row, col), 0));
        }

        let positions: Vec<CellCoord> = grid.tiles_sorted().iter().map(|t| t.position).collect();
        assert_eq!(
            positions,
            vec![
                CellCoord::new(0, -1),
                CellCoord::new(0, 2),
                CellCoord::new(1, 0)
            ]
        );
    }

    // Tests that a clone is a separate grid identity with equal contents
    #[test]
    fn test_clone_gets_new_identity() {
        let mut grid = skewed_grid();
        grid.set_tile(TileData::new(CellCoord::new(0, 1), 2));
        let copy = grid.clone();

        assert_ne!(copy.id(), grid.id());
        assert_eq!(copy.tiles_sorted(), grid.tiles_sorted());
        assert_eq!(copy.membership_revision(), grid.membership_revision());
    }
}
