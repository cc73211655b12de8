//! Tests for full mesh builds and single-cell refreshes

#[cfg(test)]
mod tests {
    use crate::{GRASS, MARKER, WATER, sample_catalog, skewed_grid, unit_sprite};
    use paratile::TilemapError;
    use paratile::mesh::buffers::StaleReason;
    use paratile::mesh::builder::quad_geometry;
    use paratile::mesh::{MeshBuilder, QuadMeshBuilder};
    use paratile::spatial::coords::{CellCoord, Vec3};
    use paratile::spatial::grid::{ParallelogramGrid, TileData};
    use paratile::spatial::tiles::{PixelRect, Sprite};

    // Tests corner placement around the cell center with winding BL, TL, TR, BR
    #[test]
    fn test_quad_geometry_corners() {
        let sprite = Sprite::new([32, 32], PixelRect::new(0.0, 0.0, 32.0, 16.0), [2.0, 1.0])
            .expect("valid sprite");
        let (vertices, uvs) = quad_geometry(Vec3::new(10.0, 20.0, 3.0), &sprite);

        assert_eq!(
            vertices,
            [
                [9.0, 19.5, 3.0],
                [9.0, 20.5, 3.0],
                [11.0, 20.5, 3.0],
                [11.0, 19.5, 3.0],
            ]
        );
        assert_eq!(uvs, [[0.0, 0.0], [0.0, 0.5], [1.0, 0.5], [1.0, 0.0]]);
    }

    // Tests that every occupied cell gets exactly one slot and slots are dense
    #[test]
    fn test_build_assigns_each_cell_one_slot() {
        let mut grid = skewed_grid();
        for (row, col) in [(0, 0), (2, -1), (-3, 4), (7, 7)] {
            grid.set_tile(TileData::new(CellCoord::new(row, col), WATER));
        }

        let mesh = QuadMeshBuilder::new()
            .build_mesh(&grid, &sample_catalog())
            .expect("build succeeds");

        let mut slots: Vec<usize> = grid
            .tiles()
            .filter_map(|tile| mesh.slot_of(tile.position))
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_eq!(mesh.slot_of(CellCoord::new(1, 1)), None);
    }

    // Tests that slots follow row-major cell order whatever the insertion order
    // Verified by assigning slots in hash map iteration order
    #[test]
    fn test_build_slots_follow_row_major_order() {
        let mut grid = ParallelogramGrid::default();
        for (row, col) in [(5, 0), (-2, 3), (0, 1), (-2, -8), (0, 0)] {
            grid.set_tile(TileData::new(CellCoord::new(row, col), GRASS));
        }

        let mesh = QuadMeshBuilder::new()
            .build_mesh(&grid, &sample_catalog())
            .expect("build succeeds");

        let expected = [(-2, -8), (-2, 3), (0, 0), (0, 1), (5, 0)];
        for (slot, (row, col)) in expected.into_iter().enumerate() {
            assert_eq!(mesh.slot_of(CellCoord::new(row, col)), Some(slot));
        }
    }

    // Tests index values: slot k references vertices 4k..4k+3 as [0,1,2,2,3,0]
    // Verified by using slot * 6 as the vertex base
    #[test]
    fn test_build_triangle_topology() {
        let mut grid = ParallelogramGrid::default();
        for col in 0..3 {
            grid.set_tile(TileData::new(CellCoord::new(0, col), GRASS));
        }

        let mesh = QuadMeshBuilder::new()
            .build_mesh(&grid, &sample_catalog())
            .expect("build succeeds");

        assert_eq!(
            mesh.triangle_indices(),
            &[0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4, 8, 9, 10, 10, 11, 8]
        );
    }

    #[test]
    fn test_build_centers_quads_on_cells() {
        let mut grid = skewed_grid();
        let cell = CellCoord::new(2, 3);
        grid.set_tile(TileData::new(cell, GRASS));

        let mesh = QuadMeshBuilder::new()
            .build_mesh(&grid, &sample_catalog())
            .expect("build succeeds");
        let (expected, _) = quad_geometry(grid.cell_to_world(cell), &unit_sprite(0));

        let slot = mesh.slot_of(cell).expect("slot assigned");
        assert_eq!(mesh.quad_vertices(slot), Some(&expected[..]));
        let bounds = mesh.bounds().expect("bounds computed");
        assert_eq!(bounds.min, Vec3::from(expected[0]));
        assert_eq!(bounds.max, Vec3::from(expected[2]));
    }

    // Tests that an unknown sprite index fails the whole build
    #[test]
    fn test_build_rejects_out_of_range_index() {
        let mut grid = ParallelogramGrid::default();
        grid.set_tile(TileData::new(CellCoord::new(0, 0), GRASS));
        grid.set_tile(TileData::new(CellCoord::new(0, 1), 7));

        let result = QuadMeshBuilder::new().build_mesh(&grid, &sample_catalog());
        assert!(matches!(
            result,
            Err(TilemapError::InvalidTileIndex {
                index: 7,
                max_tiles: 3
            })
        ));
    }

    // Tests that a refresh rewrites only the target slot's vertices and UVs
    // Verified by writing the quad at slot + 1
    #[test]
    fn test_refresh_patches_single_slot() {
        let mut grid = skewed_grid();
        for (row, col) in [(0, 0), (0, 1), (1, 0)] {
            grid.set_tile(TileData::new(CellCoord::new(row, col), GRASS));
        }
        let catalog = sample_catalog();
        let builder = QuadMeshBuilder::new();
        let mut mesh = builder.build_mesh(&grid, &catalog).expect("build succeeds");
        let before = mesh.clone();

        let target = CellCoord::new(0, 1);
        grid.set_tile(TileData::new(target, WATER));
        let asset = catalog.get(WATER).expect("known tile");
        builder
            .refresh_cell(&mut mesh, &grid, asset, target)
            .expect("refresh succeeds");

        let slot = mesh.slot_of(target).expect("slot assigned");
        for other in (0..mesh.quad_count()).filter(|s| *s != slot) {
            assert_eq!(mesh.quad_vertices(other), before.quad_vertices(other));
            assert_eq!(mesh.quad_uvs(other), before.quad_uvs(other));
        }
        assert_ne!(mesh.quad_uvs(slot), before.quad_uvs(slot));
        assert_eq!(mesh.triangle_indices(), before.triangle_indices());
    }

    #[test]
    fn test_refresh_unknown_cell_fails() {
        let mut grid = ParallelogramGrid::default();
        grid.set_tile(TileData::new(CellCoord::new(0, 0), GRASS));
        let catalog = sample_catalog();
        let builder = QuadMeshBuilder::new();
        let mut mesh = builder.build_mesh(&grid, &catalog).expect("build succeeds");

        let asset = catalog.get(GRASS).expect("known tile");
        let result = builder.refresh_cell(&mut mesh, &grid, asset, CellCoord::new(4, 4));
        assert!(matches!(
            result,
            Err(TilemapError::CellNotInMesh { cell }) if cell == CellCoord::new(4, 4)
        ));
        assert!(mesh.is_fresh());
    }

    // Tests that a refresh after a structural edit is refused and marks the mesh stale
    // Verified by skipping the revision comparison
    #[test]
    fn test_refresh_after_insert_is_stale() {
        let mut grid = ParallelogramGrid::default();
        grid.set_tile(TileData::new(CellCoord::new(0, 0), GRASS));
        let catalog = sample_catalog();
        let builder = QuadMeshBuilder::new();
        let mut mesh = builder.build_mesh(&grid, &catalog).expect("build succeeds");
        let built_revision = grid.membership_revision();

        grid.set_tile(TileData::new(CellCoord::new(0, 1), GRASS));
        let asset = catalog.get(GRASS).expect("known tile");
        let result = builder.refresh_cell(&mut mesh, &grid, asset, CellCoord::new(0, 0));

        let expected = StaleReason::MembershipChanged {
            built_revision,
            grid_revision: grid.membership_revision(),
        };
        assert!(matches!(
            result,
            Err(TilemapError::StaleMesh { reason, .. }) if reason == expected
        ));
        assert!(!mesh.is_fresh());
    }

    // Tests that an asset without a sprite leaves the buffers untouched
    #[test]
    fn test_refresh_without_sprite_is_noop() {
        let mut grid = ParallelogramGrid::default();
        grid.set_tile(TileData::new(CellCoord::new(0, 0), GRASS));
        let catalog = sample_catalog();
        let builder = QuadMeshBuilder::new();
        let mut mesh = builder.build_mesh(&grid, &catalog).expect("build succeeds");
        let before = mesh.clone();

        let asset = catalog.get(MARKER).expect("known tile");
        builder
            .refresh_cell(&mut mesh, &grid, asset, CellCoord::new(0, 0))
            .expect("no-op succeeds");

        assert_eq!(mesh.vertex_bytes(), before.vertex_bytes());
        assert_eq!(mesh.uv_bytes(), before.uv_bytes());
    }

    // Tests that patching a hidden slot writes geometry but does not add triangles
    #[test]
    fn test_refresh_hidden_slot_stays_hidden() {
        let mut grid = ParallelogramGrid::default();
        let cell = CellCoord::new(0, 0);
        grid.set_tile(TileData::new(cell, MARKER));
        let catalog = sample_catalog();
        let builder = QuadMeshBuilder::new();
        let mut mesh = builder.build_mesh(&grid, &catalog).expect("build succeeds");

        let asset = catalog.get(GRASS).expect("known tile");
        builder
            .refresh_cell(&mut mesh, &grid, asset, cell)
            .expect("refresh succeeds");

        assert_eq!(mesh.visible_quad_count(), 0);
        assert_eq!(mesh.triangle_indices(), &[0; 6]);
        assert_ne!(mesh.quad_vertices(0), Some(&[[0.0_f32; 3]; 4][..]));
    }
}
