//! End-to-end scenarios for the visibility sweep and the scorer.

use approx::assert_relative_eq;
use needlepath::{
    analyze, calc_approach_score, compute_paths, AnalysisParams, SpatialIndex, INACCESSIBLE,
};
use needlepath_math::Point3;
use needlepath_mesh::Mesh;

/// Square `[0, 10]^2` at z = 0 split into four triangles around its center.
fn four_triangle_square() -> Mesh {
    Mesh::from_triangles(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
        ],
        &[[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
    )
}

/// Box `[-10, 10]^3` whose top face has a square window `[-2, 2]^2`.
fn box_with_window() -> Mesh {
    let v = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let vertices = vec![
        v(-10.0, -10.0, -10.0),
        v(10.0, -10.0, -10.0),
        v(10.0, 10.0, -10.0),
        v(-10.0, 10.0, -10.0),
        v(-10.0, -10.0, 10.0),
        v(10.0, -10.0, 10.0),
        v(10.0, 10.0, 10.0),
        v(-10.0, 10.0, 10.0),
        // Window corners on the top face.
        v(-2.0, -2.0, 10.0),
        v(2.0, -2.0, 10.0),
        v(2.0, 2.0, 10.0),
        v(-2.0, 2.0, 10.0),
    ];
    Mesh::from_triangles(
        vertices,
        &[
            // Bottom
            [0, 2, 1],
            [0, 3, 2],
            // Sides
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
            // Top ring around the window
            [4, 5, 9],
            [4, 9, 8],
            [5, 6, 10],
            [5, 10, 9],
            [6, 7, 11],
            [6, 11, 10],
            [7, 4, 8],
            [7, 8, 11],
        ],
    )
}

/// Regular grid of `n * n` vertices at height `z`, starting at `start` with
/// the given step.
fn grid(n: usize, start: f64, step: f64, z: f64) -> Mesh {
    let mut vertices = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            vertices.push(Point3::new(
                start + i as f64 * step,
                start + j as f64 * step,
                z,
            ));
        }
    }
    let row = n as u32;
    let mut tris = Vec::new();
    for j in 0..(n - 1) as u32 {
        for i in 0..(n - 1) as u32 {
            let a = j * row + i;
            tris.push([a, a + 1, a + row + 1]);
            tris.push([a, a + row + 1, a + row]);
        }
    }
    Mesh::from_triangles(vertices, &tris)
}

#[test]
fn test_flat_skin_without_obstacles() {
    let skin = four_triangle_square();
    let target = Point3::new(5.0, 5.0, 50.0);
    let params = AnalysisParams::default();
    let result = analyze(&target, &Mesh::new(), &skin, &params).unwrap();

    // All five vertices are visible; the center is nearest, corners tie.
    assert_eq!(result.paths.len(), 5);
    assert_eq!(result.paths.shortest_index, Some(4));
    assert_eq!(result.paths.longest_index, Some(0));
    assert_relative_eq!(result.paths.shortest_length().unwrap(), 50.0);

    // Every centroid is at the same distance from the target.
    let d = ((10.0f64 / 3.0).powi(2) + 50.0 * 50.0).sqrt();
    let acc = &result.accessibility;
    assert_relative_eq!(acc.score, 100.0 * (130.0 - d) / 130.0, epsilon = 1e-9);
    assert_relative_eq!(acc.accessible_area, acc.score);
    assert_eq!(acc.inaccessible_area, 0.0);
    assert_relative_eq!(acc.minimum_distance, d, epsilon = 1e-9);
    // First cell wins the tie.
    let first_centroid = Point3::new(5.0, 5.0 / 3.0, 0.0);
    assert!((acc.minimum_distance_point.unwrap() - first_centroid).norm() < 1e-9);
    for scalar in &acc.cell_scalars {
        assert_relative_eq!(*scalar, d + 101.0, epsilon = 1e-9);
    }
    // Nothing is occluded, so the normalized variant is exactly 1.
    assert_eq!(acc.normalized_score(), 1.0);
}

#[test]
fn test_window_in_enclosing_obstacle() {
    let index = SpatialIndex::build(&box_with_window()).unwrap();
    assert_eq!(index.num_triangles(), 18);
    let skin = grid(5, -6.0, 3.0, 20.0);
    let target = Point3::origin();
    let params = AnalysisParams::default();

    let paths = compute_paths(&target, &index, &skin, &params).unwrap();

    // Lines from the grid cross the top face at half the grid coordinate:
    // only x, y in {-3, 0, 3} fall through the window.
    let expected: Vec<usize> = (0..25)
        .filter(|&n| {
            let (i, j) = (n % 5, n / 5);
            (1..=3).contains(&i) && (1..=3).contains(&j)
        })
        .collect();
    assert_eq!(paths.vertex_indices, expected);
    assert_eq!(paths.candidates, 25);

    // The vertex straight above the target is the shortest path.
    let shortest = paths.shortest().unwrap();
    assert!((shortest.entry - Point3::new(0.0, 0.0, 20.0)).norm() < 1e-12);

    let acc = calc_approach_score(&target, &index, &skin, &params).unwrap();
    assert!(acc.score > 0.0);
    assert!(acc.inaccessible_area > 0.0);
    assert!(acc.cells_visible > 0 && acc.cells_occluded > 0);
    assert_eq!(acc.cells_visible + acc.cells_occluded, skin.num_cells());
    assert_eq!(acc.cell_scalars.len(), skin.num_cells());
}

#[test]
fn test_normalized_score_with_partial_occlusion() {
    let index = SpatialIndex::build(&box_with_window()).unwrap();
    let skin = grid(5, -6.0, 3.0, 20.0);
    let target = Point3::origin();
    let params = AnalysisParams::default();
    let acc = calc_approach_score(&target, &index, &skin, &params).unwrap();

    // Sum the areas cell by cell.
    let mut accessible = 0.0;
    let mut inaccessible = 0.0;
    for (_, tri) in skin.triangles() {
        let tri = tri.unwrap();
        let centroid = tri.centroid();
        if index.intersects(&centroid, &target, params.tolerance) {
            inaccessible += tri.area();
        } else {
            let d = (centroid - target).norm();
            accessible += tri.area() * (params.cutoff - d) / params.cutoff;
        }
    }
    assert!(accessible > 0.0 && inaccessible > 0.0);
    assert_relative_eq!(acc.accessible_area, accessible, epsilon = 1e-9);
    assert_relative_eq!(acc.inaccessible_area, inaccessible, epsilon = 1e-9);
    assert_relative_eq!(
        acc.normalized_score(),
        accessible / (accessible + inaccessible),
        epsilon = 1e-12
    );
    assert!(acc.normalized_score() < 1.0);
}

#[test]
fn test_closed_box_blocks_everything() {
    let mut obstacle = box_with_window();
    // Close the window.
    obstacle.cells.push(vec![8, 9, 10]);
    obstacle.cells.push(vec![8, 10, 11]);
    let index = SpatialIndex::build(&obstacle).unwrap();
    let skin = grid(5, -6.0, 3.0, 20.0);
    let params = AnalysisParams::default();

    let paths = compute_paths(&Point3::origin(), &index, &skin, &params).unwrap();
    assert!(paths.is_empty());
    assert_eq!(paths.shortest_index_raw(), -1);
    assert_eq!(paths.longest_index_raw(), -1);

    let acc = calc_approach_score(&Point3::origin(), &index, &skin, &params).unwrap();
    assert_eq!(acc.score, 0.0);
    assert_eq!(acc.minimum_distance, INACCESSIBLE);
    assert_relative_eq!(acc.inaccessible_area, skin.total_surface_area(), epsilon = 1e-9);
    assert!(acc.cell_scalars.iter().all(|&s| s == INACCESSIBLE));
}

#[test]
fn test_skin_vertex_on_target_is_skipped() {
    let skin = four_triangle_square();
    // Target sits exactly on the center vertex.
    let target = Point3::new(5.0, 5.0, 0.0);
    let index = SpatialIndex::build(&Mesh::new()).unwrap();
    let params = AnalysisParams::default();

    let paths = compute_paths(&target, &index, &skin, &params).unwrap();
    assert_eq!(paths.skipped_coincident, 1);
    assert_eq!(paths.len(), 4);
    assert!(!paths.vertex_indices.contains(&4));
    assert!(paths.iter().all(|p| p.length() > 0.0));

    // Centroids are off the target, so every cell still scores.
    let acc = calc_approach_score(&target, &index, &skin, &params).unwrap();
    assert_eq!(acc.cells_skipped, 0);
    assert_eq!(acc.cells_visible, 4);
}

#[test]
fn test_quad_cells_in_skin_are_skipped() {
    let mut skin = four_triangle_square();
    skin.cells.push(vec![0, 1, 2, 3]);
    let target = Point3::new(5.0, 5.0, 50.0);
    let result = analyze(&target, &Mesh::new(), &skin, &AnalysisParams::default()).unwrap();
    assert_eq!(result.accessibility.cells_skipped, 1);
    assert_eq!(result.accessibility.cell_scalars[4], INACCESSIBLE);
    assert_eq!(result.accessibility.cells_visible, 4);
}

#[test]
fn test_invalid_skin_reference_is_an_error() {
    let mut skin = four_triangle_square();
    skin.cells.push(vec![0, 1, 99]);
    let result = analyze(
        &Point3::new(5.0, 5.0, 50.0),
        &Mesh::new(),
        &skin,
        &AnalysisParams::default(),
    );
    assert!(result.is_err());
}
