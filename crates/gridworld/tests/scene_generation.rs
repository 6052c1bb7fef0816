use gridworld::{Scene, SceneGenerator, SceneParams};

/// Cells of different objects must neither coincide nor share an edge.
fn assert_objects_isolated(scene: &Scene) {
    for (a, first) in scene.objects.iter().enumerate() {
        for second in &scene.objects[a + 1..] {
            for (x1, y1) in first.cells() {
                for (x2, y2) in second.cells() {
                    let distance = x1.abs_diff(x2) + y1.abs_diff(y2);
                    assert!(
                        distance > 1,
                        "objects {first:?} and {second:?} touch at ({x1},{y1})/({x2},{y2})"
                    );
                }
            }
        }
    }
}

fn occupied_by_objects(scene: &Scene) -> usize {
    scene.objects.iter().map(|s| s.size * s.size).sum()
}

#[test]
fn random_scenes_keep_objects_apart() {
    let mut rng = fastrand::Rng::with_seed(11);
    let generator = SceneGenerator::new(SceneParams {
        dim: 7,
        max_objects: 6,
        max_object_size: 3,
        random_count: true,
        random_size: true,
    });
    for _ in 0..500 {
        let scene = generator.generate(&mut rng);
        assert_objects_isolated(&scene);
        assert!(scene.label() >= 1);
        assert!(scene.label() <= scene.requested);
        assert_eq!(scene.grid.count_ones(), occupied_by_objects(&scene));
    }
}

#[test]
fn two_single_cells_on_small_grid() {
    let mut rng = fastrand::Rng::with_seed(3);
    let generator = SceneGenerator::new(SceneParams {
        dim: 4,
        max_objects: 2,
        max_object_size: 1,
        random_count: false,
        random_size: false,
    });
    for _ in 0..200 {
        let scene = generator.generate(&mut rng);
        assert_eq!(scene.label(), 2);
        assert_eq!(scene.grid.count_ones(), 2);
        assert!(!scene.is_degraded());
        assert_objects_isolated(&scene);
    }
}

#[test]
fn crowded_grid_degrades_label() {
    let mut rng = fastrand::Rng::with_seed(5);
    // a 3x3 grid fits between 3 and 5 mutually isolated cells
    let generator = SceneGenerator::new(SceneParams {
        dim: 3,
        max_objects: 9,
        max_object_size: 1,
        random_count: false,
        random_size: false,
    });
    for _ in 0..100 {
        let scene = generator.generate(&mut rng);
        assert!(scene.is_degraded());
        assert_eq!(scene.requested, 9);
        assert_eq!(scene.label(), scene.objects.len());
        assert_eq!(scene.label(), scene.grid.count_ones());
        assert!((2..=5).contains(&scene.label()), "label {}", scene.label());
        assert_objects_isolated(&scene);
    }
}

#[test]
fn oversized_objects_shrink_to_fit() {
    let mut rng = fastrand::Rng::with_seed(8);
    let generator = SceneGenerator::new(SceneParams {
        dim: 4,
        max_objects: 2,
        max_object_size: 3,
        random_count: false,
        random_size: false,
    });
    for _ in 0..100 {
        let scene = generator.generate(&mut rng);
        assert_eq!(scene.objects[0].size, 3);
        assert_eq!(scene.label(), 2, "a 3x3 square always leaves room for one cell");
        assert_eq!(scene.objects[1].size, 1);
        assert_objects_isolated(&scene);
    }
}
