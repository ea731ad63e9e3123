//! 3D view of a voxel grid using kiss3d.

use std::collections::HashMap;

use kiss3d::prelude::*;

use brickbox::{PlacementId, VoxelGrid};

/// Palette cycled by placement order.
const PALETTE: [(f32, f32, f32); 10] = [
    (1.0, 0.2, 0.2), // red
    (0.2, 1.0, 0.2), // green
    (0.2, 0.2, 1.0), // blue
    (1.0, 1.0, 0.2), // yellow
    (1.0, 0.2, 1.0), // magenta
    (0.2, 1.0, 1.0), // cyan
    (1.0, 0.6, 0.2), // orange
    (0.6, 0.3, 1.0), // violet
    (0.5, 0.8, 0.4), // olive
    (0.9, 0.5, 0.6), // pink
];

/// Returns the display color for the `order`-th placed brick.
fn brick_color(order: usize) -> Color {
    let (r, g, b) = PALETTE[order % PALETTE.len()];
    Color::new(r, g, b, 1.0)
}

/// Represents a rendered cube in the 3D scene.
struct RenderedCube {
    node: SceneNode3d,
    /// The cube's position when not exploded.
    base_position: Vec3,
    id: PlacementId,
}

/// Builds the 3D scene for the grid.
///
/// Grid coordinates map x->X, y->Y, z->Z in world units, centered at the origin.
/// Returns the rendered cubes and each placement's centroid for the explosion view.
fn build_scene(
    scene: &mut SceneNode3d,
    grid: &VoxelGrid,
) -> (Vec<RenderedCube>, HashMap<PlacementId, Vec3>) {
    /// Size of each rendered cube (slightly smaller than 1.0 for visible gaps).
    const CUBE_SIZE: f32 = 0.9;

    let center_offset = -(grid.size() as f32 - 1.0) / 2.0;
    let to_world = |(x, y, z): (i32, i32, i32)| {
        Vec3::new(
            x as f32 + center_offset,
            y as f32 + center_offset,
            z as f32 + center_offset,
        )
    };

    let mut rendered_cubes = Vec::new();
    let mut centroids = HashMap::new();
    for (order, placement) in grid.placements().enumerate() {
        let cells = placement.cells();
        let sum = cells
            .iter()
            .map(|&cell| to_world(cell))
            .fold(Vec3::ZERO, |acc, pos| acc + pos);
        centroids.insert(placement.id(), sum / cells.len() as f32);

        for cell in cells {
            let base_position = to_world(cell);
            let node = scene
                .add_cube(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE)
                .set_color(brick_color(order))
                .set_position(base_position);
            rendered_cubes.push(RenderedCube {
                node,
                base_position,
                id: placement.id(),
            });
        }
    }

    (rendered_cubes, centroids)
}

/// Displays the grid in an interactive 3D viewer until the window closes.
pub fn display(grid: &VoxelGrid) {
    pollster::block_on(display_async(grid));
}

async fn display_async(grid: &VoxelGrid) {
    let mut window = Window::new(&format!(
        "{} bricks - [Up/Down] explode, [R] reset",
        grid.placements().count()
    ))
    .await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(grid.size() as f32 * 2.5);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 5.0) * grid.size() as f32);

    let (mut rendered_cubes, centroids) = build_scene(&mut scene, grid);

    // how much to push bricks apart (0.0 = compact)
    let mut explosion_amount: f32 = 0.0;
    const EXPLOSION_SPEED: f32 = 0.05;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Up => explosion_amount += EXPLOSION_SPEED,
                        Key::Down => {
                            explosion_amount = (explosion_amount - EXPLOSION_SPEED).max(0.0)
                        }
                        Key::R => explosion_amount = 0.0,
                        _ => {}
                    }
                }
            }
        }

        for cube in &mut rendered_cubes {
            let direction = centroids
                .get(&cube.id)
                .map(|centroid| centroid.normalize_or_zero())
                .unwrap_or(Vec3::ZERO);
            cube.node
                .set_position(cube.base_position + direction * explosion_amount * 2.0);
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
