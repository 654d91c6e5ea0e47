use nalgebra as na;
use rand::Rng;

use ornament_hull::ConvexHull;

fn main() {
    let mut rng = rand::thread_rng();
    let size = 1000.0;
    let points: Vec<_> = (0..5_000)
        .map(|_| {
            na::Point3::new(
                rng.gen_range(-size, size),
                rng.gen_range(-size, size),
                rng.gen_range(-size, size),
            )
        })
        .collect();

    let mut hull = ConvexHull::new();
    let mut count = 0;
    for _ in 0..50 {
        count += hull.set_from_points(&points).vertex_ids().len();
    }
    println!("Emitted a total of {} vertices", count);

    let triangles = hull.to_triangle_list();
    let area: f64 = triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.vertices;
            (b - a).cross(&(c - a)).norm() * 0.5
        })
        .sum();
    println!(
        "Last hull: {} triangles, surface area {:.1}",
        triangles.len(),
        area
    );
}
