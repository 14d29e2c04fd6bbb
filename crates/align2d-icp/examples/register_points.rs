use align2d_geometry::{pointset::PointSet, transform::Similarity2};
use align2d_icp::{icp_similarity, IcpParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // an L-shaped scene observed twice: the second observation is shifted
    // and slightly rotated, with one spurious detection appended
    let source = PointSet::new(vec![
        [100.0, 100.0],
        [140.0, 100.0],
        [180.0, 100.0],
        [220.0, 100.0],
        [100.0, 140.0],
        [100.0, 180.0],
        [100.0, 220.0],
    ]);

    let motion = Similarity2::from_params([160.0, -0.0002, 0.01, -45.0]);
    let mut target_points = motion.apply(&source).points().to_vec();
    target_points.push([900.0, 900.0]); // outlier
    let target = PointSet::new(target_points);

    let result = icp_similarity(&source, &target, IcpParams::default())?;

    println!("estimated transform: {:?}", result.transform);
    println!(
        "scale: {:.4}, angle: {:.4} rad, translation: ({:.2}, {:.2})",
        result.transform.scale(),
        result.transform.angle(),
        result.transform.tx,
        result.transform.ty,
    );
    println!("correspondences: {:?}", result.correspondences.indices);
    println!(
        "residual error after {} iterations: {:.4}",
        result.num_iterations, result.correspondences.total_error
    );

    Ok(())
}
