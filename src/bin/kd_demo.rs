//! Builds a k-d tree over a small 2-d sample, prints it, and answers one nearest-neighbor query.

use clap::Parser;
use kd_nearest::{KdTree, KdTreeError};

#[derive(Parser, Debug)]
#[command(name = "kd_demo", about = "Nearest-neighbor lookup over the sample point set")]
struct Args {
    /// Query x coordinate
    #[arg(default_value_t = 3.0, allow_negative_numbers = true)]
    x: f64,
    /// Query y coordinate
    #[arg(default_value_t = 4.5, allow_negative_numbers = true)]
    y: f64,
}

fn sample_points() -> Vec<Vec<f64>> {
    vec![
        vec![2.0, 3.0],
        vec![5.0, 4.0],
        vec![9.0, 6.0],
        vec![4.0, 7.0],
        vec![8.0, 1.0],
        vec![7.0, 2.0],
    ]
}

fn main() -> Result<(), KdTreeError> {
    let args = Args::parse();

    let tree = KdTree::build(sample_points())?;
    print!("{tree}");

    let nearest = tree.nearest(&[args.x, args.y])?;
    let coordinates: Vec<String> = nearest.point.iter().map(|c| c.to_string()).collect();
    println!("{}", coordinates.join(" "));
    println!("squared distance: {}", nearest.squared_distance);
    Ok(())
}
