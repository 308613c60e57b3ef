use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{App, Arg};
use log::info;
use planeseg_algorithms::pipeline::RansacParams;
use planeseg_algorithms::segmentation::{find_dominant_plane, partition_by_plane};
use planeseg_io::xyz::{read_xyz, write_xyz};

struct Args {
    input_file: PathBuf,
    params: RansacParams,
}

fn get_args() -> Result<Args> {
    let matches = App::new("planeseg")
        .version("0.1")
        .about("Finds the dominant plane in an XYZ point cloud with a concurrent RANSAC pipeline")
        .arg(
            Arg::with_name("INPUT")
                .help("Input XYZ point cloud file (tab-separated, one header line)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("CONFIDENCE")
                .help("Probability that at least one sampled triplet is outlier-free, in (0, 1)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("INLIER_RATIO")
                .help("Estimated fraction of points on the dominant plane, in (0, 1)")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::with_name("EPSILON")
                .help("Maximum point-to-plane distance for a supporting point")
                .required(true)
                .index(4),
        )
        .arg(
            Arg::with_name("WORKERS")
                .short("w")
                .long("workers")
                .takes_value(true)
                .default_value("8")
                .help("Number of support-evaluator worker threads"),
        )
        .arg(
            Arg::with_name("SEED")
                .short("s")
                .long("seed")
                .takes_value(true)
                .help("Seed for the point sampler, for reproducible runs"),
        )
        .get_matches();

    let input_file = PathBuf::from(matches.value_of("INPUT").unwrap());
    let confidence = matches
        .value_of("CONFIDENCE")
        .unwrap()
        .parse::<f64>()
        .context("CONFIDENCE must be a floating-point number")?;
    let inlier_ratio = matches
        .value_of("INLIER_RATIO")
        .unwrap()
        .parse::<f64>()
        .context("INLIER_RATIO must be a floating-point number")?;
    let epsilon = matches
        .value_of("EPSILON")
        .unwrap()
        .parse::<f64>()
        .context("EPSILON must be a floating-point number")?;
    let workers = matches
        .value_of("WORKERS")
        .unwrap()
        .parse::<usize>()
        .context("WORKERS must be a positive integer")?;
    let seed = match matches.value_of("SEED") {
        Some(seed) => Some(seed.parse::<u64>().context("SEED must be an integer")?),
        None => None,
    };

    Ok(Args {
        input_file,
        params: RansacParams {
            confidence,
            inlier_ratio,
            epsilon,
            workers,
            seed,
        },
    })
}

/// Builds the output path `<stem><suffix>.<ext>` next to the input file, keeping the input's
/// extension (so `scene.XYZ` yields `scene_p.XYZ`)
fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("cloud");
    let extension = input
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("xyz");
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = get_args()?;

    let cloud = Arc::new(read_xyz(&args.input_file)?);
    info!(
        "loaded {} points from {}",
        cloud.len(),
        args.input_file.display()
    );

    let start = Instant::now();
    let best = find_dominant_plane(Arc::clone(&cloud), &args.params)?;
    info!("pipeline finished in {:?}", start.elapsed());

    println!(
        "dominant plane: {} ({} supporting points)",
        best.plane, best.support
    );

    let (inliers, outliers) = partition_by_plane(&cloud, &best.plane, args.params.epsilon);
    let inlier_path = output_path(&args.input_file, "_p");
    let outlier_path = output_path(&args.input_file, "_p0");
    write_xyz(&inlier_path, &inliers)?;
    write_xyz(&outlier_path, &outliers)?;
    info!(
        "wrote {} supporting points to {} and {} remaining points to {}",
        inliers.len(),
        inlier_path.display(),
        outliers.len(),
        outlier_path.display()
    );

    Ok(())
}
