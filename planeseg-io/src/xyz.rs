use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use planeseg_core::cloud::PointCloud;
use planeseg_core::nalgebra::Vector3;

/// Reads a tab-separated XYZ file into a [PointCloud].
///
/// The first line is treated as a header and skipped; every subsequent non-empty line must
/// hold at least three tab-separated floating-point columns (`x`, `y`, `z`).
///
/// # Errors
///
/// If the file cannot be opened or a line cannot be parsed, an error carrying the file path
/// resp. line number is returned.
pub fn read_xyz<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
    read_xyz_from(BufReader::new(file))
}

/// Reads tab-separated XYZ data from any buffered reader. See [read_xyz].
pub fn read_xyz_from<R: BufRead>(reader: R) -> Result<PointCloud> {
    let mut lines = reader.lines();
    // the first line is a header like "x\ty\tz"
    if let Some(header) = lines.next() {
        header.context("failed to read the header line")?;
    }

    let mut points = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", index + 2))?;
        if line.trim().is_empty() {
            continue;
        }
        let point =
            parse_point(&line).with_context(|| format!("malformed point on line {}", index + 2))?;
        points.push(point);
    }
    Ok(PointCloud::new(points))
}

fn parse_point(line: &str) -> Result<Vector3<f64>> {
    let mut columns = line.split('\t');
    let mut next_coordinate = |axis: char| -> Result<f64> {
        let column = columns
            .next()
            .ok_or_else(|| anyhow!("missing {} column", axis))?;
        column
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid {} coordinate '{}'", axis, column))
    };
    Ok(Vector3::new(
        next_coordinate('x')?,
        next_coordinate('y')?,
        next_coordinate('z')?,
    ))
}

/// Writes the points as a tab-separated XYZ file with an `x\ty\tz` header line.
///
/// # Errors
///
/// If the file cannot be created or written to, an error is returned.
pub fn write_xyz<P: AsRef<Path>>(path: P, points: &[Vector3<f64>]) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
    write_xyz_to(BufWriter::new(file), points)
}

/// Writes the points as tab-separated XYZ data to any writer. See [write_xyz].
pub fn write_xyz_to<W: Write>(mut writer: W, points: &[Vector3<f64>]) -> Result<()> {
    writeln!(writer, "x\ty\tz")?;
    for point in points {
        writeln!(writer, "{:.6}\t{:.6}\t{:.6}", point.x, point.y, point.z)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_read_skips_the_header_line() {
        let data = "x\ty\tz\n1.0\t2.0\t3.0\n-4.5\t0.25\t1e3\n";
        let cloud = read_xyz_from(Cursor::new(data)).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0], Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(cloud[1], Vector3::new(-4.5, 0.25, 1000.0));
    }

    #[test]
    fn test_read_ignores_blank_lines() {
        let data = "x\ty\tz\n1.0\t2.0\t3.0\n\n";
        let cloud = read_xyz_from(Cursor::new(data)).unwrap();
        assert_eq!(cloud.len(), 1);
    }

    #[test]
    fn test_read_of_header_only_file_yields_empty_cloud() {
        let cloud = read_xyz_from(Cursor::new("x\ty\tz\n")).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_read_reports_the_offending_line() {
        let data = "x\ty\tz\n1.0\t2.0\t3.0\n1.0\tnope\t3.0\n";
        let err = read_xyz_from(Cursor::new(data)).unwrap_err();
        assert!(format!("{}", err).contains("line 3"));
    }

    #[test]
    fn test_read_rejects_missing_columns() {
        let data = "x\ty\tz\n1.0\t2.0\n";
        assert!(read_xyz_from(Cursor::new(data)).is_err());
    }

    #[test]
    fn test_written_files_can_be_read_back() {
        let points = vec![
            Vector3::new(1.5, -2.25, 3.0),
            Vector3::new(0.0, 100.0, -0.125),
        ];
        let mut buffer = Vec::new();
        write_xyz_to(&mut buffer, &points).unwrap();
        let cloud = read_xyz_from(Cursor::new(buffer)).unwrap();
        assert_eq!(cloud.points(), points.as_slice());
    }
}
