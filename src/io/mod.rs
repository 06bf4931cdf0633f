//! Plain-text interchange files.
//!
//! # Polygon input
//!
//! Whitespace-separated numbers: the vertex count `n`, then `n` coordinate
//! pairs in counter-clockwise order, then any number of partition segments
//! as `ox oy ex ey` quadruples.
//!
//! ```text
//! 4
//! 0 0
//! 3 0
//! 3 3
//! 0 3
//! 1 0 1 3
//! ```
//!
//! # Region output
//!
//! One value group per line: `guard.x guard.y`, the level `k`, the polygon
//! vertex count and vertices, the region count, then each region's vertex
//! count followed by its vertices.
//!
//! ```
//! use sightmesh::io::{write_regions, RegionReport};
//! use nalgebra::Point2;
//!
//! let report = RegionReport {
//!     guard: Point2::new(0.0, 0.0),
//!     level: 0,
//!     polygon: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
//!     regions: vec![],
//! };
//! let mut out = Vec::new();
//! write_regions(&mut out, &report).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("0.0 0.0\n0\n3\n"));
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point2;

use crate::error::{MeshError, Result};

/// A polygon with its optional partition segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonInput {
    /// Polygon vertices, counter-clockwise.
    pub vertices: Vec<Point2<f64>>,
    /// Partition segments as (origin, end).
    pub partitions: Vec<(Point2<f64>, Point2<f64>)>,
}

/// Everything written to a region file.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionReport {
    /// The guard vertex.
    pub guard: Point2<f64>,
    /// The visibility level the regions were merged at.
    pub level: u32,
    /// The input polygon.
    pub polygon: Vec<Point2<f64>>,
    /// Merged regions.
    pub regions: Vec<Vec<Point2<f64>>>,
}

/// Numbers of a text file, tagged with their 1-based line.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let inner = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |tok| (i + 1, tok)));
        Self {
            inner: Box::new(inner),
            last_line: 1,
        }
    }

    fn next_token(&mut self, what: &str) -> Result<(usize, &'a str)> {
        match self.inner.next() {
            Some((line, tok)) => {
                self.last_line = line;
                Ok((line, tok))
            }
            None => Err(MeshError::Parse {
                line: self.last_line,
                message: format!("unexpected end of input, expected {}", what),
            }),
        }
    }

    fn next_f64(&mut self, what: &str) -> Result<f64> {
        let (line, tok) = self.next_token(what)?;
        tok.parse().map_err(|_| MeshError::Parse {
            line,
            message: format!("invalid {} '{}'", what, tok),
        })
    }

    fn next_point(&mut self, what: &str) -> Result<Point2<f64>> {
        let x = self.next_f64(what)?;
        let y = self.next_f64(what)?;
        Ok(Point2::new(x, y))
    }

    fn next_raw(&mut self) -> Option<(usize, &'a str)> {
        self.inner.next()
    }
}

/// Parse a polygon description.
pub fn parse_polygon(text: &str) -> Result<PolygonInput> {
    let mut tokens = Tokens::new(text);

    let (line, tok) = tokens.next_token("vertex count")?;
    let n: usize = tok.parse().map_err(|_| MeshError::Parse {
        line,
        message: format!("invalid vertex count '{}'", tok),
    })?;

    let mut vertices = Vec::with_capacity(n);
    for _ in 0..n {
        vertices.push(tokens.next_point("vertex coordinate")?);
    }

    let mut partitions = Vec::new();
    while let Some((line, tok)) = tokens.next_raw() {
        let ox: f64 = tok.parse().map_err(|_| MeshError::Parse {
            line,
            message: format!("invalid partition coordinate '{}'", tok),
        })?;
        tokens.last_line = line;
        let oy = tokens.next_f64("partition coordinate")?;
        let end = tokens.next_point("partition coordinate")?;
        partitions.push((Point2::new(ox, oy), end));
    }

    log::debug!(
        "parsed polygon with {} vertices and {} partition segments",
        vertices.len(),
        partitions.len()
    );
    Ok(PolygonInput {
        vertices,
        partitions,
    })
}

/// Read a polygon description from a file.
pub fn read_polygon<P: AsRef<Path>>(path: P) -> Result<PolygonInput> {
    let text = fs::read_to_string(path)?;
    parse_polygon(&text)
}

fn write_point<W: Write>(writer: &mut W, p: &Point2<f64>) -> Result<()> {
    writeln!(writer, "{:?} {:?}", p.x, p.y)?;
    Ok(())
}

/// Write a region report.
pub fn write_regions<W: Write>(mut writer: W, report: &RegionReport) -> Result<()> {
    write_point(&mut writer, &report.guard)?;
    writeln!(writer, "{}", report.level)?;
    writeln!(writer, "{}", report.polygon.len())?;
    for p in &report.polygon {
        write_point(&mut writer, p)?;
    }

    writeln!(writer, "{}", report.regions.len())?;
    for region in &report.regions {
        writeln!(writer, "{}", region.len())?;
        for p in region {
            write_point(&mut writer, p)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a region report to a file.
pub fn save_regions<P: AsRef<Path>>(report: &RegionReport, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_regions(BufWriter::new(file), report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_polygon_with_partitions() {
        let text = "4\n0 0\n3 0\n3 3\n0 3\n1 0 1 3\n0 1.5 3 1.5\n";
        let input = parse_polygon(text).unwrap();
        assert_eq!(input.vertices.len(), 4);
        assert_eq!(input.vertices[2], Point2::new(3.0, 3.0));
        assert_eq!(
            input.partitions,
            vec![
                (Point2::new(1.0, 0.0), Point2::new(1.0, 3.0)),
                (Point2::new(0.0, 1.5), Point2::new(3.0, 1.5)),
            ]
        );
    }

    #[test]
    fn test_parse_polygon_on_one_line() {
        let input = parse_polygon("3 0 0 1 0 0 1").unwrap();
        assert_eq!(input.vertices.len(), 3);
        assert!(input.partitions.is_empty());
    }

    #[test]
    fn test_parse_errors_carry_line() {
        match parse_polygon("3\n0 0\n1 x\n0 1\n") {
            Err(MeshError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
        match parse_polygon("3\n0 0\n1 0\n") {
            Err(MeshError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("end of input"));
            }
            other => panic!("unexpected {:?}", other),
        }
        // Incomplete partition quadruple.
        assert!(matches!(
            parse_polygon("3\n0 0\n1 0\n0 1\n0 0 1\n"),
            Err(MeshError::Parse { line: 5, .. })
        ));
        assert!(matches!(parse_polygon(""), Err(MeshError::Parse { .. })));
    }

    #[test]
    fn test_write_regions_layout() {
        let report = RegionReport {
            guard: Point2::new(4.0, 0.0),
            level: 2,
            polygon: vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(0.0, 4.0)],
            regions: vec![vec![
                Point2::new(0.0, 4.0),
                Point2::new(0.0, 0.0),
                Point2::new(1.333333, 0.5),
            ]],
        };
        let mut out = Vec::new();
        write_regions(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "4.0 0.0\n2\n3\n0.0 0.0\n4.0 0.0\n0.0 4.0\n1\n3\n0.0 4.0\n0.0 0.0\n1.333333 0.5\n"
        );
    }
}
