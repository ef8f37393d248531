//! Coordinate-file importer: one point per line, missing components carried
//! over from the previous point.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use corelib::Vec3;

use crate::error::FormatError;

/// How a line with exactly two coordinates is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TwoTokenMode {
    /// Tokens set Y and Z, X is carried over.
    #[default]
    CarryX,
    /// X from token 1, Y from token 2, Z carried over. Token 2 never exists on
    /// a two-token line, so such lines are rejected.
    Legacy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointImportOptions {
    pub two_token: TwoTokenMode,
}

/// Load points from a file path.
pub fn load_points_from_path(
    path: impl AsRef<Path>,
    options: PointImportOptions,
) -> Result<Vec<Vec3>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open point file: {}", path.as_ref().display()))?;
    let points = load_points_from_reader(BufReader::new(file), options).with_context(|| {
        format!("Failed to import points from {}", path.as_ref().display())
    })?;
    log::info!(
        "Loaded {} points from {}",
        points.len(),
        path.as_ref().display()
    );
    Ok(points)
}

/// Load points from a [`BufRead`] implementation.
pub fn load_points_from_reader<R: BufRead>(
    reader: R,
    options: PointImportOptions,
) -> Result<Vec<Vec3>> {
    let mut points = Vec::new();
    let mut last = Vec3::ZERO;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        last = parse_point_line(&line, line_no + 1, last, options)?;
        points.push(last);
    }
    Ok(points)
}

/// Convenience helper to parse an in-memory coordinate listing.
pub fn load_points_from_str(contents: &str, options: PointImportOptions) -> Result<Vec<Vec3>> {
    load_points_from_reader(io::Cursor::new(contents), options)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, 'X' | 'Y' | 'Z')
}

/// Parse one line given the previously emitted point. `line` is 1-based.
pub fn parse_point_line(
    line: &str,
    line_no: usize,
    last: Vec3,
    options: PointImportOptions,
) -> Result<Vec3, FormatError> {
    let parts: Vec<&str> = line.split(is_separator).filter(|s| !s.is_empty()).collect();
    let coord = |i: usize| -> Result<f32, FormatError> {
        let token = parts.get(i).ok_or(FormatError::TokenCount {
            line: line_no,
            count: parts.len(),
        })?;
        token.parse::<f32>().map_err(|_| FormatError::InvalidNumber {
            context: format!("line {line_no}"),
            token: (*token).to_owned(),
        })
    };

    match parts.len() {
        1 => Ok(Vec3::new(coord(0)?, last.y, last.z)),
        2 => match options.two_token {
            TwoTokenMode::CarryX => Ok(Vec3::new(last.x, coord(0)?, coord(1)?)),
            TwoTokenMode::Legacy => Ok(Vec3::new(coord(1)?, coord(2)?, last.z)),
        },
        3 => Ok(Vec3::new(coord(0)?, coord(1)?, coord(2)?)),
        count => Err(FormatError::TokenCount {
            line: line_no,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_error(err: anyhow::Error) -> FormatError {
        err.downcast::<FormatError>().expect("format error")
    }

    #[test]
    fn single_token_updates_x_only() {
        let pts = load_points_from_str("1.0 2.0 3.0\n5.0\n", PointImportOptions::default())
            .expect("parse");
        assert_eq!(pts, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 2.0, 3.0)]);
    }

    #[test]
    fn axis_letters_separate_tokens() {
        let pts = load_points_from_str("X1.5Y-2Z4\nX8", PointImportOptions::default())
            .expect("parse");
        assert_eq!(pts, vec![Vec3::new(1.5, -2.0, 4.0), Vec3::new(8.0, -2.0, 4.0)]);
    }

    #[test]
    fn two_tokens_carry_x() {
        let pts = load_points_from_str("1 2 3\n7 9", PointImportOptions::default())
            .expect("parse");
        assert_eq!(pts[1], Vec3::new(1.0, 7.0, 9.0));
    }

    #[test]
    fn legacy_two_tokens_are_rejected() {
        let options = PointImportOptions {
            two_token: TwoTokenMode::Legacy,
        };
        let err = format_error(load_points_from_str("1 2 3\n7 9", options).unwrap_err());
        assert_eq!(err, FormatError::TokenCount { line: 2, count: 2 });
    }

    #[test]
    fn four_tokens_fail() {
        let err = format_error(
            load_points_from_str("1 2 3\n1 2 3 4", PointImportOptions::default()).unwrap_err(),
        );
        assert_eq!(err, FormatError::TokenCount { line: 2, count: 4 });
    }

    #[test]
    fn blank_line_is_a_format_error() {
        let err =
            format_error(load_points_from_str("1 2 3\n\n", PointImportOptions::default()).unwrap_err());
        assert_eq!(err, FormatError::TokenCount { line: 2, count: 0 });
    }

    #[test]
    fn bad_number_fails() {
        let err =
            format_error(load_points_from_str("1 two 3", PointImportOptions::default()).unwrap_err());
        assert!(matches!(err, FormatError::InvalidNumber { ref token, .. } if token == "two"));
    }

    #[test]
    fn empty_input_yields_no_points() {
        let pts = load_points_from_str("", PointImportOptions::default()).expect("parse");
        assert!(pts.is_empty());
    }
}
