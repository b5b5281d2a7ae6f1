//! Parser for the `.desc` mine description format.
//!
//! A description holds four `#`-separated fields: the mine outline, the
//! worker start, `;`-separated obstacle outlines and the booster list.
//! Points are written as `(x,y)` with non-negative integer coordinates;
//! any other text between points is ignored. Boosters are not parsed.

use mine_wrap_core::Cell;
use mine_wrap_geometry::{Polygon, Vertex};
use regex::Regex;
use thiserror::Error;

const FIELD_DELIMITER: char = '#';
const OBSTACLE_DELIMITER: char = ';';
const POINT_PATTERN: &str = r"\((\d+),(\d+)\)";

/// Mine layout extracted from a description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Description {
    /// Outline of the mine.
    pub mine: Polygon,
    /// Cell the worker starts on.
    pub start: Cell,
    /// Outlines of the obstacles inside the mine.
    pub obstacles: Vec<Polygon>,
}

/// Errors raised while parsing a description.
#[derive(Clone, Debug, Error, PartialEq)]
pub(crate) enum DescriptionError {
    /// The text did not split into the expected number of fields.
    #[error("expected 4 '#'-separated fields, found {found}")]
    FieldCount {
        /// Number of fields present.
        found: usize,
    },
    /// The worker field held no point.
    #[error("worker start position is missing")]
    MissingWorker,
    /// The mine outline held too few points to enclose an area.
    #[error("mine outline needs at least 3 points, found {points}")]
    MineTooSmall {
        /// Number of points present.
        points: usize,
    },
    /// A coordinate did not fit the cell coordinate range.
    #[error("coordinate `{value}` is out of range")]
    CoordinateOverflow {
        /// Digits as written.
        value: String,
    },
    /// The point pattern failed to compile.
    #[error("invalid point pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Parses a complete description.
pub(crate) fn parse_description(text: &str) -> Result<Description, DescriptionError> {
    let fields: Vec<&str> = text.trim().split(FIELD_DELIMITER).collect();
    let [mine, worker, obstacles, _boosters] = fields.as_slice() else {
        return Err(DescriptionError::FieldCount {
            found: fields.len(),
        });
    };

    let point = Regex::new(POINT_PATTERN)?;

    let outline = parse_points(&point, mine)?;
    if outline.len() < 3 {
        return Err(DescriptionError::MineTooSmall {
            points: outline.len(),
        });
    }

    let start = parse_points(&point, worker)?
        .first()
        .map(|vertex| Cell::new(vertex.x(), vertex.y()))
        .ok_or(DescriptionError::MissingWorker)?;

    let mut shapes = Vec::new();
    for obstacle in obstacles.split(OBSTACLE_DELIMITER) {
        let points = parse_points(&point, obstacle)?;
        if !points.is_empty() {
            shapes.push(Polygon::new(points));
        }
    }

    Ok(Description {
        mine: Polygon::new(outline),
        start,
        obstacles: shapes,
    })
}

/// Extracts every `(x,y)` point of the field in order.
fn parse_points(point: &Regex, field: &str) -> Result<Vec<Vertex>, DescriptionError> {
    point
        .captures_iter(field)
        .map(|captures| {
            Ok(Vertex::new(
                parse_coordinate(&captures[1])?,
                parse_coordinate(&captures[2])?,
            ))
        })
        .collect()
}

fn parse_coordinate(digits: &str) -> Result<i32, DescriptionError> {
    digits
        .parse()
        .map_err(|_| DescriptionError::CoordinateOverflow {
            value: digits.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mine_worker_and_obstacles() {
        let description = parse_description(
            "(0,0),(10,0),(10,10),(0,10)#(0,0)#(4,2),(6,2),(6,7),(4,7);(5,8),(6,8),(6,9),(5,9)#B(0,1);F(0,2)",
        )
        .expect("valid description");

        assert_eq!(description.mine, Polygon::rectangle(0, 0, 10, 10));
        assert_eq!(description.start, Cell::new(0, 0));
        assert_eq!(description.obstacles.len(), 2);
        assert_eq!(
            description.obstacles[1].vertices(),
            &[
                Vertex::new(5, 8),
                Vertex::new(6, 8),
                Vertex::new(6, 9),
                Vertex::new(5, 9),
            ]
        );
    }

    #[test]
    fn empty_obstacle_field_yields_no_obstacles() {
        let description =
            parse_description("(0,0),(3,0),(3,3),(0,3)#(1,1)##\n").expect("valid description");
        assert!(description.obstacles.is_empty());
        assert_eq!(description.start, Cell::new(1, 1));
    }

    #[test]
    fn text_between_points_is_ignored() {
        let point = Regex::new(POINT_PATTERN).expect("pattern compiles");
        let points = parse_points(&point, "junk(1,2) (x,3),(4,5)(6,) ((7,8))").expect("parses");
        assert_eq!(
            points,
            vec![Vertex::new(1, 2), Vertex::new(4, 5), Vertex::new(7, 8)]
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            parse_description("(0,0),(1,0),(1,1)#(0,0)"),
            Err(DescriptionError::FieldCount { found: 2 })
        );
    }

    #[test]
    fn rejects_missing_worker() {
        assert_eq!(
            parse_description("(0,0),(1,0),(1,1)#nowhere##"),
            Err(DescriptionError::MissingWorker)
        );
    }

    #[test]
    fn rejects_mine_with_too_few_points() {
        assert_eq!(
            parse_description("(0,0),(1,0)#(0,0)##"),
            Err(DescriptionError::MineTooSmall { points: 2 })
        );
    }

    #[test]
    fn rejects_coordinates_beyond_cell_range() {
        assert_eq!(
            parse_description("(0,0),(99999999999,0),(1,1)#(0,0)##"),
            Err(DescriptionError::CoordinateOverflow {
                value: "99999999999".to_owned()
            })
        );
    }
}
