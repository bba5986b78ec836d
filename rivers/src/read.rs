//! Reading rivers from text.
//!
//! The format is line-based:
//!
//! ```text
//! # comments start with a hash
//! north
//! 0 5
//! 10 5
//! south
//! 0 0
//! 10 0
//! island
//! 3 4
//! 4 1.5
//! 7 1.5
//! 6 4
//! ```
//!
//! The keywords `north` and `south` choose which shoreline the following points belong
//! to, and every `island` keyword starts a new island. Points before the first keyword
//! go to the north shoreline. Blank lines are ignored.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use crate::{
    error::{InvalidRiver, ReadError},
    geom::Point,
    num::Float,
    river::{River, RiverCfg},
};

/// The raw point sequences of a river, before any validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiverPoints<F: Float> {
    pub north: Vec<Point<F>>,
    pub south: Vec<Point<F>>,
    pub islands: Vec<Vec<Point<F>>>,
}

impl<F: Float> Default for RiverPoints<F> {
    fn default() -> Self {
        Self {
            north: Vec::new(),
            south: Vec::new(),
            islands: Vec::new(),
        }
    }
}

/// Where the next point goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    North,
    South,
    Island(usize),
}

impl<F: Float> RiverPoints<F> {
    pub fn from_bufread<R: BufRead>(rdr: R) -> Result<Self, ReadError> {
        let mut ret = RiverPoints::default();
        let mut target = Target::North;

        for (line_idx, line) in rdr.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line {
                "north" => target = Target::North,
                "south" => target = Target::South,
                "island" => {
                    ret.islands.push(Vec::new());
                    target = Target::Island(ret.islands.len() - 1);
                }
                _ => {
                    let p = parse_point(line, line_no)?;
                    match target {
                        Target::North => ret.north.push(p),
                        Target::South => ret.south.push(p),
                        Target::Island(i) => ret.islands[i].push(p),
                    }
                    continue;
                }
            }
            tracing::trace!(line = line_no, ?target, "switching target");
        }

        Ok(ret)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        Self::from_bufread(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(r: R) -> Result<Self, ReadError> {
        Self::from_bufread(BufReader::new(r))
    }

    pub fn parse(s: &str) -> Result<Self, ReadError> {
        Self::from_reader(s.as_bytes())
    }

    /// Builds and validates the river.
    pub fn into_river(self, cfg: RiverCfg<F>) -> Result<River<F>, InvalidRiver> {
        River::with_cfg(self.north, self.south, self.islands, cfg)
    }
}

fn parse_point<F: Float>(line: &str, line_no: usize) -> Result<Point<F>, ReadError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let &[x, y] = tokens.as_slice() else {
        return Err(ReadError::TokenCount {
            line: line_no,
            found: tokens.len(),
        });
    };
    Ok(Point::new(parse_coord(x, line_no)?, parse_coord(y, line_no)?))
}

fn parse_coord<F: Float>(token: &str, line_no: usize) -> Result<F, ReadError> {
    let x: f64 = token.parse().map_err(|_| ReadError::Number {
        line: line_no,
        token: token.to_owned(),
    })?;
    F::from_f64(x).ok_or_else(|| ReadError::NonFinite {
        line: line_no,
        token: token.to_owned(),
    })
}
