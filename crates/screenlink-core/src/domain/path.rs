//! Overlay path builder.
//!
//! The overlay is a single polyline through the centers of every live window.
//! It is described as a compact path-description string:
//!
//! ```text
//! PATH  := (MOVE (LINE)* CLOSE?)?
//! MOVE  := "M" x y
//! LINE  := "L" x y
//! CLOSE := "Z"
//! ```
//!
//! Tokens are joined by single spaces, e.g. `"M 0 0 L 10 20 Z"`.
//!
//! A fresh [`PathBuilder`] is built for every rebuild cycle; nothing carries
//! over between cycles.

use std::fmt;

use thiserror::Error;

use crate::domain::screen::{Point, ScreenEntry};

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo { x, y } => write!(f, "M {x} {y}"),
            PathCommand::LineTo { x, y } => write!(f, "L {x} {y}"),
            PathCommand::ClosePath => f.write_str("Z"),
        }
    }
}

/// Errors produced when parsing a path-description string.
#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected token {token:?} at position {position}")]
    UnexpectedToken { position: usize, token: String },

    /// A move or line instruction ended before both coordinates were read.
    #[error("instruction at position {position} is missing a coordinate")]
    MissingCoordinate { position: usize },

    /// A coordinate is not a decimal number.
    #[error("invalid number {token:?} at position {position}")]
    InvalidNumber { position: usize, token: String },
}

/// Accumulates drawing instructions in append order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move; intended as the first instruction of a path.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::MoveTo { x, y });
        self
    }

    /// Appends a straight line to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::LineTo { x, y });
        self
    }

    /// Closes the polyline back to its starting point.
    pub fn close_path(&mut self) -> &mut Self {
        self.commands.push(PathCommand::ClosePath);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Renders the instructions as a space-joined path-description string.
    ///
    /// An empty builder serializes to an empty string.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Builds the closed polyline through the centers of `entries`, in order.
///
/// The first center gets a move, every following one a line, and the path is
/// closed.  With no entries the builder stays empty.
pub fn connect_centers<'a, I>(entries: I) -> PathBuilder
where
    I: IntoIterator<Item = &'a ScreenEntry>,
{
    let mut builder = PathBuilder::new();
    for (i, entry) in entries.into_iter().enumerate() {
        let Point { x, y } = entry.center();
        if i == 0 {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }
    if !builder.is_empty() {
        builder.close_path();
    }
    builder
}

/// Parses a path-description string back into instructions.
///
/// Accepts exactly the grammar in the module docs: an optional move, any
/// number of lines, and an optional trailing close.
///
/// # Errors
///
/// Returns [`PathError`] describing the first token that breaks the grammar.
pub fn parse_path(input: &str) -> Result<Vec<PathCommand>, PathError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let mut commands = Vec::new();
    let mut pos = 0;
    let mut closed = false;

    while pos < tokens.len() {
        let token = tokens[pos];
        if closed {
            return Err(PathError::UnexpectedToken {
                position: pos,
                token: token.to_string(),
            });
        }
        match (token, commands.is_empty()) {
            ("M", true) => {
                let (x, y) = read_pair(&tokens, pos)?;
                commands.push(PathCommand::MoveTo { x, y });
                pos += 3;
            }
            ("L", false) => {
                let (x, y) = read_pair(&tokens, pos)?;
                commands.push(PathCommand::LineTo { x, y });
                pos += 3;
            }
            ("Z", false) => {
                commands.push(PathCommand::ClosePath);
                closed = true;
                pos += 1;
            }
            _ => {
                return Err(PathError::UnexpectedToken {
                    position: pos,
                    token: token.to_string(),
                })
            }
        }
    }

    Ok(commands)
}

/// Reads the two coordinates following the instruction at `pos`.
fn read_pair(tokens: &[&str], pos: usize) -> Result<(f64, f64), PathError> {
    let number = |offset: usize| -> Result<f64, PathError> {
        let position = pos + offset;
        let token = tokens
            .get(position)
            .ok_or(PathError::MissingCoordinate { position: pos })?;
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| PathError::InvalidNumber {
                position,
                token: (*token).to_string(),
            })
    };
    Ok((number(1)?, number(2)?))
}
