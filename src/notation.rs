//! Move notation: `F R' U2 B`.
//!
//! Each token is a face letter (`F R L B D U`) with an optional suffix: `'`
//! for an inverse turn or `2` for two forward turns.

use std::str::FromStr;

use thiserror::Error;

use crate::cubie::Face;
use crate::puzzle::FaceTurn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTurnError {
    #[error("empty move")]
    Empty,
    #[error("unknown face {0:?}, expected one of F R L B D U")]
    UnknownFace(char),
    #[error("bad suffix in move {0:?}")]
    BadSuffix(String),
}

impl FromStr for FaceTurn {
    type Err = ParseTurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(ParseTurnError::Empty)?;
        let face = Face::from_letter(letter).ok_or(ParseTurnError::UnknownFace(letter))?;
        match chars.as_str() {
            "" => Ok(FaceTurn::new(face, false)),
            "'" => Ok(FaceTurn::new(face, true)),
            _ => Err(ParseTurnError::BadSuffix(s.to_owned())),
        }
    }
}

/// Parses a whitespace-separated move sequence, expanding `X2` into two
/// forward turns.
pub fn parse_sequence(s: &str) -> Result<Vec<FaceTurn>, ParseTurnError> {
    let mut turns = Vec::new();
    for token in s.split_whitespace() {
        match token.strip_suffix('2') {
            Some(single) => {
                let turn: FaceTurn = single.parse()?;
                if turn.inverse {
                    return Err(ParseTurnError::BadSuffix(token.to_owned()));
                }
                turns.extend([turn, turn]);
            }
            None => turns.push(token.parse()?),
        }
    }
    Ok(turns)
}

/// Formats turns back into notation, one token per turn.
pub fn format_sequence(turns: &[FaceTurn]) -> String {
    turns
        .iter()
        .map(FaceTurn::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
