/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use super::errors::RequestError;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type Floor = i32;

/// A passenger trip from `start_floor` to `end_floor`.
///
/// Equality is structural, two requests with the same floors are duplicates.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    #[serde(rename = "startFloor")]
    start_floor: Floor,
    #[serde(rename = "endFloor")]
    end_floor: Floor,
}

impl Request {
    pub fn new(start_floor: Floor, end_floor: Floor) -> Result<Request, RequestError> {
        if start_floor < 1 || end_floor < 1 {
            return Err(RequestError::NonPositiveFloor {
                start_floor,
                end_floor,
            });
        }
        if start_floor == end_floor {
            return Err(RequestError::SameFloor(start_floor));
        }

        Ok(Request {
            start_floor,
            end_floor,
        })
    }

    pub fn start_floor(&self) -> Floor {
        self.start_floor
    }

    pub fn end_floor(&self) -> Floor {
        self.end_floor
    }

    /// Distance from `floor` to the pickup floor
    pub fn pickup_distance(&self, floor: Floor) -> u32 {
        self.start_floor.abs_diff(floor)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start_floor, self.end_floor)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    /// Direction of travel from `from` towards `to`
    pub fn towards(from: Floor, to: Floor) -> Direction {
        match from.cmp(&to) {
            std::cmp::Ordering::Less => Direction::Up,
            std::cmp::Ordering::Greater => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Stop,
        }
    }

    /// Floor offset of one step in this direction
    pub fn step(&self) -> Floor {
        match *self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Stop => 0,
        }
    }
}

/// Point-in-time view of one elevator.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorStatus {
    pub id: usize,
    pub floor: Floor,
    pub direction: Direction,
    pub pending: usize,
    pub busy: bool,
}

/***************************************/
/*             Unit tests              */
/***************************************/
