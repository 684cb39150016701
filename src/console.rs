/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use std::fmt;
use std::io::BufRead;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatcher::ElevatorSystem;
use crate::shared::Floor;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Call { start_floor: Floor, end_floor: Floor },
    Status,
    Quit,
    Empty,
}

/// Input the console refuses before it reaches the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    NotAFloor(String),
    OutOfRange { floor: Floor, n_floors: Floor },
    SameFloor(Floor),
    Unknown(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotAFloor(s) => write!(f, "'{}' is not a floor number", s),
            InputError::OutOfRange { floor, n_floors } => {
                write!(f, "floor {} is outside 1..={}", floor, n_floors)
            }
            InputError::SameFloor(floor) => {
                write!(f, "start and end floor must differ (both {})", floor)
            }
            InputError::Unknown(s) => {
                write!(f, "unknown command '{}', expected '<start> <end>', 'status' or 'quit'", s)
            }
        }
    }
}

impl std::error::Error for InputError {}

/***************************************/
/*             Public API              */
/***************************************/

/// Parses and validates one line of console input.
pub fn parse_command(input: &str, n_floors: Floor) -> Result<Command, InputError> {
    let words: Vec<&str> = input.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(Command::Empty),
        ["status"] => Ok(Command::Status),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        [start, end] => {
            // Two words that do not open with a number are not a call
            if start.parse::<Floor>().is_err() {
                return Err(InputError::Unknown(input.trim().to_string()));
            }
            let start_floor = parse_floor(start, n_floors)?;
            let end_floor = parse_floor(end, n_floors)?;
            if start_floor == end_floor {
                return Err(InputError::SameFloor(start_floor));
            }
            Ok(Command::Call {
                start_floor,
                end_floor,
            })
        }
        _ => Err(InputError::Unknown(input.trim().to_string())),
    }
}

fn parse_floor(word: &str, n_floors: Floor) -> Result<Floor, InputError> {
    let floor: Floor = word
        .parse()
        .map_err(|_| InputError::NotAFloor(word.to_string()))?;
    if floor < 1 || floor > n_floors {
        return Err(InputError::OutOfRange { floor, n_floors });
    }
    Ok(floor)
}

/// One line per elevator with its position and queued trips, head first.
pub fn status_lines(system: &ElevatorSystem) -> Vec<String> {
    system
        .elevators()
        .iter()
        .map(|elevator| {
            let status = elevator.status();
            let queue: Vec<String> = elevator
                .queued_requests()
                .iter()
                .map(|r| format!("[{}]", r))
                .collect();
            format!(
                "elevator {}: floor {}, {:?}{}, queue: {}",
                status.id,
                status.floor,
                status.direction,
                if status.busy { ", busy" } else { "" },
                if queue.is_empty() {
                    "empty".to_string()
                } else {
                    queue.join(" ")
                }
            )
        })
        .collect()
}

/// Feeds requests from `input` to the dispatcher until `quit` or end of input.
pub fn console_input_loop<R: BufRead>(input: R, system: &ElevatorSystem, n_floors: Floor) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        match parse_command(&line, n_floors) {
            Ok(Command::Call {
                start_floor,
                end_floor,
            }) => {
                if let Err(e) = system.submit_floors(start_floor, end_floor) {
                    println!("error: {}", e);
                }
            }
            Ok(Command::Status) => {
                for line in status_lines(system) {
                    println!("{}", line);
                }
            }
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {}
            Err(e) => println!("error: {}", e),
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
