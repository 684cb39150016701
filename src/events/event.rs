/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ElevatorStatus, Floor, Request};

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * Status events produced by the dispatcher and the elevators.
 *
 * Every variant renders as exactly one human readable line through `Display`,
 * and as one JSON object through `Serialize`.
 */
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    RequestAccepted { request: Request },
    RequestAssigned { request: Request, elevator: usize },
    FloorReached { elevator: usize, floor: Floor },
    Stopped { elevator: usize, floor: Floor },
    PickedUp { elevator: usize, floor: Floor },
    DroppedOff { elevator: usize, floor: Floor },
    DuplicateRequest { elevator: usize, request: Request },
    QueueDrained { elevator: usize },
    FleetSnapshot { elevators: Vec<ElevatorStatus> },
    DispatchFailed { request: Request, reason: String },
}

impl Event {
    pub fn to_json(&self) -> String {
        // Serializing plain data with string keys cannot fail
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RequestAccepted { request } => write!(
                f,
                "New request: from floor {} to floor {}",
                request.start_floor(),
                request.end_floor()
            ),
            Event::RequestAssigned { request, elevator } => {
                write!(f, "Request {} assigned to elevator {}", request, elevator)
            }
            Event::FloorReached { elevator, floor } => {
                write!(f, "Elevator {} is now at floor {}", elevator, floor)
            }
            Event::Stopped { elevator, floor } => {
                write!(f, "Elevator {} stopped at floor {}", elevator, floor)
            }
            Event::PickedUp { elevator, floor } => {
                write!(f, "Elevator {} picked up a passenger at floor {}", elevator, floor)
            }
            Event::DroppedOff { elevator, floor } => {
                write!(f, "Elevator {} dropped off a passenger at floor {}", elevator, floor)
            }
            Event::DuplicateRequest { elevator, request } => write!(
                f,
                "Elevator {} is already servicing a trip from floor {} to floor {}",
                elevator,
                request.start_floor(),
                request.end_floor()
            ),
            Event::QueueDrained { elevator } => {
                write!(f, "Elevator {} finished all requests", elevator)
            }
            // Kept on one line so sinks never split a snapshot
            Event::FleetSnapshot { elevators } => {
                write!(f, "Fleet positions:")?;
                for (i, status) in elevators.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}elevator {} at floor {}", sep, status.id, status.floor)?;
                }
                Ok(())
            }
            Event::DispatchFailed { request, reason } => {
                write!(f, "Error: could not dispatch request {}: {}", request, reason)
            }
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
