pub mod errors;
#[macro_use]
pub mod macros;
pub mod structs;

pub use errors::ConfigError;
pub use errors::DispatchError;
pub use structs::Direction;
pub use structs::ElevatorStatus;
pub use structs::Floor;
pub use structs::Request;
