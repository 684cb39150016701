pub mod dispatcher;


pub use dispatcher::ElevatorSystem;
