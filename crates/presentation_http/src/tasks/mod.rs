//! Background tasks for the HTTP presentation layer

mod emission;

pub use emission::spawn_emission_task;
