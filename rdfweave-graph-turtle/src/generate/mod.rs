//! Text generators for the Turtle family

mod ntriples;
mod turtle;

pub use ntriples::NTriplesGenerator;
pub use turtle::TurtleGenerator;
