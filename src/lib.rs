pub mod vector;
pub use vector::*;

pub mod ray;
pub use ray::*;

pub mod triangle;
pub use triangle::*;

pub mod sphere;
pub use sphere::*;

pub mod intersections;
pub use intersections::*;

pub mod error;
pub use error::BenchError;

pub mod bench;
pub use bench::*;
