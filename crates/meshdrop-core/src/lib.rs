pub mod error;
pub mod fal;
pub mod generator;

pub use error::{GeneratorError, GeneratorResult};
pub use fal::FalClient;
pub use generator::{GenerateParams, MeshGenerator};
