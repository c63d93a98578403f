//! Feature transforms: column assembly and standardization

pub mod assembler;
pub mod scaler;

pub use assembler::VectorAssembler;
pub use scaler::StandardScaler;
