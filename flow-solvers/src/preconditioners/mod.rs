//! Preconditioners for the iterative solve

mod diagonal;

pub use diagonal::DiagonalPreconditioner;
