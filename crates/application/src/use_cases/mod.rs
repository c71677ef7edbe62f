pub mod admission;

pub use admission::{Admission, AdmitConnectionUseCase};
