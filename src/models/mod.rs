pub mod appointment;
pub mod enums;
pub mod patient;
pub mod vital_sign;

pub use appointment::*;
pub use enums::*;
pub use patient::*;
pub use vital_sign::*;
