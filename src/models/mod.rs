pub use fitquest_core::models::*;
pub use fitquest_core::units::UnitSystem;
