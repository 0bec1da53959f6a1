pub mod certificate;
pub mod display;
pub mod random;
pub mod suite;
