pub mod daikin;
pub mod tado;
