pub mod device;
pub mod direction;
pub mod punch;
pub mod status;
