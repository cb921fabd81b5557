pub mod award;
pub mod round;
pub mod segment;
