pub mod csv;
pub mod sample;
