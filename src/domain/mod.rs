pub mod gate;
pub mod models;
pub mod playlist;
