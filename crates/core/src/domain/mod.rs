pub mod analysis;
pub mod overview;
pub mod ticket;
