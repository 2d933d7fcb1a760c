pub mod sessions;
pub mod transfers;
