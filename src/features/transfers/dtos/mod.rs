mod transfer_dto;

pub use transfer_dto::*;
