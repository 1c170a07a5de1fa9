pub mod quiz_dto;
pub mod submit_dto;
