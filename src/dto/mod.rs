pub mod admin_dto;
pub mod api_response;
pub mod report_dto;
pub mod wizard_dto;
