pub mod admin_controller;
pub mod report_controller;
pub mod wizard_controller;
