//! HTTP API handlers for kinfind-server

pub mod admin;
pub mod compare;
pub mod form;
pub mod health;
pub mod reports;
pub mod ui;

pub use admin::admin_routes;
pub use compare::compare_routes;
pub use health::health_routes;
pub use reports::report_routes;
pub use ui::ui_routes;
