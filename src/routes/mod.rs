pub mod auth;

pub mod users;

pub mod roles;

pub mod catalog;

pub mod enrollments;

pub mod payments;

pub mod progress;

pub mod forums;

pub mod websocket;

pub use auth::configure_auth_routes;
pub use catalog::configure_catalog_routes;
pub use enrollments::configure_enrollment_routes;
pub use forums::configure_forum_routes;
pub use payments::configure_payment_routes;
pub use progress::configure_progress_routes;
pub use roles::configure_role_routes;
pub use users::configure_user_routes;
pub use websocket::configure_websocket_routes;
