pub mod auth;
pub mod categories;
pub mod chapters;
pub mod comments;
pub mod courses;
pub mod enrollments;
pub mod forums;
pub mod lessons;
pub mod payments;
pub mod progress;
pub mod roles;
pub mod topics;
pub mod users;
pub mod websocket;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use chapters::ChapterService;
pub use comments::CommentService;
pub use courses::CourseService;
pub use enrollments::EnrollmentService;
pub use forums::ForumService;
pub use lessons::LessonService;
pub use payments::PaymentService;
pub use progress::ProgressService;
pub use roles::RoleService;
pub use topics::TopicService;
pub use users::UserService;
pub use websocket::WebSocketService;
