//! 预导入模块，方便使用

pub use super::categories::{
    ActiveModel as CategoryActiveModel, Entity as Categories, Model as CategoryModel,
};
pub use super::chapters::{
    ActiveModel as ChapterActiveModel, Entity as Chapters, Model as ChapterModel,
};
pub use super::comments::{
    ActiveModel as CommentActiveModel, Entity as Comments, Model as CommentModel,
};
pub use super::course_progress::{
    ActiveModel as CourseProgressActiveModel, Entity as CourseProgresses,
    Model as CourseProgressModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::documents::{
    ActiveModel as DocumentActiveModel, Entity as Documents, Model as DocumentModel,
};
pub use super::forums::{ActiveModel as ForumActiveModel, Entity as Forums, Model as ForumModel};
pub use super::lesson_progress::{
    ActiveModel as LessonProgressActiveModel, Entity as LessonProgresses,
    Model as LessonProgressModel,
};
pub use super::lessons::{ActiveModel as LessonActiveModel, Entity as Lessons, Model as LessonModel};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::permissions::{
    ActiveModel as PermissionActiveModel, Entity as Permissions, Model as PermissionModel,
};
pub use super::roles::{ActiveModel as RoleActiveModel, Entity as Roles, Model as RoleModel};
pub use super::topics::{ActiveModel as TopicActiveModel, Entity as Topics, Model as TopicModel};
pub use super::user_courses::{
    ActiveModel as UserCourseActiveModel, Entity as UserCourses, Model as UserCourseModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
