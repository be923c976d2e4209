//! 角色与资源访问判定
//!
//! 角色在 `RequireJWT` 中解析一次，这里只做纯函数判定。

use crate::models::courses::entities::Course;
use crate::models::enrollments::entities::Enrollment;
use crate::models::forums::entities::Forum;
use crate::models::users::entities::UserRole;

pub fn is_admin(role: Option<&UserRole>) -> bool {
    matches!(role, Some(UserRole::Admin))
}

pub fn is_teacher(role: Option<&UserRole>) -> bool {
    matches!(role, Some(UserRole::Teacher))
}

pub fn is_student(role: Option<&UserRole>) -> bool {
    matches!(role, Some(UserRole::Student))
}

pub fn is_teacher_or_admin(role: Option<&UserRole>) -> bool {
    is_teacher(role) || is_admin(role)
}

/// 管理员或课程讲师可以修改课程及其章节、课时
pub fn can_manage_course(role: Option<&UserRole>, user_id: i64, course: &Course) -> bool {
    is_admin(role) || (is_teacher(role) && course.lecturer_id == user_id)
}

/// 论坛访问判定
///
/// 管理员可访问全部论坛，讲师可访问自己创建的论坛，
/// 其他用户需持有该论坛课程的有效选课记录。
pub fn can_access_forum(
    role: Option<&UserRole>,
    user_id: i64,
    forum: &Forum,
    enrollment: Option<&Enrollment>,
) -> bool {
    if is_admin(role) {
        return true;
    }
    if is_teacher(role) && forum.user_id == user_id {
        return true;
    }
    match (forum.course_id, enrollment) {
        (Some(course_id), Some(enrollment)) => {
            enrollment.course_id == course_id
                && enrollment.user_id == user_id
                && enrollment.status.grants_access()
        }
        _ => false,
    }
}

/// 作者本人或管理员可以修改、删除帖子和评论
pub fn can_modify_post(role: Option<&UserRole>, user_id: i64, author_id: i64) -> bool {
    is_admin(role) || user_id == author_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::EnrollmentStatus;
    use chrono::Utc;

    fn forum(creator: i64, course_id: Option<i64>) -> Forum {
        Forum {
            id: 1,
            user_id: creator,
            course_id,
            name: "General".into(),
            description: None,
            is_locked: false,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn enrollment(user_id: i64, course_id: i64, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: 9,
            user_id,
            course_id,
            status,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_predicates() {
        let admin = UserRole::Admin;
        let teacher = UserRole::Teacher;
        let student = UserRole::Student;
        assert!(is_admin(Some(&admin)));
        assert!(is_teacher_or_admin(Some(&admin)));
        assert!(is_teacher_or_admin(Some(&teacher)));
        assert!(!is_teacher_or_admin(Some(&student)));
        assert!(is_student(Some(&student)));
        assert!(!is_student(None));
        assert!(!is_admin(None));
    }

    #[test]
    fn test_admin_and_creator_access() {
        let f = forum(5, Some(3));
        assert!(can_access_forum(Some(&UserRole::Admin), 1, &f, None));
        assert!(can_access_forum(Some(&UserRole::Teacher), 5, &f, None));
        assert!(!can_access_forum(Some(&UserRole::Teacher), 6, &f, None));
    }

    #[test]
    fn test_enrolled_access() {
        let f = forum(5, Some(3));
        let student = Some(&UserRole::Student);
        for status in [EnrollmentStatus::InProgress, EnrollmentStatus::Complete] {
            let e = enrollment(8, 3, status);
            assert!(can_access_forum(student, 8, &f, Some(&e)));
        }
        for status in [
            EnrollmentStatus::Pending,
            EnrollmentStatus::PaymentFailed,
            EnrollmentStatus::Failed,
            EnrollmentStatus::Inactive,
        ] {
            let e = enrollment(8, 3, status);
            assert!(!can_access_forum(student, 8, &f, Some(&e)));
        }
        let other_course = enrollment(8, 4, EnrollmentStatus::InProgress);
        assert!(!can_access_forum(student, 8, &f, Some(&other_course)));
        assert!(!can_access_forum(None, 8, &f, None));
    }

    #[test]
    fn test_modify_post() {
        assert!(can_modify_post(Some(&UserRole::Student), 3, 3));
        assert!(!can_modify_post(Some(&UserRole::Teacher), 3, 4));
        assert!(can_modify_post(Some(&UserRole::Admin), 3, 4));
    }
}
