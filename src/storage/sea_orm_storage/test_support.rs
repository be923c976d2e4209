//! 测试用内存数据库与数据构造

use super::SeaOrmStorage;
use crate::models::{
    chapters::requests::CreateChapterRequest,
    courses::{entities::Course, requests::CreateCourseRequest},
    lessons::{entities::Lesson, requests::CreateLessonRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::path::PathBuf;
use std::time::Duration;

/// 单连接的内存 SQLite，已执行迁移
pub(crate) async fn memory_storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    SeaOrmStorage::from_connection(db)
}

/// 文件型 SQLite，连接池与生产环境相同的 pragma；drop 时删除数据库文件
pub(crate) struct FileStorage {
    pub storage: SeaOrmStorage,
    path: PathBuf,
}

impl Drop for FileStorage {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

pub(crate) async fn file_storage(connections: u32) -> FileStorage {
    let path = std::env::temp_dir().join(format!("coursehub-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = SeaOrmStorage::sqlite_pool(&url, connections, Duration::from_secs(30))
        .await
        .expect("connect sqlite file");
    Migrator::up(&db, None).await.expect("run migrations");
    FileStorage {
        storage: SeaOrmStorage::from_connection(db),
        path,
    }
}

pub(crate) async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hash".to_string(),
            role,
            first_name: None,
            last_name: None,
            phone: None,
            address: None,
            introduce: None,
            avatar_url: None,
        })
        .await
        .expect("seed user")
}

/// 创建课程（附带分类）
pub(crate) async fn seed_course(
    storage: &SeaOrmStorage,
    lecturer_id: i64,
    price: Option<i64>,
) -> Course {
    let category = storage
        .create_category_impl(crate::models::categories::requests::CreateCategoryRequest {
            name: "Programming".to_string(),
            image_url: None,
            description: None,
        })
        .await
        .expect("seed category");
    storage
        .create_course_impl(
            lecturer_id,
            CreateCourseRequest {
                category_id: category.id,
                lecturer_id: None,
                subject: "Rust".to_string(),
                name: "Rust for beginners".to_string(),
                description: None,
                image_url: None,
                thumbnail_url: None,
                video_url: None,
                price,
                level: None,
                duration: Some(120),
            },
        )
        .await
        .expect("seed course")
}

/// 在课程下创建一个章节和 n 个课时
pub(crate) async fn seed_lessons(storage: &SeaOrmStorage, course_id: i64, n: usize) -> Vec<Lesson> {
    let chapter = storage
        .create_chapter_impl(CreateChapterRequest {
            course_id,
            name: "Chapter 1".to_string(),
            description: None,
            is_published: true,
        })
        .await
        .expect("seed chapter");
    let mut lessons = Vec::with_capacity(n);
    for i in 0..n {
        let lesson = storage
            .create_lesson_impl(CreateLessonRequest {
                chapter_id: chapter.id,
                name: format!("Lesson {}", i + 1),
                description: None,
                lesson_type: None,
                video_url: None,
                duration: Some(600),
                is_published: true,
            })
            .await
            .expect("seed lesson");
        lessons.push(lesson);
    }
    lessons
}
