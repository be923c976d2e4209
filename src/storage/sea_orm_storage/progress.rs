//! 学习进度存储操作

use super::SeaOrmStorage;
use crate::entity::course_progress::{self, Entity as CourseProgresses};
use crate::entity::lesson_progress::{self, Entity as LessonProgresses};
use crate::errors::{CourseHubError, Result};
use crate::models::progress::entities::{
    CourseProgress, CourseProgressSummary, LessonProgress, LessonProgressStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};

impl SeaOrmStorage {
    /// 写入课时进度，并在同一事务中重算课程进度
    ///
    /// 事务先认领课程进度行，同一 (user, course) 的写入因此串行，
    /// 首次写入的并发请求不会撞上 (user_id, lesson_id) 唯一索引。
    pub async fn upsert_lesson_progress_impl(
        &self,
        user_id: i64,
        lesson_id: i64,
        course_id: i64,
        watch_time: i64,
        completion_percentage: f64,
    ) -> Result<(LessonProgress, CourseProgress)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        Self::claim_course_progress(&txn, user_id, course_id, now).await?;
        let status = LessonProgressStatus::from_percentage(completion_percentage);

        let existing = LessonProgresses::find()
            .filter(lesson_progress::Column::UserId.eq(user_id))
            .filter(lesson_progress::Column::LessonId.eq(lesson_id))
            .one(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时进度失败: {e}")))?;

        let started_now = status.is_started().then_some(now);
        let completed_now = (status == LessonProgressStatus::Completed).then_some(now);

        let saved = match existing {
            Some(row) => {
                // started_at / completed_at 只写一次
                let started_at = row.started_at.or(started_now);
                let completed_at = row.completed_at.or(completed_now);
                let mut model: lesson_progress::ActiveModel = row.into();
                model.status = Set(status.to_string());
                model.watch_time = Set(watch_time);
                model.completion_percentage = Set(completion_percentage);
                model.started_at = Set(started_at);
                model.completed_at = Set(completed_at);
                model.last_watched_at = Set(Some(now));
                model.updated_at = Set(now);
                model.update(&txn).await.map_err(|e| {
                    CourseHubError::database_operation(format!("更新课时进度失败: {e}"))
                })?
            }
            None => lesson_progress::ActiveModel {
                user_id: Set(user_id),
                lesson_id: Set(lesson_id),
                status: Set(status.to_string()),
                watch_time: Set(watch_time),
                completion_percentage: Set(completion_percentage),
                started_at: Set(started_now),
                last_watched_at: Set(Some(now)),
                completed_at: Set(completed_now),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建课时进度失败: {e}")))?,
        };

        let course = self
            .recompute_course_progress_on(&txn, user_id, course_id, now)
            .await?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((saved.into_lesson_progress(), course))
    }

    pub async fn recompute_course_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<CourseProgress> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;
        let now = chrono::Utc::now().timestamp();
        Self::claim_course_progress(&txn, user_id, course_id, now).await?;
        let progress = self
            .recompute_course_progress_on(&txn, user_id, course_id, now)
            .await?;
        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(progress)
    }

    /// 进度事务的第一条语句：确保课程进度行存在并刷新访问时间
    ///
    /// SQLite 上由此立即取得写锁，不会在读后升级锁时遇到 SQLITE_BUSY；
    /// 其他后端上冲突更新会锁住该行直到事务结束。
    async fn claim_course_progress<C>(
        conn: &C,
        user_id: i64,
        course_id: i64,
        now: i64,
    ) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let model = course_progress::ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            total_lessons: Set(0),
            completed_lessons: Set(0),
            total_watch_time: Set(0),
            completion_percentage: Set(0.0),
            last_accessed_at: Set(now),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // enrolled_at 保留首次写入的值
        CourseProgresses::insert(model)
            .on_conflict(
                OnConflict::columns([
                    course_progress::Column::CourseId,
                    course_progress::Column::UserId,
                ])
                .update_column(course_progress::Column::LastAccessedAt)
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("写入课程进度失败: {e}")))?;
        Ok(())
    }

    /// 全量重算已认领的课程进度行
    async fn recompute_course_progress_on<C>(
        &self,
        conn: &C,
        user_id: i64,
        course_id: i64,
        now: i64,
    ) -> Result<CourseProgress>
    where
        C: ConnectionTrait,
    {
        let lesson_ids = self.list_course_lesson_ids(conn, course_id).await?;

        let rows = if lesson_ids.is_empty() {
            Vec::new()
        } else {
            LessonProgresses::find()
                .filter(lesson_progress::Column::UserId.eq(user_id))
                .filter(lesson_progress::Column::LessonId.is_in(lesson_ids.iter().copied()))
                .all(conn)
                .await
                .map_err(|e| {
                    CourseHubError::database_operation(format!("查询课时进度失败: {e}"))
                })?
        };

        let completed = rows
            .iter()
            .filter(|r| r.status == LessonProgressStatus::COMPLETED)
            .count() as i64;
        let watch_time: i64 = rows.iter().map(|r| r.watch_time).sum();
        let summary = CourseProgressSummary::compute(lesson_ids.len() as i64, completed, watch_time);

        CourseProgresses::update_many()
            .col_expr(
                course_progress::Column::TotalLessons,
                Expr::value(summary.total_lessons),
            )
            .col_expr(
                course_progress::Column::CompletedLessons,
                Expr::value(summary.completed_lessons),
            )
            .col_expr(
                course_progress::Column::TotalWatchTime,
                Expr::value(summary.total_watch_time),
            )
            .col_expr(
                course_progress::Column::CompletionPercentage,
                Expr::value(summary.completion_percentage),
            )
            .col_expr(course_progress::Column::LastAccessedAt, Expr::value(now))
            .col_expr(course_progress::Column::UpdatedAt, Expr::value(now))
            .filter(course_progress::Column::CourseId.eq(course_id))
            .filter(course_progress::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新课程进度失败: {e}")))?;

        CourseProgresses::find()
            .filter(course_progress::Column::CourseId.eq(course_id))
            .filter(course_progress::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程进度失败: {e}")))?
            .map(|m| m.into_course_progress())
            .ok_or_else(|| CourseHubError::not_found("课程进度不存在"))
    }

    pub async fn list_lesson_progress_impl(&self, user_id: i64) -> Result<Vec<LessonProgress>> {
        let items = LessonProgresses::find()
            .filter(lesson_progress::Column::UserId.eq(user_id))
            .order_by_desc(lesson_progress::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时进度失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_lesson_progress()).collect())
    }

    pub async fn list_course_lesson_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Vec<LessonProgress>> {
        let lesson_ids = self.list_course_lesson_ids(&self.db, course_id).await?;
        if lesson_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = LessonProgresses::find()
            .filter(lesson_progress::Column::UserId.eq(user_id))
            .filter(lesson_progress::Column::LessonId.is_in(lesson_ids))
            .order_by_asc(lesson_progress::Column::LessonId)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时进度失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_lesson_progress()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        file_storage, memory_storage, seed_course, seed_lessons, seed_user,
    };
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_course_rollup() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course = seed_course(&storage, teacher.id, None).await;
        let lessons = seed_lessons(&storage, course.id, 3).await;

        storage
            .upsert_lesson_progress_impl(student.id, lessons[0].id, course.id, 300, 100.0)
            .await
            .unwrap();
        storage
            .upsert_lesson_progress_impl(student.id, lessons[1].id, course.id, 200, 95.0)
            .await
            .unwrap();
        let (lesson, progress) = storage
            .upsert_lesson_progress_impl(student.id, lessons[2].id, course.id, 50, 40.0)
            .await
            .unwrap();

        assert_eq!(lesson.status, LessonProgressStatus::InProgress);
        assert_eq!(progress.total_lessons, 3);
        assert_eq!(progress.completed_lessons, 2);
        assert_eq!(progress.total_watch_time, 550);
        assert!((progress.completion_percentage - 66.666).abs() < 0.01);

        // 重算结果不变
        let again = storage
            .recompute_course_progress_impl(student.id, course.id)
            .await
            .unwrap();
        assert_eq!(again.id, progress.id);
        assert_eq!(again.completed_lessons, 2);
        assert_eq!(again.total_watch_time, 550);
        assert_eq!(again.enrolled_at, progress.enrolled_at);
    }

    #[tokio::test]
    async fn test_empty_course_is_zero() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course = seed_course(&storage, teacher.id, None).await;

        let progress = storage
            .recompute_course_progress_impl(student.id, course.id)
            .await
            .unwrap();
        assert_eq!(progress.total_lessons, 0);
        assert_eq!(progress.completion_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_timestamps_set_once() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course = seed_course(&storage, teacher.id, None).await;
        let lessons = seed_lessons(&storage, course.id, 1).await;

        let (first, _) = storage
            .upsert_lesson_progress_impl(student.id, lessons[0].id, course.id, 0, 0.0)
            .await
            .unwrap();
        assert_eq!(first.status, LessonProgressStatus::NotStarted);
        assert!(first.started_at.is_none());
        assert!(first.completed_at.is_none());
        assert!(first.last_watched_at.is_some());

        let (done, _) = storage
            .upsert_lesson_progress_impl(student.id, lessons[0].id, course.id, 600, 92.0)
            .await
            .unwrap();
        assert_eq!(done.id, first.id);
        assert_eq!(done.status, LessonProgressStatus::Completed);
        assert!(done.started_at.is_some());
        assert!(done.completed_at.is_some());

        // 把首次时间拨回一小时前，后续写入若覆盖会得到当前时间
        let an_hour_ago = chrono::Utc::now().timestamp() - 3600;
        lesson_progress::ActiveModel {
            id: Set(done.id),
            started_at: Set(Some(an_hour_ago)),
            completed_at: Set(Some(an_hour_ago)),
            ..Default::default()
        }
        .update(&storage.db)
        .await
        .unwrap();

        let (again, _) = storage
            .upsert_lesson_progress_impl(student.id, lessons[0].id, course.id, 650, 97.0)
            .await
            .unwrap();
        assert_eq!(again.status, LessonProgressStatus::Completed);
        assert_eq!(again.started_at.map(|t| t.timestamp()), Some(an_hour_ago));
        assert_eq!(again.completed_at.map(|t| t.timestamp()), Some(an_hour_ago));

        let (rewatch, progress) = storage
            .upsert_lesson_progress_impl(student.id, lessons[0].id, course.id, 100, 10.0)
            .await
            .unwrap();
        assert_eq!(rewatch.status, LessonProgressStatus::InProgress);
        assert_eq!(rewatch.started_at.map(|t| t.timestamp()), Some(an_hour_ago));
        assert_eq!(rewatch.completed_at.map(|t| t.timestamp()), Some(an_hour_ago));
        assert!(rewatch.last_watched_at.unwrap().timestamp() > an_hour_ago);
        assert_eq!(progress.completed_lessons, 0);

        let listed = storage
            .list_course_lesson_progress_impl(student.id, course.id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_progress_writes_on_pooled_sqlite() {
        let db = file_storage(8).await;
        let storage = db.storage.clone();
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let course = seed_course(&storage, teacher.id, None).await;
        let lessons = seed_lessons(&storage, course.id, 2).await;
        let lesson_id = lessons[0].id;

        for round in 0..5 {
            // 每轮换一个新学生，覆盖首次写入的竞争
            let student =
                seed_user(&storage, &format!("student{round:02}"), UserRole::Student).await;

            let mut handles = Vec::new();
            for i in 0..4 {
                let storage = storage.clone();
                let (user_id, course_id) = (student.id, course.id);
                handles.push(tokio::spawn(async move {
                    if i % 2 == 0 {
                        storage
                            .upsert_lesson_progress_impl(user_id, lesson_id, course_id, 100, 50.0)
                            .await
                            .map(|(_, course)| course)
                    } else {
                        storage.recompute_course_progress_impl(user_id, course_id).await
                    }
                }));
            }
            for handle in handles {
                let result = handle.await.unwrap();
                assert!(result.is_ok(), "concurrent write failed: {result:?}");
            }

            let rows = storage
                .list_course_lesson_progress_impl(student.id, course.id)
                .await
                .unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].status, LessonProgressStatus::InProgress);

            let progress = storage
                .recompute_course_progress_impl(student.id, course.id)
                .await
                .unwrap();
            assert_eq!(progress.total_lessons, 2);
            assert_eq!(progress.total_watch_time, 100);
            assert_eq!(progress.completed_lessons, 0);
        }
    }
}
