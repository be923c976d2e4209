use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程论坛
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct Forum {
    pub id: i64,
    /// 创建者
    pub user_id: i64,
    pub course_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub is_locked: bool,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 主题帖
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct Topic {
    pub id: i64,
    pub forum_id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub view_count: i64,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 评论
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub forum_id: i64,
    pub topic_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub content: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 评论树节点
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct CommentNode {
    #[serde(flatten)]
    #[ts(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// 子树中的评论数（含自身）
    pub fn count(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::count).sum::<usize>()
    }

    /// 子树深度，叶子为 1
    pub fn depth(&self) -> usize {
        1 + self
            .replies
            .iter()
            .map(CommentNode::depth)
            .max()
            .unwrap_or(0)
    }
}
