//! 评论回复树
//!
//! 一次取出主题下全部评论，放入以 id 为索引的 arena，
//! 通过 parent_id -> children 索引组装成有限深度的树。
//! 超过深度上限的回复挂到第 `max_depth - 1` 层祖先下，与最深一层并列。

use std::collections::{HashMap, VecDeque};

use crate::models::forums::entities::{Comment, CommentNode};

/// 广播预览的最大字符数
pub const PREVIEW_CHARS: usize = 100;

/// 截断评论内容用于实时推送
pub fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }
    let mut truncated: String = content.chars().take(PREVIEW_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// 组装评论森林，根按 id 升序，同级回复按 id 升序
///
/// 父评论不在集合中的评论作为根处理；`max_depth` 至少为 2。
pub fn build_comment_forest(mut comments: Vec<Comment>, max_depth: usize) -> Vec<CommentNode> {
    let max_depth = max_depth.max(2);
    comments.sort_by_key(|c| c.id);

    let index: HashMap<i64, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();
    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id.and_then(|p| index.get(&p).copied()) {
            Some(parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    // level: 节点在结果树中的层级；holder: 结果树中的父节点
    let mut level = vec![0usize; comments.len()];
    let mut holder: Vec<Option<usize>> = vec![None; comments.len()];
    let mut placed: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut queue = VecDeque::new();
    for &root in &roots {
        level[root] = 1;
        queue.push_back(root);
    }

    while let Some(node) = queue.pop_front() {
        for &child in &children[node] {
            let (parent, child_level) = if level[node] < max_depth {
                (Some(node), level[node] + 1)
            } else {
                (holder[node], level[node])
            };
            level[child] = child_level;
            holder[child] = parent;
            if let Some(parent) = parent {
                placed[parent].push(child);
            }
            queue.push_back(child);
        }
    }
    for replies in &mut placed {
        replies.sort_unstable();
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|root| assemble(root, &mut slots, &placed))
        .collect()
}

/// 以指定评论为根组装其回复子树
pub fn build_reply_subtree(
    comments: Vec<Comment>,
    root_id: i64,
    max_depth: usize,
) -> Option<CommentNode> {
    let mut by_parent: HashMap<i64, Vec<i64>> = HashMap::new();
    for comment in &comments {
        if let Some(parent) = comment.parent_id {
            by_parent.entry(parent).or_default().push(comment.id);
        }
    }

    let mut members = std::collections::HashSet::from([root_id]);
    let mut queue = VecDeque::from([root_id]);
    while let Some(id) = queue.pop_front() {
        for &child in by_parent.get(&id).into_iter().flatten() {
            if members.insert(child) {
                queue.push_back(child);
            }
        }
    }

    let subtree: Vec<Comment> = comments
        .into_iter()
        .filter(|c| members.contains(&c.id))
        .map(|mut c| {
            if c.id == root_id {
                c.parent_id = None;
            }
            c
        })
        .collect();

    build_comment_forest(subtree, max_depth)
        .into_iter()
        .find(|node| node.comment.id == root_id)
}

fn assemble(
    node: usize,
    slots: &mut [Option<Comment>],
    placed: &[Vec<usize>],
) -> Option<CommentNode> {
    let comment = slots[node].take()?;
    let replies = placed[node]
        .iter()
        .filter_map(|&child| assemble(child, slots, placed))
        .collect();
    Some(CommentNode { comment, replies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: i64, parent_id: Option<i64>) -> Comment {
        Comment {
            id,
            user_id: 1,
            forum_id: 1,
            topic_id: Some(1),
            parent_id,
            content: format!("comment {id}"),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.comment.id).collect()
    }

    #[test]
    fn test_builds_nested_tree() {
        let forest = build_comment_forest(
            vec![
                comment(3, Some(1)),
                comment(1, None),
                comment(2, None),
                comment(4, Some(3)),
                comment(5, Some(1)),
            ],
            3,
        );
        assert_eq!(ids(&forest), vec![1, 2]);
        assert_eq!(ids(&forest[0].replies), vec![3, 5]);
        assert_eq!(ids(&forest[0].replies[0].replies), vec![4]);
        assert!(forest[1].replies.is_empty());
        assert_eq!(forest.iter().map(CommentNode::count).sum::<usize>(), 5);
    }

    #[test]
    fn test_depth_is_bounded() {
        // 1 <- 2 <- 3 <- 4 <- 5 的回复链
        let chain: Vec<Comment> = (1..=5)
            .map(|id| comment(id, (id > 1).then_some(id - 1)))
            .collect();
        let forest = build_comment_forest(chain, 3);

        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.depth(), 3);
        assert_eq!(root.count(), 5);
        assert_eq!(ids(&root.replies), vec![2]);
        // 4、5 与 3 并列挂在第 2 层
        assert_eq!(ids(&root.replies[0].replies), vec![3, 4, 5]);
    }

    #[test]
    fn test_orphans_become_roots() {
        let forest = build_comment_forest(vec![comment(7, Some(99)), comment(8, Some(7))], 3);
        assert_eq!(ids(&forest), vec![7]);
        assert_eq!(ids(&forest[0].replies), vec![8]);
    }

    #[test]
    fn test_reply_subtree() {
        let comments = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, None),
            comment(5, Some(4)),
        ];
        let subtree = build_reply_subtree(comments, 2, 3).unwrap();
        assert_eq!(subtree.comment.id, 2);
        assert_eq!(ids(&subtree.replies), vec![3]);
        assert_eq!(subtree.count(), 2);

        assert!(build_reply_subtree(vec![comment(1, None)], 42, 3).is_none());
    }

    #[test]
    fn test_preview_truncation() {
        assert_eq!(preview("short"), "short");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);

        let long = "é".repeat(PREVIEW_CHARS + 5);
        let truncated = preview(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), PREVIEW_CHARS + 3);
    }
}
