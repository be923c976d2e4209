/*!
 * 论坛主题实时推送
 *
 * 客户端通过以下 URL 订阅某个主题：
 * ```text
 * ws://host/ws/forum/topic/{topic_id}?token=<access_token>
 * ```
 *
 * ## 服务端推送
 * ```json
 * {
 *     "type": "new_comment",
 *     "comment_id": 42,
 *     "user_name": "Nguyen Van A",
 *     "content": "前 100 个字符...",
 *     "timestamp": "2026-01-24T12:00:00Z"
 * }
 * ```
 *
 * ## 心跳
 * ```json
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 *
 * 推送不保证顺序与送达，发送失败只记录日志。
 */

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use actix_ws::Message;
use dashmap::DashMap;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::middlewares::require_jwt::authenticate_token;
use crate::models::forums::entities::Comment;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::comments::tree::preview;
use crate::services::forums::load_topic_context;
use crate::storage::Storage;

/// 全局连接管理器
static CONNECTION_MANAGER: Lazy<ConnectionManager> =
    Lazy::new(|| ConnectionManager::with_capacity(AppConfig::get().forum.channel_capacity));

/// 心跳间隔
const HEARTBEAT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

/// WebSocket 消息类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForumEvent {
    /// 新评论
    NewComment {
        comment_id: i64,
        user_name: String,
        content: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// 心跳请求
    Ping,
    /// 心跳响应
    Pong,
    /// 订阅成功
    Connected { topic_id: i64 },
    /// 错误消息
    Error { message: String },
}

impl ForumEvent {
    pub fn new_comment(comment: &Comment, user_name: String) -> Self {
        ForumEvent::NewComment {
            comment_id: comment.id,
            user_name,
            content: preview(&comment.content),
            timestamp: comment.created_at,
        }
    }
}

/// 连接管理器
pub struct ConnectionManager {
    /// 主题 ID -> 广播发送器
    groups: DashMap<i64, broadcast::Sender<ForumEvent>>,
    capacity: usize,
}

impl ConnectionManager {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &CONNECTION_MANAGER
    }

    /// 订阅主题
    pub fn subscribe(&self, topic_id: i64) -> broadcast::Receiver<ForumEvent> {
        let entry = self.groups.entry(topic_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.capacity);
            tx
        });
        entry.subscribe()
    }

    /// 取消订阅
    pub fn unsubscribe(&self, topic_id: i64) {
        // 只有当没有订阅者时才移除
        self.groups
            .remove_if(&topic_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 向主题推送事件，返回收到事件的订阅者数
    pub fn publish(&self, topic_id: i64, event: ForumEvent) -> usize {
        match self.groups.get(&topic_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// 主题的在线订阅者数
    pub fn subscriber_count(&self, topic_id: i64) -> usize {
        self.groups
            .get(&topic_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}

/// 评论提交后推送给主题订阅者
pub fn broadcast_new_comment(topic_id: i64, comment: &Comment, user_name: String) {
    let delivered =
        ConnectionManager::get().publish(topic_id, ForumEvent::new_comment(comment, user_name));
    debug!(
        "Broadcast comment {} to {} subscribers of topic {}",
        comment.id, delivered, topic_id
    );
}

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// WebSocket 服务
pub struct WebSocketService;

impl WebSocketService {
    /// 校验令牌与论坛访问权限后升级连接
    pub async fn connect(
        request: HttpRequest,
        body: web::Payload,
        topic_id: i64,
        token: Option<String>,
    ) -> ActixResult<HttpResponse> {
        let (Some(storage), Some(cache)) = (
            request.app_data::<web::Data<Arc<dyn Storage>>>(),
            request.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
        ) else {
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Service is not ready",
            )));
        };
        let storage = storage.get_ref().clone();

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Missing access token",
            )));
        };
        let user = match authenticate_token(&token, &storage, cache.get_ref()).await {
            Ok(user) => user,
            Err(msg) => {
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    msg,
                )));
            }
        };

        if let Err(response) = load_topic_context(&storage, &user, topic_id).await {
            return Ok(response);
        }

        let (response, session, stream) = actix_ws::handle(&request, body)?;
        actix_web::rt::spawn(Self::handle_connection(topic_id, user.id, session, stream));
        Ok(response)
    }

    /// 处理 WebSocket 连接
    pub async fn handle_connection(
        topic_id: i64,
        user_id: i64,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        info!("User {} subscribed to topic {}", user_id, topic_id);

        let manager = ConnectionManager::get();
        let mut rx = manager.subscribe(topic_id);

        if let Ok(json) = serde_json::to_string(&ForumEvent::Connected { topic_id }) {
            let _ = session.text(json).await;
        }

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(ForumEvent::Ping) = serde_json::from_str::<ForumEvent>(&text) {
                                let pong = serde_json::to_string(&ForumEvent::Pong)
                                    .unwrap_or_else(|_| r#"{"type":"pong"}"#.to_string());
                                if session.text(pong).await.is_err() {
                                    break;
                                }
                            } else {
                                debug!("Ignored message from user {} on topic {}", user_id, topic_id);
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            break;
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for user {} on topic {}: {:?}", user_id, topic_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                event = rx.recv() => {
                    match event {
                        Ok(event) => {
                            if let Ok(json) = serde_json::to_string(&event)
                                && session.text(json).await.is_err() {
                                    break;
                                }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Subscriber {} of topic {} lagged by {} events", user_id, topic_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            break;
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(rx);
        manager.unsubscribe(topic_id);
        let _ = session.close(None).await;
        info!("User {} left topic {}", user_id, topic_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(content: &str) -> Comment {
        Comment {
            id: 9,
            user_id: 1,
            forum_id: 1,
            topic_id: Some(3),
            parent_id: None,
            content: content.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_topic_subscribers_only() {
        let manager = ConnectionManager::with_capacity(8);
        let mut rx = manager.subscribe(3);
        let mut other = manager.subscribe(4);

        let event = ForumEvent::new_comment(&comment("hello"), "Alice".into());
        assert_eq!(manager.publish(3, event.clone()), 1);
        assert_eq!(rx.recv().await.unwrap(), event);
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let manager = ConnectionManager::with_capacity(8);
        let event = ForumEvent::new_comment(&comment("hello"), "Alice".into());
        assert_eq!(manager.publish(3, event.clone()), 0);

        let rx = manager.subscribe(3);
        drop(rx);
        assert_eq!(manager.publish(3, event), 0);
        manager.unsubscribe(3);
        assert_eq!(manager.subscriber_count(3), 0);
    }

    #[test]
    fn test_event_wire_form() {
        let long = "x".repeat(150);
        let event = ForumEvent::new_comment(&comment(&long), "Alice".into());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "new_comment");
        assert_eq!(value["comment_id"], 9);
        assert_eq!(value["user_name"], "Alice");
        assert_eq!(value["content"].as_str().unwrap().len(), 103);
        assert!(value["timestamp"].is_string());

        let ping: ForumEvent = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(ping, ForumEvent::Ping);
    }
}
