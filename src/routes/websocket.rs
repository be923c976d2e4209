use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::services::WebSocketService;
use crate::services::websocket::WsQuery;
use crate::utils::SafeTopicIdI64;

// 浏览器无法为 WebSocket 设置请求头，令牌走查询参数
pub async fn forum_topic_ws(
    req: HttpRequest,
    body: web::Payload,
    topic_id: SafeTopicIdI64,
    query: web::Query<WsQuery>,
) -> ActixResult<HttpResponse> {
    WebSocketService::connect(req, body, topic_id.0, query.into_inner().token).await
}

// 配置路由
pub fn configure_websocket_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws/forum/topic/{topic_id}", web::get().to(forum_topic_ws));
}
