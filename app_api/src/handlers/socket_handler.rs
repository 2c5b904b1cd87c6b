use crate::middleware::CurrentUser;
use crate::state::ApiState;
use actix_web::{HttpRequest, HttpResponse, get, rt, web};
use actix_ws::{CloseReason, Message, MessageStream, Session};
use biz_service::protocol::relay_event::ClientCommand;
use biz_service::relay::{ConnectionId, SocketRelay};
use common::UserId;
use futures_util::StreamExt;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(relay_socket);
}

/// 推送通道：升级为 WebSocket 后注册到中继，
/// 客户端发送 `{"event":"join","userId":"..."}` 加入自己的地址
#[get("/ws")]
pub async fn relay_socket(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<ApiState>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let (tx, rx) = mpsc::unbounded_channel();
    let relay = state.relay.clone();
    let conn_id = relay.register(tx);
    info!("🔗 relay connection {} opened by {}", conn_id.0, user.id);
    rt::spawn(run_connection(relay, conn_id, user.into_inner().id, session, stream, rx));
    Ok(response)
}

async fn run_connection(
    relay: Arc<SocketRelay>,
    conn_id: ConnectionId,
    owner: UserId,
    mut session: Session,
    mut stream: MessageStream,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let reason: Option<CloseReason> = loop {
        tokio::select! {
            Some(payload) = outbound.recv() => {
                if session.text(payload).await.is_err() {
                    break None;
                }
            }
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => relay.apply_command(&conn_id, &owner, command),
                    Err(e) => debug!("relay connection {} sent an unknown command: {}", conn_id.0, e),
                },
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break None;
                    }
                }
                Some(Ok(Message::Close(reason))) => break reason,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("relay connection {} protocol error: {}", conn_id.0, e);
                    break None;
                }
                None => break None,
            },
        }
    };
    relay.remove(&conn_id);
    let _ = session.close(reason).await;
}
