use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use app_api::handlers;
use app_api::middleware::AuthMiddleware;
use app_api::state::ApiState;
use async_trait::async_trait;
use biz_service::chat_platform::{ChatPlatform, ChatPlatformError};
use common::config::{StreamConfig, SysConfig};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// 记录被同步到聊天平台的用户 ID
#[derive(Default)]
struct RecordingChatPlatform {
    synced: Mutex<Vec<String>>,
}

impl RecordingChatPlatform {
    fn synced(&self) -> Vec<String> {
        self.synced.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for RecordingChatPlatform {
    async fn upsert_user(&self, id: &str, _name: &str, _image: &str) -> Result<(), ChatPlatformError> {
        self.synced.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

fn test_state_with_chat(chat: Arc<dyn ChatPlatform>) -> web::Data<ApiState> {
    let sys = SysConfig { jwt_secret: "integration-secret".to_string(), bcrypt_cost: 4, ..Default::default() };
    let stream =
        StreamConfig { api_key: "key".to_string(), api_secret: "platform-secret".to_string(), ..Default::default() };
    web::Data::new(ApiState::in_memory(&sys, &stream, chat).unwrap())
}

fn test_state() -> web::Data<ApiState> {
    test_state_with_chat(Arc::new(RecordingChatPlatform::default()))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new().wrap(AuthMiddleware::new($state.clone())).app_data($state.clone()).configure(handlers::configure),
        )
        .await
    };
}

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// 注册并完成引导，返回 (user_id, token)
macro_rules! onboarded_user {
    ($app:expr, $name:expr) => {{
        let email = format!("{}@example.com", $name.to_lowercase());
        let (status, body) = call_json!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(json!({"fullName": $name, "email": email, "password": "secret1"}))
        );
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let token = body["token"].as_str().unwrap().to_string();
        let id = body["user"]["id"].as_str().unwrap().to_string();

        let (status, body) = call_json!(
            $app,
            test::TestRequest::post().uri("/api/auth/onboarding").insert_header(bearer(&token)).set_json(json!({
                "fullName": $name,
                "bio": "hello",
                "nativeLanguage": "english",
                "learningLanguage": "spanish",
                "location": "Lisbon"
            }))
        );
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["user"]["isOnboarded"], true);
        (id, token)
    }};
}

#[actix_web::test]
async fn protected_routes_require_a_session() {
    let state = test_state();
    let app = init_app!(state);

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/api/users/friends"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, _) = call_json!(app, test::TestRequest::get().uri("/api/auth/me").insert_header(bearer("garbage")));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call_json!(app, test::TestRequest::get().uri("/ws"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/status"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn signup_sets_cookie_and_login_checks_credentials() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({"fullName": "Ana", "email": "ana@example.com", "password": "secret1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let cookie = resp.response().cookies().find(|c| c.name() == "jwt").unwrap();
    assert!(cookie.http_only().unwrap_or(false));
    let cookie_token = cookie.value().to_string();
    let body: Value = test::read_body_json(resp).await;
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["user"]["isOnboarded"], false);

    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(actix_web::cookie::Cookie::new("jwt", cookie_token))
        .to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "ana@example.com");

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({"fullName": "Ana 2", "email": "ana@example.com", "password": "secret1"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call_json!(
        app,
        test::TestRequest::post().uri("/api/auth/login").set_json(json!({"email": "ana@example.com", "password": "nope123"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = call_json!(
        app,
        test::TestRequest::post().uri("/api/auth/login").set_json(json!({"email": "ana@example.com", "password": "secret1"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn onboarding_reports_missing_fields() {
    let state = test_state();
    let app = init_app!(state);
    let (_, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({"fullName": "Ana", "email": "ana@example.com", "password": "secret1"}))
    );
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call_json!(
        app,
        test::TestRequest::post().uri("/api/auth/onboarding").insert_header(bearer(&token)).set_json(json!({"fullName": "Ana"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("bio") && message.contains("location"), "{}", message);
}

#[actix_web::test]
async fn friend_request_lifecycle() {
    let state = test_state();
    let app = init_app!(state);
    let (a_id, a_token) = onboarded_user!(app, "Alice");
    let (b_id, b_token) = onboarded_user!(app, "Bob");

    // B 在线，等待推送
    let (tx, mut rx) = mpsc::unbounded_channel();
    let conn = state.relay.register(tx);
    assert!(state.relay.join(&conn, &b_id));

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/api/users/recommended").insert_header(bearer(&a_token)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], b_id.as_str());

    let (status, created) = call_json!(
        app,
        test::TestRequest::post().uri(&format!("/api/users/friend-request/{}", b_id)).insert_header(bearer(&a_token))
    );
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["status"], "pending");
    let request_id = created["id"].as_str().unwrap().to_string();

    let pushed: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
    assert_eq!(pushed["event"], "friendRequest");
    assert_eq!(pushed["data"]["request"]["id"], request_id.as_str());
    assert_eq!(pushed["data"]["sender"]["id"], a_id.as_str());

    let (status, _) = call_json!(
        app,
        test::TestRequest::post().uri(&format!("/api/users/friend-request/{}", a_id)).insert_header(bearer(&b_token))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, outgoing) =
        call_json!(app, test::TestRequest::get().uri("/api/users/outgoing-friend-requests").insert_header(bearer(&a_token)));
    assert_eq!(outgoing.as_array().unwrap().len(), 1);
    assert_eq!(outgoing[0]["recipient"]["id"], b_id.as_str());

    let (_, listed) = call_json!(app, test::TestRequest::get().uri("/api/users/friend-requests").insert_header(bearer(&b_token)));
    assert_eq!(listed["incomingReqs"].as_array().unwrap().len(), 1);
    assert_eq!(listed["incomingReqs"][0]["sender"]["fullName"], "Alice");
    assert!(listed["acceptedReqs"].as_array().unwrap().is_empty());

    let accept_uri = format!("/api/users/friend-request/{}/accept", request_id);
    let (status, _) = call_json!(app, test::TestRequest::put().uri(&accept_uri).insert_header(bearer(&a_token)));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call_json!(app, test::TestRequest::put().uri(&accept_uri).insert_header(bearer(&b_token)));
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call_json!(app, test::TestRequest::put().uri(&accept_uri).insert_header(bearer(&b_token)));
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, listed) = call_json!(app, test::TestRequest::get().uri("/api/users/friend-requests").insert_header(bearer(&b_token)));
    assert!(listed["incomingReqs"].as_array().unwrap().is_empty());
    assert_eq!(listed["acceptedReqs"].as_array().unwrap().len(), 1);
    assert_eq!(listed["acceptedReqs"][0]["recipient"]["id"], b_id.as_str());

    for (token, friend) in [(&a_token, &b_id), (&b_token, &a_id)] {
        let (_, friends) = call_json!(app, test::TestRequest::get().uri("/api/users/friends").insert_header(bearer(token)));
        assert_eq!(friends.as_array().unwrap().len(), 1);
        assert_eq!(friends[0]["id"], friend.as_str());
    }

    let (_, profile) = call_json!(app, test::TestRequest::get().uri(&format!("/api/users/{}", a_id)).insert_header(bearer(&b_token)));
    assert_eq!(profile["friends"][0], b_id.as_str());
    assert!(profile.get("email").is_none());

    let (_, recommended) =
        call_json!(app, test::TestRequest::get().uri("/api/users/recommended").insert_header(bearer(&a_token)));
    assert!(recommended.as_array().unwrap().is_empty());

    let (status, _) = call_json!(
        app,
        test::TestRequest::post().uri(&format!("/api/users/friend-request/{}", b_id)).insert_header(bearer(&a_token))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn friend_request_edge_cases() {
    let state = test_state();
    let app = init_app!(state);
    let (c_id, c_token) = onboarded_user!(app, "Carol");

    let (status, _) = call_json!(
        app,
        test::TestRequest::post().uri(&format!("/api/users/friend-request/{}", c_id)).insert_header(bearer(&c_token))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, outgoing) =
        call_json!(app, test::TestRequest::get().uri("/api/users/outgoing-friend-requests").insert_header(bearer(&c_token)));
    assert!(outgoing.as_array().unwrap().is_empty());

    let (status, _) =
        call_json!(app, test::TestRequest::post().uri("/api/users/friend-request/nobody").insert_header(bearer(&c_token)));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        call_json!(app, test::TestRequest::put().uri("/api/users/friend-request/missing/accept").insert_header(bearer(&c_token)));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call_json!(app, test::TestRequest::get().uri("/api/users/nobody").insert_header(bearer(&c_token)));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn chat_token_and_openapi() {
    let state = test_state();
    let app = init_app!(state);
    let (_, token) = onboarded_user!(app, "Dave");

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/api/chat/token").insert_header(bearer(&token)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);

    let (status, doc) = call_json!(app, test::TestRequest::get().uri("/openapi.json"));
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/users/friend-request/{id}/accept").is_some());
    assert!(doc["paths"].get("/api/chat/user").is_some());
}

#[actix_web::test]
async fn malformed_body_is_a_bad_request() {
    let state = test_state();
    let app = init_app!(state);
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn chat_user_sync_on_onboarding_and_on_demand() {
    let chat = Arc::new(RecordingChatPlatform::default());
    let state = test_state_with_chat(chat.clone());
    let app = init_app!(state);
    let (id, token) = onboarded_user!(app, "Erin");
    assert_eq!(chat.synced(), vec![id.clone()]);

    let (status, body) = call_json!(
        app,
        test::TestRequest::post().uri("/api/chat/user").insert_header(bearer(&token)).set_json(json!({"userId": id}))
    );
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Chat user created/updated successfully");
    assert_eq!(chat.synced().len(), 2);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/chat/user")
            .insert_header(bearer(&token))
            .set_json(json!({"userId": "no-such-user"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post().uri("/api/chat/user").insert_header(bearer(&token)).set_json(json!({}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        call_json!(app, test::TestRequest::post().uri("/api/chat/user").set_json(json!({"userId": id})));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(chat.synced().len(), 2);
}
