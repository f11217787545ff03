//! 自助点餐全流程 HTTP 测试
//!
//! 使用内存数据库完整初始化 ServerState，通过 Router 直接发请求:
//! 建档 → 扫码 → 点单 → 支付 → 后厨 → 取餐

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use order_server::api::build_app;
use order_server::{Config, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

const KITCHEN_KEY: &str = "test-kitchen-key";
const CASHIER_KEY: &str = "test-cashier-key";

fn test_config() -> Config {
    Config {
        data_dir: "./data".to_string(),
        http_port: 0,
        environment: "development".to_string(),
        session_ttl_ms: 3_600_000,
        session_sweep_interval_ms: 60_000,
        kitchen_key: KITCHEN_KEY.to_string(),
        cashier_key: CASHIER_KEY.to_string(),
        shutdown_timeout_ms: 1_000,
    }
}

fn test_app() -> Router {
    let config = test_config();
    let state = ServerState::initialize_in_memory(&config).unwrap();
    build_app(state)
}

/// 发送一个 JSON 请求并解析响应
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// 建档: 租户 + 桌台 + 两个菜品，返回 (tenant_id, qr_token, item_ids)
async fn seed_store(app: &Router) -> (String, String, Vec<String>) {
    let cashier = [("x-cashier-key", CASHIER_KEY)];

    let (status, body) = send(
        app,
        Method::POST,
        "/api/admin/tenants",
        &cashier,
        Some(json!({"name": "Cafe Uno", "slug": "cafe-uno"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tenant_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        app,
        Method::POST,
        "/api/admin/tables",
        &cashier,
        Some(json!({"tenant_id": tenant_id, "name": "T1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut item_ids = Vec::new();
    for (name, price) in [("Coffee", 10.0), ("Tea", 5.0)] {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/admin/menu-items",
            &cashier,
            Some(json!({"tenant_id": tenant_id, "name": name, "price": price})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        item_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(
        app,
        Method::GET,
        &format!("/api/tables/qr-tokens?tenant_id={}", tenant_id),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let qr_token = body["data"][0]["qr_token"].as_str().unwrap().to_string();

    (tenant_id, qr_token, item_ids)
}

async fn start_session(app: &Router, qr_token: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/guest/start",
        &[],
        Some(json!({"tenant_slug": "cafe-uno", "qr_token": qr_token})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["session"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_order_flow() {
    let app = test_app();
    let (tenant_id, qr_token, item_ids) = seed_store(&app).await;
    let guest_token = start_session(&app, &qr_token).await;
    let guest = [("x-guest-token", guest_token.as_str())];
    let kitchen = [("x-kitchen-key", KITCHEN_KEY)];
    let cashier = [("x-cashier-key", CASHIER_KEY)];

    // 会话检查
    let (status, body) = send(&app, Method::GET, "/api/guest/check", &guest, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], json!(true));

    // 菜单
    let (status, body) = send(&app, Method::GET, "/api/menu", &guest, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // 下单: 2 x Coffee(10) + 1 x Tea(5) = 25
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        &guest,
        Some(json!({"items": [
            {"menu_item_id": item_ids[0], "quantity": 2},
            {"menu_item_id": item_ids[1], "quantity": 1},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["total"], json!(25.0));
    assert_eq!(body["data"]["status"], json!("pending"));
    assert_eq!(body["data"]["payment_status"], json!("unpaid"));

    // 刷卡支付: 立即结清并获得取餐码
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments",
        &guest,
        Some(json!({"order_id": order_id, "method": "card", "amount": 25.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], json!("paid"));
    let pickup_token = body["data"]["pickup_token"].as_str().unwrap().to_string();
    assert_eq!(pickup_token.len(), 6);

    // 后厨看板
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/kitchen/orders?tenant_id={}", tenant_id),
        &kitchen,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // 后厨推进状态
    for next in ["preparing", "ready"] {
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/orders/{}/status", order_id),
            &kitchen,
            Some(json!({"status": next})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], json!(next));
    }

    // 取餐码查验
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/pickup/{}", pickup_token),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["id"], json!(order_id.clone()));
    assert_eq!(body["data"]["table_name"], json!("T1"));

    // 交餐
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/pickup/{}/collect", pickup_token),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["collected_now"], json!(true));
    assert_eq!(body["data"]["status"], json!("collected"));

    // 重复扫码: 幂等，不再产生新的交餐
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/pickup/{}/collect", pickup_token),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["collected_now"], json!(false));

    // 看板已清空
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/kitchen/orders?tenant_id={}", tenant_id),
        &kitchen,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cash_payment_flow() {
    let app = test_app();
    let (_, qr_token, item_ids) = seed_store(&app).await;
    let guest_token = start_session(&app, &qr_token).await;
    let guest = [("x-guest-token", guest_token.as_str())];
    let cashier = [("x-cashier-key", CASHIER_KEY)];

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        &guest,
        Some(json!({"items": [{"menu_item_id": item_ids[1], "quantity": 1}]})),
    )
    .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // 现金支付: 登记但订单保持未结清，无取餐码
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments",
        &guest,
        Some(json!({"order_id": order_id, "method": "cash", "amount": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], json!("unpaid"));
    assert!(body["data"]["pickup_token"].is_null());

    // 收银确认: 结清并发码
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/payments/{}/confirm-cash", order_id),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], json!("paid"));
    assert!(body["data"]["pickup_token"].is_string());

    // 再次确认: 409
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/payments/{}/confirm-cash", order_id),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("E0004"));

    // 收银查看支付记录: 现金一笔，已捕获
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/payments/{}", order_id),
        &cashier,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payments = body["data"].as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["method"], json!("cash"));
    assert_eq!(payments[0]["status"], json!("captured"));
    assert_eq!(payments[0]["amount"], json!(5.0));
}

#[tokio::test]
async fn test_auth_failures() {
    let app = test_app();
    let (tenant_id, qr_token, item_ids) = seed_store(&app).await;

    // 无会话令牌
    let (status, body) = send(&app, Method::GET, "/api/menu", &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("E3001"));

    // 伪造会话令牌
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/menu",
        &[("x-guest-token", "not-a-session")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 错误的后厨密钥
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/kitchen/orders?tenant_id={}", tenant_id),
        &[("x-kitchen-key", "wrong")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("E2001"));

    // 顾客不能用会话令牌访问员工接口
    let guest_token = start_session(&app, &qr_token).await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/orders/{}/status", "any"),
        &[("x-guest-token", guest_token.as_str())],
        Some(json!({"status": "preparing"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let _ = item_ids;
}

#[tokio::test]
async fn test_domain_errors_over_http() {
    let app = test_app();
    let (_, qr_token, item_ids) = seed_store(&app).await;
    let guest_token = start_session(&app, &qr_token).await;
    let guest = [("x-guest-token", guest_token.as_str())];
    let kitchen = [("x-kitchen-key", KITCHEN_KEY)];

    // 未知二维码
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/guest/start",
        &[],
        Some(json!({"tenant_slug": "cafe-uno", "qr_token": "BOGUS-TOKEN"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("E0003"));

    // 未知店铺标识
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/guest/start",
        &[],
        Some(json!({"tenant_slug": "no-such-cafe", "qr_token": qr_token})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("E0003"));

    // 空订单
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        &guest,
        Some(json!({"items": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("E0002"));

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        &guest,
        Some(json!({"items": [{"menu_item_id": item_ids[0], "quantity": 1}]})),
    )
    .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // 支付金额不足
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments",
        &guest,
        Some(json!({"order_id": order_id, "method": "card", "amount": 0.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("E0002"));

    // 非法状态值
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/orders/{}/status", order_id),
        &kitchen,
        Some(json!({"status": "shipped"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], json!("E0006"));

    // 跳过 preparing 直接 ready
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/orders/{}/status", order_id),
        &kitchen,
        Some(json!({"status": "ready"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], json!("E0005"));

    // 未支付不能交餐
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/orders/{}/status", order_id),
        &kitchen,
        Some(json!({"status": "collected"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("E2002"));
}
