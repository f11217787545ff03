//! 订单压力测试 - 8 线程并发推进 1000 个订单
//!
//! 使用内存数据库完整初始化 ServerState，绕过 HTTP 层直接驱动订单管理器。
//! 验证取餐码全局唯一、事件序号单调递增、终态订单从看板消失。

use order_server::{Config, ServerState};
use rand::Rng;
use shared::models::GuestSession;
use shared::order::{OrderStatus, PaymentMethod, PaymentStatus};
use shared::request::{CreateOrderRequest, OrderLineRequest};
use shared::util::now_millis;
use std::collections::HashSet;

const THREADS: usize = 8;
const ORDERS_PER_THREAD: usize = 125;

const PRODUCTS: &[(&str, f64)] = &[
    ("宫保鸡丁", 38.0),
    ("麻婆豆腐", 28.0),
    ("鱼香肉丝", 35.0),
    ("红烧肉", 48.0),
    ("可乐", 8.0),
    ("米饭", 3.0),
];

fn test_config() -> Config {
    Config {
        data_dir: "./data".to_string(),
        http_port: 0,
        environment: "development".to_string(),
        session_ttl_ms: 3_600_000,
        session_sweep_interval_ms: 60_000,
        kitchen_key: "k".to_string(),
        cashier_key: "c".to_string(),
        shutdown_timeout_ms: 1_000,
    }
}

struct Fixture {
    state: ServerState,
    session: GuestSession,
    item_ids: Vec<String>,
}

fn fixture() -> Fixture {
    let state = ServerState::initialize_in_memory(&test_config()).unwrap();

    let tenant = state.directory.create_tenant("压力测试店", "stress").unwrap();
    let table = state.directory.create_table(&tenant.id, "T1").unwrap();
    let mut item_ids = Vec::new();
    for (name, price) in PRODUCTS {
        let item = state
            .directory
            .create_menu_item(&tenant.id, name, None, *price, true)
            .unwrap();
        item_ids.push(item.id);
    }

    let session = state
        .sessions
        .create(&tenant.id, &table.id, 3_600_000)
        .unwrap();

    Fixture {
        state,
        session,
        item_ids,
    }
}

fn random_request(rng: &mut impl Rng, item_ids: &[String]) -> CreateOrderRequest {
    let count = rng.gen_range(1..=4);
    CreateOrderRequest {
        items: (0..count)
            .map(|_| OrderLineRequest {
                menu_item_id: item_ids[rng.gen_range(0..item_ids.len())].clone(),
                quantity: rng.gen_range(1..=3),
            })
            .collect(),
        notes: None,
    }
}

#[test]
fn test_thousand_orders_unique_tokens() {
    let f = fixture();

    // 每个线程独立走完 下单 → 支付 → 备餐 → 出餐 → 交餐，
    // 一半现金一半刷卡，与其他线程的订单交叉写库
    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let manager = f.state.orders.clone();
        let session = f.session.clone();
        let item_ids = f.item_ids.clone();
        handles.push(std::thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let mut completed = Vec::with_capacity(ORDERS_PER_THREAD);
            for idx in 0..ORDERS_PER_THREAD {
                let req = random_request(&mut rng, &item_ids);
                let order = manager.create_order(&session, &req).unwrap();
                assert!(order.total > 0.0);

                let method = if idx % 2 == 0 {
                    PaymentMethod::Card
                } else {
                    PaymentMethod::Cash
                };
                let (_, order) = manager
                    .record_payment(&session, &order.id, method, order.total)
                    .unwrap();

                let order = if order.payment_status == PaymentStatus::Paid {
                    order
                } else {
                    manager.confirm_cash_payment(&order.id).unwrap().1
                };

                let token = order.pickup_token.clone().unwrap();
                assert_eq!(token.len(), 6);

                manager.update_status(&order.id, "preparing").unwrap();
                manager.update_status(&order.id, "ready").unwrap();
                let outcome = manager.collect_pickup(&token).unwrap();
                assert!(outcome.collected_now);
                assert_eq!(outcome.order.status, OrderStatus::Collected);

                completed.push((order.id, token));
            }
            completed
        }));
    }

    let mut orders = Vec::new();
    for handle in handles {
        orders.extend(handle.join().unwrap());
    }
    assert_eq!(orders.len(), THREADS * ORDERS_PER_THREAD);

    // 取餐码全局唯一
    let mut tokens = HashSet::new();
    for (_, token) in &orders {
        assert!(tokens.insert(token.clone()), "duplicate pickup token");
    }

    // 看板清空
    let manager = &f.state.orders;
    let open = manager.list_open_orders(&f.session.tenant_id, None).unwrap();
    assert!(open.is_empty());

    // 事件序号全局单调: 每个订单的事件按序号排列且互不重复
    let mut seen = HashSet::new();
    for (order_id, _) in &orders {
        let events = manager.storage().events_for_order(order_id).unwrap();
        // 创建 + 发码 + preparing + ready + collected
        assert_eq!(events.len(), 5);
        let mut last = 0;
        for event in events {
            assert!(event.sequence > last);
            last = event.sequence;
            assert!(seen.insert(event.sequence));
        }
    }
}

#[tokio::test]
async fn test_session_sweep_under_load() {
    let f = fixture();

    // 大量短会话过期后被一次清理
    for _ in 0..200 {
        f.state
            .sessions
            .create(&f.session.tenant_id, &f.session.table_id, -1)
            .unwrap();
    }
    let removed = f.state.sessions.sweep_expired().unwrap();
    assert_eq!(removed, 200);

    // 长会话不受影响
    let session = f
        .state
        .sessions
        .get_by_token(&f.session.token)
        .unwrap()
        .unwrap();
    assert!(!session.is_expired(now_millis()));
}
