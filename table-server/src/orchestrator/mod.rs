//! SessionOrchestrator - 桌台状态机
//!
//! 把外部触发 (扫码、助手意图、店员操作) 组合成一次完整的状态转换：
//!
//! ```text
//! trigger ──▶ TokenStore (如需) ──▶ SessionRegistry::update ──▶ EventBroadcaster
//! ```
//!
//! | From              | Trigger        | To       |
//! |-------------------|----------------|----------|
//! | empty             | 有效扫码        | occupied |
//! | any               | 加入购物车      | ordering |
//! | occupied/ordering | 完成订单        | ordered  |
//! | ordered           | 上菜            | served   |
//! | any               | 清台            | empty    |
//!
//! 助手后端调用发生在任何核心锁之外；失败不修改会话。

mod replies;
mod types;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use shared::ObserverEvent;
use shared::models::{AccessToken, TableSession, TableStatus};
use tokio::sync::broadcast;

use crate::assistant::{
    AssistantBackend, ChatHistory, ChatMessage, Intent, IntentParser, MenuCatalog,
};
use crate::core::{SessionError, SessionResult};
use crate::message::{EventBroadcaster, ScanAttempt};
use crate::sessions::{SessionRegistry, SessionUpdate, cart};
use crate::tokens::{TokenCheck, TokenStore};
use crate::utils::Clock;

pub use replies::{APOLOGY_MESSAGE, ESTIMATED_TIME};
pub use types::{
    AccessGrant, CartOperation, CartOutcome, CartView, ChatReply, ClearOutcome, IssuedToken,
    OrderReceipt, SystemInfo,
};

/// 最大就餐人数
pub const MAX_CUSTOMERS: i64 = 20;

/// 编排层配置
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 顾客点餐页地址前缀
    pub base_url: String,
    pub token_ttl: Duration,
    pub event_channel_capacity: usize,
    pub activity_log_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            token_ttl: Duration::from_secs(shared::models::DEFAULT_TOKEN_TTL_SECS),
            event_channel_capacity: crate::message::DEFAULT_CHANNEL_CAPACITY,
            activity_log_capacity: crate::message::DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

/// 会话编排器
#[derive(Clone)]
pub struct SessionOrchestrator {
    tokens: TokenStore,
    sessions: SessionRegistry,
    broadcaster: EventBroadcaster,
    catalog: Arc<MenuCatalog>,
    chats: Arc<ChatHistory>,
    backend: Arc<dyn AssistantBackend>,
    parser: Arc<dyn IntentParser>,
    clock: Arc<dyn Clock>,
    base_url: String,
    started_at: i64,
}

impl fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("tokens", &self.tokens.len())
            .field("sessions", &self.sessions)
            .field("base_url", &self.base_url)
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl SessionOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        clock: Arc<dyn Clock>,
        backend: Arc<dyn AssistantBackend>,
        parser: Arc<dyn IntentParser>,
    ) -> Self {
        let broadcaster = EventBroadcaster::new(
            config.event_channel_capacity,
            config.activity_log_capacity,
            clock.clone(),
        );
        let sessions =
            SessionRegistry::new(clock.clone()).with_observer(Arc::new(broadcaster.clone()));

        Self {
            tokens: TokenStore::new(config.token_ttl, clock.clone()),
            sessions,
            broadcaster,
            catalog: Arc::new(MenuCatalog::default()),
            chats: Arc::new(ChatHistory::default()),
            backend,
            parser,
            started_at: clock.now_millis(),
            clock,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    // ========== Components ==========

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn broadcaster(&self) -> &EventBroadcaster {
        &self.broadcaster
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn uptime_secs(&self) -> u64 {
        let elapsed = self.clock.now_millis().saturating_sub(self.started_at);
        u64::try_from(elapsed / 1000).unwrap_or(0)
    }

    // ========== Access tokens ==========

    /// 为桌台签发二维码令牌
    pub fn issue_token(&self, table_id: &str) -> IssuedToken {
        let token = self.tokens.issue(table_id);
        self.broadcaster.qr_generated(&token);
        tracing::info!(
            table_id = %table_id,
            token = %token.token_id,
            ttl_secs = self.tokens.ttl_secs(),
            "QR token issued"
        );
        self.describe_token(&token)
    }

    fn describe_token(&self, token: &AccessToken) -> IssuedToken {
        IssuedToken {
            url: format!(
                "{}/order?table={}&token={}",
                self.base_url, token.table_id, token.token_id
            ),
            token_id: token.token_id.clone(),
            table_id: token.table_id.clone(),
            expires_in_seconds: token.expires_in_secs_at(self.clock.now_millis()),
            created_at: token.created_at,
        }
    }

    /// 扫码校验
    ///
    /// 令牌必须存在、未过期且绑定到同一桌台。成功时 `empty → occupied`；
    /// 桌台已在使用中时只刷新设备信息，不回退状态。
    /// 令牌检查在桌台锁内进行，与清台的撤销互斥。
    /// 成功与失败都会广播扫码事件。
    pub fn validate_access(
        &self,
        token_id: &str,
        table_id: &str,
        device: Option<&str>,
    ) -> SessionResult<AccessGrant> {
        let now = self.clock.now_millis();
        let device_owned = device.map(str::to_string);
        let mut rejection: Option<&'static str> = None;

        let result = self.sessions.update(table_id, |session| {
            let age_secs = match self.tokens.validate(token_id) {
                TokenCheck::Valid {
                    table_id: bound,
                    age_secs,
                } if bound == table_id => age_secs,
                TokenCheck::Valid { table_id: bound, .. } => {
                    tracing::warn!(
                        target: "security",
                        table_id = %table_id,
                        bound_table = %bound,
                        "Access token used for a different table"
                    );
                    rejection = Some("table_mismatch");
                    return Err(SessionError::InvalidOrExpiredToken);
                }
                TokenCheck::Invalid => {
                    tracing::warn!(
                        target: "security",
                        table_id = %table_id,
                        token = %token_id,
                        "Invalid or expired access token"
                    );
                    rejection = Some("invalid_or_expired");
                    return Err(SessionError::InvalidOrExpiredToken);
                }
            };

            if session.status == TableStatus::Empty {
                session.status = TableStatus::Occupied;
                session.session_start = Some(now);
            }
            if device_owned.is_some() {
                session.customer_device = device_owned.clone();
            }
            Ok(age_secs)
        });

        let (state, age_secs) = match (result, rejection) {
            (Ok(committed), _) => committed,
            (Err(_), Some(reason)) => return Err(self.reject_scan(table_id, reason, device)),
            (Err(err), None) => return Err(err),
        };

        self.broadcaster.qr_scan_attempt(ScanAttempt {
            table_id: table_id.to_string(),
            success: true,
            reason: None,
            token_age_secs: Some(age_secs),
            device: device_owned,
        });
        tracing::info!(table_id = %table_id, token_age_secs = age_secs, "Table access granted");

        Ok(AccessGrant {
            table_id: table_id.to_string(),
            token_age_secs: age_secs,
            state,
        })
    }

    fn reject_scan(&self, table_id: &str, reason: &str, device: Option<&str>) -> SessionError {
        self.broadcaster.qr_scan_attempt(ScanAttempt {
            table_id: table_id.to_string(),
            success: false,
            reason: Some(reason.to_string()),
            token_age_secs: None,
            device: device.map(str::to_string),
        });
        SessionError::InvalidOrExpiredToken
    }

    // ========== Cart ==========

    /// 执行购物车操作
    pub fn apply_cart_operation(
        &self,
        table_id: &str,
        op: CartOperation,
    ) -> SessionResult<CartOutcome> {
        match op {
            CartOperation::AddItem { menu_id, quantity } => self
                .add_to_cart(table_id, &menu_id, quantity)
                .map(CartOutcome::Cart),
            CartOperation::GetCart => Ok(CartOutcome::Cart(self.cart(table_id))),
            CartOperation::CompleteOrder => self.complete_order(table_id).map(CartOutcome::Order),
        }
    }

    /// 加入购物车
    ///
    /// 未知菜品在触及会话之前被拒绝；成功后状态变为 `ordering`。
    pub fn add_to_cart(&self, table_id: &str, menu_id: &str, quantity: i64) -> SessionResult<CartView> {
        let item = self
            .catalog
            .get(menu_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownMenuItem(menu_id.to_string()))?;

        let now = self.clock.now_millis();
        let (state, ()) = self.sessions.update(table_id, |session| {
            cart::add_item(session, &item, quantity)?;
            if session.session_start.is_none() {
                session.session_start = Some(now);
            }
            session.status = TableStatus::Ordering;
            Ok(())
        })?;

        tracing::info!(
            table_id = %table_id,
            menu_id = %menu_id,
            quantity,
            total = state.total_amount,
            "Item added to cart"
        );
        Ok(CartView::from_session(&state))
    }

    /// 购物车视图
    pub fn cart(&self, table_id: &str) -> CartView {
        CartView::from_session(&self.sessions.get(table_id))
    }

    /// 完成订单：`occupied/ordering → ordered`
    ///
    /// 空购物车直接拒绝，不发生状态转换。
    pub fn complete_order(&self, table_id: &str) -> SessionResult<OrderReceipt> {
        let now = self.clock.now_millis();
        let (state, ()) = self.sessions.update(table_id, |session| {
            if session.cart.is_empty() {
                return Err(SessionError::EmptyCartCompletion);
            }
            if !matches!(session.status, TableStatus::Occupied | TableStatus::Ordering) {
                return Err(SessionError::InvalidTransition {
                    from: session.status,
                    action: "complete order",
                });
            }
            session.status = TableStatus::Ordered;
            session.order_time = Some(now);
            session.served_time = None;
            Ok(())
        })?;

        let receipt = OrderReceipt {
            order_id: format!("ORDER_{}_{}", table_id, now),
            table_state: state,
            estimated_time: ESTIMATED_TIME.to_string(),
        };
        self.print_kitchen_ticket(&receipt);
        Ok(receipt)
    }

    fn print_kitchen_ticket(&self, receipt: &OrderReceipt) {
        let state = &receipt.table_state;
        let items = state
            .cart
            .iter()
            .map(|line| format!("{} x{} ({})", line.name, line.quantity, line.price))
            .collect::<Vec<_>>()
            .join(", ");
        let order_time = state
            .order_time
            .map(shared::util::millis_to_rfc3339)
            .unwrap_or_default();
        tracing::info!(
            target: "kitchen",
            table_id = %state.table_id,
            order_id = %receipt.order_id,
            order_time = %order_time,
            items = %items,
            total = state.total_amount,
            "Kitchen ticket"
        );
    }

    // ========== Staff actions ==========

    /// 设置就餐人数 (0..=20)
    pub fn set_customer_count(&self, table_id: &str, count: i64) -> SessionResult<TableSession> {
        let customers = u8::try_from(count)
            .ok()
            .filter(|c| i64::from(*c) <= MAX_CUSTOMERS)
            .ok_or(SessionError::InvalidCustomerCount(count))?;

        let state = self
            .sessions
            .merge(table_id, SessionUpdate::new().customers(customers))?;
        tracing::info!(table_id = %table_id, customers, "Customer count updated");
        Ok(state)
    }

    /// 上菜：`ordered → served`
    pub fn mark_served(&self, table_id: &str) -> SessionResult<TableSession> {
        let now = self.clock.now_millis();
        let (state, ()) = self.sessions.update(table_id, |session| {
            if session.status != TableStatus::Ordered {
                return Err(SessionError::InvalidTransition {
                    from: session.status,
                    action: "mark served",
                });
            }
            session.status = TableStatus::Served;
            session.served_time = Some(now);
            Ok(())
        })?;
        tracing::info!(table_id = %table_id, "Table served");
        Ok(state)
    }

    /// 清台：重置会话，撤销令牌，删除对话历史
    ///
    /// 撤销与重置在同一次桌台锁内完成，进行中的扫码要么先于清台生效，
    /// 要么看到令牌已被撤销。
    pub fn clear_table(&self, table_id: &str) -> SessionResult<ClearOutcome> {
        let (state, tokens_revoked) = self.sessions.update(table_id, |session| {
            let revoked = self.tokens.revoke_all_for_table(table_id);
            SessionUpdate::reset().apply_to(session);
            Ok(revoked)
        })?;
        let chat_dropped = self.chats.remove(table_id);

        tracing::info!(
            table_id = %table_id,
            tokens_revoked,
            chat_dropped,
            "Table cleared"
        );
        Ok(ClearOutcome {
            state,
            tokens_revoked,
            chat_dropped,
        })
    }

    // ========== Assistant ==========

    /// 一轮对话
    ///
    /// 后端失败返回 `ExternalServiceFailure`，会话保持不变。
    /// 意图执行失败只替换回复文本。
    pub async fn chat(&self, table_id: &str, message: &str) -> SessionResult<ChatReply> {
        let history = self.chats.append(table_id, ChatMessage::user(message));
        tracing::info!(
            table_id = %table_id,
            message = %preview(message, 50),
            "Customer message"
        );

        let text = match self.backend.complete(&history).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(table_id = %table_id, error = %err, "Assistant backend failed");
                return Err(err);
            }
        };

        let intents = self.parser.parse(&text);
        if !intents.is_empty() {
            tracing::debug!(table_id = %table_id, count = intents.len(), "Executing intents");
        }

        let mut response = text;
        let mut cart_updated = false;
        let mut action_performed = None;
        for intent in &intents {
            action_performed = Some(intent.name().to_string());
            match self.execute_intent(table_id, intent) {
                Ok(reply) => {
                    cart_updated |= matches!(intent, Intent::AddToCart { .. } | Intent::CompleteOrder);
                    response = reply;
                }
                Err(err) => {
                    tracing::warn!(table_id = %table_id, intent = intent.name(), error = %err, "Intent failed");
                    response = replies::for_error(&err);
                }
            }
        }

        self.chats
            .append(table_id, ChatMessage::assistant(response.clone()));
        let session_length = self.chats.session_len(table_id);

        self.broadcaster
            .new_message(table_id, message, &response, action_performed.clone());
        tracing::info!(table_id = %table_id, reply = %preview(&response, 100), "Assistant reply");

        Ok(ChatReply {
            response,
            cart_updated,
            action_performed,
            session_length,
        })
    }

    fn execute_intent(&self, table_id: &str, intent: &Intent) -> SessionResult<String> {
        match intent {
            Intent::ShowMenu => Ok(self.catalog.render()),
            Intent::AddToCart { menu_id, quantity } => {
                self.add_to_cart(table_id, menu_id, *quantity)?;
                let name = self
                    .catalog
                    .get(menu_id)
                    .map_or(menu_id.as_str(), |item| item.name.as_str());
                Ok(replies::item_added(name, *quantity))
            }
            Intent::GetCart => Ok(replies::cart_summary(&self.cart(table_id))),
            Intent::CompleteOrder => {
                let receipt = self.complete_order(table_id)?;
                Ok(replies::order_completed(&receipt))
            }
        }
    }

    // ========== Reads ==========

    pub fn table_status(&self, table_id: &str) -> TableSession {
        self.sessions.get(table_id)
    }

    pub fn all_tables(&self) -> std::collections::BTreeMap<String, TableSession> {
        self.sessions.list_all()
    }

    pub fn system_info(&self) -> SystemInfo {
        let tables = self.sessions.list_all();
        SystemInfo {
            active_tokens: self.tokens.len(),
            active_tables: tables.values().filter(|s| s.status.is_active()).count(),
            total_tables: tables.len(),
            total_sales: tables.values().map(|s| s.total_amount).sum(),
            active_chat_sessions: self.chats.active_sessions(),
            uptime_secs: self.uptime_secs(),
            server_start: self.started_at,
        }
    }

    /// 观察者接入：全量快照 + 后续事件流
    pub fn connect_observer(&self) -> (ObserverEvent, broadcast::Receiver<ObserverEvent>) {
        let sessions = self.sessions.clone();
        self.broadcaster.connect(move || sessions.list_all())
    }
}

/// 日志用的截断预览
fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
