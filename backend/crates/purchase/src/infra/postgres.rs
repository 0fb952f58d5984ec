//! PostgreSQL Repository Implementation
//!
//! State transitions are single conditional `UPDATE … RETURNING`
//! statements; an empty result means the order was not in the expected
//! state when the write ran.

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, PurchaseOrderId, TraderId};
use kernel::{AccountAddress, TokenAmount};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::purchase_order::PurchaseOrder;
use crate::domain::repository::PurchaseOrderRepository;
use crate::domain::value_object::authorization::Authorization;
use crate::domain::view::{HistoryFilter, ListingSummary, Party, PurchaseOrderView};
use crate::error::{PurchaseError, PurchaseResult};

const ORDER_COLUMNS: &str = "order_id, buyer_id, listing_id, verifier_id, create_block, rewards, \
     buyer_auth, verifier_auth, needs_verification, needs_closure, settled_block, \
     created_at, updated_at";

const VIEW_SELECT: &str = r#"
    SELECT o.order_id, o.buyer_id, o.listing_id, o.verifier_id, o.create_block, o.rewards,
           o.buyer_auth, o.verifier_auth, o.needs_verification, o.needs_closure,
           o.settled_block, o.created_at, o.updated_at,
           l.name AS listing_name, l.cid AS listing_cid, l.size_bytes AS listing_size,
           l.price AS listing_price, l.category AS listing_category,
           l.created_at AS listing_created_at,
           s.trader_id AS seller_id, s.name AS seller_name, s.account AS seller_account,
           b.name AS buyer_name, b.account AS buyer_account,
           v.name AS verifier_name, v.account AS verifier_account
    FROM purchase_orders o
    JOIN listings l ON l.listing_id = o.listing_id
    JOIN traders s ON s.trader_id = l.owner_id
    JOIN traders b ON b.trader_id = o.buyer_id
    LEFT JOIN traders v ON v.trader_id = o.verifier_id
"#;

#[derive(Clone)]
pub struct PgPurchaseOrderRepository {
    pool: PgPool,
}

impl PgPurchaseOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_bigint(value: u64, column: &str) -> PurchaseResult<i64> {
    i64::try_from(value).map_err(|_| PurchaseError::Internal(format!("{column} exceeds BIGINT")))
}

impl PurchaseOrderRepository for PgPurchaseOrderRepository {
    async fn create(&self, order: &PurchaseOrder) -> PurchaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO purchase_orders (
                order_id,
                buyer_id,
                listing_id,
                verifier_id,
                create_block,
                rewards,
                buyer_auth,
                verifier_auth,
                needs_verification,
                needs_closure,
                settled_block,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.buyer_id.as_uuid())
        .bind(order.listing_id.as_uuid())
        .bind(order.verifier_id.map(|id| id.into_uuid()))
        .bind(to_bigint(order.create_block, "create_block")?)
        .bind(order.rewards.as_i64())
        .bind(order.buyer_auth.as_str())
        .bind(order.verifier_auth.as_ref().map(|a| a.as_str()))
        .bind(order.needs_verification)
        .bind(order.needs_closure)
        .bind(
            order
                .settled_block
                .map(|b| to_bigint(b, "settled_block"))
                .transpose()?,
        )
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, order_id: PurchaseOrderId) -> PurchaseResult<Option<PurchaseOrder>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE order_id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_order()).transpose()
    }

    async fn mark_verified(
        &self,
        order_id: PurchaseOrderId,
        verifier_auth: &Authorization,
        now: DateTime<Utc>,
    ) -> PurchaseResult<Option<PurchaseOrder>> {
        let sql = format!(
            r#"
            UPDATE purchase_orders
            SET verifier_auth = $2,
                needs_verification = FALSE,
                updated_at = $3
            WHERE order_id = $1
              AND needs_verification
              AND needs_closure
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id.as_uuid())
            .bind(verifier_auth.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_order()).transpose()
    }

    async fn mark_settled(
        &self,
        order_id: PurchaseOrderId,
        settled_block: u64,
        now: DateTime<Utc>,
    ) -> PurchaseResult<Option<PurchaseOrder>> {
        let sql = format!(
            r#"
            UPDATE purchase_orders
            SET needs_closure = FALSE,
                settled_block = $2,
                updated_at = $3
            WHERE order_id = $1
              AND needs_closure
              AND NOT needs_verification
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id.as_uuid())
            .bind(to_bigint(settled_block, "settled_block")?)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_order()).transpose()
    }

    async fn find_view(
        &self,
        order_id: PurchaseOrderId,
    ) -> PurchaseResult<Option<PurchaseOrderView>> {
        let sql = format!("{VIEW_SELECT} WHERE o.order_id = $1");
        let row = sqlx::query_as::<_, ViewRow>(&sql)
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_view()).transpose()
    }

    async fn find_views(&self, filter: &HistoryFilter) -> PurchaseResult<Vec<PurchaseOrderView>> {
        let (column, account) = match filter {
            HistoryFilter::Buyer(account) => ("b.account", account),
            HistoryFilter::Seller(account) => ("s.account", account),
            HistoryFilter::Verifier(account) => ("v.account", account),
        };
        let sql = format!("{VIEW_SELECT} WHERE {column} = $1 ORDER BY o.created_at DESC");

        let rows = sqlx::query_as::<_, ViewRow>(&sql)
            .bind(account.as_str())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(filter = ?filter, count = rows.len(), "History query");
        rows.into_iter().map(|r| r.into_view()).collect()
    }
}

fn stored_u64(value: i64, column: &str) -> PurchaseResult<u64> {
    u64::try_from(value)
        .map_err(|_| PurchaseError::Internal(format!("negative {column} in database")))
}

fn stored_account(value: &str) -> PurchaseResult<AccountAddress> {
    AccountAddress::parse(value)
        .map_err(|e| PurchaseError::Internal(format!("stored account: {e}")))
}

fn stored_amount(value: i64) -> PurchaseResult<TokenAmount> {
    TokenAmount::from_db(value).map_err(|e| PurchaseError::Internal(e.to_string()))
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    buyer_id: Uuid,
    listing_id: Uuid,
    verifier_id: Option<Uuid>,
    create_block: i64,
    rewards: i64,
    buyer_auth: String,
    verifier_auth: Option<String>,
    needs_verification: bool,
    needs_closure: bool,
    settled_block: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> PurchaseResult<PurchaseOrder> {
        Ok(PurchaseOrder {
            order_id: PurchaseOrderId::from_uuid(self.order_id),
            buyer_id: TraderId::from_uuid(self.buyer_id),
            listing_id: ListingId::from_uuid(self.listing_id),
            verifier_id: self.verifier_id.map(TraderId::from_uuid),
            create_block: stored_u64(self.create_block, "create_block")?,
            rewards: stored_amount(self.rewards)?,
            buyer_auth: Authorization::from_db(self.buyer_auth),
            verifier_auth: self.verifier_auth.map(Authorization::from_db),
            needs_verification: self.needs_verification,
            needs_closure: self.needs_closure,
            settled_block: self
                .settled_block
                .map(|b| stored_u64(b, "settled_block"))
                .transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ViewRow {
    #[sqlx(flatten)]
    order: OrderRow,
    listing_name: String,
    listing_cid: String,
    listing_size: i64,
    listing_price: i64,
    listing_category: Option<String>,
    listing_created_at: DateTime<Utc>,
    seller_id: Uuid,
    seller_name: String,
    seller_account: String,
    buyer_name: String,
    buyer_account: String,
    verifier_name: Option<String>,
    verifier_account: Option<String>,
}

impl ViewRow {
    fn into_view(self) -> PurchaseResult<PurchaseOrderView> {
        let order = self.order.into_order()?;

        let verifier = match (order.verifier_id, self.verifier_name, self.verifier_account) {
            (Some(trader_id), Some(name), Some(account)) => Some(Party {
                trader_id,
                name,
                account: stored_account(&account)?,
            }),
            _ => None,
        };

        Ok(PurchaseOrderView {
            listing: ListingSummary {
                listing_id: order.listing_id,
                name: self.listing_name,
                cid: self.listing_cid,
                size_bytes: stored_u64(self.listing_size, "size_bytes")?,
                price: stored_amount(self.listing_price)?,
                category: self.listing_category,
                created_at: self.listing_created_at,
            },
            seller: Party {
                trader_id: TraderId::from_uuid(self.seller_id),
                name: self.seller_name,
                account: stored_account(&self.seller_account)?,
            },
            buyer: Party {
                trader_id: order.buyer_id,
                name: self.buyer_name,
                account: stored_account(&self.buyer_account)?,
            },
            verifier,
            order,
        })
    }
}
