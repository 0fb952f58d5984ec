//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::AccountAddress;
use kernel::id::TraderId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::trader::Trader;
use crate::domain::repository::TraderRepository;
use crate::domain::value_object::trader_name::TraderName;
use crate::error::{IdentityError, IdentityResult};

const NAME_CONSTRAINT: &str = "traders_name_canonical_key";
const ACCOUNT_CONSTRAINT: &str = "traders_account_key";

/// PostgreSQL-backed trader repository
#[derive(Clone)]
pub struct PgTraderRepository {
    pool: PgPool,
}

impl PgTraderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TraderRepository for PgTraderRepository {
    async fn create(&self, trader: &Trader) -> IdentityResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO traders (
                trader_id,
                name,
                name_canonical,
                account,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(trader.trader_id.as_uuid())
        .bind(trader.name.original())
        .bind(trader.name.canonical())
        .bind(trader.account.as_str())
        .bind(trader.password_hash.as_phc_string())
        .bind(trader.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent sign-up
            Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(NAME_CONSTRAINT) => {
                Err(IdentityError::NameTaken)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(ACCOUNT_CONSTRAINT) =>
            {
                Err(IdentityError::AccountTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, trader_id: TraderId) -> IdentityResult<Option<Trader>> {
        let row = sqlx::query_as::<_, TraderRow>(
            r#"
            SELECT trader_id, name, account, password_hash, created_at
            FROM traders
            WHERE trader_id = $1
            "#,
        )
        .bind(trader_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_trader()).transpose()
    }

    async fn find_by_name(&self, name: &TraderName) -> IdentityResult<Option<Trader>> {
        let row = sqlx::query_as::<_, TraderRow>(
            r#"
            SELECT trader_id, name, account, password_hash, created_at
            FROM traders
            WHERE name_canonical = $1
            "#,
        )
        .bind(name.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_trader()).transpose()
    }

    async fn find_by_account(&self, account: &AccountAddress) -> IdentityResult<Option<Trader>> {
        let row = sqlx::query_as::<_, TraderRow>(
            r#"
            SELECT trader_id, name, account, password_hash, created_at
            FROM traders
            WHERE account = $1
            "#,
        )
        .bind(account.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_trader()).transpose()
    }

    async fn exists_by_name(&self, name: &TraderName) -> IdentityResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM traders WHERE name_canonical = $1)",
        )
        .bind(name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_account(&self, account: &AccountAddress) -> IdentityResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM traders WHERE account = $1)")
                .bind(account.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list(&self) -> IdentityResult<Vec<Trader>> {
        let rows = sqlx::query_as::<_, TraderRow>(
            r#"
            SELECT trader_id, name, account, password_hash, created_at
            FROM traders
            ORDER BY created_at, trader_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_trader()).collect()
    }
}

#[derive(sqlx::FromRow)]
struct TraderRow {
    trader_id: Uuid,
    name: String,
    account: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TraderRow {
    fn into_trader(self) -> IdentityResult<Trader> {
        let account = AccountAddress::parse(&self.account)
            .map_err(|e| IdentityError::Internal(format!("Stored account is invalid: {e}")))?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)?;

        Ok(Trader {
            trader_id: TraderId::from_uuid(self.trader_id),
            name: TraderName::from_db(&self.name),
            account,
            password_hash,
            created_at: self.created_at,
        })
    }
}
