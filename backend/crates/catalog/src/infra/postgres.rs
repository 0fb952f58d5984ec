//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, TraderId};
use kernel::{AccountAddress, TokenAmount};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::listing::{Listing, ListingOwner, ListingWithOwner};
use crate::domain::repository::ListingRepository;
use crate::domain::value_object::content_id::ContentId;
use crate::error::{CatalogError, CatalogResult};

const CID_OWNER_CONSTRAINT: &str = "listings_cid_owner_key";

#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ListingRepository for PgListingRepository {
    async fn create(&self, listing: &Listing) -> CatalogResult<()> {
        let size_bytes = i64::try_from(listing.size_bytes)
            .map_err(|_| CatalogError::Internal("size exceeds BIGINT".to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO listings (
                listing_id,
                cid,
                size_bytes,
                name,
                price,
                owner_id,
                category,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(listing.listing_id.as_uuid())
        .bind(listing.cid.as_str())
        .bind(size_bytes)
        .bind(&listing.name)
        .bind(listing.price.as_i64())
        .bind(listing.owner_id.as_uuid())
        .bind(listing.category.as_deref())
        .bind(listing.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(CID_OWNER_CONSTRAINT) =>
            {
                Err(CatalogError::DuplicateListing)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, listing_id: ListingId) -> CatalogResult<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT listing_id, cid, size_bytes, name, price, owner_id, category, created_at
            FROM listings
            WHERE listing_id = $1
            "#,
        )
        .bind(listing_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_listing()).transpose()
    }

    async fn find_with_owner(
        &self,
        listing_id: ListingId,
    ) -> CatalogResult<Option<ListingWithOwner>> {
        let row = sqlx::query_as::<_, ListingOwnerRow>(
            r#"
            SELECT l.listing_id, l.cid, l.size_bytes, l.name, l.price, l.owner_id,
                   l.category, l.created_at,
                   t.name AS owner_name, t.account AS owner_account
            FROM listings l
            JOIN traders t ON t.trader_id = l.owner_id
            WHERE l.listing_id = $1
            "#,
        )
        .bind(listing_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_listing_with_owner()).transpose()
    }

    async fn list(&self, owner: Option<&AccountAddress>) -> CatalogResult<Vec<ListingWithOwner>> {
        let rows = sqlx::query_as::<_, ListingOwnerRow>(
            r#"
            SELECT l.listing_id, l.cid, l.size_bytes, l.name, l.price, l.owner_id,
                   l.category, l.created_at,
                   t.name AS owner_name, t.account AS owner_account
            FROM listings l
            JOIN traders t ON t.trader_id = l.owner_id
            WHERE $1::TEXT IS NULL OR t.account = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(owner.map(|a| a.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_listing_with_owner())
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    listing_id: Uuid,
    cid: String,
    size_bytes: i64,
    name: String,
    price: i64,
    owner_id: Uuid,
    category: Option<String>,
    created_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self) -> CatalogResult<Listing> {
        Ok(Listing {
            listing_id: ListingId::from_uuid(self.listing_id),
            cid: ContentId::parse(&self.cid)?,
            size_bytes: u64::try_from(self.size_bytes)
                .map_err(|_| CatalogError::Internal("negative size in database".to_string()))?,
            name: self.name,
            price: TokenAmount::from_db(self.price)
                .map_err(|e| CatalogError::Internal(e.to_string()))?,
            owner_id: TraderId::from_uuid(self.owner_id),
            category: self.category,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ListingOwnerRow {
    #[sqlx(flatten)]
    listing: ListingRow,
    owner_name: String,
    owner_account: String,
}

impl ListingOwnerRow {
    fn into_listing_with_owner(self) -> CatalogResult<ListingWithOwner> {
        let account = AccountAddress::parse(&self.owner_account)
            .map_err(|e| CatalogError::Internal(format!("stored account: {e}")))?;
        let listing = self.listing.into_listing()?;

        Ok(ListingWithOwner {
            owner: ListingOwner {
                trader_id: listing.owner_id,
                name: self.owner_name,
                account,
            },
            listing,
        })
    }
}
