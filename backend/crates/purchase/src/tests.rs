//! Unit tests for the Purchase crate
//!
//! Lifecycle scenarios run against in-memory repositories sharing one
//! [`support::World`] and a scripted ledger gateway.

#[cfg(test)]
pub(crate) mod support {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use catalog::{CatalogResult, ContentId, Listing, ListingOwner, ListingRepository, ListingWithOwner};
    use chrono::{DateTime, Utc};
    use identity::{IdentityResult, Trader, TraderName, TraderRepository};
    use kernel::id::{ListingId, PurchaseOrderId, TraderId};
    use kernel::{AccountAddress, TokenAmount};
    use ledger::{LedgerError, LedgerGateway, LedgerResult, RawTransaction, ReceiptStatus, TransactionReceipt};
    use platform::password::HashedPassword;

    use crate::domain::entity::purchase_order::PurchaseOrder;
    use crate::domain::repository::PurchaseOrderRepository;
    use crate::domain::value_object::authorization::Authorization;
    use crate::domain::view::{HistoryFilter, ListingSummary, Party, PurchaseOrderView};
    use crate::error::PurchaseResult;

    pub const SELLER_ACCOUNT: &str = "0x1111111111111111111111111111111111111111";
    pub const BUYER_ACCOUNT: &str = "0x2222222222222222222222222222222222222222";
    pub const VERIFIER_ACCOUNT: &str = "0x3333333333333333333333333333333333333333";
    pub const OTHER_ACCOUNT: &str = "0x4444444444444444444444444444444444444444";
    pub const UNKNOWN_ACCOUNT: &str = "0x9999999999999999999999999999999999999999";

    pub const SETTLEMENT_TX: &str = "0xf8a98085174876e800830186a0";
    pub const SETTLED_BLOCK: u64 = 42;

    const PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$RdescudvJCsgt3ub+b+dWRWJTmaaJObG";

    /// Everything the in-memory repositories share
    #[derive(Default)]
    pub struct World {
        traders: Mutex<Vec<Trader>>,
        listings: Mutex<Vec<Listing>>,
        orders: Mutex<Vec<PurchaseOrder>>,
    }

    impl World {
        pub fn add_trader(&self, name: &str, account: &str) -> Trader {
            let trader = Trader::new(
                TraderName::new(name).unwrap(),
                AccountAddress::parse(account).unwrap(),
                HashedPassword::from_phc_string(PHC).unwrap(),
            );
            self.traders.lock().unwrap().push(trader.clone());
            trader
        }

        pub fn add_listing(&self, owner: &Trader, price: u64) -> Listing {
            let n = self.listings.lock().unwrap().len();
            let listing = Listing::new(
                ContentId::parse(&format!("Qm{n:0>44}")).unwrap(),
                1024,
                format!("dataset-{n}.csv"),
                TokenAmount::new(price).unwrap(),
                owner.trader_id,
                None,
            );
            self.listings.lock().unwrap().push(listing.clone());
            listing
        }

        pub fn order(&self, order_id: PurchaseOrderId) -> PurchaseOrder {
            self.orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.order_id == order_id)
                .cloned()
                .unwrap()
        }

        pub fn order_count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }

        fn trader(&self, trader_id: TraderId) -> Option<Trader> {
            self.traders
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.trader_id == trader_id)
                .cloned()
        }

        fn listing(&self, listing_id: ListingId) -> Option<Listing> {
            self.listings
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.listing_id == listing_id)
                .cloned()
        }

        fn party(&self, trader_id: TraderId) -> Option<Party> {
            self.trader(trader_id).map(|t| Party {
                trader_id: t.trader_id,
                name: t.name.original().to_string(),
                account: t.account,
            })
        }

        fn view(&self, order: PurchaseOrder) -> Option<PurchaseOrderView> {
            let listing = self.listing(order.listing_id)?;
            Some(PurchaseOrderView {
                seller: self.party(listing.owner_id)?,
                buyer: self.party(order.buyer_id)?,
                verifier: order.verifier_id.and_then(|id| self.party(id)),
                listing: ListingSummary {
                    listing_id: listing.listing_id,
                    name: listing.name,
                    cid: listing.cid.to_string(),
                    size_bytes: listing.size_bytes,
                    price: listing.price,
                    category: listing.category,
                    created_at: listing.created_at,
                },
                order,
            })
        }

        /// Apply `change` to a stored order; `None` when it is missing or refused
        fn update(
            &self,
            order_id: PurchaseOrderId,
            change: impl FnOnce(&mut PurchaseOrder) -> PurchaseResult<()>,
        ) -> Option<PurchaseOrder> {
            let mut orders = self.orders.lock().unwrap();
            let order = orders.iter_mut().find(|o| o.order_id == order_id)?;
            let mut next = order.clone();
            change(&mut next).ok()?;
            *order = next.clone();
            Some(next)
        }
    }

    pub struct Traders(pub Arc<World>);
    pub struct Listings(pub Arc<World>);
    pub struct Orders(pub Arc<World>);

    impl TraderRepository for Traders {
        async fn create(&self, trader: &Trader) -> IdentityResult<()> {
            self.0.traders.lock().unwrap().push(trader.clone());
            Ok(())
        }

        async fn find_by_id(&self, trader_id: TraderId) -> IdentityResult<Option<Trader>> {
            Ok(self.0.trader(trader_id))
        }

        async fn find_by_name(&self, name: &TraderName) -> IdentityResult<Option<Trader>> {
            Ok(self
                .0
                .traders
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.name.canonical() == name.canonical())
                .cloned())
        }

        async fn find_by_account(&self, account: &AccountAddress) -> IdentityResult<Option<Trader>> {
            Ok(self
                .0
                .traders
                .lock()
                .unwrap()
                .iter()
                .find(|t| &t.account == account)
                .cloned())
        }

        async fn exists_by_name(&self, name: &TraderName) -> IdentityResult<bool> {
            Ok(self.find_by_name(name).await?.is_some())
        }

        async fn exists_by_account(&self, account: &AccountAddress) -> IdentityResult<bool> {
            Ok(self.find_by_account(account).await?.is_some())
        }

        async fn list(&self) -> IdentityResult<Vec<Trader>> {
            Ok(self.0.traders.lock().unwrap().clone())
        }
    }

    impl ListingRepository for Listings {
        async fn create(&self, listing: &Listing) -> CatalogResult<()> {
            self.0.listings.lock().unwrap().push(listing.clone());
            Ok(())
        }

        async fn find_by_id(&self, listing_id: ListingId) -> CatalogResult<Option<Listing>> {
            Ok(self.0.listing(listing_id))
        }

        async fn find_with_owner(
            &self,
            listing_id: ListingId,
        ) -> CatalogResult<Option<ListingWithOwner>> {
            Ok(self.0.listing(listing_id).and_then(|listing| {
                let owner = self.0.party(listing.owner_id)?;
                Some(ListingWithOwner {
                    owner: ListingOwner {
                        trader_id: owner.trader_id,
                        name: owner.name,
                        account: owner.account,
                    },
                    listing,
                })
            }))
        }

        async fn list(&self, _owner: Option<&AccountAddress>) -> CatalogResult<Vec<ListingWithOwner>> {
            Ok(Vec::new())
        }
    }

    impl PurchaseOrderRepository for Orders {
        async fn create(&self, order: &PurchaseOrder) -> PurchaseResult<()> {
            self.0.orders.lock().unwrap().push(order.clone());
            Ok(())
        }

        async fn find_by_id(&self, order_id: PurchaseOrderId) -> PurchaseResult<Option<PurchaseOrder>> {
            Ok(self
                .0
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.order_id == order_id)
                .cloned())
        }

        async fn mark_verified(
            &self,
            order_id: PurchaseOrderId,
            verifier_auth: &Authorization,
            now: DateTime<Utc>,
        ) -> PurchaseResult<Option<PurchaseOrder>> {
            Ok(self
                .0
                .update(order_id, |o| o.record_verification(verifier_auth.clone(), now)))
        }

        async fn mark_settled(
            &self,
            order_id: PurchaseOrderId,
            settled_block: u64,
            now: DateTime<Utc>,
        ) -> PurchaseResult<Option<PurchaseOrder>> {
            Ok(self
                .0
                .update(order_id, |o| o.record_settlement(settled_block, now)))
        }

        async fn find_view(
            &self,
            order_id: PurchaseOrderId,
        ) -> PurchaseResult<Option<PurchaseOrderView>> {
            let order = self.find_by_id(order_id).await?;
            Ok(order.and_then(|o| self.0.view(o)))
        }

        async fn find_views(&self, filter: &HistoryFilter) -> PurchaseResult<Vec<PurchaseOrderView>> {
            let orders = self.0.orders.lock().unwrap().clone();
            let mut views: Vec<_> = orders
                .into_iter()
                .rev()
                .filter_map(|o| self.0.view(o))
                .filter(|v| filter.matches(v))
                .collect();
            views.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
            Ok(views)
        }
    }

    /// What the next submission does
    #[derive(Debug, Clone, Copy)]
    pub enum Outcome {
        Mined,
        Reverted,
        /// JSON-RPC error object from the node
        Rejected,
        Unreachable,
        /// Never answers
        Hang,
    }

    /// Ledger gateway replaying a queue of outcomes; `Mined` once it runs dry
    pub struct ScriptedGateway {
        outcomes: Mutex<VecDeque<Outcome>>,
        delay: Duration,
        pub submitted: AtomicUsize,
    }

    impl ScriptedGateway {
        pub fn new(outcomes: &[Outcome]) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.iter().copied().collect()),
                delay: Duration::ZERO,
                submitted: AtomicUsize::new(0),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn submitted(&self) -> usize {
            self.submitted.load(Ordering::SeqCst)
        }

        fn receipt(status: ReceiptStatus) -> TransactionReceipt {
            TransactionReceipt {
                transaction_hash: "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060"
                    .to_string(),
                block_number: SETTLED_BLOCK,
                status,
                gas_used: 85_000,
            }
        }
    }

    impl LedgerGateway for ScriptedGateway {
        async fn submit_raw_transaction(
            &self,
            _tx: &RawTransaction,
        ) -> LedgerResult<TransactionReceipt> {
            self.submitted.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Outcome::Mined);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match outcome {
                Outcome::Mined => Ok(Self::receipt(ReceiptStatus::Success)),
                Outcome::Reverted => Ok(Self::receipt(ReceiptStatus::Reverted)),
                Outcome::Rejected => Err(LedgerError::Rpc {
                    code: -32000,
                    message: "nonce too low".to_string(),
                }),
                Outcome::Unreachable => Err(LedgerError::Transport("connection refused".to_string())),
                Outcome::Hang => std::future::pending().await,
            }
        }

        async fn token_balance(&self, _account: &AccountAddress) -> LedgerResult<u128> {
            Ok(0)
        }

        async fn native_balance(&self, _account: &AccountAddress) -> LedgerResult<u128> {
            Ok(0)
        }

        async fn nonce(&self, _account: &AccountAddress) -> LedgerResult<u64> {
            Ok(0)
        }

        async fn gas_price(&self) -> LedgerResult<u128> {
            Ok(1)
        }

        async fn chain_id(&self) -> LedgerResult<u64> {
            Ok(1337)
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use identity::Trader;
    use kernel::AccountAddress;
    use kernel::error::kind::ErrorKind;
    use kernel::id::PurchaseOrderId;
    use tokio_test::{assert_err, assert_ok};

    use super::support::*;
    use crate::application::{
        CloseOrderUseCase, CreateOrderInput, CreateOrderUseCase, OrderHistoryUseCase, OrderLocks,
        PurchaseConfig, VerifyOrderUseCase,
    };
    use crate::domain::entity::purchase_order::PurchaseOrder;
    use crate::domain::value_object::order_state::OrderState;
    use crate::domain::value_object::reward_policy::RewardPolicy;
    use crate::domain::view::HistoryFilter;
    use crate::error::PurchaseError;

    struct Market {
        world: Arc<World>,
        seller: Trader,
        buyer: Trader,
        verifier: Trader,
        listing_id: String,
        gateway: Arc<ScriptedGateway>,
        locks: Arc<OrderLocks>,
        config: Arc<PurchaseConfig>,
    }

    impl Market {
        fn new(outcomes: &[Outcome]) -> Self {
            Self::with(ScriptedGateway::new(outcomes), PurchaseConfig::default())
        }

        fn with(gateway: ScriptedGateway, config: PurchaseConfig) -> Self {
            let world = Arc::new(World::default());
            let seller = world.add_trader("seller", SELLER_ACCOUNT);
            let buyer = world.add_trader("buyer", BUYER_ACCOUNT);
            let verifier = world.add_trader("verifier", VERIFIER_ACCOUNT);
            let listing = world.add_listing(&seller, 100);
            Self {
                world,
                seller,
                buyer,
                verifier,
                listing_id: listing.listing_id.to_string(),
                gateway: Arc::new(gateway),
                locks: Arc::new(OrderLocks::new()),
                config: Arc::new(config),
            }
        }

        fn input(&self, verifier: Option<&str>, rewards: u64) -> CreateOrderInput {
            CreateOrderInput {
                buyer: BUYER_ACCOUNT.to_string(),
                listing: self.listing_id.clone(),
                verifier: verifier.map(str::to_string),
                rewards,
                create_block: 12,
                buyer_auth: "0xbuyer-signature".to_string(),
            }
        }

        async fn create(&self, input: CreateOrderInput) -> Result<PurchaseOrder, PurchaseError> {
            CreateOrderUseCase::new(
                Arc::new(Orders(self.world.clone())),
                Arc::new(Traders(self.world.clone())),
                Arc::new(Listings(self.world.clone())),
                self.config.clone(),
            )
            .execute(input)
            .await
        }

        async fn verify(&self, order_id: PurchaseOrderId, auth: &str) -> Result<PurchaseOrder, PurchaseError> {
            VerifyOrderUseCase::new(Arc::new(Orders(self.world.clone())))
                .execute(order_id, auth)
                .await
        }

        fn closer(&self) -> CloseOrderUseCase<Orders, ScriptedGateway> {
            CloseOrderUseCase::new(
                Arc::new(Orders(self.world.clone())),
                self.gateway.clone(),
                self.locks.clone(),
                self.config.clone(),
            )
        }

        fn history(&self) -> OrderHistoryUseCase<Orders> {
            OrderHistoryUseCase::new(Arc::new(Orders(self.world.clone())))
        }
    }

    #[tokio::test]
    async fn test_order_without_verifier_ignores_rewards() {
        let market = Market::new(&[]);

        let order = assert_ok!(market.create(market.input(None, 10)).await);

        assert!(!order.needs_verification);
        assert!(order.needs_closure);
        assert!(order.rewards.is_zero());
        assert_eq!(order.verifier_id, None);
        assert_eq!(order.state(), OrderState::ReadyToClose);
        assert_eq!(order.buyer_id, market.buyer.trader_id);
    }

    #[tokio::test]
    async fn test_blank_verifier_counts_as_none() {
        let market = Market::new(&[]);

        let order = assert_ok!(market.create(market.input(Some("  "), 10)).await);

        assert!(!order.needs_verification);
        assert!(order.rewards.is_zero());
    }

    #[tokio::test]
    async fn test_order_with_verifier_takes_absolute_rewards() {
        let market = Market::new(&[]);

        let order = assert_ok!(market.create(market.input(Some(VERIFIER_ACCOUNT), 10)).await);

        assert!(order.needs_verification);
        assert_eq!(order.rewards.value(), 10);
        assert_eq!(order.verifier_id, Some(market.verifier.trader_id));
        assert_eq!(order.state(), OrderState::PendingVerification);
    }

    #[tokio::test]
    async fn test_percent_policy_scales_by_price() {
        let market = Market::with(
            ScriptedGateway::new(&[]),
            PurchaseConfig {
                reward_policy: RewardPolicy::PercentOfPrice,
                ..PurchaseConfig::default()
            },
        );

        let order = assert_ok!(market.create(market.input(Some(VERIFIER_ACCOUNT), 25)).await);
        assert_eq!(order.rewards.value(), 25);

        let err = assert_err!(market.create(market.input(Some(VERIFIER_ACCOUNT), 101)).await);
        assert!(matches!(err, PurchaseError::InvalidRewards(_)));
    }

    #[tokio::test]
    async fn test_verify_then_close() {
        let market = Market::new(&[]);
        let order = assert_ok!(market.create(market.input(Some(VERIFIER_ACCOUNT), 10)).await);

        let verified = assert_ok!(market.verify(order.order_id, "0xverifier-signature").await);
        assert_eq!(verified.state(), OrderState::ReadyToClose);
        assert_eq!(
            verified.verifier_auth.as_ref().map(|a| a.as_str()),
            Some("0xverifier-signature")
        );

        let closed = assert_ok!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert_eq!(closed.create_block, SETTLED_BLOCK);
        assert_eq!(closed.order.state(), OrderState::Closed);
        assert!(!closed.order.needs_closure);
        assert!(closed.order.verifier_auth.is_some());
        assert_eq!(closed.order.settled_block, Some(SETTLED_BLOCK));

        let stored = market.world.order(order.order_id);
        assert_eq!(stored, closed.order);
        assert_eq!(market.gateway.submitted(), 1);
        assert!(market.locks.is_empty());
    }

    #[tokio::test]
    async fn test_close_before_verify_is_rejected() {
        let market = Market::new(&[]);
        let order = assert_ok!(market.create(market.input(Some(VERIFIER_ACCOUNT), 10)).await);

        let err = assert_err!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);

        assert!(matches!(err, PurchaseError::NeedsVerification));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(market.gateway.submitted(), 0);
        assert_eq!(market.world.order(order.order_id), order);
    }

    #[tokio::test]
    async fn test_reverted_settlement_keeps_order_open() {
        let market = Market::new(&[Outcome::Reverted]);
        let order = assert_ok!(market.create(market.input(None, 0)).await);

        let err = assert_err!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        match &err {
            PurchaseError::SettlementReverted(receipt) => {
                assert!(!receipt.is_success());
                assert_eq!(receipt.block_number, SETTLED_BLOCK);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(market.world.order(order.order_id).needs_closure);

        // A corrected transaction goes through afterwards
        let closed = assert_ok!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert_eq!(closed.order.state(), OrderState::Closed);
        assert_eq!(market.gateway.submitted(), 2);
    }

    #[tokio::test]
    async fn test_verify_edge_cases() {
        let market = Market::new(&[]);
        let direct = assert_ok!(market.create(market.input(None, 0)).await);
        let verified = assert_ok!(market.create(market.input(Some(VERIFIER_ACCOUNT), 10)).await);

        let err = assert_err!(market.verify(direct.order_id, "0xsig").await);
        assert!(matches!(err, PurchaseError::VerificationNotRequired));

        let err = assert_err!(market.verify(verified.order_id, "   ").await);
        assert!(matches!(err, PurchaseError::MissingAuthorization("Verifier")));
        assert!(market.world.order(verified.order_id).needs_verification);

        assert_ok!(market.verify(verified.order_id, "0xsig").await);
        let err = assert_err!(market.verify(verified.order_id, "0xother").await);
        assert!(matches!(err, PurchaseError::VerificationNotRequired));
        assert_eq!(
            market
                .world
                .order(verified.order_id)
                .verifier_auth
                .as_ref()
                .map(|a| a.as_str().to_string()),
            Some("0xsig".to_string())
        );

        let err = assert_err!(market.verify(PurchaseOrderId::new(), "0xsig").await);
        assert!(matches!(err, PurchaseError::OrderNotFound));
    }

    #[tokio::test]
    async fn test_closed_order_stays_closed() {
        let market = Market::new(&[]);
        let order = assert_ok!(market.create(market.input(None, 0)).await);
        assert_ok!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);

        let err = assert_err!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert!(matches!(err, PurchaseError::AlreadyClosed));
        assert_eq!(market.gateway.submitted(), 1);

        let err = assert_err!(market.verify(order.order_id, "0xsig").await);
        assert!(matches!(err, PurchaseError::VerificationNotRequired));
    }

    #[tokio::test]
    async fn test_malformed_transaction_is_rejected_before_lookup() {
        let market = Market::new(&[]);

        // No such order, yet the blob is what gets reported
        let err = assert_err!(market.closer().execute(PurchaseOrderId::new(), "0xzz").await);
        assert!(matches!(err, PurchaseError::InvalidTransaction(_)));

        let err = assert_err!(market.closer().execute(PurchaseOrderId::new(), "f86c").await);
        assert!(matches!(err, PurchaseError::InvalidTransaction(_)));
        assert_eq!(market.gateway.submitted(), 0);

        let err = assert_err!(market.closer().execute(PurchaseOrderId::new(), SETTLEMENT_TX).await);
        assert!(matches!(err, PurchaseError::OrderNotFound));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_references() {
        let market = Market::new(&[]);

        let mut input = market.input(None, 0);
        input.buyer = UNKNOWN_ACCOUNT.to_string();
        assert!(matches!(
            market.create(input).await,
            Err(PurchaseError::BuyerNotFound)
        ));

        let mut input = market.input(None, 0);
        input.buyer = "not-an-account".to_string();
        let err = assert_err!(market.create(input).await);
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let mut input = market.input(None, 0);
        input.listing = uuid::Uuid::new_v4().to_string();
        assert!(matches!(
            market.create(input).await,
            Err(PurchaseError::ListingNotFound)
        ));

        let mut input = market.input(None, 0);
        input.listing = "42".to_string();
        assert!(matches!(
            market.create(input).await,
            Err(PurchaseError::ListingNotFound)
        ));

        assert!(matches!(
            market.create(market.input(Some(UNKNOWN_ACCOUNT), 10)).await,
            Err(PurchaseError::VerifierNotFound)
        ));

        let mut input = market.input(None, 0);
        input.buyer_auth = String::new();
        assert!(matches!(
            market.create(input).await,
            Err(PurchaseError::MissingAuthorization("Buyer"))
        ));

        assert!(matches!(
            market.create(market.input(Some(VERIFIER_ACCOUNT), 101)).await,
            Err(PurchaseError::RewardExceedsPrice { rewards: 101, price: 100 })
        ));

        let mut input = market.input(None, 0);
        input.create_block = u64::MAX;
        let err = assert_err!(market.create(input).await);
        assert!(matches!(err, PurchaseError::CreateBlockOutOfRange(u64::MAX)));
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        assert_eq!(market.world.order_count(), 0);
    }

    #[tokio::test]
    async fn test_ledger_failures_leave_order_closeable() {
        let market = Market::new(&[Outcome::Rejected, Outcome::Unreachable]);
        let order = assert_ok!(market.create(market.input(None, 0)).await);

        let err = assert_err!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert!(matches!(err, PurchaseError::SettlementFailed(_)));
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = assert_err!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert_eq!(err.kind(), ErrorKind::BadGateway);
        assert!(err.kind().is_retryable());

        assert_eq!(market.world.order(order.order_id).state(), OrderState::ReadyToClose);
        assert_ok!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
    }

    #[tokio::test]
    async fn test_concurrent_close_submits_once() {
        let market = Market::with(
            ScriptedGateway::new(&[]).with_delay(Duration::from_millis(20)),
            PurchaseConfig::default(),
        );
        let order = assert_ok!(market.create(market.input(None, 0)).await);

        let first = market.closer();
        let second = market.closer();
        let (a, b) = tokio::join!(
            first.execute(order.order_id, SETTLEMENT_TX),
            second.execute(order.order_id, SETTLEMENT_TX),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(PurchaseError::AlreadyClosed)))
        );
        assert_eq!(market.gateway.submitted(), 1);
        assert!(market.locks.is_empty());
    }

    #[tokio::test]
    async fn test_settlement_timeout_is_retryable() {
        let market = Market::with(
            ScriptedGateway::new(&[Outcome::Hang]),
            PurchaseConfig {
                settlement_timeout: Duration::from_millis(50),
                ..PurchaseConfig::default()
            },
        );
        let order = assert_ok!(market.create(market.input(None, 0)).await);

        let err = assert_err!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert!(matches!(err, PurchaseError::SettlementTimeout));
        assert_eq!(err.kind(), ErrorKind::GatewayTimeout);
        assert!(market.world.order(order.order_id).needs_closure);
        assert!(market.locks.is_empty());

        let closed = assert_ok!(market.closer().execute(order.order_id, SETTLEMENT_TX).await);
        assert_eq!(closed.order.state(), OrderState::Closed);
    }

    #[tokio::test]
    async fn test_history_by_role() {
        let market = Market::new(&[]);
        let first = assert_ok!(market.create(market.input(None, 0)).await);
        let second = assert_ok!(market.create(market.input(Some(VERIFIER_ACCOUNT), 10)).await);
        let history = market.history();

        let as_buyer = assert_ok!(
            history
                .list(Some(HistoryFilter::Buyer(market.buyer.account.clone())))
                .await
        );
        assert_eq!(as_buyer.len(), 2);
        assert_eq!(as_buyer[0].order.order_id, second.order_id);
        assert_eq!(as_buyer[1].order.order_id, first.order_id);

        let as_seller = assert_ok!(
            history
                .list(Some(HistoryFilter::Seller(market.seller.account.clone())))
                .await
        );
        assert_eq!(as_seller.len(), 2);
        assert_eq!(as_seller[0].seller.name, "seller");

        let as_verifier = assert_ok!(
            history
                .list(Some(HistoryFilter::Verifier(market.verifier.account.clone())))
                .await
        );
        assert_eq!(as_verifier.len(), 1);
        assert_eq!(as_verifier[0].order.order_id, second.order_id);
        assert_eq!(
            as_verifier[0].verifier.as_ref().map(|p| p.trader_id),
            Some(market.verifier.trader_id)
        );

        let stranger = AccountAddress::parse(OTHER_ACCOUNT).unwrap();
        let none = assert_ok!(history.list(Some(HistoryFilter::Buyer(stranger))).await);
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_history_lookup_errors() {
        let market = Market::new(&[]);
        let history = market.history();

        assert!(matches!(
            history.list(None).await,
            Err(PurchaseError::MissingHistoryFilter)
        ));
        assert!(matches!(
            history.get(PurchaseOrderId::new()).await,
            Err(PurchaseError::OrderNotFound)
        ));

        let order = assert_ok!(market.create(market.input(None, 0)).await);
        let view = assert_ok!(history.get(order.order_id).await);
        assert_eq!(view.buyer.trader_id, market.buyer.trader_id);
        assert_eq!(view.listing.price.value(), 100);
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::{Extension, Router};
    use identity::{CurrentTrader, Trader};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::PurchaseConfig;
    use crate::presentation::{PurchaseAppState, purchase_router};

    struct Harness {
        world: Arc<World>,
        gateway: Arc<ScriptedGateway>,
        buyer: Trader,
        outsider: Trader,
        listing_id: String,
    }

    impl Harness {
        fn new(outcomes: &[Outcome]) -> Self {
            let world = Arc::new(World::default());
            let seller = world.add_trader("seller", SELLER_ACCOUNT);
            let buyer = world.add_trader("buyer", BUYER_ACCOUNT);
            world.add_trader("verifier", VERIFIER_ACCOUNT);
            let outsider = world.add_trader("outsider", OTHER_ACCOUNT);
            let listing = world.add_listing(&seller, 100);
            Self {
                world,
                gateway: Arc::new(ScriptedGateway::new(outcomes)),
                buyer,
                outsider,
                listing_id: listing.listing_id.to_string(),
            }
        }

        /// Routes with no authenticated trader in the request
        fn anonymous(&self) -> Router {
            purchase_router(PurchaseAppState::new(
                Arc::new(Orders(self.world.clone())),
                Arc::new(Traders(self.world.clone())),
                Arc::new(Listings(self.world.clone())),
                self.gateway.clone(),
                PurchaseConfig::default(),
            ))
        }

        fn app_as(&self, trader: &Trader) -> Router {
            self.anonymous().layer(Extension(CurrentTrader {
                trader_id: trader.trader_id,
                name: trader.name.original().to_string(),
                account: trader.account.clone(),
            }))
        }

        fn app(&self) -> Router {
            self.app_as(&self.buyer)
        }

        fn purchase_body(&self, verifier: Option<&str>, rewards: Value) -> Value {
            json!({
                "buyer": BUYER_ACCOUNT,
                "listing": self.listing_id,
                "verifier": verifier,
                "rewards": rewards,
                "createBlock": 12,
                "buyerAuth": "0xbuyer-signature",
            })
        }
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_full_lifecycle_over_http() {
        let h = Harness::new(&[]);
        let app = h.app();

        let resp = app
            .clone()
            .oneshot(post(
                "/buyer/purchase",
                h.purchase_body(Some(VERIFIER_ACCOUNT), json!("10")),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let created = body_json(resp).await;
        assert_eq!(created["rewards"], 10);
        assert_eq!(created["state"], "PENDING_VERIFICATION");
        assert_eq!(created["needs_verification"], true);
        let id = created["id"].as_str().unwrap().to_string();

        let resp = app
            .clone()
            .oneshot(post(
                "/verifier/sign",
                json!({ "item": id, "verifierAuth": "0xverifier-signature" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["state"], "READY_TO_CLOSE");

        let resp = app
            .clone()
            .oneshot(post("/seller/close", json!({ "id": id, "data": SETTLEMENT_TX })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let closed = body_json(resp).await;
        assert_eq!(closed["create_block"], SETTLED_BLOCK);
        assert_eq!(closed["purchase"]["state"], "CLOSED");
        assert_eq!(closed["purchase"]["needs_closure"], false);
        assert_eq!(closed["purchase"]["verifier_auth"], "0xverifier-signature");
    }

    #[tokio::test]
    async fn test_purchase_rejects_bad_rewards() {
        let h = Harness::new(&[]);

        let resp = h
            .app()
            .oneshot(post(
                "/buyer/purchase",
                h.purchase_body(Some(VERIFIER_ACCOUNT), json!("abc")),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = h
            .app()
            .oneshot(post(
                "/buyer/purchase",
                h.purchase_body(Some(VERIFIER_ACCOUNT), json!(500)),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let mut body = h.purchase_body(None, json!(0));
        body["createBlock"] = json!(u64::MAX);
        let resp = h.app().oneshot(post("/buyer/purchase", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert_eq!(h.world.order_count(), 0);
    }

    #[tokio::test]
    async fn test_routes_require_trader() {
        let h = Harness::new(&[Outcome::Mined]);
        let app = h.anonymous();

        let resp = app
            .clone()
            .oneshot(post("/buyer/purchase", h.purchase_body(None, json!(0))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app
            .clone()
            .oneshot(post(
                "/verifier/sign",
                json!({ "item": uuid::Uuid::new_v4(), "verifierAuth": "0xsig" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = h
            .app()
            .oneshot(post("/buyer/purchase", h.purchase_body(None, json!(0))))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_string();
        let resp = app
            .clone()
            .oneshot(post("/seller/close", json!({ "id": id, "data": SETTLEMENT_TX })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.gateway.submitted(), 0);

        let resp = app
            .clone()
            .oneshot(get(&format!("/history?buyer={BUYER_ACCOUNT}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app.oneshot(get(&format!("/history/{id}"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.world.order_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let h = Harness::new(&[]);

        let resp = h
            .app()
            .oneshot(post(
                "/verifier/sign",
                json!({ "item": uuid::Uuid::new_v4(), "verifierAuth": "0xsig" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = h
            .app()
            .oneshot(post("/seller/close", json!({ "id": "abc", "data": SETTLEMENT_TX })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = h.app().oneshot(get("/history/not-a-uuid")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_close_error_statuses() {
        let h = Harness::new(&[Outcome::Reverted]);
        let app = h.app();

        let resp = app
            .clone()
            .oneshot(post("/buyer/purchase", h.purchase_body(None, json!(0))))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_string();

        let resp = app
            .clone()
            .oneshot(post("/seller/close", json!({ "id": id, "data": "0xnothex" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.gateway.submitted(), 0);

        let resp = app
            .clone()
            .oneshot(post("/seller/close", json!({ "id": id, "data": SETTLEMENT_TX })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let problem = body_json(resp).await;
        assert_eq!(problem["detail"], "Close Transaction Failed.");
        assert_eq!(problem["details"]["status"], "reverted");
        assert_eq!(problem["details"]["blockNumber"], SETTLED_BLOCK);

        let resp = app
            .oneshot(post("/seller/close", json!({ "id": id, "data": SETTLEMENT_TX })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_history_requires_filter() {
        let h = Harness::new(&[]);

        let resp = h.app().oneshot(get("/history")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = h.app().oneshot(get("/history?buyer=0x12")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_content_id_visible_to_participants_only() {
        let h = Harness::new(&[]);

        let resp = h
            .app()
            .oneshot(post("/buyer/purchase", h.purchase_body(None, json!(0))))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_string();

        let resp = h
            .app()
            .oneshot(get(&format!("/history?buyer={BUYER_ACCOUNT}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list = body_json(resp).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert!(list[0]["listing"]["cid"].is_string());
        assert_eq!(list[0]["listing"]["owner"]["name"], "seller");
        assert_eq!(list[0]["buyer"]["account"], BUYER_ACCOUNT);

        let resp = h
            .app_as(&h.outsider)
            .oneshot(get(&format!("/history/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let item = body_json(resp).await;
        assert!(item["listing"].get("cid").is_none());
        assert_eq!(item["id"], id);
        assert!(item["verifier"].is_null());
    }
}
