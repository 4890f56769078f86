//! Join, leave, and pay on one group order, for one shopper.
//!
//! The controller's participation state is a projection of two backend
//! reads (order summary and participant info). The only local guess it ever
//! makes is the optimistic `ParticipantUnpaid` right after a successful
//! join, and that guess is immediately replaced by a refresh. Payment is
//! never inferred locally: `ParticipantPaid` is only reachable through
//! [`ParticipationController::refresh`].
//!
//! Mutations are single-flight. A `tokio::sync::Mutex<()>` is the
//! "processing" flag: `join`, `leave`, and `pay` take it with `try_lock`
//! and return [`ParticipationError::InProgress`] without sending anything
//! when it is held, while `refresh` waits for it so a refresh can never
//! interleave with an in-flight mutation.

mod error;
mod state;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use panieco_core::{cart_total, validate_cart, CartItem};
use reqwest::Url;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::client::PaniecoClient;
use crate::error::ClientError;

pub use error::{ErrorKind, ParticipationError};
pub use state::{GroupOrderSnapshot, ParticipationState};

type UpdateHook = Box<dyn Fn() + Send + Sync>;

/// Drives one shopper's participation in one group order.
pub struct ParticipationController {
    client: Arc<PaniecoClient>,
    public_id: String,
    free_shipping_min: Decimal,
    snapshot: Mutex<Option<GroupOrderSnapshot>>,
    message: Mutex<Option<String>>,
    processing: tokio::sync::Mutex<()>,
    disposed: AtomicBool,
    on_update: Option<UpdateHook>,
}

impl fmt::Debug for ParticipationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticipationController")
            .field("public_id", &self.public_id)
            .field("free_shipping_min", &self.free_shipping_min)
            .field("snapshot", &self.snapshot())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl ParticipationController {
    /// Creates a controller for `public_id`. Nothing is fetched until the
    /// first [`refresh`](Self::refresh); until then every mutation fails
    /// with [`ParticipationError::NotLoaded`].
    ///
    /// `free_shipping_min` comes from the group-order listing; the public
    /// summary endpoint does not repeat it.
    #[must_use]
    pub fn new(
        client: Arc<PaniecoClient>,
        public_id: impl Into<String>,
        free_shipping_min: Decimal,
    ) -> Self {
        Self {
            client,
            public_id: public_id.into(),
            free_shipping_min,
            snapshot: Mutex::new(None),
            message: Mutex::new(None),
            processing: tokio::sync::Mutex::new(()),
            disposed: AtomicBool::new(false),
            on_update: None,
        }
    }

    /// Registers a hook called after every successful join or leave, once
    /// the follow-up refresh has completed.
    #[must_use]
    pub fn with_update_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    /// Last confirmed view, or `None` before the first successful refresh.
    #[must_use]
    pub fn snapshot(&self) -> Option<GroupOrderSnapshot> {
        lock(&self.snapshot).clone()
    }

    #[must_use]
    pub fn state(&self) -> Option<ParticipationState> {
        lock(&self.snapshot).as_ref().map(|s| s.participation)
    }

    /// User-facing message left by the last failed operation. Cleared by
    /// the next successful one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        lock(&self.message).clone()
    }

    /// `true` while a join, leave, pay, or refresh is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.try_lock().is_err()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Makes the controller inert. Results of requests still in flight are
    /// discarded, and every later call fails with
    /// [`ParticipationError::Disposed`].
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    /// Re-reads the order summary and participant info, and recomputes the
    /// state from them alone.
    ///
    /// # Errors
    ///
    /// [`ParticipationError::RefreshFailed`] when either read fails (the
    /// previous snapshot is kept), or [`ParticipationError::Disposed`].
    pub async fn refresh(&self) -> Result<GroupOrderSnapshot, ParticipationError> {
        self.ensure_live()?;
        let processing = self.processing.lock().await;
        let result = self.refresh_locked().await;
        drop(processing);
        self.settle(&result);
        result
    }

    /// Joins with the current cart. The contributed amount is computed from
    /// `cart` at call time.
    ///
    /// # Errors
    ///
    /// - [`ParticipationError::EmptyCart`] or [`ParticipationError::InvalidCart`]
    ///   before any request.
    /// - [`ParticipationError::InProgress`], [`ParticipationError::NotLoaded`],
    ///   [`ParticipationError::AlreadyParticipating`] before any request.
    /// - [`ParticipationError::JoinFailed`] when the backend rejects the join;
    ///   the state stays `NotParticipating`.
    pub async fn join(&self, cart: &[CartItem]) -> Result<GroupOrderSnapshot, ParticipationError> {
        self.ensure_live()?;
        let Ok(processing) = self.processing.try_lock() else {
            return Err(ParticipationError::InProgress);
        };
        let result = self.join_locked(cart).await;
        drop(processing);
        self.settle(&result);
        if result.is_ok() {
            self.notify();
        }
        result
    }

    /// Leaves the group order.
    ///
    /// # Errors
    ///
    /// - [`ParticipationError::NotParticipating`] or
    ///   [`ParticipationError::UnknownParticipant`] before any request.
    /// - [`ParticipationError::LeaveFailed`] when the backend rejects it;
    ///   the state is unchanged.
    pub async fn leave(&self) -> Result<GroupOrderSnapshot, ParticipationError> {
        self.ensure_live()?;
        let Ok(processing) = self.processing.try_lock() else {
            return Err(ParticipationError::InProgress);
        };
        let result = self.leave_locked().await;
        drop(processing);
        self.settle(&result);
        if result.is_ok() {
            self.notify();
        }
        result
    }

    /// Requests a payment session for the current cart and returns the URL
    /// to redirect the shopper to. The state never changes here; payment
    /// shows up on a later [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// - [`ParticipationError::AlreadyPaid`] on HTTP 409.
    /// - [`ParticipationError::PaymentInitFailed`] on any other failure,
    ///   including a response without a URL.
    pub async fn pay(&self, cart: &[CartItem]) -> Result<Url, ParticipationError> {
        self.ensure_live()?;
        let Ok(processing) = self.processing.try_lock() else {
            return Err(ParticipationError::InProgress);
        };
        let result = self.pay_locked(cart).await;
        drop(processing);
        self.settle(&result);
        result
    }

    async fn refresh_locked(&self) -> Result<GroupOrderSnapshot, ParticipationError> {
        let (summary, info) = tokio::try_join!(
            self.client.group_order(&self.public_id),
            self.client.participant_info(&self.public_id),
        )
        .map_err(ParticipationError::RefreshFailed)?;
        self.ensure_live_after("refresh")?;

        let snapshot = GroupOrderSnapshot {
            public_id: summary.public_id,
            total_amount: summary.total_amount,
            free_shipping_min: self.free_shipping_min,
            status: summary.status,
            participation: ParticipationState::from_info(&info),
        };
        *lock(&self.snapshot) = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn join_locked(&self, cart: &[CartItem]) -> Result<GroupOrderSnapshot, ParticipationError> {
        validate_cart(cart)?;
        let amount = cart_total(cart)?;
        if self.current_state()?.is_participating() {
            return Err(ParticipationError::AlreadyParticipating);
        }

        let created = self
            .client
            .join_group_order(&self.public_id, amount, cart)
            .await
            .map_err(ParticipationError::JoinFailed)?;
        self.ensure_live_after("join")?;

        let participant_id = created_participant_id(&created);
        tracing::info!(
            public_id = %self.public_id,
            ?participant_id,
            %amount,
            "joined group order"
        );
        self.set_participation(ParticipationState::ParticipantUnpaid { participant_id });
        self.refresh_after("join").await
    }

    async fn leave_locked(&self) -> Result<GroupOrderSnapshot, ParticipationError> {
        let state = self.current_state()?;
        if !state.is_participating() {
            return Err(ParticipationError::NotParticipating);
        }
        let participant_id = state
            .participant_id()
            .ok_or(ParticipationError::UnknownParticipant)?;

        self.client
            .leave_group_order(&self.public_id, participant_id)
            .await
            .map_err(ParticipationError::LeaveFailed)?;
        self.ensure_live_after("leave")?;

        tracing::info!(public_id = %self.public_id, participant_id, "left group order");
        self.set_participation(ParticipationState::NotParticipating);
        self.refresh_after("leave").await
    }

    async fn pay_locked(&self, cart: &[CartItem]) -> Result<Url, ParticipationError> {
        validate_cart(cart)?;
        if !self.current_state()?.is_participating() {
            return Err(ParticipationError::NotParticipating);
        }

        let url = self
            .client
            .start_checkout(&self.public_id, cart)
            .await
            .map_err(|e| match e {
                ClientError::Conflict { .. } => ParticipationError::AlreadyPaid(e),
                other => ParticipationError::PaymentInitFailed(other),
            })?;
        self.ensure_live_after("pay")?;

        tracing::info!(public_id = %self.public_id, "checkout session started");
        Ok(url)
    }

    /// Follow-up read after a successful mutation. A failed read keeps the
    /// post-mutation state rather than failing an operation the backend
    /// already acknowledged.
    async fn refresh_after(&self, op: &str) -> Result<GroupOrderSnapshot, ParticipationError> {
        match self.refresh_locked().await {
            Ok(snapshot) => Ok(snapshot),
            Err(ParticipationError::Disposed) => Err(ParticipationError::Disposed),
            Err(e) => {
                tracing::warn!(
                    public_id = %self.public_id,
                    op,
                    error = %e,
                    "refresh after mutation failed, keeping local state"
                );
                self.snapshot().ok_or(ParticipationError::NotLoaded)
            }
        }
    }

    fn current_state(&self) -> Result<ParticipationState, ParticipationError> {
        self.state().ok_or(ParticipationError::NotLoaded)
    }

    fn set_participation(&self, participation: ParticipationState) {
        if let Some(snapshot) = lock(&self.snapshot).as_mut() {
            snapshot.participation = participation;
        }
    }

    fn ensure_live(&self) -> Result<(), ParticipationError> {
        if self.is_disposed() {
            return Err(ParticipationError::Disposed);
        }
        Ok(())
    }

    fn ensure_live_after(&self, op: &str) -> Result<(), ParticipationError> {
        if self.is_disposed() {
            tracing::warn!(public_id = %self.public_id, op, "discarding result for disposed controller");
            return Err(ParticipationError::Disposed);
        }
        Ok(())
    }

    /// Records the outcome for [`message`](Self::message). Dropped and
    /// discarded calls leave the previous message alone.
    fn settle<T>(&self, result: &Result<T, ParticipationError>) {
        match result {
            Ok(_) => *lock(&self.message) = None,
            Err(ParticipationError::InProgress | ParticipationError::Disposed) => {}
            Err(e) => *lock(&self.message) = Some(e.user_message()),
        }
    }

    fn notify(&self) {
        if let Some(hook) = &self.on_update {
            hook();
        }
    }
}

/// Opens a new group order at a pickup point with the shopper's cart and
/// returns its public id.
///
/// # Errors
///
/// [`ParticipationError::EmptyCart`] or [`ParticipationError::InvalidCart`]
/// before any request; [`ParticipationError::CreateFailed`] when the backend
/// rejects the creation.
pub async fn create_group_order(
    client: &PaniecoClient,
    pickup_point_id: &str,
    cart: &[CartItem],
) -> Result<String, ParticipationError> {
    validate_cart(cart)?;
    let amount = cart_total(cart)?;
    let public_id = client
        .create_group_order(pickup_point_id, amount, cart)
        .await
        .map_err(ParticipationError::CreateFailed)?;
    tracing::info!(pickup_point_id, %public_id, %amount, "created group order");
    Ok(public_id)
}

/// Pulls the participant id out of the join response, which the backend
/// sends either flat or wrapped in `participant`.
fn created_participant_id(created: &Value) -> Option<i64> {
    let as_id = |v: &Value| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    };
    created
        .get("participant_id")
        .and_then(as_id)
        .or_else(|| created.get("id").and_then(as_id))
        .or_else(|| {
            created
                .get("participant")
                .and_then(|p| p.get("id"))
                .and_then(as_id)
        })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
