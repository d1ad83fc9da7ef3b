//! Per-request saga scratchpad (C2).
//!
//! Tracks which forward steps have produced rollback-able artifacts. Lives
//! for the duration of one `completeCheckout` invocation; there is no
//! persistence (spec §3 Non-goals: durable saga state).

/// Which compensating actions are owed, given a [`SagaState`]'s artifacts
/// (spec I2: compensation completeness).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompensationPlan {
    pub release_reservation: Option<&'static str>,
    pub refund_payment: bool,
}

/// The triple `(reservationId?, paymentId?, orderId?)`. Each field is set
/// exactly once on the success of its step (spec I1: monotone progress).
#[derive(Debug, Clone, Default)]
pub struct SagaState {
    reservation_id: Option<String>,
    payment_id: Option<String>,
    order_id: Option<String>,
    order_number: Option<String>,
}

impl SagaState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful inventory reservation.
    ///
    /// # Panics
    ///
    /// Panics if a reservation was already recorded (I1 violation — would
    /// indicate a saga engine bug, not a runtime condition).
    pub fn mark_reserved(&mut self, reservation_id: String) {
        assert!(
            self.reservation_id.is_none(),
            "reservation recorded twice in one saga"
        );
        self.reservation_id = Some(reservation_id);
    }

    /// Record a successful payment.
    ///
    /// # Panics
    ///
    /// Panics if a payment was already recorded, or if no reservation
    /// precedes it (I1: monotone progress order).
    pub fn mark_paid(&mut self, payment_id: String) {
        assert!(self.reservation_id.is_some(), "payment recorded before reservation");
        assert!(self.payment_id.is_none(), "payment recorded twice in one saga");
        self.payment_id = Some(payment_id);
    }

    /// Record a successfully created order.
    ///
    /// # Panics
    ///
    /// Panics if an order was already recorded, or if no payment precedes
    /// it (I1: monotone progress order).
    pub fn mark_order_created(&mut self, order_id: String, order_number: String) {
        assert!(self.payment_id.is_some(), "order recorded before payment");
        assert!(self.order_id.is_none(), "order recorded twice in one saga");
        self.order_id = Some(order_id);
        self.order_number = Some(order_number);
    }

    #[must_use]
    pub fn reservation_id(&self) -> Option<&str> {
        self.reservation_id.as_deref()
    }

    #[must_use]
    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }

    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    #[must_use]
    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    /// Which compensations are owed if the saga fails right now (I2: every
    /// non-null artifact triggers its inverse, except a payment is
    /// refunded only when no order has been created).
    #[must_use]
    pub fn compensation_plan(&self) -> CompensationPlan {
        CompensationPlan {
            release_reservation: if self.reservation_id.is_some() && self.order_id.is_none() {
                Some("release")
            } else {
                None
            },
            refund_payment: self.payment_id.is_some() && self.order_id.is_none(),
        }
    }
}
