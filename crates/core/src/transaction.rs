//! Transaction model and builder.
//!
//! [`build_transaction`] turns a [`NewTransaction`] request into a
//! [`TransactionDraft`] ready to be persisted. Validation is fail-fast in a
//! fixed order:
//!
//! 1. customer name present
//! 2. at least one session booking (plus catalog/quantity/duplicate checks)
//! 3. every slot still available
//! 4. down payment within `[MIN_DOWN_PAYMENT, total_price)`
//! 5. cash tendered covers the amount due
//!
//! Prices always come from the catalog, never from the request.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::{BookedSlots, SlotDate, SlotKey};
use crate::calendar::StudioCalendar;
use crate::catalog::CatalogSnapshot;
use crate::error::CoreError;
use crate::ledger::PaymentState;
use crate::types::{DbId, Rupiah, Timestamp};

/// Smallest accepted down payment.
pub const MIN_DOWN_PAYMENT: Rupiah = 50_000;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Whether the transaction has been paid in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Lunas")]
    Lunas,
    #[serde(rename = "Belum Lunas")]
    BelumLunas,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Lunas => "Lunas",
            PaymentStatus::BelumLunas => "Belum Lunas",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Lunas" => Ok(PaymentStatus::Lunas),
            "Belum Lunas" => Ok(PaymentStatus::BelumLunas),
            other => Err(CoreError::validation(
                "payment_status",
                format!("unknown payment status '{other}'"),
            )),
        }
    }
}

/// Operational label for the physical studio session.
///
/// Any status may follow any other; this is not a workflow guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudioStatus {
    Booked,
    #[serde(rename = "On Progress")]
    OnProgress,
    Selesai,
}

impl StudioStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudioStatus::Booked => "Booked",
            StudioStatus::OnProgress => "On Progress",
            StudioStatus::Selesai => "Selesai",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Booked" => Ok(StudioStatus::Booked),
            "On Progress" => Ok(StudioStatus::OnProgress),
            "Selesai" => Ok(StudioStatus::Selesai),
            other => Err(CoreError::validation(
                "studio_status",
                format!("unknown studio status '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Qris,
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Qris => "qris",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "qris" => Ok(PaymentMethod::Qris),
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(CoreError::validation(
                "payment_method",
                format!("unknown payment method '{other}'"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted shape
// ---------------------------------------------------------------------------

/// One booked slot of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBooking {
    pub session_id: DbId,
    pub date: NaiveDate,
}

/// One add-on line of a transaction. `unit_price` is captured at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnLineItem {
    pub add_on_id: DbId,
    pub quantity: i32,
    pub unit_price: Rupiah,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub user_id: DbId,
    pub customer_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub total_price: Rupiah,
    pub amount_paid: Rupiah,
    pub amount_remaining: Rupiah,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub studio_status: StudioStatus,
    pub session_bookings: Vec<SessionBooking>,
    pub add_on_items: Vec<AddOnLineItem>,
}

impl Transaction {
    pub fn payment_state(&self) -> PaymentState {
        PaymentState {
            amount_paid: self.amount_paid,
            amount_remaining: self.amount_remaining,
            payment_status: self.payment_status,
        }
    }
}

/// A validated, priced transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub user_id: DbId,
    pub customer_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub total_price: Rupiah,
    pub payment: PaymentState,
    pub payment_method: PaymentMethod,
    pub studio_status: StudioStatus,
    pub session_bookings: Vec<SessionBooking>,
    pub add_on_items: Vec<AddOnLineItem>,
}

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub session_id: DbId,
    pub date: SlotDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOnRequest {
    pub add_on_id: DbId,
    pub quantity: i32,
}

/// How much of the total is collected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentPlan {
    Full,
    DownPayment { amount: Rupiah },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub bookings: Vec<BookingRequest>,
    #[serde(default)]
    pub add_ons: Vec<AddOnRequest>,
    pub payment_plan: PaymentPlan,
    pub payment_method: PaymentMethod,
    /// Cash handed over by the customer. Required for cash payments.
    #[serde(default)]
    pub cash_tendered: Option<Rupiah>,
}

impl NewTransaction {
    /// Distinct calendar days touched by the requested bookings.
    pub fn booking_dates(&self, calendar: &StudioCalendar) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .bookings
            .iter()
            .map(|b| b.date.to_date(calendar))
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

/// Builder output: the draft plus change owed to a cash customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub draft: TransactionDraft,
    pub change_due: Option<Rupiah>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Validate and price a transaction request.
///
/// `booked` must contain every slot already taken on the request's booking
/// dates (see [`NewTransaction::booking_dates`]).
pub fn build_transaction(
    user_id: DbId,
    request: &NewTransaction,
    catalog: &CatalogSnapshot,
    booked: &BookedSlots,
    calendar: &StudioCalendar,
) -> Result<BuiltTransaction, CoreError> {
    // 1. Customer.
    let customer_name = request.customer_name.trim();
    if customer_name.is_empty() {
        return Err(CoreError::validation(
            "customer_name",
            "customer name must not be empty",
        ));
    }

    // 2. Sessions, resolved against the catalog.
    if request.bookings.is_empty() {
        return Err(CoreError::validation(
            "bookings",
            "at least one session must be booked",
        ));
    }

    let mut seen = HashSet::with_capacity(request.bookings.len());
    let mut session_bookings = Vec::with_capacity(request.bookings.len());
    let mut total_price: Rupiah = 0;

    for booking in &request.bookings {
        let session = catalog.session(booking.session_id).ok_or_else(|| {
            CoreError::validation(
                "bookings",
                format!("session {} does not exist", booking.session_id),
            )
        })?;
        let date = booking.date.to_date(calendar);
        if !seen.insert(SlotKey {
            session_id: session.id,
            date,
        }) {
            return Err(CoreError::validation(
                "bookings",
                format!("session {} on {date} is listed twice", session.id),
            ));
        }
        total_price = checked_add(total_price, session.price)?;
        session_bookings.push(SessionBooking {
            session_id: session.id,
            date,
        });
    }

    let mut add_on_items = Vec::with_capacity(request.add_ons.len());
    for item in &request.add_ons {
        let add_on = catalog.add_on(item.add_on_id).ok_or_else(|| {
            CoreError::validation(
                "add_ons",
                format!("add-on {} does not exist", item.add_on_id),
            )
        })?;
        if item.quantity < 1 {
            return Err(CoreError::validation(
                "add_ons",
                format!("quantity for add-on {} must be at least 1", add_on.id),
            ));
        }
        let line_total = add_on
            .price
            .checked_mul(Rupiah::from(item.quantity))
            .ok_or_else(out_of_range)?;
        total_price = checked_add(total_price, line_total)?;
        add_on_items.push(AddOnLineItem {
            add_on_id: add_on.id,
            quantity: item.quantity,
            unit_price: add_on.price,
        });
    }

    // 3. Slots.
    if let Some(taken) = session_bookings
        .iter()
        .find(|b| !booked.is_available(b.session_id, b.date))
    {
        return Err(CoreError::SlotConflict {
            session_id: taken.session_id,
            date: taken.date,
        });
    }

    // 4. Payment plan.
    let amount_due = match request.payment_plan {
        PaymentPlan::Full => total_price,
        PaymentPlan::DownPayment { amount } => {
            if amount < MIN_DOWN_PAYMENT {
                return Err(CoreError::validation(
                    "payment_plan",
                    format!("down payment must be at least {MIN_DOWN_PAYMENT}"),
                ));
            }
            if amount >= total_price {
                return Err(CoreError::validation(
                    "payment_plan",
                    format!("down payment must be less than the total price {total_price}"),
                ));
            }
            amount
        }
    };

    // 5. Cash.
    let change_due = match request.payment_method {
        PaymentMethod::Cash => {
            let tendered = request.cash_tendered.ok_or_else(|| {
                CoreError::validation("cash_tendered", "cash tendered is required for cash payments")
            })?;
            if tendered < amount_due {
                return Err(CoreError::validation(
                    "cash_tendered",
                    format!("cash tendered {tendered} is less than the amount due {amount_due}"),
                ));
            }
            Some(tendered - amount_due)
        }
        PaymentMethod::Qris | PaymentMethod::Transfer => None,
    };

    let draft = TransactionDraft {
        user_id,
        customer_name: customer_name.to_string(),
        phone: non_blank(request.phone.as_deref()),
        notes: non_blank(request.notes.as_deref()),
        total_price,
        payment: PaymentState::compute(total_price, amount_due),
        payment_method: request.payment_method,
        studio_status: StudioStatus::Booked,
        session_bookings,
        add_on_items,
    };

    Ok(BuiltTransaction { draft, change_due })
}

fn checked_add(a: Rupiah, b: Rupiah) -> Result<Rupiah, CoreError> {
    a.checked_add(b).ok_or_else(out_of_range)
}

fn out_of_range() -> CoreError {
    CoreError::validation("add_ons", "total price is out of range")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
