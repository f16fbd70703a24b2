use chrono::NaiveDate;

use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

text_enum! {
    PaymentMethod {
        Upi => "UPI",
        Cash => "Cash",
        BankTransfer => "Bank Transfer",
        Cheque => "Cheque",
    }
}

/// One line of an in-kind donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InKindItem {
    pub item: String,
    pub quantity: Decimal,
    pub unit: String,
}

/// Whether a donation was money or goods
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "donation_type", rename_all = "kebab-case")]
pub enum DonationKind {
    Monetary { payment_method: PaymentMethod },
    InKind { items: Vec<InKindItem> },
}

impl DonationKind {
    pub fn is_monetary(&self) -> bool {
        matches!(self, Self::Monetary { .. })
    }

    /// Label used when storing the kind as text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monetary { .. } => "monetary",
            Self::InKind { .. } => "in-kind",
        }
    }
}

/// Stored donation record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Option<Uuid>,
    /// Never negative; in-kind donations without a valuation carry zero
    pub amount: Decimal,
    #[serde(flatten)]
    pub kind: DonationKind,
    pub date: NaiveDate,
}

/// Validated donation to be logged
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub amount: Decimal,
    pub kind: DonationKind,
    pub date: NaiveDate,
}
