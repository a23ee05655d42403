//! Invoice, expense and customer records.
//!
//! # Responsibility
//! - Define the three record shapes stored in a [`crate::Snapshot`].
//! - Turn raw form input (drafts) into records, rejecting what would poison
//!   aggregates later.
//!
//! # Invariants
//! - Every record carries a stable `RecordId` assigned at creation.
//! - `Amount` is always finite; NaN never reaches a sum.
//! - Records are immutable once stored; they are only appended or removed.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned to every record at creation time.
pub type RecordId = Uuid;

/// Customer name recorded on invoices submitted without one.
pub const GENERAL_CUSTOMER: &str = "عميل عام";

/// Ingestion error for draft records.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    /// A required text field was empty or whitespace only.
    EmptyField(&'static str),
    /// Amount text is not a number.
    InvalidAmount(String),
    /// Amount parsed to NaN or infinity.
    NonFiniteAmount,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` is required"),
            Self::InvalidAmount(text) => write!(f, "amount `{text}` is not a number"),
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
        }
    }
}

impl Error for RecordValidationError {}

/// Monetary amount as entered by the user.
///
/// Plain `f64`: no currency scaling or rounding is applied. Negative values
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    /// Wraps `value`, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self, RecordValidationError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(RecordValidationError::NonFiniteAmount)
        }
    }

    /// Parses free-form amount text such as `"120"`, `" 99.5 "` or `"1e3"`.
    pub fn parse(text: &str) -> Result<Self, RecordValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyField("amount"));
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| RecordValidationError::InvalidAmount(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = RecordValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

/// Older snapshots kept amounts as form text, so both shapes are read.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match StoredAmount::deserialize(deserializer)? {
            StoredAmount::Number(value) => Amount::new(value).map_err(de::Error::custom),
            StoredAmount::Text(text) => Amount::parse(&text).map_err(de::Error::custom),
        }
    }
}

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            other => Err(format!(
                "unsupported invoice status `{other}`; expected paid|pending"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default = "Uuid::new_v4")]
    pub id: RecordId,
    /// Customer name; not a foreign key, may dangle after customer removal.
    pub customer: String,
    pub amount: Amount,
    /// Calendar date as entered, normally `YYYY-MM-DD`.
    pub date: String,
    pub status: InvoiceStatus,
}

/// Unvalidated invoice form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub customer: String,
    pub amount: String,
    pub date: String,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Validates `draft` and assigns a fresh id.
    ///
    /// An empty customer becomes [`GENERAL_CUSTOMER`].
    pub fn from_draft(draft: InvoiceDraft) -> Result<Self, RecordValidationError> {
        let amount = Amount::parse(&draft.amount)?;
        let date = required("date", draft.date)?;
        let customer = match draft.customer.trim() {
            "" => GENERAL_CUSTOMER.to_string(),
            name => name.to_string(),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            customer,
            amount,
            date,
            status: draft.status,
        })
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default = "Uuid::new_v4")]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub amount: Amount,
    pub date: String,
}

/// Unvalidated expense form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub category: String,
    pub amount: String,
    pub date: String,
}

impl Expense {
    pub fn from_draft(draft: ExpenseDraft) -> Result<Self, RecordValidationError> {
        let title = required("title", draft.title)?;
        let amount = Amount::parse(&draft.amount)?;
        let date = required("date", draft.date)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            category: draft.category.trim().to_string(),
            amount,
            date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default = "Uuid::new_v4")]
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
}

/// Unvalidated customer form input; blank contact fields mean "not given".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Customer {
    pub fn from_draft(draft: CustomerDraft) -> Result<Self, RecordValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required("name", draft.name)?,
            phone: non_blank(draft.phone),
            email: non_blank(draft.email),
        })
    }
}

/// Named record collection inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Invoices,
    Expenses,
    Customers,
}

impl Collection {
    pub const ALL: [Self; 3] = [Self::Invoices, Self::Expenses, Self::Customers];

    /// Name used as the legacy per-collection storage slot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoices => "invoices",
            Self::Expenses => "expenses",
            Self::Customers => "customers",
        }
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "invoices" => Ok(Self::Invoices),
            "expenses" => Ok(Self::Expenses),
            "customers" => Ok(Self::Customers),
            other => Err(format!(
                "unknown collection `{other}`; expected invoices|expenses|customers"
            )),
        }
    }
}

/// Any one stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Record {
    Invoice(Invoice),
    Expense(Expense),
    Customer(Customer),
}

impl Record {
    pub fn id(&self) -> RecordId {
        match self {
            Self::Invoice(invoice) => invoice.id,
            Self::Expense(expense) => expense.id,
            Self::Customer(customer) => customer.id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Self::Invoice(_) => Collection::Invoices,
            Self::Expense(_) => Collection::Expenses,
            Self::Customer(_) => Collection::Customers,
        }
    }
}

fn required(field: &'static str, value: String) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(non_blank))
}

#[cfg(test)]
mod tests {
    use super::{
        Amount, Collection, Customer, CustomerDraft, Expense, ExpenseDraft, Invoice,
        InvoiceDraft, InvoiceStatus, RecordValidationError, GENERAL_CUSTOMER,
    };

    fn invoice_draft(customer: &str, amount: &str) -> InvoiceDraft {
        InvoiceDraft {
            customer: customer.to_string(),
            amount: amount.to_string(),
            date: "2025-03-14".to_string(),
            status: InvoiceStatus::Paid,
        }
    }

    #[test]
    fn amount_parse_accepts_trimmed_and_exponent_forms() {
        assert_eq!(Amount::parse(" 99.5 ").unwrap().value(), 99.5);
        assert_eq!(Amount::parse("1e3").unwrap().value(), 1000.0);
        assert_eq!(Amount::parse("-20").unwrap().value(), -20.0);
    }

    #[test]
    fn amount_parse_rejects_text_and_non_finite_values() {
        assert_eq!(
            Amount::parse("abc").unwrap_err(),
            RecordValidationError::InvalidAmount("abc".to_string())
        );
        assert_eq!(
            Amount::parse("NaN").unwrap_err(),
            RecordValidationError::NonFiniteAmount
        );
        assert_eq!(
            Amount::parse("inf").unwrap_err(),
            RecordValidationError::NonFiniteAmount
        );
        assert_eq!(
            Amount::parse("  ").unwrap_err(),
            RecordValidationError::EmptyField("amount")
        );
    }

    #[test]
    fn amount_reads_number_and_numeric_text() {
        let from_number: Amount = serde_json::from_str("150").unwrap();
        let from_text: Amount = serde_json::from_str("\"150\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<Amount>("\"twelve\"").is_err());
    }

    #[test]
    fn invoice_draft_without_customer_uses_general_customer() {
        let invoice = Invoice::from_draft(invoice_draft("   ", "10")).unwrap();
        assert_eq!(invoice.customer, GENERAL_CUSTOMER);
        assert!(!invoice.id.is_nil());
    }

    #[test]
    fn invoice_draft_requires_date() {
        let mut draft = invoice_draft("Acme", "10");
        draft.date = String::new();
        assert_eq!(
            Invoice::from_draft(draft).unwrap_err(),
            RecordValidationError::EmptyField("date")
        );
    }

    #[test]
    fn expense_draft_requires_title() {
        let draft = ExpenseDraft {
            title: " ".to_string(),
            category: "rent".to_string(),
            amount: "500".to_string(),
            date: "2025-01-01".to_string(),
        };
        assert_eq!(
            Expense::from_draft(draft).unwrap_err(),
            RecordValidationError::EmptyField("title")
        );
    }

    #[test]
    fn customer_blank_contact_fields_become_none() {
        let customer = Customer::from_draft(CustomerDraft {
            name: "Salem".to_string(),
            phone: "  ".to_string(),
            email: "salem@example.com".to_string(),
        })
        .unwrap();
        assert_eq!(customer.phone, None);
        assert_eq!(customer.email.as_deref(), Some("salem@example.com"));

        let legacy: Customer =
            serde_json::from_str(r#"{"name":"Huda","phone":"","email":""}"#).unwrap();
        assert_eq!(legacy.phone, None);
        assert_eq!(legacy.email, None);
        assert!(!legacy.id.is_nil());
    }

    #[test]
    fn invoice_wire_shape_uses_lowercase_status() {
        let invoice = Invoice::from_draft(invoice_draft("Acme", "250")).unwrap();
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["status"], "paid");
        assert_eq!(json["amount"], 250.0);
        assert_eq!(json["id"], invoice.id.to_string());
    }

    #[test]
    fn collection_and_status_parse_from_names() {
        assert_eq!("expenses".parse::<Collection>(), Ok(Collection::Expenses));
        assert!("payments".parse::<Collection>().is_err());
        assert_eq!(" Pending ".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Pending));
    }
}
