//! Field-scoped substring filter used by the invoice and expense tables.

use crate::model::record::{Customer, Expense, Invoice};

/// Record type whose text fields can be searched.
pub trait TextSearchable {
    type Field: Copy;

    fn field_text(&self, field: Self::Field) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceField {
    Customer,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Title,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Phone,
    Email,
}

impl TextSearchable for Invoice {
    type Field = InvoiceField;

    fn field_text(&self, field: InvoiceField) -> &str {
        match field {
            InvoiceField::Customer => &self.customer,
            InvoiceField::Date => &self.date,
        }
    }
}

impl TextSearchable for Expense {
    type Field = ExpenseField;

    fn field_text(&self, field: ExpenseField) -> &str {
        match field {
            ExpenseField::Title => &self.title,
            ExpenseField::Category => &self.category,
        }
    }
}

impl TextSearchable for Customer {
    type Field = CustomerField;

    fn field_text(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::Phone => self.phone.as_deref().unwrap_or_default(),
            CustomerField::Email => self.email.as_deref().unwrap_or_default(),
        }
    }
}

/// Records whose `field` contains `needle`, in their original order.
///
/// The empty needle returns every record. No case folding or trimming is
/// applied to either side.
pub fn filter_by_text<'a, T: TextSearchable>(
    records: &'a [T],
    field: T::Field,
    needle: &str,
) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| record.field_text(field).contains(needle))
        .collect()
}

/// Like [`filter_by_text`] but keeps each record's position in `records`,
/// so callers can address a filtered row for deletion.
pub fn filter_by_text_indexed<'a, T: TextSearchable>(
    records: &'a [T],
    field: T::Field,
    needle: &str,
) -> Vec<(usize, &'a T)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.field_text(field).contains(needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        filter_by_text, filter_by_text_indexed, CustomerField, ExpenseField, InvoiceField,
    };
    use crate::model::record::{
        Customer, CustomerDraft, Expense, ExpenseDraft, Invoice, InvoiceDraft, InvoiceStatus,
    };

    fn invoices(customers: &[&str]) -> Vec<Invoice> {
        customers
            .iter()
            .map(|customer| {
                Invoice::from_draft(InvoiceDraft {
                    customer: customer.to_string(),
                    amount: "10".to_string(),
                    date: "2025-04-01".to_string(),
                    status: InvoiceStatus::Paid,
                })
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn empty_needle_returns_everything_in_order() {
        let records = invoices(&["Acme", "Globex", "Initech"]);
        let hits = filter_by_text(&records, InvoiceField::Customer, "");
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[2].customer, "Initech");
    }

    #[test]
    fn matching_is_case_sensitive_substring() {
        let records = invoices(&["Acme Corp", "acme labs", "Globex"]);
        let hits = filter_by_text(&records, InvoiceField::Customer, "Acme");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer, "Acme Corp");
    }

    #[test]
    fn indexed_filter_reports_original_positions() {
        let records = invoices(&["Nour", "Salem", "Nour Trading"]);
        let hits = filter_by_text_indexed(&records, InvoiceField::Customer, "Nour");
        let positions: Vec<usize> = hits.iter().map(|(index, _)| *index).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn expense_title_and_category_are_searchable() {
        let records = vec![Expense::from_draft(ExpenseDraft {
            title: "Office rent".to_string(),
            category: "إيجار".to_string(),
            amount: "700".to_string(),
            date: "2025-04-01".to_string(),
        })
        .unwrap()];

        assert_eq!(filter_by_text(&records, ExpenseField::Title, "rent").len(), 1);
        assert_eq!(filter_by_text(&records, ExpenseField::Category, "إيجار").len(), 1);
        assert!(filter_by_text(&records, ExpenseField::Title, "Rent").is_empty());
    }

    #[test]
    fn missing_customer_contact_matches_only_empty_needle() {
        let records = vec![Customer::from_draft(CustomerDraft {
            name: "Huda".to_string(),
            ..CustomerDraft::default()
        })
        .unwrap()];

        assert_eq!(filter_by_text(&records, CustomerField::Phone, "").len(), 1);
        assert!(filter_by_text(&records, CustomerField::Phone, "77").is_empty());
    }
}
