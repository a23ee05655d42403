//! Subcommand handlers. Each one reads or mutates the store, then prints.

use crate::format::{format_amount, format_number, status_label, truncate};
use crate::{CustomerCommand, DeleteArgs, ExpenseCommand, InvoiceCommand, ListArgs, SettingsCommand};
use anyhow::{Context, Result};
use log::info;
use smart_accountant_core::{
    filter_by_text_indexed, Collection, CustomerDraft, CustomerField, DerivedViews, ExpenseDraft,
    ExpenseField, InvoiceDraft, InvoiceField, KeyValueRepository, MarginTone, Record,
    RecordStore,
};
use std::io::{self, BufRead, Write};

pub fn cmd_dashboard<R: KeyValueRepository>(store: &RecordStore<R>, json: bool) -> Result<()> {
    let views = store.views();
    if json {
        println!("{}", serde_json::to_string_pretty(views)?);
        return Ok(());
    }

    println!("{}", views.company_name);
    println!("{}\n", "=".repeat(views.company_name.chars().count().max(8)));
    println!("Revenue:     {}", format_amount(views.total_revenue, &views.currency));
    println!("Expenses:    {}", format_amount(views.total_expenses, &views.currency));
    println!("Net profit:  {}", format_amount(views.net_profit, &views.currency));

    println!("\nRecent transactions");
    if views.recent.is_empty() {
        println!("  (none)");
    }
    for item in &views.recent {
        println!(
            "  {:<24} {:<12} +{}",
            truncate(&item.customer, 24),
            item.date,
            format_amount(item.amount, &views.currency)
        );
    }
    Ok(())
}

pub fn cmd_invoice<R: KeyValueRepository>(
    store: &mut RecordStore<R>,
    command: InvoiceCommand,
) -> Result<()> {
    match command {
        InvoiceCommand::Add {
            customer,
            amount,
            date,
            status,
        } => {
            let id = store.add_invoice(InvoiceDraft {
                customer,
                amount,
                date: date.unwrap_or_else(today),
                status,
            })?;
            info!("event=cli_command module=cli status=ok command=invoice_add");
            println!("Invoice recorded ({id}).");
            Ok(())
        }
        InvoiceCommand::List(args) => list_invoices(store, &args),
        InvoiceCommand::Delete(args) => delete_record(store, Collection::Invoices, &args),
    }
}

pub fn cmd_expense<R: KeyValueRepository>(
    store: &mut RecordStore<R>,
    command: ExpenseCommand,
) -> Result<()> {
    match command {
        ExpenseCommand::Add {
            title,
            category,
            amount,
            date,
        } => {
            let id = store.add_expense(ExpenseDraft {
                title,
                category,
                amount,
                date: date.unwrap_or_else(today),
            })?;
            info!("event=cli_command module=cli status=ok command=expense_add");
            println!("Expense recorded ({id}).");
            Ok(())
        }
        ExpenseCommand::List(args) => list_expenses(store, &args),
        ExpenseCommand::Delete(args) => delete_record(store, Collection::Expenses, &args),
    }
}

pub fn cmd_customer<R: KeyValueRepository>(
    store: &mut RecordStore<R>,
    command: CustomerCommand,
) -> Result<()> {
    match command {
        CustomerCommand::Add { name, phone, email } => {
            let id = store.add_customer(CustomerDraft { name, phone, email })?;
            info!("event=cli_command module=cli status=ok command=customer_add");
            println!("Customer added ({id}).");
            Ok(())
        }
        CustomerCommand::List(args) => list_customers(store, &args),
        CustomerCommand::Delete(args) => delete_record(store, Collection::Customers, &args),
    }
}

pub fn cmd_report<R: KeyValueRepository>(store: &RecordStore<R>, json: bool) -> Result<()> {
    let views = store.views();
    if json {
        let report = serde_json::json!({
            "counts": views.counts,
            "profit_margin": views.profit_margin,
            "margin_tone": views.margin_tone,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Invoices:       {}", views.counts.total);
    println!("  paid:         {}", views.counts.paid);
    println!("  pending:      {}", views.counts.pending);
    println!("Profit margin:  {}", margin_line(views));
    Ok(())
}

pub fn cmd_chart<R: KeyValueRepository>(store: &RecordStore<R>) -> Result<()> {
    const BAR_WIDTH: f64 = 40.0;

    let views = store.views();
    let chart = &views.revenue_chart;
    let peak = chart.data.iter().copied().fold(0.0_f64, f64::max);

    println!("Paid revenue, {}", chart.year);
    for (label, value) in chart.labels.iter().zip(&chart.data) {
        let bar_len = if peak > 0.0 {
            (value / peak * BAR_WIDTH).round().max(0.0) as usize
        } else {
            0
        };
        println!(
            "{label:>10} | {:<40} {}",
            "#".repeat(bar_len),
            format_number(*value)
        );
    }
    Ok(())
}

pub fn cmd_settings<R: KeyValueRepository>(
    store: &mut RecordStore<R>,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let settings = &store.snapshot().settings;
            println!("Company:   {}", settings.company_name);
            println!("Currency:  {}", settings.currency);
        }
        SettingsCommand::Set { company, currency } => {
            store.update_settings(company, currency)?;
            let settings = &store.snapshot().settings;
            println!(
                "Settings saved: {} ({})",
                settings.company_name, settings.currency
            );
        }
    }
    Ok(())
}

pub fn cmd_reset<R: KeyValueRepository>(store: &mut RecordStore<R>, yes: bool) -> Result<()> {
    if !confirm("This deletes ALL invoices, expenses, customers and settings.", yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    store.reset().context("Failed to reset records")?;
    info!("event=cli_command module=cli status=ok command=reset");
    println!("All data cleared.");
    Ok(())
}

fn list_invoices<R: KeyValueRepository>(store: &RecordStore<R>, args: &ListArgs) -> Result<()> {
    let snapshot = store.snapshot();
    let rows = filter_by_text_indexed(&snapshot.invoices, InvoiceField::Customer, &args.search);
    if args.json {
        let items: Vec<_> = rows.iter().map(|(_, invoice)| invoice).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No invoices.");
        return Ok(());
    }

    let currency = &snapshot.settings.currency;
    for (index, invoice) in rows {
        println!(
            "#{:<4} {:<24} {:<12} {:>16}  {}",
            index + 1,
            truncate(&invoice.customer, 24),
            invoice.date,
            format_amount(invoice.amount.value(), currency),
            status_label(invoice.is_paid())
        );
    }
    Ok(())
}

fn list_expenses<R: KeyValueRepository>(store: &RecordStore<R>, args: &ListArgs) -> Result<()> {
    let snapshot = store.snapshot();
    let rows = filter_by_text_indexed(&snapshot.expenses, ExpenseField::Title, &args.search);
    if args.json {
        let items: Vec<_> = rows.iter().map(|(_, expense)| expense).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No expenses.");
        return Ok(());
    }

    let currency = &snapshot.settings.currency;
    for (index, expense) in rows {
        println!(
            "#{:<4} {:<24} {:<14} {:<12} {:>16}",
            index + 1,
            truncate(&expense.title, 24),
            truncate(&expense.category, 14),
            expense.date,
            format_amount(expense.amount.value(), currency)
        );
    }
    Ok(())
}

fn list_customers<R: KeyValueRepository>(store: &RecordStore<R>, args: &ListArgs) -> Result<()> {
    let snapshot = store.snapshot();
    let rows = filter_by_text_indexed(&snapshot.customers, CustomerField::Name, &args.search);
    if args.json {
        let items: Vec<_> = rows.iter().map(|(_, customer)| customer).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No customers.");
        return Ok(());
    }

    for (index, customer) in rows {
        println!(
            "#{:<4} {:<24} {:<16} {}",
            index + 1,
            truncate(&customer.name, 24),
            customer.phone.as_deref().unwrap_or("-"),
            customer.email.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn delete_record<R: KeyValueRepository>(
    store: &mut RecordStore<R>,
    collection: Collection,
    args: &DeleteArgs,
) -> Result<()> {
    let target = match (args.id, args.row) {
        (Some(id), _) => id.to_string(),
        (None, Some(row)) => format!("row #{row}"),
        (None, None) => anyhow::bail!("Pass a row number or --id"),
    };
    if !confirm(
        &format!("Delete {target} from {}?", collection.as_str()),
        args.yes,
    )? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = match (args.id, args.row) {
        (Some(id), _) => store.remove_by_id(collection, id)?,
        // Rows are 1-based; row 0 can never match.
        (None, Some(row)) => match row.checked_sub(1) {
            Some(index) => store.remove_at(collection, index)?,
            None => None,
        },
        (None, None) => None,
    };

    match removed {
        Some(record) => {
            info!(
                "event=cli_command module=cli status=ok command=delete collection={}",
                collection.as_str()
            );
            println!("Deleted {}.", describe(&record));
        }
        None => println!("Nothing to delete at {target}."),
    }
    Ok(())
}

fn describe(record: &Record) -> String {
    match record {
        Record::Invoice(invoice) => format!("invoice for {}", invoice.customer),
        Record::Expense(expense) => format!("expense \"{}\"", expense.title),
        Record::Customer(customer) => format!("customer {}", customer.name),
    }
}

fn margin_line(views: &DerivedViews) -> String {
    let figure = format!("{:.1}%", views.profit_margin);
    match views.margin_tone {
        MarginTone::Normal => figure,
        MarginTone::Warning => format!("{figure} (loss)"),
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "نعم"
    )
}

#[cfg(test)]
mod tests {
    use super::{describe, is_affirmative, margin_line};
    use smart_accountant_core::views::ViewOptions;
    use smart_accountant_core::{
        Customer, CustomerDraft, DerivedViews, MarginTone, Record, Snapshot,
    };

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(is_affirmative("نعم"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
    }

    #[test]
    fn margin_line_marks_losses() {
        let mut views = DerivedViews::compute(&Snapshot::default(), ViewOptions::for_year(2025));
        assert_eq!(margin_line(&views), "0.0%");

        views.margin_tone = MarginTone::Warning;
        views.profit_margin = -12.5;
        assert_eq!(margin_line(&views), "-12.5% (loss)");
    }

    #[test]
    fn describe_names_the_removed_record() {
        let customer = Customer::from_draft(CustomerDraft {
            name: "Huda".to_string(),
            ..CustomerDraft::default()
        })
        .unwrap();
        assert_eq!(describe(&Record::Customer(customer)), "customer Huda");
    }
}
