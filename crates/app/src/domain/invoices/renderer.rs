//! Invoice Renderers

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::domain::invoices::models::InvoiceData;

/// Errors raised while rendering an invoice.
#[derive(Debug, Error)]
pub enum InvoiceRenderError {
    /// Writing the output failed.
    #[error("failed to write invoice")]
    Io(#[from] io::Error),
}

/// Turns [`InvoiceData`] into a document.
pub trait InvoiceRenderer: Send + Sync {
    /// Write `invoice` to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render(&self, invoice: &InvoiceData, out: &mut dyn io::Write)
    -> Result<(), InvoiceRenderError>;
}

/// Plain-text invoice laid out as terminal tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableInvoiceRenderer;

impl InvoiceRenderer for TableInvoiceRenderer {
    fn render(
        &self,
        invoice: &InvoiceData,
        out: &mut dyn io::Write,
    ) -> Result<(), InvoiceRenderError> {
        let mut details = Builder::default();

        push_row(&mut details, "Invoice Number", &invoice.invoice_number);
        push_row(&mut details, "Date", invoice.issued_at.strftime("%Y-%m-%d"));
        push_row(&mut details, "Customer", &invoice.customer.name);
        push_row(&mut details, "Email", &invoice.customer.email);
        push_row(&mut details, "Property", &invoice.property.title);
        push_row(&mut details, "Location", &invoice.property.location);
        push_row(&mut details, "Host", &invoice.property.host_name);
        push_row(&mut details, "Check-in", invoice.stay.check_in);
        push_row(&mut details, "Check-out", invoice.stay.check_out);
        push_row(&mut details, "Number of Nights", invoice.stay.nights);
        push_row(&mut details, "Number of Guests", invoice.stay.guests);

        let mut details = details.build();
        details.with(Style::modern_rounded());

        let mut charges = Builder::default();

        push_row(&mut charges, "Item", "Amount");

        for line in &invoice.line_items {
            push_row(&mut charges, &line.label, &line.amount);
        }

        let mut charges = charges.build();
        charges.with(Style::modern_rounded());
        charges.modify(Columns::new(1..), Alignment::right());

        let method = invoice
            .payment
            .method
            .map_or("N/A", |method| method.as_str());

        writeln!(out, "INVOICE")?;
        writeln!(out, "{details}")?;
        writeln!(out, "{charges}")?;
        writeln!(out, "Payment Status: {}", invoice.payment.status)?;
        writeln!(out, "Payment Method: {method}")?;
        writeln!(
            out,
            "Payment ID: {}",
            invoice.payment.id.as_deref().unwrap_or("N/A")
        )?;

        Ok(())
    }
}

fn push_row(builder: &mut Builder, label: &str, value: impl ToString) {
    builder.push_record([label.to_string(), value.to_string()]);
}
