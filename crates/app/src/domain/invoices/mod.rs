//! Invoices
//!
//! The booking service assembles [`InvoiceData`]; turning it into a document
//! is left to an [`InvoiceRenderer`].

pub mod models;
mod renderer;

pub use models::InvoiceData;
pub use renderer::{InvoiceRenderError, InvoiceRenderer, TableInvoiceRenderer};
