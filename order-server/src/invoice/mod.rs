//! Invoice generation

pub mod renderer;

pub use renderer::InvoiceRenderer;
