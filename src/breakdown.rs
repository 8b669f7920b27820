//! Breakdown
//!
//! Renders the cart lines and a pricing snapshot as a console table followed by
//! a summary of every charge and deduction.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows, Segment},
        style::BorderColor,
    },
};
use thiserror::Error;

use crate::{amounts::to_money, items::CartLineItem, pricing::PricingSnapshot};

/// Errors that can occur when writing a breakdown.
#[derive(Debug, Error)]
pub enum BreakdownError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// A priced cart ready to print.
#[derive(Debug, Clone, Copy)]
pub struct Breakdown<'a> {
    items: &'a [CartLineItem],
    snapshot: &'a PricingSnapshot,
    estimated_delivery: Option<&'a str>,
}

impl<'a> Breakdown<'a> {
    /// Create a breakdown for the given lines and snapshot.
    pub fn new(items: &'a [CartLineItem], snapshot: &'a PricingSnapshot) -> Self {
        Self {
            items,
            snapshot,
            estimated_delivery: None,
        }
    }

    /// Attach the delivery estimate from the shipping quote.
    #[must_use]
    pub fn with_estimated_delivery(mut self, estimate: Option<&'a str>) -> Self {
        self.estimated_delivery = estimate;
        self
    }

    /// Writes the breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), BreakdownError> {
        if self.items.is_empty() {
            writeln!(out, "\nCart is empty").map_err(|_err| BreakdownError::IO)?;
        } else {
            write_item_table(&mut out, self.items)?;
        }

        write_summary(&mut out, self.snapshot)?;

        if let Some(estimate) = self.estimated_delivery {
            writeln!(out, " Estimated delivery: {estimate}\n").map_err(|_err| BreakdownError::IO)?;
        }

        Ok(())
    }
}

fn write_item_table(out: &mut impl io::Write, items: &[CartLineItem]) -> Result<(), BreakdownError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Product", "Qty", "Unit Price", "Tax", "Line Total"]);

    for (idx, item) in items.iter().enumerate() {
        let product = match &item.key.variant {
            Some(variant) => format!("{} ({variant})", item.key.product),
            None => item.key.product.to_string(),
        };

        builder.push_record([
            format!("#{:<3}", idx + 1),
            product,
            item.quantity.to_string(),
            format!("{}", to_money(item.unit_sale_price)),
            format!("{}", to_money(item.tax_total())),
            format!("{}", to_money(item.line_total)),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..6), Alignment::right());
    table.modify(Segment::all(), BorderColor::filled(Color::FG_BRIGHT_BLACK));

    writeln!(out, "\n{table}").map_err(|_err| BreakdownError::IO)
}

fn write_summary(out: &mut impl io::Write, snapshot: &PricingSnapshot) -> Result<(), BreakdownError> {
    let mut builder = Builder::default();

    builder.push_record(["Total MRP:".to_string(), to_money(snapshot.total_mrp).to_string()]);
    builder.push_record(["Tax:".to_string(), to_money(snapshot.tax_sum).to_string()]);

    if snapshot.coupon_discount > 0 {
        builder.push_record(["Coupon:".to_string(), format!("-{}", to_money(snapshot.coupon_discount))]);
    }

    builder.push_record(["Shipping:".to_string(), to_money(snapshot.shipping).to_string()]);
    builder.push_record(["Platform fee:".to_string(), to_money(snapshot.platform_fee).to_string()]);

    if snapshot.wallet_deduction > 0 {
        builder.push_record(["Wallet:".to_string(), format!("-{}", to_money(snapshot.wallet_deduction))]);
    }

    builder.push_record(["Total payable:".to_string(), to_money(snapshot.total_payable).to_string()]);

    let mut table = builder.build();

    table.with(Style::empty());
    table.modify(Columns::new(0..2), Alignment::right());
    table.modify(Rows::last(), Color::BOLD);

    writeln!(out, "{table}\n").map_err(|_err| BreakdownError::IO)
}
