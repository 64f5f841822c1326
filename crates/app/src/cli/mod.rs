use clap::{Parser, Subcommand};
use lodge::pricing::LineItem;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use lodge_app::config::AppConfig;

mod demo;
mod quote;
mod refund;

#[derive(Debug, Parser)]
#[command(name = "lodge-app", about = "Lodge booking CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a stay
    Quote(quote::QuoteArgs),
    /// Compute the refund for cancelling a booking
    Refund(refund::RefundArgs),
    /// Walk a booking through its lifecycle against an in-memory store
    Demo(demo::DemoArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Quote(args) => quote::run(&self.config, args),
            Commands::Refund(args) => refund::run(args),
            Commands::Demo(args) => demo::run(&self.config, args).await,
        }
    }
}

/// Two-column table of labelled amounts, amounts right-aligned.
fn line_items_table<'a>(lines: impl IntoIterator<Item = &'a LineItem>) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Item".to_string(), "Amount".to_string()]);

    for line in lines {
        builder.push_record([line.label.clone(), line.amount.clone()]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..), Alignment::right());

    table
}
