//! Command line definition.

use std::path::PathBuf;

use catalog_core::{Basket, Money};
use catalog_db::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Query, edit and purchase products held in a flat file or SQLite catalog",
    long_about = "Without a subcommand an interactive numbered menu is started. \
                  The backend is chosen by the SOURCE key of the config file.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        value_name = "FILE",
        help = "Main property file holding SOURCE"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        global = true,
        default_value_t = false,
        help = "Print results as JSON"
    )]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Get a product by name, optionally within one store")]
    Get {
        name: String,
        #[arg(long, value_name = "ID")]
        store: Option<i64>,
    },

    #[command(about = "List every product")]
    List,

    #[command(about = "Add a product", allow_negative_numbers = true)]
    Add {
        name: String,
        store_id: i64,
        quantity: i64,
        price: Money,
    },

    #[command(
        about = "Replace quantity and price of a product in one store",
        allow_negative_numbers = true
    )]
    Update {
        name: String,
        store_id: i64,
        quantity: i64,
        price: Money,
    },

    #[command(about = "Delete a product from one store", allow_negative_numbers = true)]
    Delete { name: String, store_id: i64 },

    #[command(about = "List the products of one store", allow_negative_numbers = true)]
    Store { store_id: i64 },

    #[command(about = "Find the cheapest offer for an item across stores")]
    Cheapest { item: String },

    #[command(
        about = "Price a basket in one store without changing stock",
        allow_negative_numbers = true
    )]
    Purchase {
        store_id: i64,
        #[arg(
            long = "item",
            value_name = "NAME=QTY",
            value_parser = parse_basket_line,
            required = true
        )]
        items: Vec<(String, i64)>,
    },

    #[command(
        about = "List products of one store priced at or below an amount",
        allow_negative_numbers = true
    )]
    Affordable { store_id: i64, amount: Money },

    #[command(
        about = "Price a basket in one store and deduct the stock",
        allow_negative_numbers = true
    )]
    Checkout {
        store_id: i64,
        #[arg(
            long = "item",
            value_name = "NAME=QTY",
            value_parser = parse_basket_line,
            required = true
        )]
        items: Vec<(String, i64)>,
    },
}

/// Parses one `NAME=QTY` basket line. The last `=` splits, so names may
/// contain `=`.
pub fn parse_basket_line(s: &str) -> Result<(String, i64), String> {
    let (name, qty) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=QTY, got '{s}'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing product name in '{s}'"));
    }
    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity in '{s}'"))?;

    Ok((name.to_string(), qty))
}

/// Collects parsed lines into a basket, summing repeated names.
pub fn basket(items: Vec<(String, i64)>) -> Basket {
    items.into_iter().collect()
}
