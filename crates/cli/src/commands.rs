//! Shell command grammar.
//!
//! Each input line is parsed on its own with clap, so typos get the same
//! error and usage text as command-line flags.

use clap::{CommandFactory, Parser, Subcommand};
use storefront_client::domain::{
    cart::models::CartItemId, catalog::models::ProductId, orders::models::OrderId,
};

/// One line of shell input.
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// A shell command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum Command {
    /// List products
    Products,

    /// Set the quantity picked for a product
    Qty {
        product: ProductId,

        /// Anything other than a positive whole number counts as 1
        quantity: String,
    },

    /// Add a product to the cart
    Add {
        product: ProductId,

        /// Overrides the quantity set with `qty`
        quantity: Option<String>,
    },

    /// Show the cart
    Cart,

    /// Remove an item from the cart
    Remove { item: CartItemId },

    /// Place an order for everything in the cart
    Checkout,

    /// Pay the order on the payment screen
    Pay { card: String },

    /// Show order history
    Orders,

    /// Cancel a pending order
    Cancel { order: OrderId },

    /// Open a screen by path, e.g. `/cart` or `/payment/42`
    Go { path: String },

    /// Log in
    Login { email: String, password: String },

    /// Create an account
    Register { email: String, password: String },

    /// Log out
    Logout,

    /// Show who is logged in
    Whoami,

    /// Show this help
    Help,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    /// Command word, safe to log; arguments may hold credentials.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Qty { .. } => "qty",
            Self::Add { .. } => "add",
            Self::Cart => "cart",
            Self::Remove { .. } => "remove",
            Self::Checkout => "checkout",
            Self::Pay { .. } => "pay",
            Self::Orders => "orders",
            Self::Cancel { .. } => "cancel",
            Self::Go { .. } => "go",
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns the clap error, ready to be rendered, for unknown commands or bad
/// arguments.
pub(crate) fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();

    if words.is_empty() {
        return Ok(None);
    }

    Line::try_parse_from(words).map(|line| Some(line.command))
}

/// Usage text listing every command.
pub(crate) fn help() -> String {
    Line::command().render_help().to_string()
}
