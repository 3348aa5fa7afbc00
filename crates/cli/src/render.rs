//! Screen rendering.
//!
//! Every screen is written as plain text; listings use bordered tables with
//! prices right aligned.

use std::{io, ops::Range};

use rust_decimal::Decimal;
use storefront_client::{
    domain::{
        cart::{CartView, CartViewModel},
        catalog::CatalogViewModel,
        orders::{OrdersView, OrdersWorkflow, PaymentViewModel, status::OrderSummary},
    },
    loadable::Loadable,
    money::MoneyFormat,
    session::models::Session,
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

pub(crate) fn products(
    out: &mut impl io::Write,
    catalog: &CatalogViewModel,
    money: MoneyFormat,
) -> io::Result<()> {
    let products = match catalog.state() {
        Loadable::Loading => return writeln!(out, "Loading products..."),
        Loadable::Failed(message) => return writeln!(out, "{message}"),
        Loadable::Loaded(products) if products.is_empty() => {
            return writeln!(out, "No products available.");
        }
        Loadable::Loaded(products) => products,
    };

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Price", "Qty", "Description"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            money.format(product.price),
            catalog.quantity(product.id).to_string(),
            product.description.as_deref().unwrap_or("-").to_string(),
        ]);
    }

    write_table(out, builder, 2..3)?;

    writeln!(out, "Use `qty <id> <n>` to pick a quantity and `add <id>` to buy.")
}

pub(crate) fn cart(
    out: &mut impl io::Write,
    cart: &CartViewModel,
    money: MoneyFormat,
) -> io::Result<()> {
    let items = match cart.view() {
        CartView::Loading => return writeln!(out, "Loading cart..."),
        CartView::Empty => return writeln!(out, "Your cart is empty."),
        CartView::Failed(message) => return writeln!(out, "{message}"),
        CartView::Items(items) => items,
    };

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Price", "Qty", "Subtotal"]);

    for item in items {
        builder.push_record([
            item.id.to_string(),
            item.product_name.clone(),
            amount(money, item.price),
            item.quantity.to_string(),
            amount(money, item.subtotal()),
        ]);
    }

    write_table(out, builder, 2..5)?;

    writeln!(out, "Total: {}", amount(money, cart.total()))
}

pub(crate) fn checkout(
    out: &mut impl io::Write,
    cart: &CartViewModel,
    money: MoneyFormat,
) -> io::Result<()> {
    self::cart(out, cart, money)?;

    if cart.can_checkout() {
        writeln!(out, "Type `checkout` to place the order.")?;
    }

    Ok(())
}

pub(crate) fn payment(
    out: &mut impl io::Write,
    payment: Option<&PaymentViewModel>,
    orders: &OrdersWorkflow,
    money: MoneyFormat,
) -> io::Result<()> {
    let Some(payment) = payment else {
        return writeln!(out, "No order is awaiting payment.");
    };

    let order = payment.order_id();

    writeln!(out, "Payment for order #{order}")?;

    if let Some(known) = orders.order(order) {
        writeln!(out, "Amount due: {}", money.format(known.total))?;
    }

    if let Some(error) = payment.error() {
        writeln!(out, "{error}")?;
    }

    writeln!(out, "Type `pay <card number>` to pay.")
}

pub(crate) fn orders(
    out: &mut impl io::Write,
    orders: &OrdersWorkflow,
    money: MoneyFormat,
) -> io::Result<()> {
    let orders = match orders.view() {
        OrdersView::Loading => return writeln!(out, "Loading orders..."),
        OrdersView::Empty => return writeln!(out, "You have no orders yet."),
        OrdersView::Failed(message) => return writeln!(out, "{message}"),
        OrdersView::Orders(orders) => orders,
    };

    for order in orders {
        order_summary(out, &OrderSummary::project(order), money)?;
    }

    Ok(())
}

fn order_summary(
    out: &mut impl io::Write,
    summary: &OrderSummary<'_>,
    money: MoneyFormat,
) -> io::Result<()> {
    writeln!(out, "Order #{} ({})", summary.id, summary.status_label)?;

    let mut builder = Builder::default();

    builder.push_record(["Product", "Unit price", "Qty", "Subtotal"]);

    for line in &summary.lines {
        builder.push_record([
            line.product_name.to_string(),
            money.format(line.unit_price),
            line.quantity.to_string(),
            amount(money, line.subtotal),
        ]);
    }

    write_table(out, builder, 1..4)?;

    writeln!(out, "Total: {}", money.format(summary.total))?;

    if summary.total_mismatch() {
        writeln!(out, "Note: the order total differs from the sum of its lines.")?;
    }

    let mut actions = Vec::new();

    if summary.actions.can_pay {
        actions.push(format!("go /payment/{}", summary.id));
    }

    if summary.actions.can_cancel {
        actions.push(format!("cancel {}", summary.id));
    }

    if !actions.is_empty() {
        writeln!(out, "Actions: {}", actions.join(" | "))?;
    }

    writeln!(out)
}

pub(crate) fn login(out: &mut impl io::Write) -> io::Result<()> {
    writeln!(out, "Log in with `login <email> <password>`.")?;
    writeln!(out, "No account yet? Use `go /register`.")
}

pub(crate) fn register(out: &mut impl io::Write) -> io::Result<()> {
    writeln!(out, "Create an account with `register <email> <password>`.")?;
    writeln!(out, "Already registered? Use `go /login`.")
}

pub(crate) fn session(out: &mut impl io::Write, session: &Session) -> io::Result<()> {
    match session.user() {
        Some(user) => writeln!(out, "Logged in as {}.", user.email),
        None => writeln!(out, "Not logged in."),
    }
}

/// Formatted amount, or `-` when it is unknown.
fn amount(money: MoneyFormat, value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |value| money.format(value))
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    money_columns: Range<usize>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(money_columns), Alignment::right());

    writeln!(out, "{table}")
}
