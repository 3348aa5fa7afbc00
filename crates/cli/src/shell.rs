//! Interactive shell: runs commands against the app context and redraws the
//! screen the workflow lands on.

use std::io;

use storefront_client::{
    context::AppContext,
    domain::quantity::Quantity,
    errors::ActionError,
    money::MoneyFormat,
    navigation::Route,
    session::models::Credentials,
};
use tracing::debug;

use crate::{
    commands::{self, Command},
    render,
};

/// What the input loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Command interpreter over one [`AppContext`].
#[derive(Debug)]
pub(crate) struct Shell {
    app: AppContext,
    money: MoneyFormat,
}

impl Shell {
    pub(crate) fn new(app: AppContext, money: MoneyFormat) -> Self {
        Self { app, money }
    }

    /// Resolve the session and draw the first screen.
    pub(crate) async fn start(&mut self, out: &mut impl io::Write) -> io::Result<()> {
        let route = self.app.start().await;

        self.show(route, out).await
    }

    /// Parse and run one input line.
    pub(crate) async fn handle_line(
        &mut self,
        line: &str,
        out: &mut impl io::Write,
    ) -> io::Result<Flow> {
        match commands::parse(line) {
            Ok(None) => Ok(Flow::Continue),
            Ok(Some(command)) => self.execute(command, out).await,
            Err(error) => {
                writeln!(out, "{}", error.render())?;

                Ok(Flow::Continue)
            }
        }
    }

    async fn execute(&mut self, command: Command, out: &mut impl io::Write) -> io::Result<Flow> {
        debug!(command = command.name(), route = %self.app.route(), "running command");

        match command {
            Command::Products => self.open(Route::Products, out).await?,
            Command::Cart => self.open(Route::Cart, out).await?,
            Command::Orders => self.open(Route::Orders, out).await?,
            Command::Go { path } => match Route::parse(&path) {
                Some(route) => self.open(route, out).await?,
                None => writeln!(out, "Unknown path `{path}`.")?,
            },
            Command::Qty { product, quantity } => {
                if self.enter(Route::Products, out).await? {
                    let quantity = self.app.catalog.set_quantity(product, &quantity);

                    writeln!(out, "Quantity for product {product} set to {quantity}.")?;
                }
            }
            Command::Add { product, quantity } => {
                if self.enter(Route::Products, out).await? {
                    let result = match quantity {
                        Some(raw) => {
                            self.app
                                .catalog
                                .add_to_cart_with(product, Quantity::from_input(&raw))
                                .await
                        }
                        None => self.app.catalog.add_to_cart(product).await,
                    };

                    match result {
                        Ok(added) => {
                            let name = self
                                .app
                                .catalog
                                .product(added.product_id)
                                .map_or_else(|| format!("product {product}"), |p| p.name.clone());

                            writeln!(out, "Added {} x {name} to the cart.", added.quantity)?;
                        }
                        Err(error) => report(out, &error)?,
                    }
                }
            }
            Command::Remove { item } => {
                if self.enter(Route::Cart, out).await? {
                    match self.app.cart.remove_item(item).await {
                        Ok(()) => render::cart(out, &self.app.cart, self.money)?,
                        Err(error) => report(out, &error)?,
                    }
                }
            }
            Command::Checkout => self.checkout(out).await?,
            Command::Pay { card } => self.pay(&card, out).await?,
            Command::Cancel { order } => {
                if self.enter(Route::Orders, out).await? {
                    match self.app.orders.cancel_order(order).await {
                        Ok(()) => {
                            writeln!(out, "Order #{order} cancelled.")?;
                            render::orders(out, &self.app.orders, self.money)?;
                        }
                        Err(error) => report(out, &error)?,
                    }
                }
            }
            Command::Login { email, password } => {
                match self.app.login(Credentials::new(email, password)).await {
                    Ok(route) => self.show(route, out).await?,
                    Err(error) => report(out, &error)?,
                }
            }
            Command::Register { email, password } => {
                match self.app.register(Credentials::new(email, password)).await {
                    Ok(route) => {
                        writeln!(out, "Account created. You can log in now.")?;
                        self.show(route, out).await?;
                    }
                    Err(error) => report(out, &error)?,
                }
            }
            Command::Logout => {
                let route = self.app.logout().await;

                writeln!(out, "Logged out.")?;
                self.show(route, out).await?;
            }
            Command::Whoami => render::session(out, self.app.session.current())?,
            Command::Help => write!(out, "{}", commands::help())?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn checkout(&mut self, out: &mut impl io::Write) -> io::Result<()> {
        if !self.enter(Route::Checkout, out).await? {
            return Ok(());
        }

        _ = self.app.cart.load().await;

        if !self.app.cart.can_checkout() {
            return render::checkout(out, &self.app.cart, self.money);
        }

        match self.app.checkout().await {
            Ok(route) => self.show(route, out).await,
            Err(error) => report(out, &error),
        }
    }

    async fn pay(&mut self, card: &str, out: &mut impl io::Write) -> io::Result<()> {
        if !matches!(self.app.route(), Route::Payment(_)) {
            return writeln!(out, "Open a pending order with `go /payment/<order>` first.");
        }

        match self.app.pay(card).await {
            Ok(route) => {
                writeln!(out, "Payment accepted.")?;

                self.show(route, out).await
            }
            Err(error) => report(out, &error),
        }
    }

    /// Navigate to `route` and draw wherever the guard lets us land.
    async fn open(&mut self, route: Route, out: &mut impl io::Write) -> io::Result<()> {
        let landed = self.app.navigate(route);

        self.show(landed, out).await
    }

    /// Navigate to `route` for an action. When redirected, draws the new screen
    /// and returns `false` so the action is skipped.
    async fn enter(&mut self, route: Route, out: &mut impl io::Write) -> io::Result<bool> {
        let landed = self.app.navigate(route);

        if landed == route {
            return Ok(true);
        }

        self.show(landed, out).await?;

        Ok(false)
    }

    /// Load and draw the screen for `route`.
    async fn show(&mut self, route: Route, out: &mut impl io::Write) -> io::Result<()> {
        writeln!(out, "[{route}]")?;

        // Load failures are kept in view-model state and drawn below.
        match route {
            Route::Products => {
                _ = self.app.catalog.load_products().await;

                render::products(out, &self.app.catalog, self.money)
            }
            Route::Cart => {
                _ = self.app.cart.load().await;

                render::cart(out, &self.app.cart, self.money)
            }
            Route::Checkout => {
                _ = self.app.cart.load().await;

                render::checkout(out, &self.app.cart, self.money)
            }
            Route::Payment(_) => {
                _ = self.app.orders.load_orders().await;

                render::payment(out, self.app.payment.as_ref(), &self.app.orders, self.money)
            }
            Route::Orders => {
                _ = self.app.orders.load_orders().await;

                render::orders(out, &self.app.orders, self.money)
            }
            Route::Login => render::login(out),
            Route::Register => render::register(out),
        }
    }
}

fn report(out: &mut impl io::Write, error: &ActionError) -> io::Result<()> {
    writeln!(out, "{}", error.message())
}
