//! # Shell Commands
//!
//! ```text
//! add <id>             add one unit
//! remove <id>          drop the line item
//! set <id> <amount>    set an absolute amount (below 1 is ignored)
//! show                 print the cart
//! help                 print this list
//! quit                 flush and exit (also: exit, EOF)
//! ```
//!
//! Rejected operations print nothing here; the session's sink already told
//! the shopper.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;
use trolley_core::{Cart, CartResult, ProductId};
use trolley_session::{CartSession, UpdateProductAmount};

pub const HELP: &str = "\
Commands:
  add <id>             add one unit of a product
  remove <id>          remove a product from the cart
  set <id> <amount>    set the amount of a product in the cart
  show                 print the cart
  help                 print this help
  quit                 save and exit";

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add(ProductId),
    Remove(ProductId),
    Set { product_id: ProductId, amount: i64 },
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid product id '{0}'")]
    InvalidProductId(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
}

fn product_id(raw: &str) -> Result<ProductId, CommandParseError> {
    raw.parse()
        .map_err(|_| CommandParseError::InvalidProductId(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = words.split_first() else {
            return Err(CommandParseError::Empty);
        };

        match (verb.to_ascii_lowercase().as_str(), args) {
            ("add", [id]) => Ok(Command::Add(product_id(id)?)),
            ("add", _) => Err(CommandParseError::Usage("add <id>")),

            ("remove" | "rm", [id]) => Ok(Command::Remove(product_id(id)?)),
            ("remove" | "rm", _) => Err(CommandParseError::Usage("remove <id>")),

            ("set", [id, amount]) => Ok(Command::Set {
                product_id: product_id(id)?,
                amount: amount
                    .parse()
                    .map_err(|_| CommandParseError::InvalidAmount(amount.to_string()))?,
            }),
            ("set", _) => Err(CommandParseError::Usage("set <id> <amount>")),

            ("show" | "cart", _) => Ok(Command::Show),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),

            (other, _) => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; print the text if any.
    Continue(Option<String>),
    Quit,
}

/// Runs one command against the session.
pub async fn execute(session: &CartSession, command: Command) -> Outcome {
    let result = match command {
        Command::Add(id) => session.add_product(id).await,
        Command::Remove(id) => session.remove_product(id).await,
        Command::Set { product_id, amount } => {
            session
                .update_product_amount(UpdateProductAmount::new(product_id, amount))
                .await
        }
        Command::Show => return Outcome::Continue(Some(render_cart(&session.cart()))),
        Command::Help => return Outcome::Continue(Some(HELP.to_string())),
        Command::Quit => return Outcome::Quit,
    };

    after_mutation(session, result)
}

fn after_mutation(session: &CartSession, result: CartResult<()>) -> Outcome {
    match result {
        Ok(()) => Outcome::Continue(Some(render_cart(&session.cart()))),
        Err(_) => Outcome::Continue(None),
    }
}

/// Formats the cart as a table.
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "(cart is empty)".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<32}  x{}",
            item.id.get(),
            item.title().unwrap_or("-"),
            item.amount
        );
    }
    let _ = write!(
        out,
        "{} product(s), {} unit(s)",
        cart.len(),
        cart.total_amount()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trolley_core::{LineItem, ProductDetails};
    use trolley_inventory::InMemoryInventory;
    use trolley_session::RecordingSink;

    fn id(raw: u64) -> ProductId {
        ProductId::new(raw)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("add 1".parse(), Ok(Command::Add(id(1))));
        assert_eq!("  ADD   7 ".parse(), Ok(Command::Add(id(7))));
        assert_eq!("rm 3".parse(), Ok(Command::Remove(id(3))));
        assert_eq!(
            "set 2 10".parse(),
            Ok(Command::Set {
                product_id: id(2),
                amount: 10
            })
        );
        assert_eq!(
            "set 2 -1".parse(),
            Ok(Command::Set {
                product_id: id(2),
                amount: -1
            })
        );
        assert_eq!("show".parse(), Ok(Command::Show));
        assert_eq!("help".parse(), Ok(Command::Help));
        assert_eq!("exit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
        assert_eq!(
            "add".parse::<Command>(),
            Err(CommandParseError::Usage("add <id>"))
        );
        assert_eq!(
            "add x".parse::<Command>(),
            Err(CommandParseError::InvalidProductId("x".into()))
        );
        assert_eq!(
            "set 1 lots".parse::<Command>(),
            Err(CommandParseError::InvalidAmount("lots".into()))
        );
        assert_eq!(
            "buy 1".parse::<Command>(),
            Err(CommandParseError::Unknown("buy".into()))
        );
    }

    #[test]
    fn test_render_cart() {
        assert_eq!(render_cart(&Cart::new()), "(cart is empty)");

        let cart = Cart::from_items(vec![
            LineItem::from_product(ProductDetails::new(id(1)).with_field("title", "Runner"))
                .with_amount(2),
            LineItem::from_product(ProductDetails::new(id(12))),
        ]);
        let text = render_cart(&cart);

        assert!(text.contains("Runner"));
        assert!(text.contains("x2"));
        assert!(text.ends_with("2 product(s), 3 unit(s)"));
    }

    #[tokio::test]
    async fn test_execute_mutations() {
        let inventory = Arc::new(
            InMemoryInventory::new()
                .with_product(ProductDetails::new(id(1)).with_field("title", "Runner"), 1),
        );
        let sink = Arc::new(RecordingSink::new());
        let session = CartSession::builder(inventory).sink(sink.clone()).open().await;

        let shown = execute(&session, Command::Add(id(1))).await;
        assert!(matches!(shown, Outcome::Continue(Some(ref t)) if t.contains("Runner")));

        // Out of stock: nothing printed here, the sink got the message.
        assert_eq!(
            execute(&session, Command::Add(id(1))).await,
            Outcome::Continue(None)
        );
        assert_eq!(sink.messages().len(), 1);

        assert_eq!(execute(&session, Command::Quit).await, Outcome::Quit);
    }
}
