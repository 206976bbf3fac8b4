//! # Sales Screen
//!
//! The cart workflow: pick products by id, adjust quantities one unit at
//! a time, finalize. A finalized sale is committed before the receipt is
//! attempted, so a printer problem shows up as a warning next to an
//! otherwise successful sale.

use std::io;

use super::{parse_id, print_scale_warning, prompt};
use crate::session::Session;
use mercado_core::RemoveOutcome;

/// Runs the sales screen until the operator goes back.
pub fn run(session: &mut Session) -> io::Result<()> {
    loop {
        println!();
        println!("--- Sales ---");
        print_scale_warning(session);
        print_available(session);
        print_cart(session);

        println!("[a <id>] Add  [r <id>] Remove one  [f] Finalize  [0] Back");
        let Some(input) = prompt("> ")? else {
            return Ok(());
        };

        match parse_command(&input) {
            Some(Command::Add(id)) => add(session, id),
            Some(Command::Remove(id)) => remove(session, id),
            Some(Command::Finalize) => finalize(session),
            Some(Command::Back) => return Ok(()),
            None if input.is_empty() => {}
            None => println!("Unknown command: {input}"),
        }
    }
}

enum Command {
    Add(i64),
    Remove(i64),
    Finalize,
    Back,
}

fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();
    match (parts.next()?, parts.next()) {
        ("a", Some(id)) => parse_id(id).map(Command::Add),
        ("r", Some(id)) => parse_id(id).map(Command::Remove),
        ("f", None) => Some(Command::Finalize),
        ("0", None) => Some(Command::Back),
        _ => None,
    }
}

fn print_available(session: &Session) {
    match session.list_products() {
        Ok(products) => {
            // The sales grid only offers what can actually be sold.
            let sellable: Vec<_> = products.into_iter().filter(|p| p.in_stock()).collect();
            if sellable.is_empty() {
                println!("Nothing in stock.");
                return;
            }
            for p in sellable {
                println!(
                    "ID:{:<4} | {:<30} | {:>10} | Stock: {:<5}",
                    p.id,
                    p.name,
                    p.price().to_string(),
                    p.stock_quantity
                );
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn print_cart(session: &Session) {
    let cart = session.cart();
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    println!("Cart:");
    for line in cart.lines() {
        println!(
            "  ID:{:<4} | {:<25} | Qty: {:<3} | {}",
            line.product_id,
            line.name,
            line.quantity,
            line.subtotal()
        );
    }
    println!("Subtotal: {}", cart.subtotal());
}

fn add(session: &mut Session, id: i64) {
    if let Err(e) = session.add_to_cart(id) {
        println!("Error: {e}");
    }
}

fn remove(session: &mut Session, id: i64) {
    match session.remove_from_cart(id) {
        RemoveOutcome::Decremented | RemoveOutcome::LineCleared => {}
        RemoveOutcome::NotInCart => println!("Warning: product {id} is not in the cart."),
    }
}

fn finalize(session: &mut Session) {
    match session.finalize_sale() {
        Ok(outcome) => {
            println!(
                "Sale #{} completed: {}",
                outcome.sale.id,
                outcome.sale.total()
            );
            if let Some(warning) = outcome.print_warning {
                println!("Warning: sale committed, but the receipt failed to print: {warning}");
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}
