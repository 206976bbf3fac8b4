//! # Products Screen
//!
//! Registration, listing, editing and deletion. Every action re-lists on
//! success so the operator always sees current stock.

use std::io;

use super::{parse_id, print_scale_warning, prompt};
use crate::session::Session;

/// Runs the products screen until the operator goes back.
pub fn run(session: &mut Session) -> io::Result<()> {
    loop {
        println!();
        println!("--- Products ---");
        print_scale_warning(session);
        print_listing(session);

        println!("[1] Register  [2] Edit  [3] Delete  [0] Back");
        let Some(choice) = prompt("> ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => register(session)?,
            "2" => edit(session)?,
            "3" => delete(session)?,
            "0" => return Ok(()),
            "" => {}
            other => println!("Unknown option: {other}"),
        }
    }
}

fn print_listing(session: &Session) {
    match session.list_products() {
        Ok(products) if products.is_empty() => println!("No products registered."),
        Ok(products) => {
            for p in products {
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

fn register(session: &Session) -> io::Result<()> {
    let Some(name) = prompt("Name: ")? else {
        return Ok(());
    };
    let Some(price) = prompt("Price (R$): ")? else {
        return Ok(());
    };
    let Some(stock) = prompt("Stock: ")? else {
        return Ok(());
    };

    match session.register_product(&name, &price, &stock) {
        Ok(id) => println!("Product '{}' registered with id {id}.", name.trim()),
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}

fn edit(session: &Session) -> io::Result<()> {
    let Some(id_input) = prompt("Product id: ")? else {
        return Ok(());
    };
    let Some(id) = parse_id(&id_input) else {
        println!("Invalid id: {id_input}");
        return Ok(());
    };

    // Show current values so the operator retypes all three; updates are
    // full overwrites, not partial.
    let current = match session.get_product(id) {
        Ok(p) => p,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };
    println!(
        "Editing '{}' ({} | stock {})",
        current.name,
        current.price(),
        current.stock_quantity
    );

    let Some(name) = prompt("New name: ")? else {
        return Ok(());
    };
    let Some(price) = prompt("New price (R$): ")? else {
        return Ok(());
    };
    let Some(stock) = prompt("New stock: ")? else {
        return Ok(());
    };

    match session.update_product(id, &name, &price, &stock) {
        Ok(()) => println!("Product {id} updated."),
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}

fn delete(session: &Session) -> io::Result<()> {
    let Some(id_input) = prompt("Product id: ")? else {
        return Ok(());
    };
    let Some(id) = parse_id(&id_input) else {
        println!("Invalid id: {id_input}");
        return Ok(());
    };

    let Some(confirm) = prompt(&format!("Delete product {id}? [y/N] "))? else {
        return Ok(());
    };
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return Ok(());
    }

    match session.delete_product(id) {
        Ok(()) => println!("Product {id} deleted."),
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}
