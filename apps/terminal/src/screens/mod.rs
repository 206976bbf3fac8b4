//! # Terminal Screens
//!
//! Three stdin-driven screens over the [`Session`]: home, product
//! registration/list, and sales/cart. Screens render results and errors;
//! every rule lives below them.

mod products;
mod sales;

use std::io::{self, Write};

use crate::session::Session;

/// Runs the home screen until the operator quits.
pub fn run(session: &mut Session) -> io::Result<()> {
    loop {
        println!();
        println!("=== {} ===", session.settings().store_name);
        println!("[1] Products");
        println!("[2] Sales");
        println!("[0] Quit");

        let Some(choice) = prompt("> ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => products::run(session)?,
            "2" => sales::run(session)?,
            "0" | "q" => return Ok(()),
            "" => {}
            other => println!("Unknown option: {other}"),
        }
    }
}

/// Prints a prompt and reads one trimmed line; `None` on EOF.
pub(crate) fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Parses a typed product id.
pub(crate) fn parse_id(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// Renders the scale warning line, if the physical stock runs low.
pub(crate) fn print_scale_warning(session: &Session) {
    if let Some(grams) = session.low_weight() {
        println!("!! Low physical stock on the scale: {grams:.2} g");
    }
}
