//! Command implementations.

pub mod encode;
pub mod inspect;
pub mod scan;
pub mod verify;

use std::io::{self, Read};

/// Reads command input from a file, or stdin when no path is given.
pub fn read_input(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e).into()),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
