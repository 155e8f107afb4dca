pub mod score;
pub mod shuffle;

use cellforge::error::CfResult;
use std::fs;
use std::io::{self, Read};

/// Reads a text input; `-` means stdin.
pub fn read_text(path: &str) -> CfResult<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}
