use eyre::{Context, Result};
use std::io::{self, Write};

/// Prompt on stdout and read one trimmed line from stdin.
pub fn read_input(name: &str) -> Result<String> {
    print!("{name}: ");
    io::stdout().flush()?;

    let mut value = String::new();
    io::stdin()
        .read_line(&mut value)
        .wrap_err_with(|| format!("Failed to read {name}"))?;

    Ok(value.trim().to_string())
}

pub fn read_input_hidden(name: &str) -> Result<String> {
    rpassword::prompt_password(format!("{name}: "))
        .wrap_err_with(|| format!("Failed to read {name}"))
}
