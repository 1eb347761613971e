use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "CREDKIT_PASSWORD";
pub const SECRET_ENV: &str = "CREDKIT_SECRET";

/// Reads the password to check against a stored hash.
pub fn read_password() -> Result<Zeroizing<String>> {
    read_from(PASSWORD_ENV, "Password: ")
}

/// Reads the shared HMAC secret.
pub fn read_secret() -> Result<Zeroizing<String>> {
    read_from(SECRET_ENV, "Secret: ")
}

fn read_from(var: &str, prompt: &str) -> Result<Zeroizing<String>> {
    //  CREDKIT_PASSWORD="supersecret" credkit verify '$argon2id$...'
    if let Ok(value) = std::env::var(var) {
        if !value.is_empty() {
            return Ok(Zeroizing::new(value));
        }
    }

    //  printf "%s" "$PW" | credkit verify '$argon2id$...'
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    } else {
        let value = Zeroizing::new(rpassword::prompt_password(prompt)?);
        if !value.is_empty() {
            return Ok(value);
        }
    }

    bail!("no {} provided", prompt.trim_end_matches(": ").to_lowercase())
}

/// Reads a password to hash, asking twice on a terminal.
pub fn read_new_password_with_confirmation() -> Result<Zeroizing<String>> {
    if std::env::var_os(PASSWORD_ENV).is_some() || !io::stdin().is_terminal() {
        return read_password();
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
