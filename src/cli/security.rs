//! Security CLI commands
//!
//! Secrets are read with a hidden prompt unless passed as flags.

use clap::Subcommand;

use crate::crypto::SecureString;
use crate::error::{LedgerError, LedgerResult};
use crate::services::SecurityService;
use crate::storage::Storage;

/// Security subcommands
#[derive(Subcommand)]
pub enum SecurityCommands {
    /// Show whether a passcode and memorable word are set
    Status,
    /// Set or replace the passcode (4 to 8 digits)
    SetPasscode {
        /// Passcode (prompted when omitted)
        #[arg(long)]
        passcode: Option<String>,
    },
    /// Set or replace the memorable word
    SetWord {
        /// Memorable word (prompted when omitted)
        #[arg(long)]
        word: Option<String>,
    },
    /// Check a passcode or memorable word
    Verify {
        /// Passcode to check
        #[arg(long, conflicts_with = "word")]
        passcode: Option<String>,
        /// Memorable word to check instead of the passcode
        #[arg(long)]
        word: Option<String>,
    },
    /// Forget the passcode and memorable word
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Prompt for a secret (hidden input)
fn prompt_secret(prompt: &str) -> LedgerResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| LedgerError::Security(format!("Failed to read input: {}", e)))
}

/// Prompt twice and require both entries to match
fn prompt_new_secret(label: &str) -> LedgerResult<SecureString> {
    let first = prompt_secret(&format!("New {}: ", label))?;
    let second = prompt_secret(&format!("Confirm {}: ", label))?;
    if first.as_str() != second.as_str() {
        return Err(LedgerError::Validation(format!("The {}s do not match", label)));
    }
    Ok(first)
}

/// Handle a security command
pub async fn handle_security_command(storage: &Storage, cmd: SecurityCommands) -> LedgerResult<()> {
    let service = SecurityService::from_storage(storage);

    match cmd {
        SecurityCommands::Status => {
            let status = service.status().await?;
            let yes_no = |set: bool| if set { "set" } else { "not set" };
            println!("Passcode:       {}", yes_no(status.passcode));
            println!("Memorable word: {}", yes_no(status.memorable_word));
        }

        SecurityCommands::SetPasscode { passcode } => {
            let passcode = match passcode {
                Some(p) => SecureString::from(p),
                None => prompt_new_secret("passcode")?,
            };
            service.set_passcode(&passcode).await?;
            println!("Passcode saved.");
        }

        SecurityCommands::SetWord { word } => {
            let word = match word {
                Some(w) => SecureString::from(w),
                None => prompt_new_secret("memorable word")?,
            };
            service.set_memorable_word(&word).await?;
            println!("Memorable word saved.");
        }

        SecurityCommands::Verify { passcode, word } => {
            let (label, ok) = match (passcode, word) {
                (_, Some(word)) => (
                    "Memorable word",
                    service.verify_memorable_word(&SecureString::from(word)).await?,
                ),
                (Some(passcode), None) => (
                    "Passcode",
                    service.verify_passcode(&SecureString::from(passcode)).await?,
                ),
                (None, None) => (
                    "Passcode",
                    service.verify_passcode(&prompt_secret("Passcode: ")?).await?,
                ),
            };

            if ok {
                println!("{} is correct.", label);
            } else {
                return Err(LedgerError::Security(format!("{} is incorrect", label)));
            }
        }

        SecurityCommands::Reset { yes } => {
            if !yes {
                print!("Forget the passcode and memorable word? (yes/no): ");
                std::io::Write::flush(&mut std::io::stdout())?;
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if answer.trim().to_lowercase() != "yes" {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            service.reset_all_security_state().await?;
            println!("Security state cleared.");
        }
    }

    Ok(())
}
