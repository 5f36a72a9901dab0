//! Interactive sign-in prompt
//!
//! First-launch flow: choose login or registration, validate locally,
//! surface server messages inline and re-prompt on failure.

use anyhow::{Context, Result};
use std::io::{self, Write};

use nexus_core::services::ApiError;
use nexus_core::session::SessionManager;
use nexus_core::validation::{LoginForm, RegisterForm};

pub struct SignInPrompt;

impl SignInPrompt {
    /// Loop until a session is established or the user quits.
    /// Returns false when the user aborts.
    pub async fn run(session: &SessionManager) -> Result<bool> {
        println!();
        println!("======================================");
        println!("   NEXUS CONSOLE - SIGN IN");
        println!("======================================");
        println!();

        loop {
            let choice = Self::prompt_with_default("[l]ogin / [r]egister / [q]uit", "l")?;
            match choice.as_str() {
                "l" | "login" => {
                    if Self::login_flow(session).await? {
                        return Ok(true);
                    }
                }
                "r" | "register" => {
                    if Self::register_flow(session).await? {
                        return Ok(true);
                    }
                }
                "q" | "quit" => return Ok(false),
                other => println!("Unrecognized choice: {other}"),
            }
        }
    }

    async fn login_flow(session: &SessionManager) -> Result<bool> {
        let form = LoginForm {
            email: Self::prompt("Email")?,
            password: Self::prompt("Password")?,
        };

        if let Err(errors) = form.validate() {
            Self::print_field_errors(&errors);
            return Ok(false);
        }

        match session.login(&form.email, &form.password).await {
            Ok(()) => {
                println!("Signed in.");
                Ok(true)
            }
            Err(ApiError::Server { message: None, .. }) => {
                println!("Invalid email or password");
                Ok(false)
            }
            Err(e) => {
                println!("{}", e.user_message());
                Ok(false)
            }
        }
    }

    async fn register_flow(session: &SessionManager) -> Result<bool> {
        let form = RegisterForm {
            username: Self::prompt("Username")?,
            email: Self::prompt("Email")?,
            password: Self::prompt("Password")?,
            confirm_password: Self::prompt("Confirm password")?,
            agree_terms: Self::prompt_yes_no("Agree to the terms and conditions?")?,
        };

        if let Err(errors) = form.validate() {
            Self::print_field_errors(&errors);
            return Ok(false);
        }

        match session
            .register(&form.username, &form.email, &form.password)
            .await
        {
            Ok(()) => {
                println!("Account created, signed in.");
                Ok(true)
            }
            Err(e) => {
                if let Some(fields) = e.field_errors() {
                    for (field, message) in fields {
                        println!("  {field}: {message}");
                    }
                } else {
                    println!("{}", e.user_message());
                }
                Ok(false)
            }
        }
    }

    fn print_field_errors(errors: &nexus_core::validation::FieldErrors) {
        for (field, message) in errors {
            println!("  {field}: {message}");
        }
    }

    fn prompt(label: &str) -> Result<String> {
        print!("{label}: ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        Ok(input.trim().to_string())
    }

    fn prompt_with_default(label: &str, default: &str) -> Result<String> {
        let input = Self::prompt(&format!("{label} [{default}]"))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    fn prompt_yes_no(label: &str) -> Result<bool> {
        let input = Self::prompt_with_default(&format!("{label} (y/n)"), "y")?;
        Ok(matches!(input.as_str(), "y" | "Y" | "yes"))
    }
}
