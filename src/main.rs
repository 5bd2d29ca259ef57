//! lineprompt - Demo Entry Point
//!
//! Offers a menu of sample prompts and runs the chosen one, printing the
//! result. Set `RUST_LOG=lineprompt=debug` to see the prompt lifecycle on
//! stderr.

use std::process;

use inquire::{InquireError, Select};
use lineprompt::prompt::templates::icon_warn;
use lineprompt::{Pointer, Prompt, PromptError, ValidationError};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const DEMOS: [&str; 6] = [
    "username - validated on every key",
    "password - masked input",
    "confirm - yes/no question",
    "port - validated on Enter only",
    "vim - vi-style editing",
    "quit - leave the demo",
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    loop {
        let choice = Select::new("Pick a prompt:", DEMOS.to_vec())
            .with_help_message("Use arrow keys to navigate, Enter to select, Esc to quit")
            .prompt();

        let demo = match choice {
            Ok(demo) => demo,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                break
            }
            Err(e) => {
                eprintln!("ERROR: menu failed: {}", e);
                process::exit(1);
            }
        };

        let name = demo.split(" - ").next().unwrap_or(demo);
        if name == "quit" {
            break;
        }

        match run_demo(name) {
            Ok(value) => println!("You entered {:?}", value),
            Err(PromptError::Aborted) => println!("Declined"),
            Err(PromptError::Interrupted) => {
                println!("{} Interrupted", icon_warn());
                break;
            }
            Err(e) => {
                eprintln!("ERROR: prompt failed: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_demo(name: &str) -> Result<String, PromptError> {
    match name {
        "username" => Prompt::new("Username")
            .with_default(whoami())
            .with_validate(validate_username)
            .run(),
        "password" => Prompt::new("Password")
            .with_mask('*')
            .with_validate(|input| {
                if input.chars().count() < 6 {
                    return Err("password must have at least 6 characters".into());
                }
                Ok(())
            })
            .run(),
        "confirm" => Prompt::new("Delete the build directory")
            .with_default("n")
            .as_confirm()
            .run(),
        "port" => {
            let mut prompt = Prompt::new(json!({"Name": "Port", "Range": "1-65535"}))
                .with_default("8080")
                .with_allow_edit(true)
                .with_lazy_validation(true)
                .with_validate(validate_port);
            prompt.templates.prompt = Some("{{ .Name | bold }} {{ .Range | faint }}: ".into());
            prompt.templates.unvalidated = prompt.templates.prompt.clone();
            prompt.templates.success = Some("{{ .Name | faint }}: ".into());
            prompt.run()
        }
        _ => Prompt::new("Command")
            .with_vim_mode(true)
            .with_pointer(Pointer::Pipe)
            .run(),
    }
}

fn validate_username(input: &str) -> Result<(), ValidationError> {
    if input.chars().count() < 3 {
        return Err("username must have at least 3 characters".into());
    }
    if !input.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err("username may only contain letters, digits, '_' and '-'".into());
    }
    Ok(())
}

fn validate_port(input: &str) -> Result<(), ValidationError> {
    match input.parse::<u16>() {
        Ok(0) => Err("port 0 is reserved".into()),
        Ok(_) => Ok(()),
        Err(_) => Err(format!("{:?} is not a port number", input).into()),
    }
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_default()
}
