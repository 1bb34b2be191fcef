//
//  churchtools-cli
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Terminal prompts built on `dialoguer`.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

pub fn prompt_input(message: &str) -> Result<String> {
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input.trim().to_string())
}

/// Reads a password without echoing it.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}
