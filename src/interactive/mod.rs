//
//  churchtools-cli
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive prompts used by `ct auth login` and destructive commands.

mod prompt;

pub use prompt::*;
