//
//  churchtools-cli
//  output/markdown.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Markdown Output
//!
//! Building blocks for Markdown documents (agenda documents in particular)
//! and terminal rendering through `termimad`.
//!
//! | Function | Output |
//! |----------|--------|
//! | [`md_header`] | `## Title` |
//! | [`md_bold`] | `**text**` |
//! | [`md_list`] | `- item` lines |

/// Renders Markdown with ANSI styling for the terminal.
pub fn render_markdown(text: &str) -> String {
    termimad::text(text).to_string()
}

/// Prints rendered Markdown to stdout.
///
/// When piping to a file, print the raw string instead.
pub fn print_markdown(text: &str) {
    println!("{}", render_markdown(text));
}

/// A header of `level` (1-6).
pub fn md_header(level: u8, text: &str) -> String {
    format!("{} {}", "#".repeat(level as usize), text)
}

pub fn md_bold(text: &str) -> String {
    format!("**{}**", text)
}

/// A bullet list, one item per line.
pub fn md_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
