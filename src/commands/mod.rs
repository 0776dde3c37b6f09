// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod edges;
pub mod export;
pub mod item;
pub mod network;
pub mod search;
pub mod service;

use crate::session::Session;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Ctx {
    /// Where the session is stored
    pub data_dir: PathBuf,
    /// Print machine-readable JSON instead of text
    pub json: bool,
    /// Use ANSI colors in text output
    pub color: bool,
}

impl Ctx {
    /// Load the saved session
    pub fn load_session(&self) -> Result<Session> {
        Session::load(&self.data_dir)
            .with_context(|| format!("Failed to load session from {}", self.data_dir.display()))
    }

    /// Persist the session
    pub fn save_session(&self, session: &Session) -> Result<()> {
        session
            .save(&self.data_dir)
            .with_context(|| format!("Failed to save session to {}", self.data_dir.display()))
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("Failed to serialize output")?
        );
        Ok(())
    }

    /// A `#RRGGBB` color rendered as a block in that color
    #[must_use]
    pub fn swatch(&self, hex: &str) -> String {
        match (self.color, parse_hex(hex)) {
            (true, Some((r, g, b))) => "■".truecolor(r, g, b).to_string(),
            _ => "■".to_string(),
        }
    }

    /// Dimmed text, or plain text without colors
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Bold text, or plain text without colors
    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Split `#RRGGBB` into its channels
#[must_use]
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
