// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Network color palette and allocation

use crate::compose::NetworkDefinition;
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;

/// Fifty visually distinct network colors
pub const NETWORK_COLORS: [&str; 50] = [
    "#FF6B6B", // Red
    "#4ECDC4", // Turquoise
    "#45B7D1", // Sky Blue
    "#FFA07A", // Light Salmon
    "#98D8C8", // Mint
    "#F7DC6F", // Yellow
    "#BB8FCE", // Purple
    "#85C1E2", // Light Blue
    "#F8B739", // Orange
    "#52B788", // Green
    "#E94B3C", // Crimson
    "#6C5CE7", // Indigo
    "#A8E6CF", // Pale Green
    "#FFD93D", // Golden Yellow
    "#FF6B9D", // Pink
    "#95E1D3", // Aquamarine
    "#F38181", // Coral
    "#AA96DA", // Lavender
    "#FCBAD3", // Light Pink
    "#A8D8EA", // Baby Blue
    "#FFB6B9", // Pastel Red
    "#BAE1FF", // Powder Blue
    "#C7CEEA", // Periwinkle
    "#FFDAC1", // Peach
    "#B5EAD7", // Seafoam
    "#FF9FF3", // Fuchsia
    "#54A0FF", // Bright Blue
    "#48DBFB", // Cyan
    "#1DD1A1", // Emerald
    "#5F27CD", // Deep Purple
    "#00D2D3", // Teal
    "#FF9F43", // Mango
    "#EE5A6F", // Watermelon
    "#C44569", // Plum
    "#786FA6", // Gray Purple
    "#F8EFBA", // Cream
    "#63CDDA", // Turquoise Blue
    "#CF6679", // Rose
    "#F5CD79", // Sand
    "#A29BFE", // Periwinkle Blue
    "#6C5B7B", // Dusty Purple
    "#FD79A8", // Hot Pink
    "#FDCB6E", // Mustard
    "#E17055", // Terra Cotta
    "#74B9FF", // Sky
    "#9B59B6", // Amethyst
    "#55EFC4", // Light Green
    "#81ECEC", // Light Cyan
    "#FAB1A0", // Salmon Pink
    "#DFE6E9", // Light Gray
];

/// Color handed out once every palette entry is taken
pub const FALLBACK_COLOR: &str = NETWORK_COLORS[0];

/// Colors currently assigned to the given networks
#[must_use]
pub fn used_colors(networks: &IndexMap<String, NetworkDefinition>) -> Vec<&str> {
    networks
        .values()
        .filter_map(|n| n.color.as_deref())
        .collect()
}

/// Pick a color for a new network
///
/// Chooses uniformly among palette entries not in `used`. Past fifty
/// networks the palette is exhausted and [`FALLBACK_COLOR`] is returned,
/// so colors start repeating.
pub fn pick_color<R: Rng + ?Sized>(used: &[&str], rng: &mut R) -> &'static str {
    let available: Vec<&'static str> = NETWORK_COLORS
        .iter()
        .copied()
        .filter(|c| !used.iter().any(|u| u.eq_ignore_ascii_case(c)))
        .collect();

    available.choose(rng).copied().unwrap_or(FALLBACK_COLOR)
}
