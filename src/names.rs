// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Random display names for workspace items and services

use rand::seq::SliceRandom;
use rand::Rng;

const ITEM_ADJECTIVES: &[&str] = &[
    "Happy", "Swift", "Bright", "Cool", "Smart", "Quick", "Bold", "Fresh", "Neat", "Sleek",
];
const ITEM_NOUNS: &[&str] = &[
    "Project", "Workspace", "Service", "Container", "App", "System", "Platform", "Tool", "Stack",
    "Suite",
];

const SERVICE_ADJECTIVES: &[&str] = &[
    "fast", "brave", "clever", "wise", "proud", "kind", "calm", "bold", "swift", "bright", "cool",
    "smart",
];
const SERVICE_NOUNS: &[&str] = &[
    "server", "database", "cache", "worker", "api", "gateway", "proxy", "queue", "store", "engine",
    "service", "app",
];

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or("new")
}

/// Display name for a new workspace item, e.g. `Swift Stack 412`
pub fn item_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(ITEM_ADJECTIVES, rng),
        pick(ITEM_NOUNS, rng),
        rng.gen_range(0..1000)
    )
}

/// Two-word service name, e.g. `brave_cache`
pub fn service_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}_{}", pick(SERVICE_ADJECTIVES, rng), pick(SERVICE_NOUNS, rng))
}

/// A service name not rejected by `taken`
///
/// Tries a bare `adjective_noun` first, then appends `_1`, `_2`, ... to the
/// same base until the name is free.
pub fn unique_service_name<R, F>(rng: &mut R, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let base = service_name(rng);
    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_service_name_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = service_name(&mut rng);
        let (adjective, noun) = name.split_once('_').unwrap();

        assert!(SERVICE_ADJECTIVES.contains(&adjective));
        assert!(SERVICE_NOUNS.contains(&noun));
    }

    #[test]
    fn test_unique_service_name_appends_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = service_name(&mut StdRng::seed_from_u64(1));

        let name = unique_service_name(&mut rng, |n| n == base || n == format!("{base}_1"));
        assert_eq!(name, format!("{base}_2"));
    }

    #[test]
    fn test_item_name_has_three_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        let name = item_name(&mut rng);
        assert_eq!(name.split(' ').count(), 3);
    }
}
