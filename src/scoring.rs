//! Component scoring over free-text listing titles.
//!
//! Each scorer takes an already lower-cased title and returns a signed
//! point delta together with a short note for the human-readable reason.
//! Token tables are ordered slices: the first matching token wins, so more
//! specific tokens (generation-qualified model numbers) must precede the
//! generic ones.

use regex::Regex;
use std::sync::LazyLock;

/// A signed contribution to the heuristic score with its explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDelta {
    pub points: i32,
    pub note: String,
}

impl ScoreDelta {
    fn new(points: i32, note: impl Into<String>) -> Self {
        Self {
            points,
            note: note.into(),
        }
    }
}

static MEMORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s?gb").expect("memory pattern is valid"));

/// Processor tokens, most specific first.
pub const CPU_TABLE: &[(&str, i32)] = &[
    ("i9", 34),
    ("i7-12", 32),
    ("i7-11", 30),
    ("i7-10", 28),
    ("i7-9", 25),
    ("i7-8", 22),
    ("i5-12", 30),
    ("i5-11", 28),
    ("i5-10", 25),
    ("i5-9", 22),
    ("i5-8", 20),
    ("ryzen 9", 34),
    ("ryzen 7", 28),
    ("ryzen 5 5", 24),
    ("ryzen 5 4", 22),
    ("ryzen 5 3", 20),
    ("ryzen 3 3", 16),
    ("i3", -14),
    ("celeron", -26),
    ("pentium", -22),
    ("atom", -30),
];

/// Graphics tokens, most specific first.
pub const GPU_TABLE: &[(&str, i32)] = &[
    ("rtx 40", 40),
    ("rtx 30", 36),
    ("rtx 20", 32),
    ("gtx 1080", 32),
    ("gtx 1070", 30),
    ("gtx 1660", 28),
    ("gtx 1060", 24),
    ("gtx 1650", 18),
    ("gtx 1050 ti", 12),
    ("gtx 1050", 8),
    ("rx 6600", 32),
    ("rx 580", 24),
    ("rx 570", 20),
    ("mx550", 10),
    ("mx450", 8),
    ("mx350", 4),
    ("mx250", 1),
    ("mx150", -2),
    ("intel arc", 18),
    ("intel iris xe", 0),
    ("intel uhd", -14),
    ("vega 8", -8),
];

/// Phrases that hint at a broken or parts-only machine.
pub const DEFECT_PHRASES: &[&str] = &[
    "defekt",
    "ohne funktion",
    "für bastler",
    "defective",
    "for parts",
    "not working",
];

pub const DEFECT_PENALTY: i32 = -45;
pub const SSD_BONUS: i32 = 3;

/// Score installed memory from the first `<n>gb` mention.
///
/// Only the first match counts, so a storage size written before the RAM
/// size (e.g. "512gb ssd 8gb ram") is read as memory.
pub fn memory_score(title: &str) -> ScoreDelta {
    let Some(gb) = MEMORY_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    else {
        return ScoreDelta::new(-10, "RAM unknown");
    };

    match gb {
        16.. => ScoreDelta::new(26, format!("{gb}GB RAM (above requirement)")),
        12..=15 => ScoreDelta::new(18, format!("{gb}GB RAM (meets requirement)")),
        8..=11 => ScoreDelta::new(3, format!("{gb}GB RAM (below recommendation)")),
        _ => ScoreDelta::new(-24, format!("{gb}GB RAM (too little)")),
    }
}

pub fn processor_score(title: &str) -> ScoreDelta {
    match first_match(CPU_TABLE, title) {
        Some((token, points)) => ScoreDelta::new(points, format!("CPU hint '{token}'")),
        None => ScoreDelta::new(0, "CPU unclear"),
    }
}

pub fn graphics_score(title: &str) -> ScoreDelta {
    if let Some((token, points)) = first_match(GPU_TABLE, title) {
        return ScoreDelta::new(points, format!("GPU hint '{token}'"));
    }

    if title.contains("gaming") {
        ScoreDelta::new(5, "'gaming' in title")
    } else {
        ScoreDelta::new(-10, "no dedicated graphics detected")
    }
}

pub fn defect_penalty(title: &str) -> Option<ScoreDelta> {
    DEFECT_PHRASES
        .iter()
        .any(|phrase| title.contains(phrase))
        .then(|| ScoreDelta::new(DEFECT_PENALTY, "possible defect warning"))
}

pub fn ssd_bonus(title: &str) -> Option<ScoreDelta> {
    title
        .contains("ssd")
        .then(|| ScoreDelta::new(SSD_BONUS, "SSD mentioned"))
}

fn first_match(table: &'static [(&'static str, i32)], title: &str) -> Option<(&'static str, i32)> {
    table
        .iter()
        .find(|(token, _)| title.contains(token))
        .copied()
}
