// Season pitching statistics: row decoding, player filtering, and
// player/season resolution against the FanGraphs-style stats table.

use std::collections::HashMap;

use crate::table::{data_lines, parse_header_line, parse_line};

/// The most recent season the stats table is expected to contain; used as
/// the target when a lookup does not pin a season.
pub const DEFAULT_SEASON: i32 = 2025;

// ---------------------------------------------------------------------------
// SeasonStats
// ---------------------------------------------------------------------------

/// One player-season of pitching stats.
///
/// Numeric fields default to 0 when the source cell is blank or fails to
/// parse; a decoded record never carries NaN or a missing metric. Records
/// are built once at load time and never mutated.
#[derive(Debug, Clone)]
pub struct SeasonStats {
    pub season: i32,
    pub name: String,
    pub age: f64,
    pub wins: f64,
    pub losses: f64,
    pub war: f64,
    pub era: f64,
    pub games: f64,
    pub games_started: f64,
    pub innings: f64,
    pub strikeouts: f64,
    pub walks: f64,
    pub hits: f64,
    pub runs: f64,
    pub earned_runs: f64,
    pub home_runs: f64,
    pub whip: f64,
    pub fip: f64,
    pub k_per9: f64,
    pub bb_per9: f64,
    pub hr_per9: f64,
    /// Columns the fixed fields above do not model, passed through verbatim
    /// under their header names.
    pub extras: HashMap<String, String>,
}

/// Metric columns consumed into the fixed fields, by bare name. The source
/// table prefixes these with `fg_`; some exports drop the prefix, so both
/// spellings are modeled.
const METRIC_KEYS: &[&str] = &[
    "Age", "W", "L", "WAR", "ERA", "G", "GS", "IP", "SO", "BB", "H", "R",
    "ER", "HR", "WHIP", "FIP", "K/9", "BB/9", "HR/9",
];

fn is_modeled_column(header: &str) -> bool {
    if matches!(header, "Name" | "name" | "Season" | "season") {
        return true;
    }
    let bare = header.strip_prefix("fg_").unwrap_or(header);
    METRIC_KEYS.contains(&bare)
}

/// Read a metric cell, trying the `fg_`-prefixed header first and the bare
/// header second. Blank or non-numeric cells yield 0.
fn metric(row: &HashMap<String, String>, key: &str) -> f64 {
    let prefixed = format!("fg_{key}");
    row.get(&prefixed)
        .or_else(|| row.get(key))
        .and_then(|cell| cell.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn name_of(row: &HashMap<String, String>) -> &str {
    row.get("Name")
        .or_else(|| row.get("name"))
        .map(String::as_str)
        .unwrap_or("")
}

fn season_of(row: &HashMap<String, String>) -> i32 {
    row.get("Season")
        .or_else(|| row.get("season"))
        .and_then(|cell| cell.parse::<i32>().ok())
        .unwrap_or(0)
}

impl SeasonStats {
    fn from_row(row: &HashMap<String, String>, headers: &[String]) -> Self {
        let extras = headers
            .iter()
            .filter(|h| !is_modeled_column(h))
            .map(|h| (h.clone(), row.get(h).cloned().unwrap_or_default()))
            .collect();

        SeasonStats {
            season: season_of(row),
            name: name_of(row).to_string(),
            age: metric(row, "Age"),
            wins: metric(row, "W"),
            losses: metric(row, "L"),
            war: metric(row, "WAR"),
            era: metric(row, "ERA"),
            games: metric(row, "G"),
            games_started: metric(row, "GS"),
            innings: metric(row, "IP"),
            strikeouts: metric(row, "SO"),
            walks: metric(row, "BB"),
            hits: metric(row, "H"),
            runs: metric(row, "R"),
            earned_runs: metric(row, "ER"),
            home_runs: metric(row, "HR"),
            whip: metric(row, "WHIP"),
            fip: metric(row, "FIP"),
            k_per9: metric(row, "K/9"),
            bb_per9: metric(row, "BB/9"),
            hr_per9: metric(row, "HR/9"),
            extras,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Decode every row whose name column contains `target` (case-insensitive
/// substring), most recent season first. Non-matching rows are skipped, not
/// errors.
pub fn load_season_stats(text: &str, target: &str) -> Vec<SeasonStats> {
    let mut lines = data_lines(text);
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = parse_header_line(header_line);
    let needle = target.to_lowercase();

    let mut out: Vec<SeasonStats> = lines
        .map(|line| parse_line(line, &headers))
        .filter(|row| name_of(row).to_lowercase().contains(&needle))
        .map(|row| SeasonStats::from_row(&row, &headers))
        .collect();

    out.sort_by(|a, b| b.season.cmp(&a.season));
    out
}

// ---------------------------------------------------------------------------
// Player lookup and season resolution
// ---------------------------------------------------------------------------

/// Find one player-season.
///
/// `player_name` may be "First Last" or "Last, First"; with a comma, the
/// part before it is the surname token and the part after the given-name
/// token. A row matches when its name contains the surname token and, when
/// one was supplied, the given-name token.
///
/// Resolution is two-phase: an exact hit on the target season wins; if none
/// exists and the caller did not pin a season, the player's numerically
/// greatest season is returned instead. A pinned season with no exact match
/// is `None` — no fallback. When several rows share the maximal season the
/// first encountered wins, so the tie-break is input-order-dependent.
pub fn find_player_season(
    text: &str,
    player_name: &str,
    season: Option<i32>,
    default_season: i32,
) -> Option<SeasonStats> {
    let mut lines = data_lines(text);
    let header_line = lines.next()?;
    let headers = parse_header_line(header_line);

    let lowered = player_name.to_lowercase();
    let (surname, given) = match lowered.split_once(',') {
        Some((last, first)) => (last.trim().to_string(), first.trim().to_string()),
        None => (lowered.trim().to_string(), String::new()),
    };
    let matches_name = |name: &str| {
        let name = name.to_lowercase();
        name.contains(&surname) && (given.is_empty() || name.contains(&given))
    };

    let target_season = season.unwrap_or(default_season);
    let rows: Vec<HashMap<String, String>> =
        lines.map(|line| parse_line(line, &headers)).collect();

    // Phase one: exact season hit.
    for row in &rows {
        if matches_name(name_of(row)) && season_of(row) == target_season {
            return Some(SeasonStats::from_row(row, &headers));
        }
    }

    // An explicitly pinned season is exact-or-nothing.
    if season.is_some() {
        return None;
    }

    // Phase two: the player's latest available season.
    let mut latest: Option<&HashMap<String, String>> = None;
    let mut latest_season = 0;
    for row in &rows {
        if matches_name(name_of(row)) {
            let s = season_of(row);
            if s > latest_season {
                latest_season = s;
                latest = Some(row);
            }
        }
    }
    latest.map(|row| SeasonStats::from_row(row, &headers))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
