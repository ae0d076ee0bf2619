// Historical arbitration records and the weighted similarity matcher.

use std::collections::HashMap;
use std::fmt;

use crate::stats::SeasonStats;
use crate::table::{data_lines, parse_header_line, parse_line};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One past arbitration-eligible pitcher-season from the comparison pool.
/// Only rows flagged as pitchers with numeric ERA, IP, and SO survive
/// loading; anything else is unusable for matching.
#[derive(Debug, Clone)]
pub struct HistoricalArbitrationRecord {
    pub arb_year: i32,
    pub player: String,
    pub season: i32,
    pub club: String,
    pub mls: f64,
    /// Formatted salary string as carried by the table ("$5,300,000").
    pub salary: String,
    pub era: f64,
    pub wins: f64,
    pub strikeouts: f64,
    pub innings: f64,
    pub whip: f64,
    pub fip: f64,
    pub war: f64,
}

/// Arbitration-eligibility tier bucketed from major-league service time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbTier {
    PreArb,
    First,
    Second,
    Third,
    Fourth,
    FreeAgentEligible,
}

impl ArbTier {
    /// Bucket a service-time value. 3.15–4.1 is the Super Two second-year
    /// band; 6.0+ is free-agent eligible.
    pub fn from_mls(mls: f64) -> Self {
        if mls >= 6.0 {
            ArbTier::FreeAgentEligible
        } else if mls >= 5.1 {
            ArbTier::Fourth
        } else if mls >= 4.1 {
            ArbTier::Third
        } else if mls >= 3.15 {
            ArbTier::Second
        } else if mls >= 3.0 {
            ArbTier::First
        } else {
            ArbTier::PreArb
        }
    }
}

impl fmt::Display for ArbTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArbTier::PreArb => "Pre-Arb",
            ArbTier::First => "1st Arb",
            ArbTier::Second => "2nd Arb",
            ArbTier::Third => "3rd Arb",
            ArbTier::Fourth => "4th Arb",
            ArbTier::FreeAgentEligible => "FA Eligible",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn required_num(row: &HashMap<String, String>, key: &str) -> Option<f64> {
    let cell = row.get(key)?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse().ok()
}

fn optional_num(row: &HashMap<String, String>, key: &str) -> f64 {
    required_num(row, key).unwrap_or(0.0)
}

/// Decode the historical arbitration table, keeping only pitcher rows whose
/// ERA, IP, and SO cells are present and numeric.
pub fn load_historical(text: &str) -> Vec<HistoricalArbitrationRecord> {
    let mut lines = data_lines(text);
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = parse_header_line(header_line);

    let mut out = Vec::new();
    for line in lines {
        let row = parse_line(line, &headers);

        let is_pitcher = row.get("is_pitcher").map(String::as_str).unwrap_or("");
        if !is_pitcher.eq_ignore_ascii_case("true") {
            continue;
        }
        // ERA, IP, and SO are the matcher inputs; a row missing any of them
        // cannot be scored.
        let (Some(era), Some(innings), Some(strikeouts)) = (
            required_num(&row, "ERA"),
            required_num(&row, "IP"),
            required_num(&row, "SO"),
        ) else {
            continue;
        };

        out.push(HistoricalArbitrationRecord {
            arb_year: row
                .get("Arb_Year")
                .and_then(|cell| cell.parse().ok())
                .unwrap_or(0),
            player: row.get("Player").map(|v| v.replace('"', "")).unwrap_or_default(),
            season: row
                .get("Season")
                .and_then(|cell| cell.parse().ok())
                .unwrap_or(0),
            club: row.get("Club").cloned().unwrap_or_default(),
            mls: optional_num(&row, "MLS"),
            salary: row.get("Salary").map(|v| v.replace('"', "")).unwrap_or_default(),
            era,
            wins: optional_num(&row, "W"),
            strikeouts,
            innings,
            whip: optional_num(&row, "WHIP"),
            fip: optional_num(&row, "FIP"),
            war: optional_num(&row, "WAR"),
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Similarity matching
// ---------------------------------------------------------------------------

/// Service-time band for second-year arbitration eligibility, half-open.
const MLS_BAND: (f64, f64) = (3.15, 4.1);

// ERA dominates arbitration-value similarity, strikeouts next, innings as a
// durability signal, wins as a minor tiebreaker.
const ERA_WEIGHT: f64 = 0.4;
const SO_WEIGHT: f64 = 0.3;
const IP_WEIGHT: f64 = 0.2;
const W_WEIGHT: f64 = 0.1;

fn normalized_diff(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.max(b).max(1.0)
}

fn similarity_score(candidate: &HistoricalArbitrationRecord, reference: &SeasonStats) -> f64 {
    let era = normalized_diff(candidate.era, reference.era);
    let so = normalized_diff(candidate.strikeouts, reference.strikeouts);
    let ip = normalized_diff(candidate.innings, reference.innings);
    // Win totals vary over a narrow useful range, so the divisor gets a
    // higher floor.
    let w = (candidate.wins - reference.wins).abs()
        / candidate.wins.max(reference.wins).max(10.0);
    ERA_WEIGHT * era + SO_WEIGHT * so + IP_WEIGHT * ip + W_WEIGHT * w
}

/// True when `player` names the same person as the reference record: every
/// name token of the reference appears in the candidate name.
fn names_same_player(player: &str, reference_tokens: &[String]) -> bool {
    if reference_tokens.is_empty() {
        return false;
    }
    let name = player.to_lowercase();
    reference_tokens.iter().all(|t| name.contains(t.as_str()))
}

/// Rank the historical pool against a reference season, closest match first.
///
/// Candidates are restricted to the second-year service-time band and never
/// include the reference player. The internal distance score is a ranking
/// key only and is not part of the returned records. An empty pool yields an
/// empty vec; exact ties keep their pool order.
pub fn find_historical_comparables(
    records: &[HistoricalArbitrationRecord],
    reference: &SeasonStats,
    limit: usize,
) -> Vec<HistoricalArbitrationRecord> {
    let reference_tokens: Vec<String> = reference
        .name
        .to_lowercase()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let mut scored: Vec<(f64, &HistoricalArbitrationRecord)> = records
        .iter()
        .filter(|r| r.mls >= MLS_BAND.0 && r.mls < MLS_BAND.1)
        .filter(|r| !names_same_player(&r.player, &reference_tokens))
        .map(|r| (similarity_score(r, reference), r))
        .collect();

    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, r)| r.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Pool summary
// ---------------------------------------------------------------------------

/// Averages across a comparable set, for lining the reference player up
/// against the pool.
#[derive(Debug, Clone)]
pub struct ComparableSummary {
    pub count: usize,
    pub era: f64,
    pub wins: f64,
    pub strikeouts: f64,
    pub innings: f64,
    pub whip: f64,
    pub fip: f64,
    pub war: f64,
    /// Mean of the salaries that parse to a positive dollar amount.
    pub salary: f64,
}

/// Parse a formatted currency string ("$5,300,000") into dollars. Unparsable
/// input yields 0.
pub fn parse_salary(salary: &str) -> f64 {
    let cleaned: String = salary.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse().unwrap_or(0.0)
}

/// Average the pool's metrics. Salaries that do not parse to a positive
/// amount are excluded from the salary mean. `None` for an empty set.
pub fn summarize(comparables: &[HistoricalArbitrationRecord]) -> Option<ComparableSummary> {
    if comparables.is_empty() {
        return None;
    }
    let n = comparables.len() as f64;
    let mean = |metric: fn(&HistoricalArbitrationRecord) -> f64| -> f64 {
        comparables.iter().map(metric).sum::<f64>() / n
    };

    let salaries: Vec<f64> = comparables
        .iter()
        .map(|c| parse_salary(&c.salary))
        .filter(|s| *s > 0.0)
        .collect();
    let salary = if salaries.is_empty() {
        0.0
    } else {
        salaries.iter().sum::<f64>() / salaries.len() as f64
    };

    Some(ComparableSummary {
        count: comparables.len(),
        era: mean(|c| c.era),
        wins: mean(|c| c.wins),
        strikeouts: mean(|c| c.strikeouts),
        innings: mean(|c| c.innings),
        whip: mean(|c| c.whip),
        fip: mean(|c| c.fip),
        war: mean(|c| c.war),
        salary,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
