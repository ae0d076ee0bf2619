// Salary-arbitration prediction table and the curated comparable roster.

use crate::config::RosterEntry;
use crate::stats::{self, SeasonStats};
use crate::table::{data_lines, parse_header_line, parse_line};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One player's modeled arbitration salary. Salary fields stay as the
/// formatted currency strings the table carries ("$5,800,000").
#[derive(Debug, Clone)]
pub struct ArbitrationPrediction {
    pub player: String,
    pub arb_year: i32,
    /// Major-league service time in decimal years, e.g. 3.151.
    pub mls: f64,
    pub prev_salary: String,
    pub predicted_salary: String,
}

/// A curated comparable paired with its season stats, when resolvable.
#[derive(Debug, Clone)]
pub struct ComparableWithStats {
    pub prediction: ArbitrationPrediction,
    pub stats: Option<SeasonStats>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn unquoted(row: &std::collections::HashMap<String, String>, key: &str) -> String {
    row.get(key).map(|v| v.replace('"', "")).unwrap_or_default()
}

/// Decode every data row of the prediction table. Interior quotes are
/// stripped from the player name and both salary strings.
pub fn load_predictions(text: &str) -> Vec<ArbitrationPrediction> {
    let mut lines = data_lines(text);
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = parse_header_line(header_line);

    lines
        .map(|line| {
            let row = parse_line(line, &headers);
            ArbitrationPrediction {
                player: unquoted(&row, "Player"),
                arb_year: row
                    .get("Arb_Year")
                    .and_then(|cell| cell.parse().ok())
                    .unwrap_or(0),
                mls: row
                    .get("MLS")
                    .and_then(|cell| cell.parse().ok())
                    .unwrap_or(0.0),
                prev_salary: unquoted(&row, "Prev_Salary"),
                predicted_salary: unquoted(&row, "Predicted_Salary_2026"),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// First prediction whose player name contains both fragments,
/// case-insensitively. "Not found" is a valid outcome, not an error.
pub fn find_prediction(text: &str, first: &str, last: &str) -> Option<ArbitrationPrediction> {
    let first = first.to_lowercase();
    let last = last.to_lowercase();
    load_predictions(text).into_iter().find(|p| {
        let name = p.player.to_lowercase();
        name.contains(&first) && name.contains(&last)
    })
}

/// Split a display name into (given, surname) fragments for prediction
/// lookup. "Last, First" puts the surname before the comma; otherwise the
/// first and last whitespace tokens are used.
pub fn name_fragments(name: &str) -> (String, String) {
    let lowered = name.to_lowercase();
    if let Some((last, first)) = lowered.split_once(',') {
        return (first.trim().to_string(), last.trim().to_string());
    }
    let mut tokens = lowered.split_whitespace();
    let first = tokens.next().unwrap_or("").to_string();
    let last = tokens
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| first.clone());
    (first, last)
}

// ---------------------------------------------------------------------------
// Curated comparable roster
// ---------------------------------------------------------------------------

/// Resolve the curated roster against the prediction table, in roster order.
///
/// Entries with no matching row are skipped — no placeholder, no abort. At
/// most `limit` entries come back; the list is never padded.
pub fn select_comparables(
    text: &str,
    roster: &[RosterEntry],
    limit: usize,
) -> Vec<ArbitrationPrediction> {
    let predictions = load_predictions(text);
    let mut out = Vec::new();

    for entry in roster {
        let first = entry.first.to_lowercase();
        let last = entry.last.to_lowercase();
        let found = predictions.iter().find(|p| {
            let name = p.player.to_lowercase();
            name.contains(&first) && name.contains(&last)
        });
        if let Some(p) = found {
            out.push(p.clone());
        }
    }

    out.truncate(limit);
    out
}

/// Resolve the curated roster and attach each entry's stats for the given
/// season. Entries whose stats cannot be resolved still come back, with
/// `stats: None`.
pub fn comparables_with_stats(
    predictions_text: &str,
    stats_text: &str,
    roster: &[RosterEntry],
    limit: usize,
    season: i32,
) -> Vec<ComparableWithStats> {
    select_comparables(predictions_text, roster, limit)
        .into_iter()
        .map(|prediction| {
            let stats =
                stats::find_player_season(stats_text, &prediction.player, Some(season), season);
            ComparableWithStats { prediction, stats }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PREDICTIONS: &str = "\
Player,Arb_Year,MLS,Prev_Salary,Predicted_Salary_2026
\"Ryan, Joe\",2026,3.151,\"$3,000,000\",\"$5,800,000\"
\"Kirby, George\",2026,3.123,\"$2,800,000\",\"$5,500,000\"
\"Gilbert, Logan\",2026,4.055,\"$7,000,000\",\"$10,200,000\"
\"Brown, Hunter\",2026,3.072,\"$800,000\",\"$4,900,000\"
\"Ober, Bailey\",2026,3.101,\"$3,100,000\",\"$4,100,000\"
";

    fn roster(pairs: &[(&str, &str)]) -> Vec<RosterEntry> {
        pairs
            .iter()
            .map(|(first, last)| RosterEntry {
                first: first.to_string(),
                last: last.to_string(),
            })
            .collect()
    }

    // -- Loading --

    #[test]
    fn loads_one_prediction_per_row() {
        let predictions = load_predictions(PREDICTIONS);
        assert_eq!(predictions.len(), 5);
        assert_eq!(predictions[0].player, "Ryan, Joe");
        assert_eq!(predictions[0].arb_year, 2026);
        assert!((predictions[0].mls - 3.151).abs() < f64::EPSILON);
        assert_eq!(predictions[0].prev_salary, "$3,000,000");
        assert_eq!(predictions[0].predicted_salary, "$5,800,000");
    }

    #[test]
    fn empty_table_loads_nothing() {
        assert!(load_predictions("").is_empty());
        assert!(load_predictions("Player,Arb_Year,MLS,Prev_Salary,Predicted_Salary_2026\n").is_empty());
    }

    #[test]
    fn malformed_numeric_cells_default_to_zero() {
        let text = "Player,Arb_Year,MLS,Prev_Salary,Predicted_Salary_2026\nSomeone,n/a,,\"$1\",\"$2\"\n";
        let predictions = load_predictions(text);
        assert_eq!(predictions[0].arb_year, 0);
        assert_eq!(predictions[0].mls, 0.0);
    }

    // -- Fragment lookup --

    #[test]
    fn find_prediction_matches_both_fragments() {
        let found = find_prediction(PREDICTIONS, "joe", "ryan").expect("row exists");
        assert_eq!(found.player, "Ryan, Joe");
    }

    #[test]
    fn find_prediction_misses_are_none() {
        assert!(find_prediction(PREDICTIONS, "max", "scherzer").is_none());
    }

    #[test]
    fn name_fragments_handles_both_forms() {
        assert_eq!(
            name_fragments("Ryan, Joe"),
            ("joe".to_string(), "ryan".to_string())
        );
        assert_eq!(
            name_fragments("Joe Ryan"),
            ("joe".to_string(), "ryan".to_string())
        );
    }

    // -- Roster selection --

    #[test]
    fn roster_order_preserved() {
        let roster = roster(&[("george", "kirby"), ("bailey", "ober"), ("logan", "gilbert")]);
        let comps = select_comparables(PREDICTIONS, &roster, 5);
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0].player, "Kirby, George");
        assert_eq!(comps[1].player, "Ober, Bailey");
        assert_eq!(comps[2].player, "Gilbert, Logan");
    }

    #[test]
    fn roster_misses_skipped_without_padding() {
        let roster = roster(&[("trevor", "rogers"), ("george", "kirby")]);
        let comps = select_comparables(PREDICTIONS, &roster, 5);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].player, "Kirby, George");
    }

    #[test]
    fn limit_truncates_roster_matches() {
        let roster = roster(&[("george", "kirby"), ("bailey", "ober"), ("logan", "gilbert")]);
        let comps = select_comparables(PREDICTIONS, &roster, 2);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[1].player, "Ober, Bailey");
    }

    // -- Stats attachment --

    #[test]
    fn comparables_carry_stats_when_resolvable() {
        let stats_text = "\
Name,Season,fg_ERA,fg_SO
George Kirby,2025,3.41,179
";
        let roster = roster(&[("george", "kirby"), ("bailey", "ober")]);
        let comps = comparables_with_stats(PREDICTIONS, stats_text, &roster, 5, 2025);
        assert_eq!(comps.len(), 2);
        let kirby = comps[0].stats.as_ref().expect("kirby has 2025 stats");
        assert!((kirby.era - 3.41).abs() < f64::EPSILON);
        // Ober has a prediction but no stats row; still returned.
        assert!(comps[1].stats.is_none());
    }
}
