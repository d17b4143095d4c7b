use log::{info, warn};

use runoff_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

#[derive(Debug, Snafu)]
pub enum DemoError {
    #[snafu(display("unknown scenario {name:?}, available: {available}"))]
    UnknownScenario { name: String, available: String },

    #[snafu(display("tabulation failed for scenario {scenario}"))]
    Tabulation {
        source: ElectionError,
        scenario: String,
    },

    #[snafu(display("could not render the JSON summary"))]
    RenderingSummary { source: serde_json::Error },

    #[snafu(display("could not write the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("could not open the reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("could not parse the reference summary {path}"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type DemoResult<T> = Result<T, DemoError>;

/// One illustrative election: a slate and the classic three preference
/// columns, one entry per voter, empty strings marking ranks with no vote.
struct Scenario {
    name: &'static str,
    note: &'static str,
    candidates: &'static [&'static str],
    columns: [&'static [&'static str]; 3],
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "first-round-majority",
        note: "one candidate clears the bar in the first round",
        candidates: &["A", "B", "C"],
        columns: [
            &["B", "B", "A", "B", "B"],
            &["", "", "", "", ""],
            &["", "", "", "", ""],
        ],
    },
    Scenario {
        name: "three-way-tie",
        note: "a dead-even slate, the winner is drawn by lot",
        candidates: &["A", "B", "C"],
        columns: [
            &["B", "B", "A", "A", "C", "C"],
            &["", "", "", "", "", ""],
            &["", "", "", "", "", ""],
        ],
    },
    Scenario {
        name: "second-round-transfer",
        note: "the weakest candidate's ballot decides the second round",
        candidates: &["A", "B", "C"],
        columns: [
            &["A", "B", "C", "A", "B"],
            &["B", "B", "A", "B", "B"],
            &["C", "B", "B", "A", "B"],
        ],
    },
    Scenario {
        name: "two-way-tie-after-transfer",
        note: "the transfer leaves two candidates dead even",
        candidates: &["A", "B", "C"],
        columns: [
            &["A", "B", "C", "A", "B", "B"],
            &["", "", "A", "", "", ""],
            &["", "", "", "", "", ""],
        ],
    },
    Scenario {
        name: "four-candidates",
        note: "two eliminations before a third-round winner",
        candidates: &["A", "B", "C", "D"],
        columns: [
            &["A", "A", "B", "B", "B", "C", "C", "C", "D"],
            &["C", "C", "", "", "", "", "", "", "C"],
            &["", "", "", "", "", "", "", "", ""],
        ],
    },
];

fn run_scenario(
    sc: &Scenario,
    seed: Option<u64>,
    verbose: bool,
) -> Result<ElectionResult, ElectionError> {
    let candidates: Vec<String> = sc.candidates.iter().map(|s| s.to_string()).collect();
    let columns: Vec<Vec<String>> = sc
        .columns
        .iter()
        .map(|col| col.iter().map(|s| s.to_string()).collect())
        .collect();
    let column_refs: Vec<&[String]> = columns.iter().map(|c| c.as_slice()).collect();
    let builder = Builder::from_columns(&candidates, &column_refs)?;
    let mut sink = ConsoleReport { verbose };
    match seed {
        Some(s) => builder.tabulate_seeded(&mut sink, s),
        None => builder.tabulate(&mut sink),
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct SummaryInfo {
    program: String,
    seed: Option<u64>,
}

fn result_stats_to_json(rs: &ElectionResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (name, count) in round_stat.tally.iter() {
            tally.insert(name.clone(), json!(count.to_string()));
        }

        let mut tally_results: Vec<JSValue> = Vec::new();
        if let Some(name) = &round_stat.eliminated {
            tally_results.push(json!({ "eliminated": name }));
        }
        if let Some(name) = &round_stat.elected {
            tally_results.push(json!({ "elected": name }));
        }

        let js = json!({
            "round": round_stat.round,
            "totalVotes": round_stat.total_votes,
            "tally": tally,
            "tallyResults": tally_results
        });
        l.push(js);
    }
    l
}

fn scenario_summary_js(name: &str, result: &ElectionResult) -> JSValue {
    json!({
        "scenario": name,
        "winner": result.winner,
        "results": result_stats_to_json(result)
    })
}

fn build_summary_js(args: &Args, scenarios: Vec<JSValue>) -> JSValue {
    let info = SummaryInfo {
        program: "rcvtally".to_string(),
        seed: args.seed,
    };
    json!({ "config": info, "scenarios": scenarios })
}

fn read_summary(path: &str) -> DemoResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingReferenceSnafu { path })?;
    Ok(js)
}

pub fn run(args: &Args) -> DemoResult<()> {
    let selected: Vec<&Scenario> = match &args.scenario {
        Some(name) => match SCENARIOS.iter().find(|sc| sc.name == name.as_str()) {
            Some(sc) => vec![sc],
            None => {
                let available: Vec<&str> = SCENARIOS.iter().map(|sc| sc.name).collect();
                return UnknownScenarioSnafu {
                    name: name.clone(),
                    available: available.join(", "),
                }
                .fail();
            }
        },
        None => SCENARIOS.iter().collect(),
    };

    let mut summaries: Vec<JSValue> = Vec::new();
    for sc in selected {
        println!("{}", "=".repeat(70));
        println!("Scenario {}: {}", sc.name, sc.note);
        info!("scenario {}: {} ballots", sc.name, sc.columns[0].len());
        let result = run_scenario(sc, args.seed, args.verbose)
            .context(TabulationSnafu { scenario: sc.name })?;
        if result.winner.is_none() {
            println!("No candidate reached a majority.");
        }
        summaries.push(scenario_summary_js(sc.name, &result));
    }

    let summary = build_summary_js(args, summaries);
    let pretty = serde_json::to_string_pretty(&summary).context(RenderingSummarySnafu {})?;

    if let Some(out) = &args.out {
        if out == "stdout" {
            println!("{}", pretty);
        } else {
            fs::write(out, &pretty).context(WritingSummarySnafu { path: out.clone() })?;
            info!("summary written to {}", out);
        }
    }

    // The reference summary, if provided for comparison.
    if let Some(reference) = &args.reference {
        let summary_ref = read_summary(reference)?;
        let pretty_ref =
            serde_json::to_string_pretty(&summary_ref).context(RenderingSummarySnafu {})?;
        if pretty_ref != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
            whatever!("Difference detected between calculated summary and reference summary");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_tabulate_with_a_fixed_seed() {
        for sc in SCENARIOS.iter() {
            let result = run_scenario(sc, Some(7), false).unwrap();
            assert!(!result.round_stats.is_empty(), "scenario {}", sc.name);
            assert!(result.winner.is_some(), "scenario {}", sc.name);
        }
    }

    #[test]
    fn deterministic_scenarios_have_known_winners() {
        let expected = [
            ("first-round-majority", "B"),
            ("second-round-transfer", "A"),
            ("four-candidates", "C"),
        ];
        for (name, winner) in expected.iter() {
            let sc = SCENARIOS.iter().find(|sc| sc.name == *name).unwrap();
            let result = run_scenario(sc, Some(7), false).unwrap();
            assert_eq!(result.winner.as_deref(), Some(*winner), "scenario {}", name);
        }
    }

    #[test]
    fn summary_has_one_entry_per_round() {
        let sc = SCENARIOS
            .iter()
            .find(|sc| sc.name == "second-round-transfer")
            .unwrap();
        let result = run_scenario(sc, Some(7), false).unwrap();
        let js = scenario_summary_js(sc.name, &result);
        let rounds = js["results"].as_array().unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0]["tally"]["C"], json!("1"));
        assert_eq!(rounds[0]["tallyResults"][0]["eliminated"], json!("C"));
        assert_eq!(rounds[1]["tallyResults"][0]["elected"], json!("A"));
        assert_eq!(js["winner"], json!("A"));
    }
}
