//! Offline evaluation of activities against an account document and a
//! decoded-sections fixture.
//!
//! The fixture stands in for a request's GPP signal: the section ids the
//! request would declare, plus a JSON document of decoded fields per section,
//! consumed through the engine's JSON section sources.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use privacy_gate_common::activity::{Activity, ActivityInvocation};
use privacy_gate_common::creator::CreatorRegistry;
use privacy_gate_common::gpp::GppContext;
use privacy_gate_common::infrastructure::ActivityInfrastructure;
use privacy_gate_common::metrics::{AlertCategory, AtomicMetrics, Metrics};

use crate::config::load_account_config;
use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct SectionsFixture {
    #[serde(default)]
    section_ids: Vec<u32>,
    #[serde(default)]
    sections: HashMap<String, serde_json::Value>,
}

fn load_fixture(path: &PathBuf) -> Result<GppContext, CliError> {
    let content = fs::read_to_string(path)?;
    let fixture: SectionsFixture = serde_json::from_str(&content)?;

    let mut sections = HashMap::new();
    for (key, fields) in fixture.sections {
        let section_id: u32 = key.parse().map_err(|_| {
            CliError::Fixture(format!("section key '{key}' is not a section id"))
        })?;
        sections.insert(section_id, fields.to_string());
    }

    Ok(GppContext::new(fixture.section_ids, sections))
}

/// Evaluate one or all activities and print per-qualifier decisions.
pub fn evaluate(
    config: PathBuf,
    sections: PathBuf,
    activity: Option<String>,
    bidder: Option<String>,
    verbose: bool,
) -> Result<(), CliError> {
    let account = load_account_config(&config, verbose)?;
    let gpp = load_fixture(&sections)?;

    let activities: Vec<Activity> = match activity {
        Some(name) => vec![name
            .parse::<Activity>()
            .map_err(|e| CliError::Config(e.to_string()))?],
        None => Activity::ALL.to_vec(),
    };
    let invocation = match bidder {
        Some(name) => ActivityInvocation::bidder(name),
        None => ActivityInvocation::general(),
    };

    let metrics = Arc::new(AtomicMetrics::new());
    let registry = CreatorRegistry::with_defaults(Arc::clone(&metrics) as Arc<dyn Metrics>);
    let infrastructure = ActivityInfrastructure::new(registry, account, gpp);

    for activity in activities {
        println!("{activity}:");
        for (qualifier, decision) in infrastructure.qualifier_decisions(activity, &invocation) {
            println!("  {qualifier}: {decision}");
        }
        let verdict = if infrastructure.is_allowed(activity, &invocation) {
            "allowed"
        } else {
            "blocked"
        };
        println!("  final: {verdict}");
    }

    let alerts = metrics.alerts(AlertCategory::General);
    if alerts > 0 {
        println!();
        println!("{alerts} malformed section(s) skipped, see warnings");
    }

    Ok(())
}
