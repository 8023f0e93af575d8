use anyhow::Result;
use seekbox_engine::{CreateRequest, OmniboxTarget};
use serde_json::{Value, json};

use crate::host::{SearchOutcome, Selection};

/// Print a plain-text representation of the outcome.
pub(crate) fn print_plain(outcome: &SearchOutcome) {
	if !outcome.accepted {
		println!("Search cancelled (query: '{}')", outcome.query);
		return;
	}

	match &outcome.selection {
		Some(Selection::Record { field, id, label }) => println!("{field} {id}: {label}"),
		Some(Selection::Create { field, request }) => match request {
			CreateRequest::Blank => println!("create {field}"),
			CreateRequest::FromQuery(name) => println!("create {field}: {name}"),
		},
		Some(Selection::Navigate(target)) => match target {
			OmniboxTarget::Customer(id) => println!("customer {id}"),
			OmniboxTarget::WorkItem(id) => println!("work_item {id}"),
			OmniboxTarget::AllResults(query) => println!("all results for '{query}'"),
		},
		None => println!("No selection"),
	}
}

fn selection_json(selection: &Selection) -> Value {
	match selection {
		Selection::Record { field, id, label } => json!({
			"type": "record",
			"field": field,
			"id": id,
			"label": label,
		}),
		Selection::Create { field, request } => json!({
			"type": "create",
			"field": field,
			"name": match request {
				CreateRequest::Blank => Value::Null,
				CreateRequest::FromQuery(name) => Value::from(name.as_str()),
			},
		}),
		Selection::Navigate(OmniboxTarget::Customer(id)) => json!({
			"type": "navigate",
			"target": "customer",
			"id": id,
		}),
		Selection::Navigate(OmniboxTarget::WorkItem(id)) => json!({
			"type": "navigate",
			"target": "work_item",
			"id": id,
		}),
		Selection::Navigate(OmniboxTarget::AllResults(query)) => json!({
			"type": "navigate",
			"target": "all_results",
			"query": query,
		}),
	}
}

pub(crate) fn format_outcome_json(outcome: &SearchOutcome) -> Result<String> {
	let payload = json!({
		"accepted": outcome.accepted,
		"query": outcome.query,
		"selection": outcome.selection.as_ref().map(selection_json),
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

pub(crate) fn print_json(outcome: &SearchOutcome) -> Result<()> {
	println!("{}", format_outcome_json(outcome)?);
	Ok(())
}
