use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{ActiveRosterEntry, LegislatorTerm, RosterTables};

/// Join the term table with the legislators' name attributes.
///
/// Terms whose legislator is missing from the master data are dropped.
pub fn join_roster(tables: &RosterTables) -> Vec<LegislatorTerm> {
    let by_id: HashMap<&str, _> = tables
        .legislators
        .iter()
        .map(|l| (l.legislator_id.as_str(), l))
        .collect();

    let mut dropped = 0usize;
    let terms: Vec<LegislatorTerm> = tables
        .terms
        .iter()
        .filter_map(|term| {
            let Some(legislator) = by_id.get(term.legislator_id.as_str()) else {
                dropped += 1;
                return None;
            };
            Some(LegislatorTerm {
                legislator_id: term.legislator_id.clone(),
                term_id: term.term_id.clone(),
                term_start: term.term_start,
                term_end: term.term_end,
                title: legislator.title.clone(),
                given_name: legislator.given_name.clone(),
                family_name: legislator.family_name.clone(),
            })
        })
        .collect();

    if dropped > 0 {
        warn!("Dropped {} terms referencing unknown legislators", dropped);
    }

    terms
}

/// Legislators in office on `session_date`, one entry per legislator.
///
/// A legislator with several terms covering the date (e.g. a by-election
/// inside the same period) appears once, in order of their first term.
pub fn active_roster(terms: &[LegislatorTerm], session_date: NaiveDate) -> Vec<ActiveRosterEntry> {
    let mut seen: HashSet<&str> = HashSet::new();

    terms
        .iter()
        .filter(|t| t.is_active_on(session_date))
        .filter(|t| seen.insert(t.legislator_id.as_str()))
        .map(|t| ActiveRosterEntry {
            legislator_id: t.legislator_id.clone(),
            canonical_full_name: t.canonical_name(),
        })
        .collect()
}

/// Active rosters computed once per session date
#[derive(Debug, Default)]
pub struct RosterCache {
    terms: Vec<LegislatorTerm>,
    by_date: HashMap<NaiveDate, Vec<ActiveRosterEntry>>,
}

impl RosterCache {
    pub fn new(terms: Vec<LegislatorTerm>) -> Self {
        Self {
            terms,
            by_date: HashMap::new(),
        }
    }

    pub fn get(&mut self, session_date: NaiveDate) -> &[ActiveRosterEntry] {
        let terms = &self.terms;
        self.by_date.entry(session_date).or_insert_with(|| {
            let roster = active_roster(terms, session_date);
            debug!("Active roster for {}: {} legislators", session_date, roster.len());
            roster
        })
    }

    pub fn cached_dates(&self) -> usize {
        self.by_date.len()
    }
}
