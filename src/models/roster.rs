use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::protocol::day_first;

/// A member of parliament from the master data table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Legislator {
    pub legislator_id: String,
    /// Salutation and academic titles, e.g. `Dr.`
    #[serde(default)]
    pub title: Option<String>,
    pub given_name: String,
    pub family_name: String,
}

/// One row of the election period table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    pub legislator_id: String,
    pub term_id: String,
    #[serde(with = "day_first")]
    pub term_start: NaiveDate,
    /// Missing for members still in office
    #[serde(default, with = "day_first::option")]
    pub term_end: Option<NaiveDate>,
}

/// The roster input: master data plus term table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterTables {
    pub legislators: Vec<Legislator>,
    pub terms: Vec<TermRecord>,
}

/// A term joined with the legislator's name attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegislatorTerm {
    pub legislator_id: String,
    pub term_id: String,
    pub term_start: NaiveDate,
    pub term_end: Option<NaiveDate>,
    pub title: Option<String>,
    pub given_name: String,
    pub family_name: String,
}

impl LegislatorTerm {
    /// Whether the term covers `date`, both ends inclusive
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.term_start <= date && self.term_end.is_none_or(|end| date <= end)
    }

    /// `title given family`, with no leading space when the title is absent
    pub fn canonical_name(&self) -> String {
        match self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => format!("{} {} {}", title, self.given_name, self.family_name),
            None => format!("{} {}", self.given_name, self.family_name),
        }
    }
}

/// A legislator in office on a given session date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRosterEntry {
    pub legislator_id: String,
    pub canonical_full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(title: Option<&str>) -> LegislatorTerm {
        LegislatorTerm {
            legislator_id: "11000001".to_string(),
            term_id: "19".to_string(),
            term_start: NaiveDate::from_ymd_opt(2017, 10, 24).unwrap(),
            term_end: Some(NaiveDate::from_ymd_opt(2021, 10, 26).unwrap()),
            title: title.map(str::to_string),
            given_name: "Hans".to_string(),
            family_name: "Müller".to_string(),
        }
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(term(None).canonical_name(), "Hans Müller");
        assert_eq!(term(Some("  ")).canonical_name(), "Hans Müller");
        assert_eq!(term(Some(" Dr. ")).canonical_name(), "Dr. Hans Müller");
    }

    #[test]
    fn test_is_active_on_inclusive() {
        let t = term(None);
        assert!(t.is_active_on(NaiveDate::from_ymd_opt(2017, 10, 24).unwrap()));
        assert!(t.is_active_on(NaiveDate::from_ymd_opt(2021, 10, 26).unwrap()));
        assert!(!t.is_active_on(NaiveDate::from_ymd_opt(2021, 10, 27).unwrap()));
        assert!(!t.is_active_on(NaiveDate::from_ymd_opt(2017, 10, 23).unwrap()));
    }

    #[test]
    fn test_open_ended_term() {
        let mut t = term(None);
        t.term_end = None;
        assert!(t.is_active_on(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn test_term_record_empty_end() {
        let json = r#"{"legislator_id": "1", "term_id": "20", "term_start": "26.10.2021", "term_end": ""}"#;
        let record: TermRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.term_end, None);
    }
}
