use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day-first date format used by the Bundestag open data exports
pub const DAY_FIRST_FORMAT: &str = "%d.%m.%Y";

/// Parse a day-first date such as `17.01.2018`
pub fn parse_day_first(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FIRST_FORMAT)
        .with_context(|| format!("Invalid day-first date: {:?}", value))
}

/// One plenary session as handed over by the XML loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolRecord {
    /// Raw protocol text, including head and tail boilerplate
    pub text: String,
    /// Protocol identifier, e.g. `19/6`
    pub protocol_number: String,
    /// Session date
    #[serde(with = "day_first")]
    pub date: NaiveDate,
}

impl ProtocolRecord {
    /// Protocol number made safe for use as a file stem
    pub fn file_stem(&self) -> String {
        self.protocol_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }
}

/// Serde adapter for `DD.MM.YYYY` dates
pub mod day_first {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DAY_FIRST_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DAY_FIRST_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), DAY_FIRST_FORMAT).map_err(serde::de::Error::custom)
    }

    /// Same format, but empty strings and nulls mean "no date"
    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::DAY_FIRST_FORMAT;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&d.format(DAY_FIRST_FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => NaiveDate::parse_from_str(s, DAY_FIRST_FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_protocol_record() {
        let json = r#"{"text": "...", "protocol_number": "19/6", "date": "17.01.2018"}"#;
        let record: ProtocolRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.protocol_number, "19/6");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2018, 1, 17).unwrap());
        assert_eq!(record.file_stem(), "19_6");
    }

    #[test]
    fn test_parse_day_first_rejects_iso() {
        assert!(parse_day_first("2018-01-17").is_err());
        assert_eq!(
            parse_day_first(" 01.02.1990 ").unwrap(),
            NaiveDate::from_ymd_opt(1990, 2, 1).unwrap()
        );
    }
}
