//! Tournament reports as exported by the list-juggler service.
//!
//! Reports are wrapped in a `{"tournament": {...}}` envelope. Many fields are
//! routinely `null` or missing in real exports, so nearly everything here
//! defaults instead of failing.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{MetaError, Result};
use crate::numbers::{null_as_default, null_elements_as_default, null_values_as_default};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Venue {
    #[serde(rename = "venue", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
}

/// One fielded pilot as referenced by a report: pilot and ship short codes
/// plus the upgrades chosen, keyed by slot code (`ept`, `amd`, `crew`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PilotInstance {
    #[serde(rename = "name", default, deserialize_with = "null_as_default")]
    pub pilot: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ship: String,
    #[serde(default, deserialize_with = "null_values_as_default")]
    pub upgrades: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct List {
    #[serde(default, deserialize_with = "null_as_default")]
    pub faction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pilots: Vec<PilotInstance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rank {
    #[serde(default, deserialize_with = "null_as_default")]
    pub swiss: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elimination: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Player {
    #[serde(default)]
    pub list: Option<List>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tournament {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// ISO `YYYY-MM-DD`; kept raw because some reports carry other shapes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// Tier label such as `Regional` or `Store Championship`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub scope: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participant_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: Venue,
    /// Round length in minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub round_length: i64,
    /// `null` entries become empty players so they still count as listed.
    #[serde(default, deserialize_with = "null_elements_as_default")]
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(alias = "Tournament")]
    tournament: Tournament,
}

impl Tournament {
    /// Parse a report file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::MalformedReport`] with the line and column of
    /// the first syntax or shape error.
    pub fn from_json(report: &str, json: &str) -> Result<Self> {
        serde_json::from_str::<Envelope>(json)
            .map(|envelope| envelope.tournament)
            .map_err(|err| MetaError::malformed_report(report, err))
    }

    /// Players that reported a list, in report order.
    pub fn players_with_lists(&self) -> impl Iterator<Item = (&Player, &List)> {
        self.players
            .iter()
            .filter_map(|player| player.list.as_ref().map(|list| (player, list)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "tournament": {
            "name": "Spring Regional",
            "date": "2016-04-02",
            "type": "Regional",
            "format": "Standard - 100 Point Dogfight",
            "participant_count": null,
            "round_length": 75,
            "venue": {"venue": "Game Vault", "country": "USA", "state": "MA", "city": null},
            "players": [
                {
                    "list": {
                        "faction": "rebel",
                        "pilots": [
                            {"name": "lukeskywalker", "ship": "xwing", "upgrades": {"ept": ["veteraninstincts"], "amd": ["r2d2"]}},
                            {"name": "biggsdarklighter", "ship": "xwing", "upgrades": null}
                        ]
                    },
                    "rank": {"swiss": 1, "elimination": null}
                },
                {"list": null, "rank": null},
                {"rank": {"swiss": 3}}
            ]
        }
    }"#;

    #[test]
    fn parses_report_with_nulls() {
        let t = Tournament::from_json("9.json", REPORT).unwrap();
        assert_eq!(t.name, "Spring Regional");
        assert_eq!(t.scope, "Regional");
        assert_eq!(t.participant_count, 0);
        assert_eq!(t.round_length, 75);
        assert_eq!(t.venue.name, "Game Vault");
        assert_eq!(t.venue.city, "");
        assert_eq!(t.players.len(), 3);
        assert_eq!(t.players[1].rank, Rank::default());
        assert_eq!(t.players[2].rank.swiss, 3);

        let list = t.players[0].list.as_ref().unwrap();
        assert_eq!(list.pilots[0].pilot, "lukeskywalker");
        assert_eq!(list.pilots[0].upgrades["amd"], vec!["r2d2"]);
        assert!(list.pilots[1].upgrades.is_empty());
    }

    #[test]
    fn only_players_with_lists_are_iterated() {
        let t = Tournament::from_json("9.json", REPORT).unwrap();
        let ranks: Vec<_> = t.players_with_lists().map(|(p, _)| p.rank.swiss).collect();
        assert_eq!(ranks, vec![1]);
    }

    #[test]
    fn null_upgrade_slots_and_players_are_tolerated() {
        let json = r#"{"tournament": {"players": [
            null,
            {"list": {"faction": "rebel", "pilots": [
                {"name": "lukeskywalker", "ship": "xwing", "upgrades": {"ept": null, "amd": ["r2d2"]}}
            ]}, "rank": {"swiss": 1}}
        ]}}"#;
        let t = Tournament::from_json("10.json", json).unwrap();
        assert_eq!(t.players.len(), 2);
        assert_eq!(t.players[0], Player::default());
        let (_, list) = t.players_with_lists().next().unwrap();
        let upgrades = &list.pilots[0].upgrades;
        assert!(upgrades["ept"].is_empty());
        assert_eq!(upgrades["amd"], vec!["r2d2"]);
    }

    #[test]
    fn syntax_errors_point_at_the_line() {
        let broken = "{\n  \"tournament\": {\n    \"name\": \"x\",,\n  }\n}";
        let err = Tournament::from_json("bad.json", broken).unwrap_err();
        match err {
            MetaError::MalformedReport { report, line, .. } => {
                assert_eq!(report, "bad.json");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_envelope_is_malformed() {
        let err = Tournament::from_json("flat.json", r#"{"name": "x"}"#).unwrap_err();
        assert!(err.is_malformed_report());
    }
}
