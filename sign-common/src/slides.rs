use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_json::Value;
use time::OffsetDateTime;

pub const STANDINGS: &str = "standings";
pub const LAST_GAME: &str = "lastGame";
pub const NEXT_GAME: &str = "nextGame";

/// Brand colors for a team, as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColors {
    pub primary: String,
    pub secondary: String,
}

impl TeamColors {
    pub fn new(primary: &str, secondary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub rank: u32,
    pub abbreviation: String,
    pub wins: u32,
    pub losses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<TeamColors>,
}

impl StandingsRow {
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsSlide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_name: Option<String>,
    pub teams: Vec<StandingsRow>,
}

impl StandingsSlide {
    /// Orders the rows by rank. Rows that share a rank keep their received order.
    pub fn sort_by_rank(&mut self) {
        self.teams.sort_by_key(|team| team.rank);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreRow {
    pub abbreviation: String,
    pub hits: u32,
    pub runs: u32,
    pub errors: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<TeamColors>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastGameSlide {
    pub away: BoxScoreRow,
    pub home: BoxScoreRow,
    #[serde(with = "time::serde::rfc3339")]
    pub game_date: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub abbreviation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<TeamColors>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextGameSlide {
    pub team: TeamRef,
    pub opponent: TeamRef,
    pub is_home: bool,
    #[serde(default)]
    pub venue: String,
    #[serde(with = "time::serde::rfc3339")]
    pub game_date: OffsetDateTime,
}

/// A slide whose `slideType` this build does not know. The raw JSON is kept so it can be
/// logged and written back to the cache unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSlide {
    pub slide_type: String,
    pub raw: Value,
}

/// One unit of rotating sign content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slide {
    Standings(StandingsSlide),
    LastGame(LastGameSlide),
    NextGame(NextGameSlide),
    Unknown(UnknownSlide),
}

impl Slide {
    pub fn slide_type(&self) -> &str {
        match self {
            Self::Standings(_) => STANDINGS,
            Self::LastGame(_) => LAST_GAME,
            Self::NextGame(_) => NEXT_GAME,
            Self::Unknown(u) => &u.slide_type,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

#[derive(Serialize)]
#[serde(tag = "slideType")]
enum TaggedSlide<'a> {
    #[serde(rename = "standings")]
    Standings(&'a StandingsSlide),
    #[serde(rename = "lastGame")]
    LastGame(&'a LastGameSlide),
    #[serde(rename = "nextGame")]
    NextGame(&'a NextGameSlide),
}

impl Serialize for Slide {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Standings(s) => TaggedSlide::Standings(s).serialize(serializer),
            Self::LastGame(s) => TaggedSlide::LastGame(s).serialize(serializer),
            Self::NextGame(s) => TaggedSlide::NextGame(s).serialize(serializer),
            Self::Unknown(u) => u.raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Slide {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let slide_type = raw
            .get("slideType")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("slideType"))?
            .to_string();

        let slide = match slide_type.as_str() {
            STANDINGS => Self::Standings(serde_json::from_value(raw).map_err(D::Error::custom)?),
            LAST_GAME => Self::LastGame(serde_json::from_value(raw).map_err(D::Error::custom)?),
            NEXT_GAME => Self::NextGame(serde_json::from_value(raw).map_err(D::Error::custom)?),
            _ => Self::Unknown(UnknownSlide {
                slide_type: slide_type.clone(),
                raw,
            }),
        };
        Ok(slide)
    }
}
