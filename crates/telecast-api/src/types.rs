use serde::{Deserialize, Serialize};

/// Image variants as served by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rating {
    pub average: Option<f64>,
}

/// A show as returned by the index, search, and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: Option<Rating>,
    pub image: Option<Image>,
    pub summary: Option<String>,
    pub language: Option<String>,
    pub status: Option<String>,
    pub premiered: Option<String>,
    #[serde(rename = "officialSite")]
    pub official_site: Option<String>,
    pub runtime: Option<u32>,
}

impl Show {
    /// Sort key for rating-ordered views; a missing rating sorts as -1.
    pub fn rating_key(&self) -> f64 {
        self.rating.as_ref().and_then(|r| r.average).unwrap_or(-1.0)
    }
}

/// One search hit: relevance score plus the matched show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub score: f64,
    pub show: Show,
}

/// A value that may arrive as a JSON number or a numeric string.
///
/// The episodes endpoint is loose about `season`: specials sometimes carry a
/// string-typed season, so grouping has to coerce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeasonNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl SeasonNumber {
    /// Coerce to a whole-numbered season, or `None` when that is impossible.
    pub fn as_season(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) => None,
            Self::Text(s) => {
                let parsed: f64 = s.trim().parse().ok()?;
                (parsed.is_finite() && parsed.fract() == 0.0).then_some(parsed as i64)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    pub season: Option<SeasonNumber>,
    pub number: Option<i64>,
    pub airdate: Option<String>,
    pub airtime: Option<String>,
    pub runtime: Option<u32>,
    pub summary: Option<String>,
    pub image: Option<Image>,
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: Option<String>,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub image: Option<Image>,
}

/// A person/character pairing from the cast endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub person: Person,
    pub character: Character,
    #[serde(rename = "self")]
    pub is_self: Option<bool>,
    pub voice: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_coercion() {
        assert_eq!(SeasonNumber::Int(3).as_season(), Some(3));
        assert_eq!(SeasonNumber::Float(2.0).as_season(), Some(2));
        assert_eq!(SeasonNumber::Float(2.5).as_season(), None);
        assert_eq!(SeasonNumber::Float(f64::NAN).as_season(), None);
        assert_eq!(SeasonNumber::Text("4".into()).as_season(), Some(4));
        assert_eq!(SeasonNumber::Text(" 5 ".into()).as_season(), Some(5));
        assert_eq!(SeasonNumber::Text("special".into()).as_season(), None);
        assert_eq!(SeasonNumber::Text("".into()).as_season(), None);
    }

    #[test]
    fn test_show_rating_key() {
        let mut show: Show = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Test",
            "genres": [],
            "rating": { "average": 8.4 }
        }))
        .unwrap();
        assert_eq!(show.rating_key(), 8.4);

        show.rating = Some(Rating { average: None });
        assert_eq!(show.rating_key(), -1.0);

        show.rating = None;
        assert_eq!(show.rating_key(), -1.0);
    }

    #[test]
    fn test_episode_deserializes_string_season() {
        let episode: Episode = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Pilot",
            "season": "1",
            "number": null
        }))
        .unwrap();
        assert_eq!(episode.season.as_ref().and_then(|s| s.as_season()), Some(1));
        assert_eq!(episode.number, None);
    }

    #[test]
    fn test_cast_member_self_field() {
        let member: CastMember = serde_json::from_value(serde_json::json!({
            "person": { "id": 1, "name": "Jane Doe" },
            "character": { "id": 2, "name": "The Doctor" },
            "self": false,
            "voice": true
        }))
        .unwrap();
        assert_eq!(member.is_self, Some(false));
        assert_eq!(member.voice, Some(true));
        assert_eq!(member.person.name.as_deref(), Some("Jane Doe"));
    }
}
