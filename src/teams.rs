use serde::{Deserialize, Serialize};

pub const NFC: &str = "NFC";
pub const AFC: &str = "AFC";
pub const NFL: &str = "NFL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uniform {
    pub base: String,
    pub highlight: String,
    pub number: String,
    pub number_highlight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_code: String,
    pub nickname: String,
    pub endzone_text: String,
    pub endzone_shadow: String,
    pub home_uni: Uniform,
    pub away_uni: Uniform,
}

impl TeamInfo {
    /// Builds a team from its three club colours; dark-on-light home kit,
    /// light-on-dark away kit.
    pub fn from_palette(code: &str, nickname: &str, primary: &str, secondary: &str, ternary: &str) -> Self {
        Self {
            team_code: code.to_string(),
            nickname: nickname.to_string(),
            endzone_text: secondary.to_string(),
            endzone_shadow: primary.to_string(),
            home_uni: Uniform {
                base: primary.to_string(),
                highlight: secondary.to_string(),
                number: secondary.to_string(),
                number_highlight: primary.to_string(),
            },
            away_uni: Uniform {
                base: ternary.to_string(),
                highlight: primary.to_string(),
                number: primary.to_string(),
                number_highlight: secondary.to_string(),
            },
        }
    }

    pub fn uniform(&self, is_home: bool) -> &Uniform {
        if is_home { &self.home_uni } else { &self.away_uni }
    }
}

// code, nickname, primary, secondary, ternary
const BUILTIN_TEAMS: [(&str, &str, &str, &str, &str); 34] = [
    ("ARI", "CARDINALS", "#000000", "#99213e", "#ffb700"),
    ("ATL", "FALCONS", "#000000", "#a9162d", "#ffffff"),
    ("BAL", "RAVENS", "#bc9428", "#241075", "#ffffff"),
    ("BUF", "BILLS", "#00308f", "#ffffff", "#c8023a"),
    ("CAR", "PANTHERS", "#0085ca", "#101820", "#bfc0bf"),
    ("CHI", "BEARS", "#0b162a", "#e64100", "#ffffff"),
    ("CIN", "BENGALS", "#fb4f14", "#000000", "#ffffff"),
    ("CLE", "BROWNS", "#311d00", "#ff3c00", "#ffffff"),
    ("DAL", "COWBOYS", "#ffffff", "#041e42", "#869397"),
    ("DEN", "BRONCOS", "#fb4f14", "#002244", "#ffffff"),
    ("DET", "LIONS", "#0076b6", "#b0b7bc", "#ffffff"),
    ("GB", "PACKERS", "#203731", "#ffb612", "#ffffff"),
    ("HOU", "TEXANS", "#03202f", "#ffffff", "#a71930"),
    ("IND", "COLTS", "#002c5f", "#ffffff", "#a2aaad"),
    ("JAX", "JAGUARS", "#101820", "#006778", "#9f792c"),
    ("KC", "CHIEFS", "#ffffff", "#e31837", "#ffb81c"),
    ("LA", "RAMS", "#003594", "#ffa300", "#ffffff"),
    ("LAC", "CHARGERS", "#0080c6", "#ffc20e", "#ffffff"),
    ("MIA", "DOLPHINS", "#008e97", "#ffffff", "#fc4c02"),
    ("MIN", "VIKINGS", "#ffc62f", "#4f2683", "#ffffff"),
    ("NE", "PATRIOTS", "#002244", "#c60c30", "#b0b7bc"),
    ("NO", "SAINTS", "#d3bc8d", "#101820", "#ffffff"),
    ("NYG", "GIANTS", "#0b2265", "#a5acaf", "#a71930"),
    ("NYJ", "JETS", "#125740", "#ffffff", "#000000"),
    ("OAK", "RAIDERS", "#000000", "#a5acaf", "#ffffff"),
    ("PHI", "EAGLES", "#004c54", "#ffffff", "#565a5c"),
    ("PIT", "STEELERS", "#ffb612", "#101820", "#ffffff"),
    ("SEA", "SEAHAWKS", "#002244", "#69be28", "#a5acaf"),
    ("SF", "49ERS", "#aa0000", "#ffffff", "#b3995d"),
    ("TB", "BUCCANEERS", "#d50a0a", "#ffffff", "#34302b"),
    ("TEN", "TITANS", "#0c2340", "#4b92db", "#8a8d8f"),
    ("WAS", "WASHINGTON", "#773141", "#ffb612", "#ffffff"),
    (NFC, "NFC", "#f5f7f8", "#033c67", "#839eb4"),
    (AFC, "AFC", "#f6f4f4", "#ce1227", "#f2bec3"),
];

/// Reference table used when no `team_data.csv` is present.
pub fn builtin_teams() -> Vec<TeamInfo> {
    BUILTIN_TEAMS
        .iter()
        .map(|(code, nickname, primary, secondary, ternary)| {
            TeamInfo::from_palette(code, nickname, primary, secondary, ternary)
        })
        .collect()
}

pub fn find_team<'a>(teams: &'a [TeamInfo], code: &str) -> Option<&'a TeamInfo> {
    teams.iter().find(|t| t.team_code.eq_ignore_ascii_case(code))
}

/// True for the two conference pseudo-teams.
pub fn is_conference(code: &str) -> bool {
    code.eq_ignore_ascii_case(NFC) || code.eq_ignore_ascii_case(AFC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_every_club_and_both_conferences() {
        let teams = builtin_teams();
        assert_eq!(teams.len(), 34);
        assert_eq!(find_team(&teams, "gb").map(|t| t.nickname.as_str()), Some("PACKERS"));
        assert!(find_team(&teams, NFC).is_some());
        assert!(find_team(&teams, AFC).is_some());
        assert!(find_team(&teams, "XYZ").is_none());
    }

    #[test]
    fn palette_drives_both_uniforms() {
        let t = TeamInfo::from_palette("CHI", "BEARS", "#0b162a", "#e64100", "#ffffff");
        assert_eq!(t.uniform(true).base, "#0b162a");
        assert_eq!(t.uniform(false).base, "#ffffff");
        assert_eq!(t.endzone_shadow, "#0b162a");
    }
}
