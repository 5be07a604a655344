use serde::{Deserialize, Serialize};

/// One editor diagnostic produced by the error-hunting analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMarker {
    /// 1-based source line the marker points at.
    pub line: u32,
    /// Arabic description of the problem.
    pub message: String,
}

/// A generated bug-hunt round: a snippet with a hidden logic bug.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenCode {
    pub code: String,
    pub bug_description: String,
    pub hint: String,
}

/// Arena PvP challenge shown to both players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaChallenge {
    pub title: String,
    pub description: String,
}

/// Verdict on a submitted challenge solution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeVerdict {
    pub is_correct: bool,
    pub feedback: String,
    pub score: i32,
}
