use serde::Deserialize;

/// How checkmate is decided once a side is in check.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MateDetection {
    /// Mate when none of the king's own one-square steps gets out of check.
    /// Blocking the attack or capturing the attacker with another piece is not
    /// tried, so some positions are reported as mate that are not.
    #[default]
    KingSteps,
    /// Mate when no pseudo-legal move of any friendly piece gets out of check.
    Full,
}

/// Rule switches for a game. The default plays the reduced rule set: moves
/// that leave the mover's king attacked are accepted and mate only looks at
/// king steps.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Reject moves that leave the mover's own king in check.
    pub king_safety: bool,
    pub mate_detection: MateDetection,
}

impl Rules {
    /// Both corrections switched on.
    pub fn strict() -> Self {
        Rules {
            king_safety: true,
            mate_detection: MateDetection::Full,
        }
    }
}
