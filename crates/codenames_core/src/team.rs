//! Card ownership labels and the two playing sides.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Owner of a card on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// The single forbidden word.
    #[display("killer")]
    Killer,
    /// Words belonging to nobody.
    #[display("neutral")]
    Neutral,
    /// The starting team (blue).
    #[display("team A")]
    TeamA,
    /// The second team (red).
    #[display("team B")]
    TeamB,
}

impl Team {
    /// Returns the card colour used by renderers.
    #[instrument]
    pub fn color(self) -> &'static str {
        match self {
            Self::Killer => "black",
            Self::Neutral => "beige",
            Self::TeamA => "blue",
            Self::TeamB => "red",
        }
    }

    /// Returns the playing side owning this label, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Self::TeamA => Some(Side::A),
            Self::TeamB => Some(Side::B),
            Self::Killer | Self::Neutral => None,
        }
    }
}

/// One of the two teams taking turns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Side {
    /// Team A moves first.
    #[display("A")]
    A,
    /// Team B.
    #[display("B")]
    B,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Returns the card label owned by this side.
    pub fn team(self) -> Team {
        match self {
            Side::A => Team::TeamA,
            Side::B => Team::TeamB,
        }
    }

    /// Returns the side's display colour.
    pub fn color(self) -> &'static str {
        self.team().color()
    }

    /// Index into per-side arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// A pool named relative to the side holding the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Relation {
    /// Words of the side holding the turn.
    Own,
    /// Words of the other side.
    Opponent,
    /// Neutral words.
    Neutral,
    /// The killer word.
    Killer,
}

impl Relation {
    /// Resolves this relation to an absolute label for the given side.
    pub fn resolve(self, current: Side) -> Team {
        match self {
            Relation::Own => current.team(),
            Relation::Opponent => current.opponent().team(),
            Relation::Neutral => Team::Neutral,
            Relation::Killer => Team::Killer,
        }
    }
}
