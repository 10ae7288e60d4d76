//! Teams, batting order and defensive position assignments.
//!
//! The batting order is the roster order. The defense maps each roster
//! slot to a named field position; positions resolve to coordinates on a
//! concrete stadium, and fielders are found either by position name or by
//! nearest-player lookup.

use serde::{Deserialize, Serialize};

use crate::engine::geometry::Coord;
use crate::error::{GameError, Result};
use crate::models::player::Player;
use crate::models::stadium::{Stadium, FOUL_LINE_ANGLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPosition {
    Pitcher,
    Catcher,
    Shortstop,
    /// Guards base `n` (1-based).
    BaseGuard(u8),
    /// Outfielder slot `n` (0-based, left to right).
    Fielder(u8),
    /// Shallow extra fielder slot `n`.
    Extra(u8),
}

impl FieldPosition {
    /// Default coordinate for this position on the given stadium.
    pub fn coord(self, stadium: &Stadium) -> Coord {
        let second = stadium.base_coord(2);
        match self {
            FieldPosition::Pitcher => Coord::ORIGIN.move_toward(second, 60.5),
            FieldPosition::Catcher => Coord::new(0.0, -5.0),
            FieldPosition::Shortstop => {
                let left = stadium.base_coord(stadium.base_count.min(3));
                let mid = second.lerp(left, 0.5);
                // Plays a step behind the basepath.
                Coord::new(mid.x, mid.y + 15.0)
            }
            FieldPosition::BaseGuard(base) => {
                let b = base.clamp(1, stadium.base_count);
                stadium.base_coord(b).move_toward(Coord::ORIGIN, 10.0)
            }
            FieldPosition::Fielder(slot) => arc_coord(slot, 3, 250.0),
            FieldPosition::Extra(slot) => arc_coord(slot, 2, 150.0),
        }
    }
}

/// Evenly spread `total` slots across the fair wedge at `radius` feet.
fn arc_coord(slot: u8, total: u8, radius: f64) -> Coord {
    let total = total.max(1) as f64;
    let t = (slot as f64 + 0.5) / total;
    let angle = -FOUL_LINE_ANGLE + t * 2.0 * FOUL_LINE_ANGLE;
    Coord::from_polar(angle * 0.75, radius)
}

/// A fielder resolved to a concrete spot on the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenderRef {
    pub position: FieldPosition,
    pub roster_index: u8,
    pub coord: Coord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    /// Position -> roster slot of the assigned player.
    pub assignments: Vec<(FieldPosition, u8)>,
}

impl Defense {
    /// Conventional assignment for a roster batting in order: pitcher,
    /// catcher, shortstop, one guard per base, outfielders with the rest.
    pub fn standard(roster_len: usize, base_count: u8) -> Result<Self> {
        let required = 3 + base_count as usize + 1;
        if roster_len < required {
            return Err(GameError::InvalidTeamSize {
                expected: required,
                found: roster_len,
            });
        }
        let mut assignments = vec![
            (FieldPosition::Pitcher, 0u8),
            (FieldPosition::Catcher, 1u8),
            (FieldPosition::Shortstop, 2u8),
        ];
        let mut slot = 3u8;
        for base in 1..=base_count {
            assignments.push((FieldPosition::BaseGuard(base), slot));
            slot += 1;
        }
        let outfielders = (roster_len as u8).saturating_sub(slot);
        for i in 0..outfielders {
            assignments.push((FieldPosition::Fielder(i), slot));
            slot += 1;
        }
        Ok(Self { assignments })
    }

    /// Roster slot playing `position`, if assigned.
    pub fn player_at(&self, position: FieldPosition) -> Option<u8> {
        self.assignments
            .iter()
            .find(|(pos, _)| *pos == position)
            .map(|(_, idx)| *idx)
    }

    pub fn resolve(&self, position: FieldPosition, stadium: &Stadium) -> Option<DefenderRef> {
        self.player_at(position).map(|roster_index| DefenderRef {
            position,
            roster_index,
            coord: position.coord(stadium),
        })
    }

    /// The fielder closest to `point`.
    pub fn nearest_fielder(&self, point: Coord, stadium: &Stadium) -> Option<DefenderRef> {
        self.assignments
            .iter()
            .map(|(pos, idx)| DefenderRef {
                position: *pos,
                roster_index: *idx,
                coord: pos.coord(stadium),
            })
            .min_by(|a, b| {
                a.coord
                    .distance(point)
                    .partial_cmp(&b.coord.distance(point))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Fielders bracketing a runner caught between `from` and `to`: the
    /// guard at each end of the basepath (falling back to the nearest
    /// fielder to the base coordinate).
    pub fn rundown_pair(
        &self,
        from_base: u8,
        to_base: u8,
        stadium: &Stadium,
    ) -> (Option<DefenderRef>, Option<DefenderRef>) {
        let behind = self.guard_for_base(from_base, stadium);
        let ahead = self.guard_for_base(to_base, stadium);
        (behind, ahead)
    }

    fn guard_for_base(&self, base: u8, stadium: &Stadium) -> Option<DefenderRef> {
        if base == 0 {
            return self.resolve(FieldPosition::Catcher, stadium);
        }
        let wrapped = if base > stadium.base_count { 0 } else { base };
        if wrapped == 0 {
            return self.resolve(FieldPosition::Catcher, stadium);
        }
        self.resolve(FieldPosition::BaseGuard(wrapped), stadium)
            .or_else(|| self.nearest_fielder(stadium.base_coord(wrapped), stadium))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Batting order; roster slot doubles as the player id index.
    pub roster: Vec<Player>,
    pub defense: Defense,
}

impl Team {
    pub fn new(name: impl Into<String>, roster: Vec<Player>, base_count: u8) -> Result<Self> {
        let defense = Defense::standard(roster.len(), base_count)?;
        Ok(Self {
            name: name.into(),
            roster,
            defense,
        })
    }

    pub fn player(&self, roster_index: u8) -> &Player {
        &self.roster[roster_index as usize % self.roster.len()]
    }

    /// Batter for the given at-bat counter (batting order wraps).
    pub fn batter_index(&self, at_bat: usize) -> u8 {
        (at_bat % self.roster.len()) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::Player;

    fn demo_team() -> Team {
        let roster = (0..9)
            .map(|i| Player::average(format!("Player {}", i)))
            .collect();
        Team::new("Demo", roster, 3).unwrap()
    }

    #[test]
    fn standard_defense_covers_all_positions() {
        let team = demo_team();
        assert_eq!(team.defense.assignments.len(), 9);
        assert!(team.defense.player_at(FieldPosition::Pitcher).is_some());
        assert!(team.defense.player_at(FieldPosition::Catcher).is_some());
        for base in 1..=3 {
            assert!(team.defense.player_at(FieldPosition::BaseGuard(base)).is_some());
        }
    }

    #[test]
    fn too_small_roster_is_rejected() {
        let roster: Vec<Player> = (0..4).map(|i| Player::average(format!("P{}", i))).collect();
        assert!(Team::new("Tiny", roster, 3).is_err());
    }

    #[test]
    fn nearest_fielder_to_home_is_the_catcher() {
        let team = demo_team();
        let stadium = Stadium::standard();
        let nearest = team
            .defense
            .nearest_fielder(Coord::new(0.0, -2.0), &stadium)
            .unwrap();
        assert_eq!(nearest.position, FieldPosition::Catcher);
    }

    #[test]
    fn nearest_fielder_in_deep_center_is_an_outfielder() {
        let team = demo_team();
        let stadium = Stadium::standard();
        let nearest = team
            .defense
            .nearest_fielder(Coord::new(0.0, 280.0), &stadium)
            .unwrap();
        assert!(matches!(nearest.position, FieldPosition::Fielder(_)));
    }

    #[test]
    fn batting_order_wraps() {
        let team = demo_team();
        assert_eq!(team.batter_index(0), 0);
        assert_eq!(team.batter_index(8), 8);
        assert_eq!(team.batter_index(9), 0);
    }
}
