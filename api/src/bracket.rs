//! Bracket reference resolver.
//!
//! Playoff slots name their participants symbolically: a seed (`S3`), the
//! winner or loser of another slot (`W146` / `L147`), or a literal team name.
//! Resolution runs full passes over the slot table until a pass changes
//! nothing; on the fixed acyclic topology that happens well inside the
//! slot-count bound, and re-running after stabilization is a no-op.

use crate::seeding::SeedTable;
use crate::{Roster, TBD, status_is_final};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Fixed topology
//
// Championship:           Consolation:
//   Round 1: S1 bye, S2     Round 1: 151, 152
//            bye, 146, 147  Round 2: 153, 154, 155
//   Semis:   148, 149       (no final column)
//   Final:   150
// ---------------------------------------------------------------------------

/// Seeds that skip the championship first round.
pub const CHAMPIONSHIP_BYE_SEEDS: [usize; 2] = [1, 2];

#[derive(Debug, Clone, Copy)]
pub struct BracketRound {
    pub title: &'static str,
    pub slots: &'static [u32],
}

pub const CHAMPIONSHIP_ROUNDS: [BracketRound; 3] = [
    BracketRound { title: "Round 1", slots: &[146, 147] },
    BracketRound { title: "Semifinals", slots: &[148, 149] },
    BracketRound { title: "Championship", slots: &[150] },
];

pub const CONSOLATION_ROUNDS: [BracketRound; 2] = [
    BracketRound { title: "Round 1", slots: &[151, 152] },
    BracketRound { title: "Round 2", slots: &[153, 154, 155] },
];

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// One side of a playoff matchup as written in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRef {
    /// Literal team name; resolves only if it is on the roster.
    Name(String),
    /// `S<n>`: the team seeded n-th.
    Seed(usize),
    /// `W<id>`: winner of another slot.
    Winner(u32),
    /// `L<id>`: loser of another slot.
    Loser(u32),
}

impl Default for SlotRef {
    fn default() -> Self {
        SlotRef::Name(String::new())
    }
}

impl SlotRef {
    /// Case-insensitive, whitespace-trimmed. Anything that is not `S<n>`,
    /// `W<id>` or `L<id>` stays a literal name (which may simply fail to
    /// resolve).
    pub fn parse(raw: &str) -> SlotRef {
        let trimmed = raw.trim();
        if let Some(rest) = trimmed.get(1..) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                match (trimmed.as_bytes()[0].to_ascii_uppercase(), rest.parse::<u32>()) {
                    (b'S', Ok(n)) => return SlotRef::Seed(n as usize),
                    (b'W', Ok(id)) => return SlotRef::Winner(id),
                    (b'L', Ok(id)) => return SlotRef::Loser(id),
                    _ => {}
                }
            }
        }
        SlotRef::Name(trimmed.to_owned())
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Name(name) if name.is_empty() => write!(f, "{TBD}"),
            SlotRef::Name(name) => write!(f, "{name}"),
            SlotRef::Seed(n) => write!(f, "S{n}"),
            SlotRef::Winner(id) => write!(f, "W{id}"),
            SlotRef::Loser(id) => write!(f, "L{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// One playoff game. `resolved_a`/`resolved_b` are derived every render
/// cycle and never authoritative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BracketSlot {
    pub id: u32,
    pub team_a: SlotRef,
    pub team_b: SlotRef,
    pub status: String,
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
    pub date: String,
    pub time: String,
    pub field: String,
    pub resolved_a: Option<String>,
    pub resolved_b: Option<String>,
}

impl BracketSlot {
    pub fn is_final(&self) -> bool {
        status_is_final(&self.status)
    }

    /// (winner, loser) for a finalized, fully resolved, decisive game.
    /// Ties and anything still pending yield nothing.
    fn outcome(&self) -> Option<(&str, &str)> {
        if !self.is_final() {
            return None;
        }
        let (score_a, score_b) = (self.score_a?, self.score_b?);
        let a = self.resolved_a.as_deref().filter(|s| !s.is_empty())?;
        let b = self.resolved_b.as_deref().filter(|s| !s.is_empty())?;
        if score_a == score_b {
            return None;
        }
        Some(if score_a > score_b { (a, b) } else { (b, a) })
    }
}

/// Per-cycle slot snapshot keyed by id; iteration follows id order, so
/// resolution is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotTable {
    slots: BTreeMap<u32, BracketSlot>,
}

impl SlotTable {
    pub fn new(slots: Vec<BracketSlot>) -> Self {
        SlotTable { slots: slots.into_iter().map(|s| (s.id, s)).collect() }
    }

    pub fn get(&self, id: u32) -> Option<&BracketSlot> {
        self.slots.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BracketSlot> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolve every slot's references against the seed table, the roster,
    /// and the other slots. Passes repeat until a full pass changes nothing;
    /// the slot count bounds the pass count so even cyclic sheet data
    /// terminates.
    pub fn resolve(&mut self, seeds: &SeedTable, roster: &Roster) {
        let ids: Vec<u32> = self.slots.keys().copied().collect();
        for _ in 0..self.slots.len().max(1) {
            let mut changed = false;
            for &id in &ids {
                let (ref_a, ref_b) = {
                    let slot = &self.slots[&id];
                    (slot.team_a.clone(), slot.team_b.clone())
                };
                let a = self.resolve_ref(&ref_a, seeds, roster);
                let b = self.resolve_ref(&ref_b, seeds, roster);
                if let Some(slot) = self.slots.get_mut(&id) {
                    if slot.resolved_a != a {
                        slot.resolved_a = a;
                        changed = true;
                    }
                    if slot.resolved_b != b {
                        slot.resolved_b = b;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn resolve_ref(&self, slot_ref: &SlotRef, seeds: &SeedTable, roster: &Roster) -> Option<String> {
        match slot_ref {
            SlotRef::Name(name) => roster.canonical(name).map(str::to_owned),
            SlotRef::Seed(n) => seeds.team(*n).map(str::to_owned),
            SlotRef::Winner(id) => {
                self.get(*id).and_then(|s| s.outcome()).map(|(w, _)| w.to_owned())
            }
            SlotRef::Loser(id) => {
                self.get(*id).and_then(|s| s.outcome()).map(|(_, l)| l.to_owned())
            }
        }
    }
}
