//! Effect targeting system.
//!
//! A `TargetSpec` composes three independent axes:
//! - `Allegiance`: friendly, enemy, or any (relative to the viewing player)
//! - `TargetKind`: hero, minion, or any
//! - `TargetFilter`: optional special filter (`damaged_minion`, `all`)
//!
//! `TargetResolver` turns a spec into concrete targets and re-validates a
//! caller's choice against the same predicate. Untargetable minions are
//! never offered; stealthed minions are hidden from their opponent only.
//! The `all` filter describes mass effects and skips both checks.

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardInstance, Keyword};
use crate::core::{GameState, PlayerId, TargetRef};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allegiance {
    Friendly,
    Enemy,
    #[default]
    Any,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Hero,
    Minion,
    #[default]
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFilter {
    /// Minions below their maximum health.
    DamagedMinion,
    /// Every matching character, ignoring targetability.
    All,
}

/// Specification for effect targeting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpec {
    pub allegiance: Allegiance,
    pub kind: TargetKind,
    pub filter: Option<TargetFilter>,
}

impl TargetSpec {
    #[must_use]
    pub fn new(allegiance: Allegiance, kind: TargetKind) -> Self {
        Self {
            allegiance,
            kind,
            filter: None,
        }
    }

    #[must_use]
    pub fn any_character() -> Self {
        Self::new(Allegiance::Any, TargetKind::Any)
    }

    #[must_use]
    pub fn any_minion() -> Self {
        Self::new(Allegiance::Any, TargetKind::Minion)
    }

    #[must_use]
    pub fn enemy_minion() -> Self {
        Self::new(Allegiance::Enemy, TargetKind::Minion)
    }

    #[must_use]
    pub fn friendly_minion() -> Self {
        Self::new(Allegiance::Friendly, TargetKind::Minion)
    }

    #[must_use]
    pub fn enemy_character() -> Self {
        Self::new(Allegiance::Enemy, TargetKind::Any)
    }

    #[must_use]
    pub fn damaged_minion() -> Self {
        Self::any_minion().with_filter(TargetFilter::DamagedMinion)
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    fn allows_side(&self, viewer: PlayerId, side: PlayerId) -> bool {
        match self.allegiance {
            Allegiance::Friendly => side == viewer,
            Allegiance::Enemy => side != viewer,
            Allegiance::Any => true,
        }
    }

    fn allows_heroes(&self) -> bool {
        self.kind != TargetKind::Minion && self.filter != Some(TargetFilter::DamagedMinion)
    }

    fn allows_minions(&self) -> bool {
        self.kind != TargetKind::Hero
    }
}

/// Computes and validates targets.
pub struct TargetResolver;

impl TargetResolver {
    /// Every target `viewer` could legally pick under `spec`.
    ///
    /// Heroes come first (viewer's, then opponent's), then minions in
    /// board order.
    pub fn valid_targets(
        state: &GameState,
        viewer: PlayerId,
        spec: &TargetSpec,
        catalog: &CardCatalog,
    ) -> Vec<TargetRef> {
        let mut targets = Vec::new();
        let sides = [viewer, viewer.opponent()];

        if spec.allows_heroes() {
            targets.extend(
                sides
                    .iter()
                    .filter(|side| spec.allows_side(viewer, **side))
                    .map(|side| TargetRef::Hero(*side)),
            );
        }

        if spec.allows_minions() {
            for side in sides {
                if !spec.allows_side(viewer, side) {
                    continue;
                }
                targets.extend(
                    state.players[side]
                        .battlefield
                        .iter()
                        .filter(|m| Self::minion_passes(m, side, viewer, spec, catalog))
                        .map(|m| TargetRef::Minion(m.id)),
                );
            }
        }

        targets
    }

    /// Re-check a caller-supplied choice against `spec`.
    ///
    /// Fails for minions that are no longer on a battlefield.
    pub fn is_valid_target(
        state: &GameState,
        viewer: PlayerId,
        spec: &TargetSpec,
        chosen: TargetRef,
        catalog: &CardCatalog,
    ) -> bool {
        match chosen {
            TargetRef::Hero(side) => spec.allows_heroes() && spec.allows_side(viewer, side),
            TargetRef::Minion(id) => {
                if !spec.allows_minions() {
                    return false;
                }
                match state.find_minion(id) {
                    Some((side, index)) => {
                        spec.allows_side(viewer, side)
                            && state.players[side]
                                .battlefield
                                .get(index)
                                .map_or(false, |m| {
                                    Self::minion_passes(m, side, viewer, spec, catalog)
                                })
                    }
                    None => false,
                }
            }
        }
    }

    fn minion_passes(
        minion: &CardInstance,
        side: PlayerId,
        viewer: PlayerId,
        spec: &TargetSpec,
        catalog: &CardCatalog,
    ) -> bool {
        if spec.filter == Some(TargetFilter::All) {
            return true;
        }
        if spec.filter == Some(TargetFilter::DamagedMinion) && !minion.is_damaged() {
            return false;
        }

        let untargetable = catalog
            .by_id(minion.card_id)
            .map_or(minion.granted.contains(Keyword::Untargetable), |def| {
                minion.has_keyword(def, Keyword::Untargetable)
            });
        if untargetable {
            return false;
        }

        !(minion.flags.stealth && side != viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::InstanceId;

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn setup() -> (GameState, CardCatalog) {
        let catalog: CardCatalog = [
            CardDefinition::minion(CardId::new(1), "Grunt", 1, 1, 3),
            CardDefinition::minion(CardId::new(2), "Phantom", 1, 1, 1)
                .with_keyword(Keyword::Untargetable),
        ]
        .into_iter()
        .collect();

        let mut state = GameState::new(1, 30);
        for (side, card) in [(P0, 1), (P1, 1), (P1, 1), (P1, 2)] {
            let id = state.alloc_instance();
            let def = catalog.by_id(CardId::new(card)).unwrap();
            state.players[side]
                .battlefield
                .push_back(CardInstance::new(id, def, side));
        }
        (state, catalog)
    }

    #[test]
    fn test_any_character() {
        let (state, catalog) = setup();
        let targets = TargetResolver::valid_targets(&state, P0, &TargetSpec::any_character(), &catalog);

        // Two heroes, three targetable minions (the untargetable one is skipped).
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0], TargetRef::Hero(P0));
        assert_eq!(targets[1], TargetRef::Hero(P1));
        assert!(!targets.contains(&TargetRef::Minion(InstanceId::new(4))));
    }

    #[test]
    fn test_allegiance_axis() {
        let (state, catalog) = setup();
        let friendly = TargetResolver::valid_targets(&state, P0, &TargetSpec::friendly_minion(), &catalog);
        assert_eq!(friendly, vec![TargetRef::Minion(InstanceId::new(1))]);

        let enemy = TargetResolver::valid_targets(&state, P0, &TargetSpec::enemy_character(), &catalog);
        assert_eq!(enemy.len(), 3);
        assert!(enemy.contains(&TargetRef::Hero(P1)));
    }

    #[test]
    fn test_stealth_hidden_from_enemy_only() {
        let (mut state, catalog) = setup();
        state.minion_mut(InstanceId::new(2)).unwrap().flags.stealth = true;

        let enemy_view = TargetResolver::valid_targets(&state, P0, &TargetSpec::any_minion(), &catalog);
        assert!(!enemy_view.contains(&TargetRef::Minion(InstanceId::new(2))));

        let own_view = TargetResolver::valid_targets(&state, P1, &TargetSpec::friendly_minion(), &catalog);
        assert!(own_view.contains(&TargetRef::Minion(InstanceId::new(2))));
    }

    #[test]
    fn test_damaged_filter() {
        let (mut state, catalog) = setup();
        state.minion_mut(InstanceId::new(3)).unwrap().health = 1;

        let targets = TargetResolver::valid_targets(&state, P0, &TargetSpec::damaged_minion(), &catalog);
        assert_eq!(targets, vec![TargetRef::Minion(InstanceId::new(3))]);
    }

    #[test]
    fn test_all_filter_ignores_targetability() {
        let (mut state, catalog) = setup();
        state.minion_mut(InstanceId::new(2)).unwrap().flags.stealth = true;
        let spec = TargetSpec::enemy_minion().with_filter(TargetFilter::All);

        let targets = TargetResolver::valid_targets(&state, P0, &spec, &catalog);
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn test_is_valid_target() {
        let (state, catalog) = setup();
        let spec = TargetSpec::enemy_minion();

        assert!(TargetResolver::is_valid_target(&state, P0, &spec, TargetRef::Minion(InstanceId::new(2)), &catalog));
        assert!(!TargetResolver::is_valid_target(&state, P0, &spec, TargetRef::Minion(InstanceId::new(1)), &catalog));
        assert!(!TargetResolver::is_valid_target(&state, P0, &spec, TargetRef::Minion(InstanceId::new(4)), &catalog));
        assert!(!TargetResolver::is_valid_target(&state, P0, &spec, TargetRef::Hero(P1), &catalog));
        // Stale reference.
        assert!(!TargetResolver::is_valid_target(&state, P0, &spec, TargetRef::Minion(InstanceId::new(99)), &catalog));
    }
}
