//! Effect dispatch - executing effect descriptors on game state.
//!
//! `EffectDispatcher::apply` is the single entry point for every card
//! ability: battlecries, spells, deathrattles, and the continuation left
//! behind by Discover. It resolves the descriptor's selector into concrete
//! targets, matches exhaustively on the kind, runs the secondary chain,
//! and finishes with a death sweep.
//!
//! Nothing here panics or aborts a turn. A bad target or an unknown kind
//! comes back as `ResolveResult::Failed` with the state untouched.

use log::{debug, warn};

use super::context::{EffectContext, ResolverContext};
use super::discover::Discovery;
use super::effect::{EffectDescriptor, EffectKind, Selector};
use super::handlers::{control, damage, flags, meta, stats, summon, zones};
use super::targeting::{TargetFilter, TargetResolver, TargetSpec};
use crate::combat::DeathSweeper;
use crate::core::{GameState, PlayerId, RulesError, TargetRef};

/// Result of resolving an effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// Effect resolved.
    Success,
    /// Effect failed and left the state unchanged.
    Failed(RulesError),
    /// Nothing to do (no targets, condition not met, documented no-op).
    Skipped,
}

impl ResolveResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ResolveResult::Success)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ResolveResult::Failed(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&RulesError> {
        match self {
            ResolveResult::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Success if any of `results` succeeded, otherwise the first failure,
    /// otherwise skipped.
    #[must_use]
    pub fn combine(results: impl IntoIterator<Item = ResolveResult>) -> Self {
        let mut failure = None;
        for result in results {
            match result {
                ResolveResult::Success => return ResolveResult::Success,
                ResolveResult::Failed(e) if failure.is_none() => failure = Some(e),
                _ => {}
            }
        }
        failure.map_or(ResolveResult::Skipped, ResolveResult::Failed)
    }
}

impl From<bool> for ResolveResult {
    fn from(applied: bool) -> Self {
        if applied {
            ResolveResult::Success
        } else {
            ResolveResult::Skipped
        }
    }
}

/// Applies effect descriptors to game state.
pub struct EffectDispatcher;

impl EffectDispatcher {
    /// Resolve `effect` and its secondary chain, then sweep.
    pub fn apply(
        state: &mut GameState,
        effect: &EffectDescriptor,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        let result = Self::resolve(state, effect, ectx, ctx);
        DeathSweeper::remove_dead(state, ctx);
        result
    }

    /// Resolve `effect` and its secondary chain without the final sweep.
    ///
    /// If the primary effect opens a Discover, the secondary chain is
    /// parked on the pending choice instead of running now.
    pub fn resolve(
        state: &mut GameState,
        effect: &EffectDescriptor,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        if state.is_game_over() {
            return ResolveResult::Skipped;
        }
        let discovering = Discovery::pending(state);
        let primary = Self::dispatch(state, effect, ectx, ctx);
        if let ResolveResult::Failed(err) = &primary {
            Self::report(effect, err);
        }

        let Some(secondary) = effect.secondary.as_deref() else {
            return primary;
        };
        if Discovery::pending(state) > discovering {
            Discovery::defer(state, secondary.clone());
            return primary;
        }
        let follow = Self::resolve(state, secondary, ectx, ctx);
        match primary {
            ResolveResult::Failed(_) => primary,
            ResolveResult::Skipped => follow,
            ResolveResult::Success => ResolveResult::Success,
        }
    }

    fn report(effect: &EffectDescriptor, err: &RulesError) {
        match err {
            RulesError::UnknownEffectKind { .. } => warn!("{}", err),
            _ => debug!("{} failed: {}", effect.kind.name(), err),
        }
    }

    fn dispatch(
        state: &mut GameState,
        effect: &EffectDescriptor,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        debug!("dispatching {} for {}", effect.kind.name(), ectx.controller);

        let targets = match effect.kind.selector() {
            Some(selector) => match Self::select(state, selector, effect, ectx, ctx) {
                Ok(targets) => targets,
                Err(err) => return ResolveResult::Failed(err),
            },
            None => Vec::new(),
        };
        if effect.kind.selector().is_some() && targets.is_empty() {
            return ResolveResult::Skipped;
        }
        let controller = ectx.controller;

        match &effect.kind {
            // === Damage and destruction ===
            EffectKind::Damage { amount, .. } => damage::damage(state, &targets, *amount, ectx, ctx),
            EffectKind::RandomDamage { amount, hits } => {
                damage::random_damage(state, *amount, *hits, ectx, ctx)
            }
            EffectKind::CleaveDamage { amount } => damage::cleave(state, &targets, *amount, ectx, ctx),
            EffectKind::DamageEqualToArmor => {
                let armor = state.players[controller].armor;
                damage::damage(state, &targets, armor, ectx, ctx)
            }
            EffectKind::DamageConditional => {
                debug!("damage_conditional has no effect");
                ResolveResult::Skipped
            }
            EffectKind::SplitDamage { amount } => damage::split_damage(state, *amount, ectx, ctx),
            EffectKind::Destroy { .. } | EffectKind::DestroyRandom => {
                damage::destroy(state, &targets, ectx, ctx)
            }

            // === Healing and hero ===
            EffectKind::Heal { amount, .. } => damage::heal(state, &targets, *amount, ectx, ctx),
            EffectKind::GainArmor { amount } => damage::gain_armor(state, controller, *amount, ctx),
            EffectKind::SetHeroHealth { amount, side } => {
                damage::set_hero_health(state, &Self::sides(controller, *side), *amount, ctx)
            }

            // === Stats ===
            EffectKind::Buff { attack, health, .. } => {
                stats::buff(state, &targets, *attack, *health, ectx, ctx)
            }
            EffectKind::BuffHand { attack, health } => {
                stats::buff_hand(state, controller, *attack, *health, ectx, ctx)
            }
            EffectKind::SetStats { attack, health, .. } => {
                stats::set_stats(state, &targets, *attack, *health, ctx)
            }
            EffectKind::SwapStats { .. } => stats::swap_stats(state, &targets, ctx),
            EffectKind::DoubleHealth { .. } => stats::double_health(state, &targets, ectx, ctx),

            // === Cards and zones ===
            EffectKind::Draw { count } => zones::draw(state, &[controller], *count, ctx),
            EffectKind::DrawBoth { count } => {
                zones::draw(state, &[controller, controller.opponent()], *count, ctx)
            }
            EffectKind::DrawUntil { hand_size } => zones::draw_until(state, controller, *hand_size, ctx),
            EffectKind::DrawByType { card_type, count } => {
                zones::draw_by_type(state, controller, *card_type, *count, ctx)
            }
            EffectKind::Mill { count, side } => {
                zones::mill(state, &Self::sides(controller, *side), *count, ctx)
            }
            EffectKind::Discard { count } => zones::discard(state, controller, *count, ctx),
            EffectKind::ShuffleIntoDeck { card, copies, side } => zones::shuffle_into_deck(
                state,
                &Self::sides(controller, *side),
                *card,
                *copies,
                ctx,
            ),
            EffectKind::AddToHand { card, count } => {
                zones::add_to_hand(state, controller, *card, *count, ctx)
            }
            EffectKind::AddRandomToHand { pool, count } => {
                zones::add_random_to_hand(state, controller, pool, *count, ctx)
            }
            EffectKind::CopyToHand { .. } => zones::copy_to_hand(state, controller, &targets, ctx),
            EffectKind::ReturnToHand => {
                debug!("return_to_hand has no effect");
                ResolveResult::Skipped
            }
            EffectKind::StealCard => zones::steal_card(state, controller, ctx),
            EffectKind::CopyFromOpponentDeck { count } => {
                zones::copy_from_opponent_deck(state, controller, *count, ctx)
            }
            EffectKind::SwapDecks => zones::swap_decks(state, controller, ctx),

            // === Summons ===
            EffectKind::Summon { card, count, side } => {
                summon::summon(state, &Self::sides(controller, *side), *card, *count, ectx, ctx)
            }
            EffectKind::SummonRandom { pool, count } => {
                summon::summon_random(state, controller, pool, *count, ectx, ctx)
            }
            EffectKind::SummonCopy { .. } => summon::summon_copy(state, controller, &targets, ectx, ctx),
            EffectKind::SummonMultiple { cards } => {
                summon::summon_multiple(state, controller, cards, ectx, ctx)
            }
            EffectKind::Resurrect { count } => summon::resurrect(state, controller, *count, ectx, ctx),
            EffectKind::SummonFromHand => summon::summon_from_hand(state, controller, ctx),
            EffectKind::SummonHighestCostFromGraveyard => {
                summon::summon_highest_cost_from_graveyard(state, controller, ctx)
            }

            // === Control and transformation ===
            EffectKind::MindControl { temporary, .. } => {
                control::mind_control(state, controller, &targets, *temporary, ctx)
            }
            EffectKind::Transform { into, .. } => control::transform(state, &targets, *into, ctx),
            EffectKind::TransformRandom { pool, .. } => {
                control::transform_random(state, &targets, pool, ctx)
            }
            EffectKind::TransformIntoCopy => control::transform_into_copy(state, &targets, ectx, ctx),
            EffectKind::TransformDeck { into, side } => {
                control::transform_deck(state, &Self::sides(controller, *side), *into, ctx)
            }
            EffectKind::TransformRandomInHand { into } => {
                control::transform_random_in_hand(state, controller, *into, ctx)
            }

            // === Flags ===
            EffectKind::Freeze { .. } => flags::freeze(state, &targets, ctx),
            EffectKind::Silence { .. } => flags::silence(state, &targets, ctx),
            EffectKind::GrantKeyword { keyword, .. } => {
                flags::grant_keyword(state, &targets, *keyword, ctx)
            }
            EffectKind::GrantDivineShield { .. } => flags::grant_divine_shield(state, &targets),
            EffectKind::GrantImmunity { .. } => flags::grant_immunity(state, &targets),
            EffectKind::GrantDeathrattle { effect, .. } => {
                flags::grant_deathrattle(state, &targets, effect)
            }
            EffectKind::ApplyStatus { status, .. } => flags::apply_status(state, &targets, *status),

            // === Weapons ===
            EffectKind::EquipWeapon { card } => meta::equip_weapon(state, controller, *card, ctx),
            EffectKind::BuffWeapon { attack, durability } => {
                meta::buff_weapon(state, controller, *attack, *durability)
            }
            EffectKind::DestroyWeapon { side } => {
                meta::destroy_weapon(state, &Self::sides(controller, *side))
            }

            // === Meta ===
            EffectKind::GainMana { amount, crystals } => {
                meta::gain_mana(state, controller, *amount, *crystals, ctx)
            }
            EffectKind::ReduceCost {
                amount,
                scope,
                spells_only,
            } => meta::reduce_cost(state, controller, *amount, *scope, *spells_only),
            EffectKind::ReduceHandCost { amount } => meta::reduce_hand_cost(state, controller, *amount),
            EffectKind::ReduceOpponentMana { amount } => {
                meta::reduce_opponent_mana(state, controller, *amount, ctx)
            }
            EffectKind::ExtraTurn => meta::extra_turn(state, controller, ctx),
            EffectKind::Discover { pool, count } => Discovery::open(state, pool, *count, ectx, ctx),
            EffectKind::StartQuest { description, goal } => {
                meta::start_quest(state, controller, description, *goal, ectx, ctx)
            }
            EffectKind::Conditional {
                condition,
                effect,
                otherwise,
            } => {
                if meta::condition_holds(state, *condition, ectx) {
                    Self::resolve(state, effect, ectx, ctx)
                } else if let Some(otherwise) = otherwise {
                    Self::resolve(state, otherwise, ectx, ctx)
                } else {
                    ResolveResult::Skipped
                }
            }
            EffectKind::Sequence { effects } => Self::sequence(state, effects, ectx, ctx),

            EffectKind::Unknown { kind } => {
                ResolveResult::Failed(RulesError::UnknownEffectKind { kind: kind.clone() })
            }
        }
    }

    /// Resolve each effect in order. A Discover opened partway parks the
    /// rest of the list on the pending choice.
    fn sequence(
        state: &mut GameState,
        effects: &[EffectDescriptor],
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        let mut results = Vec::with_capacity(effects.len());
        for (i, effect) in effects.iter().enumerate() {
            let discovering = Discovery::pending(state);
            results.push(Self::resolve(state, effect, ectx, ctx));
            if Discovery::pending(state) > discovering {
                let rest = &effects[i + 1..];
                if !rest.is_empty() {
                    Discovery::defer(state, EffectDescriptor::sequence(rest.iter().cloned()));
                }
                break;
            }
        }
        ResolveResult::combine(results)
    }

    /// Players a `Side` refers to, from the controller's point of view.
    fn sides(controller: PlayerId, side: super::effect::Side) -> Vec<PlayerId> {
        use super::effect::Side;
        match side {
            Side::Friendly => vec![controller],
            Side::Enemy => vec![controller.opponent()],
            Side::Both => vec![controller, controller.opponent()],
        }
    }

    /// Resolve a selector into concrete targets.
    ///
    /// `Chosen` re-validates the caller's target against the descriptor's
    /// spec; every other selector is computed from the live state. Mass
    /// selectors ignore Stealth and Untargetable.
    pub fn select(
        state: &mut GameState,
        selector: Selector,
        effect: &EffectDescriptor,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> Result<Vec<TargetRef>, RulesError> {
        use super::targeting::{Allegiance, TargetKind};

        let viewer = ectx.controller;
        let mass = |state: &GameState, allegiance: Allegiance, kind: TargetKind| {
            TargetResolver::valid_targets(
                state,
                viewer,
                &TargetSpec::new(allegiance, kind).with_filter(TargetFilter::All),
                ctx.catalog,
            )
        };
        let source = ectx.source.map(TargetRef::Minion);

        let targets = match selector {
            Selector::Chosen => {
                let chosen = ectx.target.ok_or(RulesError::MissingTarget)?;
                if !TargetResolver::is_valid_target(state, viewer, &effect.target_spec(), chosen, ctx.catalog) {
                    return Err(RulesError::InvalidTarget { target: chosen });
                }
                vec![chosen]
            }
            Selector::Source => source
                .filter(|s| s.as_minion().map_or(false, |id| state.find_minion(id).is_some()))
                .into_iter()
                .collect(),
            Selector::FriendlyHero => vec![TargetRef::Hero(viewer)],
            Selector::EnemyHero => vec![TargetRef::Hero(viewer.opponent())],
            Selector::AllMinions => mass(state, Allegiance::Any, TargetKind::Minion),
            Selector::FriendlyMinions => mass(state, Allegiance::Friendly, TargetKind::Minion),
            Selector::EnemyMinions => mass(state, Allegiance::Enemy, TargetKind::Minion),
            Selector::OtherFriendlyMinions => {
                let mut targets = mass(state, Allegiance::Friendly, TargetKind::Minion);
                targets.retain(|t| Some(*t) != source);
                targets
            }
            Selector::AllCharacters => mass(state, Allegiance::Any, TargetKind::Any),
            Selector::FriendlyCharacters => mass(state, Allegiance::Friendly, TargetKind::Any),
            Selector::EnemyCharacters => mass(state, Allegiance::Enemy, TargetKind::Any),
            Selector::RandomEnemyMinion => {
                let pool = Self::living(state, mass(state, Allegiance::Enemy, TargetKind::Minion));
                state.rng.choose(&pool).copied().into_iter().collect()
            }
            Selector::RandomFriendlyMinion => {
                let mut pool = Self::living(state, mass(state, Allegiance::Friendly, TargetKind::Minion));
                pool.retain(|t| Some(*t) != source);
                state.rng.choose(&pool).copied().into_iter().collect()
            }
            Selector::RandomEnemyCharacter => {
                let pool = Self::living(state, mass(state, Allegiance::Enemy, TargetKind::Any));
                state.rng.choose(&pool).copied().into_iter().collect()
            }
            Selector::Adjacent => match ectx.source {
                Some(id) => Self::adjacent(state, id),
                None => Vec::new(),
            },
        };
        Ok(targets)
    }

    /// Drop minions already at or below zero health.
    fn living(state: &GameState, targets: Vec<TargetRef>) -> Vec<TargetRef> {
        targets
            .into_iter()
            .filter(|t| match t {
                TargetRef::Hero(_) => true,
                TargetRef::Minion(id) => state.minion(*id).map_or(false, |m| !m.is_dead()),
            })
            .collect()
    }

    /// The minions left and right of `id` on its battlefield.
    pub fn adjacent(state: &GameState, id: crate::core::InstanceId) -> Vec<TargetRef> {
        let Some((side, index)) = state.find_minion(id) else {
            return Vec::new();
        };
        let board = &state.players[side].battlefield;
        let mut out = Vec::with_capacity(2);
        if index > 0 {
            if let Some(left) = board.get(index - 1) {
                out.push(TargetRef::Minion(left.id));
            }
        }
        if let Some(right) = board.get(index + 1) {
            out.push(TargetRef::Minion(right.id));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance};
    use crate::core::{InstanceId, NullSink, RulesConfig};
    use crate::effects::effect::CardPool;

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn catalog() -> CardCatalog {
        [
            CardDefinition::minion(CardId::new(1), "Yeti", 4, 4, 5),
            CardDefinition::minion(CardId::new(2), "Wisp", 0, 1, 1),
            CardDefinition::minion(CardId::new(3), "Raptor", 2, 3, 2),
        ]
        .into_iter()
        .collect()
    }

    fn place(state: &mut GameState, catalog: &CardCatalog, player: PlayerId, card: u32) -> InstanceId {
        let id = state.alloc_instance();
        let def = catalog.by_id(CardId::new(card)).unwrap();
        state.players[player]
            .battlefield
            .push_back(CardInstance::new(id, def, player));
        id
    }

    #[test]
    fn test_chosen_target_is_revalidated() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let ectx = EffectContext::new(P0).with_target(TargetRef::Minion(InstanceId::new(77)));

        let result = EffectDispatcher::apply(&mut state, &EffectDescriptor::damage(3), &ectx, &ctx);
        assert!(matches!(result, ResolveResult::Failed(RulesError::InvalidTarget { .. })));
        assert!(state.log.is_empty());
    }

    #[test]
    fn test_missing_target() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);

        let result = EffectDispatcher::apply(&mut state, &EffectDescriptor::damage(3), &EffectContext::new(P0), &ctx);
        assert_eq!(result, ResolveResult::Failed(RulesError::MissingTarget));
    }

    #[test]
    fn test_unknown_kind_leaves_state() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let effect: EffectDescriptor = serde_json::from_str(r#"{"type": "summon_dragon_rider"}"#).unwrap();

        let result = EffectDispatcher::apply(&mut state, &effect, &EffectContext::new(P0), &ctx);
        assert_eq!(
            result,
            ResolveResult::Failed(RulesError::UnknownEffectKind { kind: "summon_dragon_rider".into() })
        );
        assert_eq!(state.player(P0).hero_health, 30);
    }

    #[test]
    fn test_secondary_runs_after_primary() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30).with_deck(P0, [CardId::new(2)]);
        let effect = EffectDescriptor::damage_all(1, Selector::EnemyHero).then(EffectDescriptor::draw(1));

        let result = EffectDispatcher::apply(&mut state, &effect, &EffectContext::new(P0), &ctx);
        assert_eq!(result, ResolveResult::Success);
        assert_eq!(state.player(P1).hero_health, 29);
        assert_eq!(state.player(P0).hand.len(), 1);
    }

    #[test]
    fn test_aoe_sees_pre_wave_set() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        for _ in 0..3 {
            place(&mut state, &catalog, P1, 2);
        }
        let yeti = place(&mut state, &catalog, P1, 1);

        EffectDispatcher::apply(&mut state, &EffectDescriptor::damage_all(1, Selector::EnemyMinions), &EffectContext::new(P0), &ctx);
        assert_eq!(state.player(P1).battlefield.len(), 1);
        assert_eq!(state.minion(yeti).unwrap().health, 4);
        assert_eq!(state.player(P1).graveyard.len(), 3);
    }

    #[test]
    fn test_sequence_parks_rest_on_discover() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30).with_deck(P0, [CardId::new(2)]);
        let effect = EffectDescriptor::sequence([
            EffectDescriptor::discover(CardPool::minions()),
            EffectDescriptor::draw(1),
        ]);

        EffectDispatcher::apply(&mut state, &effect, &EffectContext::new(P0), &ctx);
        assert!(state.discovery.active);
        assert!(state.player(P0).hand.is_empty());
        assert!(state.discovery.continuation.is_some());
    }

    #[test]
    fn test_adjacent() {
        let (catalog, _) = (catalog(), RulesConfig::default());
        let mut state = GameState::new(1, 30);
        let a = place(&mut state, &catalog, P0, 2);
        let b = place(&mut state, &catalog, P0, 2);
        let c = place(&mut state, &catalog, P0, 2);

        assert_eq!(
            EffectDispatcher::adjacent(&state, b),
            vec![TargetRef::Minion(a), TargetRef::Minion(c)]
        );
        assert_eq!(EffectDispatcher::adjacent(&state, a), vec![TargetRef::Minion(b)]);
    }

    #[test]
    fn test_combine() {
        assert_eq!(
            ResolveResult::combine([ResolveResult::Skipped, ResolveResult::Success]),
            ResolveResult::Success
        );
        assert_eq!(ResolveResult::combine([]), ResolveResult::Skipped);
    }

    #[test]
    fn test_destroy_random_hits_one_enemy() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        place(&mut state, &catalog, P0, 2);
        place(&mut state, &catalog, P1, 1);
        place(&mut state, &catalog, P1, 1);

        let effect = EffectDescriptor::new(EffectKind::DestroyRandom);
        let result = EffectDispatcher::apply(&mut state, &effect, &EffectContext::new(P0), &ctx);
        assert_eq!(result, ResolveResult::Success);
        assert_eq!(state.player(P1).battlefield.len(), 1);
        assert_eq!(state.player(P1).graveyard.len(), 1);
        assert_eq!(state.player(P0).battlefield.len(), 1);
    }
}
