//! Damage, healing, armor, and the attack exchange.
//!
//! Hero damage goes through armor first and floors health at zero; every
//! hero hit re-checks both heroes and ends the game when one (or both)
//! reaches zero. Minion damage is amplified by Vulnerable and Bleeding,
//! then either popped by Divine Shield or subtracted from health without
//! a floor. Dead minions stay on the battlefield until the next sweep.

use log::{debug, info};

use super::sweep::DeathSweeper;
use crate::cards::{CardDefinition, Keyword};
use crate::core::{
    ActivityKind, AnimationKind, AnimationPayload, GameState, InstanceId, LogEventKind, Phase,
    PlayerId, RulesError, TargetRef,
};
use crate::effects::ResolverContext;

/// What one damage application did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Divine Shield took the hit and was cleared.
    Absorbed,
    /// Health and armor lost, in total.
    Dealt(i32),
    /// The target is immune.
    Prevented,
    /// The target no longer exists.
    Missing,
}

impl Hit {
    /// Did the hit remove any health or armor?
    #[must_use]
    pub fn dealt(self) -> i32 {
        match self {
            Hit::Dealt(n) => n,
            _ => 0,
        }
    }
}

/// Applies damage and healing to heroes and minions.
pub struct CombatResolver;

impl CombatResolver {
    // === Damage ===

    /// Damage one target, then sweep the battlefields.
    pub fn deal_damage(
        state: &mut GameState,
        target: TargetRef,
        amount: i32,
        source: Option<TargetRef>,
        ctx: &ResolverContext,
    ) -> Hit {
        let hit = Self::apply_damage(state, target, amount, source, ctx);
        DeathSweeper::remove_dead(state, ctx);
        hit
    }

    /// Damage every target in `targets` as one wave, then sweep once.
    ///
    /// The caller snapshots the target list before the wave, so a minion
    /// that dies mid-wave is still hit (and its shield decision never
    /// depends on another minion's outcome).
    pub fn deal_aoe(
        state: &mut GameState,
        targets: &[TargetRef],
        amount: i32,
        source: Option<TargetRef>,
        ctx: &ResolverContext,
    ) -> Vec<Hit> {
        let hits = targets
            .iter()
            .map(|t| Self::apply_damage(state, *t, amount, source, ctx))
            .collect();
        DeathSweeper::remove_dead(state, ctx);
        hits
    }

    /// Damage one target without sweeping.
    pub fn apply_damage(
        state: &mut GameState,
        target: TargetRef,
        amount: i32,
        source: Option<TargetRef>,
        ctx: &ResolverContext,
    ) -> Hit {
        match target {
            TargetRef::Hero(player) => {
                if state.players[player].hero_immune {
                    Self::log_damage(state, target, source, 0, "is immune", ctx);
                    return Hit::Prevented;
                }
                let dealt = Self::damage_hero(state, player, amount, ctx);
                ctx.sink.queue_animation(
                    AnimationKind::Damage,
                    Self::payload(target, source).with_amount(dealt),
                );
                Hit::Dealt(dealt)
            }
            TargetRef::Minion(id) => Self::damage_minion(state, id, amount, source, ctx),
        }
    }

    /// Damage a hero: armor absorbs first, health floors at zero.
    ///
    /// Returns health plus armor lost. Appends one log entry and re-checks
    /// both heroes for game over.
    pub fn damage_hero(
        state: &mut GameState,
        player: PlayerId,
        amount: i32,
        ctx: &ResolverContext,
    ) -> i32 {
        if amount <= 0 {
            return 0;
        }
        if state.players[player].hero_immune {
            return 0;
        }

        let seat = &mut state.players[player];
        let absorbed = seat.armor.min(amount);
        seat.armor -= absorbed;
        let remaining = amount - absorbed;
        let before = seat.hero_health;
        seat.hero_health = (seat.hero_health - remaining).max(0);
        let lost = before - seat.hero_health;

        let text = if absorbed > 0 {
            format!(
                "{}'s hero takes {} damage ({} absorbed by armor)",
                player, amount, absorbed
            )
        } else {
            format!("{}'s hero takes {} damage", player, amount)
        };
        let event = ctx
            .event(state, LogEventKind::Damage, player, text)
            .with_value(amount);
        state.log.push(event);

        Self::check_game_over(state, ctx);
        absorbed + lost
    }

    /// Damage a minion without sweeping.
    ///
    /// Vulnerable and Bleeding each add to the amount before the shield
    /// check. Divine Shield absorbs the whole hit. Health is not floored.
    pub fn damage_minion(
        state: &mut GameState,
        id: InstanceId,
        amount: i32,
        source: Option<TargetRef>,
        ctx: &ResolverContext,
    ) -> Hit {
        if amount <= 0 {
            return Hit::Dealt(0);
        }
        let Some(minion) = state.minion(id) else {
            debug!("damage to {} skipped: no longer on a battlefield", id);
            return Hit::Missing;
        };
        let immune = minion.flags.immune
            || ctx
                .catalog
                .by_id(minion.card_id)
                .map_or(false, |def| minion.has_keyword(def, Keyword::Immune));

        let target = TargetRef::Minion(id);
        if immune {
            Self::log_damage(state, target, source, 0, "is immune", ctx);
            return Hit::Prevented;
        }

        let bonus = ctx.config.status_bonus_damage;
        let Some(minion) = state.minion_mut(id) else {
            return Hit::Missing;
        };
        let mut amount = amount;
        if minion.flags.vulnerable {
            amount = amount.saturating_add(bonus);
        }
        if minion.flags.bleeding {
            amount = amount.saturating_add(bonus);
        }

        if minion.flags.divine_shield {
            minion.flags.divine_shield = false;
            Self::log_damage(state, target, source, 0, "loses Divine Shield", ctx);
            ctx.sink
                .queue_animation(AnimationKind::Damage, Self::payload(target, source).with_amount(0));
            return Hit::Absorbed;
        }

        minion.health = minion.health.saturating_sub(amount);
        Self::log_damage(state, target, source, amount, "takes", ctx);
        ctx.sink.queue_animation(
            AnimationKind::Damage,
            Self::payload(target, source).with_amount(amount),
        );
        Hit::Dealt(amount)
    }

    /// Mark a minion for destruction, ignoring shields and immunity.
    ///
    /// The minion stays on the battlefield until the next sweep.
    pub fn destroy_minion(state: &mut GameState, id: InstanceId) -> bool {
        match state.minion_mut(id) {
            Some(minion) => {
                minion.health = minion.health.min(0);
                true
            }
            None => false,
        }
    }

    fn log_damage(
        state: &mut GameState,
        target: TargetRef,
        source: Option<TargetRef>,
        amount: i32,
        verb: &str,
        ctx: &ResolverContext,
    ) {
        let (owner, label, card) = match target {
            TargetRef::Hero(p) => (p, format!("{}'s hero", p), None),
            TargetRef::Minion(id) => match state.minion(id) {
                Some(m) => (
                    state.controller_of(id).unwrap_or(m.owner),
                    ctx.card_name(m.card_id),
                    Some(m.card_id),
                ),
                None => return,
            },
        };
        let actor = Self::actor(state, source).unwrap_or(owner);
        let text = if verb == "takes" {
            format!("{} takes {} damage", label, amount)
        } else {
            format!("{} {}", label, verb)
        };
        let mut event = ctx
            .event(state, LogEventKind::Damage, actor, text)
            .with_value(amount);
        if let Some(card) = card {
            event = event.with_card(card);
        }
        if let Some(id) = target.as_minion() {
            event = event.with_target(id);
        }
        state.log.push(event);
    }

    fn actor(state: &GameState, source: Option<TargetRef>) -> Option<PlayerId> {
        match source? {
            TargetRef::Hero(p) => Some(p),
            TargetRef::Minion(id) => state.locate(id).map(|(p, _, _)| p),
        }
    }

    fn payload(target: TargetRef, source: Option<TargetRef>) -> AnimationPayload {
        match source {
            Some(src) => AnimationPayload::on(target).from_source(src),
            None => AnimationPayload::on(target),
        }
    }

    /// End the game if a hero is at zero health.
    ///
    /// Both heroes dead is a draw, including when the second falls later
    /// in the same damage wave.
    pub fn check_game_over(state: &mut GameState, ctx: &ResolverContext) -> bool {
        if state.is_game_over() {
            if let Some(winner) = state.winner {
                if state.players[winner].hero_health <= 0 {
                    state.winner = None;
                    info!("{} fell in the same wave: the game is a draw", winner);
                    let actor = state.turn_owner;
                    ctx.log(state, LogEventKind::GameOver, actor, "Both heroes fell: the game is a draw");
                }
            }
            return true;
        }
        let dead: Vec<PlayerId> = PlayerId::both()
            .filter(|p| state.players[*p].hero_health <= 0)
            .collect();
        let winner = match dead.as_slice() {
            [] => return false,
            [loser] => Some(loser.opponent()),
            _ => None,
        };

        state.phase = Phase::GameOver;
        state.winner = winner;
        let text = match winner {
            Some(p) => format!("{} wins", p),
            None => "Both heroes fell: the game is a draw".to_string(),
        };
        info!("game over on turn {}: {}", state.turn_number, text);
        let actor = winner.unwrap_or(state.turn_owner);
        ctx.log(state, LogEventKind::GameOver, actor, text);
        true
    }

    // === Healing and armor ===

    /// Restore health, capped at maximum. Returns the amount restored.
    pub fn heal(
        state: &mut GameState,
        target: TargetRef,
        amount: i32,
        source: Option<TargetRef>,
        ctx: &ResolverContext,
    ) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let (actor, restored, label) = match target {
            TargetRef::Hero(p) => {
                let seat = &mut state.players[p];
                let before = seat.hero_health;
                seat.hero_health = seat.hero_health.saturating_add(amount).min(seat.max_health);
                (p, seat.hero_health - before, format!("{}'s hero", p))
            }
            TargetRef::Minion(id) => {
                let Some((owner, _)) = state.find_minion(id) else {
                    return 0;
                };
                let name = state
                    .minion(id)
                    .map(|m| ctx.card_name(m.card_id))
                    .unwrap_or_default();
                let Some(minion) = state.minion_mut(id) else {
                    return 0;
                };
                let before = minion.health;
                minion.health = minion.health.saturating_add(amount).min(minion.max_health);
                (owner, minion.health - before, name)
            }
        };

        let actor = Self::actor(state, source).unwrap_or(actor);
        let mut event = ctx
            .event(
                state,
                LogEventKind::Heal,
                actor,
                format!("{} is healed for {}", label, restored),
            )
            .with_value(restored);
        if let Some(id) = target.as_minion() {
            event = event.with_target(id);
        }
        state.log.push(event);
        ctx.sink.queue_animation(
            AnimationKind::Heal,
            Self::payload(target, source).with_amount(restored),
        );
        restored
    }

    /// Add armor to a hero.
    pub fn gain_armor(state: &mut GameState, player: PlayerId, amount: i32, ctx: &ResolverContext) {
        if amount <= 0 {
            return;
        }
        state.players[player].armor = state.players[player].armor.saturating_add(amount);
        let event = ctx
            .event(
                state,
                LogEventKind::Armor,
                player,
                format!("{} gains {} armor", player, amount),
            )
            .with_value(amount);
        state.log.push(event);
    }

    // === Attack exchange ===

    /// Effective attack of a character, after Weakened.
    #[must_use]
    pub fn attack_value(state: &GameState, character: TargetRef, ctx: &ResolverContext) -> i32 {
        match character {
            TargetRef::Hero(p) => state.players[p].weapon.as_ref().map_or(0, |w| w.attack),
            TargetRef::Minion(id) => state.minion(id).map_or(0, |m| {
                let penalty = if m.flags.weakened { ctx.config.weakened_penalty } else { 0 };
                (m.attack - penalty).max(0)
            }),
        }
    }

    /// Check that `attacker` may attack `defender` right now.
    pub fn validate_attack(
        state: &GameState,
        player: PlayerId,
        attacker: TargetRef,
        defender: TargetRef,
        ctx: &ResolverContext,
    ) -> Result<(), RulesError> {
        let refuse = |reason: &str| RulesError::CannotAttack {
            attacker,
            reason: reason.to_string(),
        };
        let opponent = player.opponent();

        match attacker {
            TargetRef::Hero(p) => {
                if p != player {
                    return Err(refuse("not your hero"));
                }
                let seat = &state.players[player];
                if seat.weapon.is_none() {
                    return Err(refuse("no weapon equipped"));
                }
                if seat.hero_frozen {
                    return Err(refuse("frozen"));
                }
                if seat.hero_attacks_this_turn >= 1 {
                    return Err(refuse("already attacked this turn"));
                }
            }
            TargetRef::Minion(id) => {
                let minion = match state.find_minion(id) {
                    Some((side, index)) if side == player => &state.players[side].battlefield[index],
                    _ => return Err(refuse("not on your battlefield")),
                };
                let def = Self::definition(minion.card_id, ctx)?;
                if minion.flags.frozen {
                    return Err(refuse("frozen"));
                }
                if minion.flags.summoning_sick && !minion.has_keyword(&def, Keyword::Charge) {
                    return Err(refuse("summoning sick"));
                }
                if minion.flags.attacks_this_turn >= minion.max_attacks(&def) {
                    return Err(refuse("no attacks left this turn"));
                }
                if minion.flags.rush_only && defender.is_hero() {
                    return Err(refuse("rush minions cannot attack heroes this turn"));
                }
            }
        }
        if Self::attack_value(state, attacker, ctx) <= 0 {
            return Err(refuse("no attack"));
        }

        match defender {
            TargetRef::Hero(p) if p != opponent => {
                return Err(RulesError::InvalidTarget { target: defender });
            }
            TargetRef::Minion(id) => match state.find_minion(id) {
                Some((side, index)) if side == opponent => {
                    if state.players[side].battlefield[index].flags.stealth {
                        return Err(RulesError::InvalidTarget { target: defender });
                    }
                }
                _ => return Err(RulesError::InvalidTarget { target: defender }),
            },
            TargetRef::Hero(_) => {}
        }

        let taunts: Vec<InstanceId> = state.players[opponent]
            .battlefield
            .iter()
            .filter(|m| !m.flags.stealth)
            .filter(|m| {
                ctx.catalog
                    .by_id(m.card_id)
                    .map_or(m.granted.contains(Keyword::Taunt), |def| {
                        m.has_keyword(def, Keyword::Taunt)
                    })
            })
            .map(|m| m.id)
            .collect();
        if !taunts.is_empty() && !defender.as_minion().map_or(false, |id| taunts.contains(&id)) {
            return Err(refuse("a taunt minion is in the way"));
        }

        Ok(())
    }

    /// Resolve a validated attack: simultaneous damage, Poisonous,
    /// Lifesteal, stealth loss, weapon wear, then one sweep.
    pub fn attack(
        state: &mut GameState,
        player: PlayerId,
        attacker: TargetRef,
        defender: TargetRef,
        ctx: &ResolverContext,
    ) -> Result<(), RulesError> {
        Self::validate_attack(state, player, attacker, defender, ctx)?;

        let outgoing = Self::attack_value(state, attacker, ctx);
        let incoming = match defender {
            TargetRef::Minion(_) => Self::attack_value(state, defender, ctx),
            TargetRef::Hero(_) => 0,
        };

        let text = format!(
            "{} attacks {}",
            Self::label(state, attacker, ctx),
            Self::label(state, defender, ctx)
        );
        let mut event = ctx
            .event(state, LogEventKind::Attack, player, text.clone())
            .with_value(outgoing);
        if let Some(id) = attacker.as_minion() {
            event = event.with_target(id);
        }
        state.log.push(event);
        ctx.sink.queue_animation(
            AnimationKind::Attack,
            AnimationPayload::on(defender).from_source(attacker),
        );
        ctx.sink.log_activity(ActivityKind::Attack, player, &text);

        // Bookkeeping happens before damage so a dying attacker is still counted.
        match attacker {
            TargetRef::Hero(p) => {
                state.players[p].hero_attacks_this_turn += 1;
            }
            TargetRef::Minion(id) => {
                if let Some(m) = state.minion_mut(id) {
                    m.flags.attacks_this_turn += 1;
                    m.flags.stealth = false;
                }
            }
        }

        let to_defender = Self::apply_damage(state, defender, outgoing, Some(attacker), ctx);
        let to_attacker = if incoming > 0 {
            Self::apply_damage(state, attacker, incoming, Some(defender), ctx)
        } else {
            Hit::Dealt(0)
        };

        Self::after_hit(state, attacker, defender, to_defender, ctx);
        Self::after_hit(state, defender, attacker, to_attacker, ctx);

        if let TargetRef::Hero(p) = attacker {
            Self::wear_weapon(state, p);
        }

        DeathSweeper::remove_dead(state, ctx);
        Ok(())
    }

    /// Apply Poisonous and Lifesteal from `dealer` after it hit `victim`.
    fn after_hit(
        state: &mut GameState,
        dealer: TargetRef,
        victim: TargetRef,
        hit: Hit,
        ctx: &ResolverContext,
    ) {
        let dealt = hit.dealt();
        let Some(id) = dealer.as_minion() else {
            return;
        };
        let Some(minion) = state.minion(id) else {
            return;
        };
        let Some(def) = ctx.definition(minion.card_id) else {
            return;
        };
        let poisonous = minion.has_keyword(&def, Keyword::Poisonous);
        let lifesteal = minion.has_keyword(&def, Keyword::Lifesteal);
        let controller = state.controller_of(id).unwrap_or(minion.owner);

        if poisonous && dealt > 0 {
            if let Some(target) = victim.as_minion() {
                debug!("{} is destroyed by poison", target);
                Self::destroy_minion(state, target);
            }
        }
        if lifesteal && dealt > 0 {
            Self::heal(state, TargetRef::Hero(controller), dealt, Some(dealer), ctx);
        }
    }

    fn wear_weapon(state: &mut GameState, player: PlayerId) {
        let seat = &mut state.players[player];
        if let Some(weapon) = seat.weapon.as_mut() {
            weapon.durability -= 1;
            if weapon.durability <= 0 {
                seat.weapon = None;
            }
        }
    }

    fn label(state: &GameState, character: TargetRef, ctx: &ResolverContext) -> String {
        match character {
            TargetRef::Hero(p) => format!("{}'s hero", p),
            TargetRef::Minion(id) => state
                .minion(id)
                .map_or_else(|| id.to_string(), |m| ctx.card_name(m.card_id)),
        }
    }

    fn definition(
        card: crate::cards::CardId,
        ctx: &ResolverContext,
    ) -> Result<std::sync::Arc<CardDefinition>, RulesError> {
        ctx.definition(card)
            .ok_or(RulesError::MissingDefinition { card })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardId, CardInstance};
    use crate::core::{NullSink, RecordingSink, RulesConfig, Weapon};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn catalog() -> CardCatalog {
        [
            CardDefinition::minion(CardId::new(1), "Yeti", 4, 4, 5),
            CardDefinition::minion(CardId::new(2), "Guard", 2, 1, 4).with_keyword(Keyword::Taunt),
            CardDefinition::minion(CardId::new(3), "Asp", 1, 1, 2).with_keyword(Keyword::Poisonous),
            CardDefinition::minion(CardId::new(4), "Leech", 2, 2, 2).with_keyword(Keyword::Lifesteal),
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
    fn test_armor_absorbs_first() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        state.players[P0].armor = 5;

        let lost = CombatResolver::damage_hero(&mut state, P0, 8, &ctx);
        assert_eq!(lost, 8);
        assert_eq!(state.player(P0).armor, 0);
        assert_eq!(state.player(P0).hero_health, 27);
        assert_eq!(state.log.count(LogEventKind::Damage), 1);
    }

    #[test]
    fn test_lethal_ends_game() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);

        CombatResolver::damage_hero(&mut state, P1, 40, &ctx);
        assert_eq!(state.player(P1).hero_health, 0);
        assert!(state.is_game_over());
        assert_eq!(state.winner, Some(P0));
    }

    #[test]
    fn test_both_heroes_dead_is_draw() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        state.players[P0].hero_health = 0;

        CombatResolver::damage_hero(&mut state, P1, 30, &ctx);
        assert!(state.is_game_over());
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_divine_shield_absorbs_any_amount() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let id = place(&mut state, &catalog, P0, 1);
        state.minion_mut(id).unwrap().flags.divine_shield = true;

        let hit = CombatResolver::damage_minion(&mut state, id, 99, None, &ctx);
        assert_eq!(hit, Hit::Absorbed);
        let minion = state.minion(id).unwrap();
        assert!(!minion.flags.divine_shield);
        assert_eq!(minion.health, 5);
    }

    #[test]
    fn test_status_amplifiers_stack() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let id = place(&mut state, &catalog, P0, 1);
        let flags = &mut state.minion_mut(id).unwrap().flags;
        flags.vulnerable = true;
        flags.bleeding = true;

        let hit = CombatResolver::damage_minion(&mut state, id, 1, None, &ctx);
        assert_eq!(hit, Hit::Dealt(7));
        // Not floored until the sweep.
        assert_eq!(state.minion(id).unwrap().health, -2);
    }

    #[test]
    fn test_stale_minion_is_missing() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);

        let hit = CombatResolver::deal_damage(
            &mut state,
            TargetRef::Minion(InstanceId::new(42)),
            3,
            None,
            &ctx,
        );
        assert_eq!(hit, Hit::Missing);
        assert!(state.log.is_empty());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        state.players[P0].hero_health = 25;

        let restored = CombatResolver::heal(&mut state, TargetRef::Hero(P0), 10, None, &ctx);
        assert_eq!(restored, 5);
        assert_eq!(state.player(P0).hero_health, 30);
    }

    #[test]
    fn test_attack_exchange() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let sink = RecordingSink::new();
        let ctx = ResolverContext::new(&catalog, &config, &sink);
        let mut state = GameState::new(1, 30);
        let yeti = place(&mut state, &catalog, P0, 1);
        let enemy = place(&mut state, &catalog, P1, 1);

        CombatResolver::attack(&mut state, P0, TargetRef::Minion(yeti), TargetRef::Minion(enemy), &ctx)
            .unwrap();
        assert_eq!(state.minion(yeti).unwrap().health, 1);
        assert_eq!(state.minion(enemy).unwrap().health, 1);
        assert_eq!(state.minion(yeti).unwrap().flags.attacks_this_turn, 1);
        assert_eq!(sink.animation_count(AnimationKind::Attack), 1);

        let again = CombatResolver::attack(&mut state, P0, TargetRef::Minion(yeti), TargetRef::Hero(P1), &ctx);
        assert!(matches!(again, Err(RulesError::CannotAttack { .. })));
    }

    #[test]
    fn test_summoning_sick_cannot_attack() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let yeti = place(&mut state, &catalog, P0, 1);
        state.minion_mut(yeti).unwrap().flags.summoning_sick = true;

        let result = CombatResolver::validate_attack(&state, P0, TargetRef::Minion(yeti), TargetRef::Hero(P1), &ctx);
        assert!(result.is_err());
    }

    #[test]
    fn test_taunt_blocks_face() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let yeti = place(&mut state, &catalog, P0, 1);
        let guard = place(&mut state, &catalog, P1, 2);

        let face = CombatResolver::validate_attack(&state, P0, TargetRef::Minion(yeti), TargetRef::Hero(P1), &ctx);
        assert!(face.is_err());
        let taunt = CombatResolver::validate_attack(&state, P0, TargetRef::Minion(yeti), TargetRef::Minion(guard), &ctx);
        assert!(taunt.is_ok());
    }

    #[test]
    fn test_poisonous_and_lifesteal() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let asp = place(&mut state, &catalog, P0, 3);
        let leech = place(&mut state, &catalog, P0, 4);
        let yeti = place(&mut state, &catalog, P1, 1);
        state.players[P0].hero_health = 20;

        CombatResolver::attack(&mut state, P0, TargetRef::Minion(asp), TargetRef::Minion(yeti), &ctx)
            .unwrap();
        assert!(state.minion(yeti).is_none());
        assert!(state.minion(asp).is_none());

        CombatResolver::attack(&mut state, P0, TargetRef::Minion(leech), TargetRef::Hero(P1), &ctx)
            .unwrap();
        assert_eq!(state.player(P1).hero_health, 28);
        assert_eq!(state.player(P0).hero_health, 22);
    }

    #[test]
    fn test_weapon_wears_out() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        state.players[P0].weapon = Some(Weapon {
            card_id: CardId::new(9),
            attack: 3,
            durability: 1,
        });

        CombatResolver::attack(&mut state, P0, TargetRef::Hero(P0), TargetRef::Hero(P1), &ctx).unwrap();
        assert_eq!(state.player(P1).hero_health, 27);
        assert!(state.player(P0).weapon.is_none());
    }
}
