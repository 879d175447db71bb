//! Action-level entry points.
//!
//! `RulesEngine` is what an orchestrator drives: it sets up a game,
//! validates each player action, and hands the work to the components
//! (`ZoneManager`, `CombatResolver`, `EffectDispatcher`,
//! `TurnCycleProcessor`). Every check happens before the first mutation,
//! so a rejected action leaves the state exactly as it was.
//!
//! Two forms are offered:
//! - `apply_action` and the `try_*` methods work on `&mut GameState` and
//!   return `Result<(), RulesError>`
//! - `play_card`, `attack`, `end_turn`, and `resume_discovery` take the
//!   state by value and always hand one back; a rejection logs a warning
//!   and returns the input unchanged

use log::{debug, info, warn};

use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, CardType};
use crate::combat::CombatResolver;
use crate::core::{
    Action, ActivityKind, AnimationKind, AnimationPayload, CostScope, EventSink, GameState,
    InstanceId, LogEventKind, NullSink, Phase, PlayerId, RulesConfig, RulesError, TargetRef,
};
use crate::effects::{
    Discovery, EffectContext, EffectDescriptor, EffectDispatcher, EffectKind, ResolverContext,
    TargetResolver,
};
use crate::turns::TurnCycleProcessor;
use crate::zones::{Zone, ZoneManager, ZonePosition};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Both heroes fell together.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// The rules for one table: a catalog, the limits, and a presentation sink.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardCatalog, CardDefinition, CardId};
/// use ccg_rules::core::{PlayerId, RulesConfig};
/// use ccg_rules::rules::RulesEngine;
///
/// let catalog: CardCatalog = [CardDefinition::minion(CardId::new(1), "Wisp", 0, 1, 1)]
///     .into_iter()
///     .collect();
/// let engine = RulesEngine::new(&catalog, RulesConfig::default());
/// let state = engine.new_game(7, vec![CardId::new(1); 10], vec![CardId::new(1); 10]);
///
/// assert_eq!(state.turn_owner, PlayerId::FIRST);
/// assert_eq!(state.player(PlayerId::FIRST).hand.len(), 4);
/// assert_eq!(state.player(PlayerId::SECOND).hand.len(), 4);
/// ```
pub struct RulesEngine<'a> {
    catalog: &'a CardCatalog,
    config: RulesConfig,
    sink: &'a dyn EventSink,
}

impl<'a> RulesEngine<'a> {
    /// An engine with a silent sink.
    pub fn new(catalog: &'a CardCatalog, config: RulesConfig) -> Self {
        Self {
            catalog,
            config,
            sink: &NullSink,
        }
    }

    /// Route animations, activity entries, and timestamps to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        self.catalog
    }

    /// The context every component call runs in.
    #[must_use]
    pub fn context(&self) -> ResolverContext<'_> {
        ResolverContext::new(self.catalog, &self.config, self.sink)
    }

    // === Setup ===

    /// Shuffle both decks, deal opening hands, and start turn 1 for the
    /// first player.
    ///
    /// The second player gets `second_player_bonus_cards` extra cards; the
    /// first player draws for turn 1 as usual.
    pub fn new_game(
        &self,
        seed: u64,
        first_deck: impl IntoIterator<Item = CardId>,
        second_deck: impl IntoIterator<Item = CardId>,
    ) -> GameState {
        let ctx = self.context();
        let mut state = GameState::new(seed, self.config.starting_health)
            .with_deck(PlayerId::FIRST, first_deck)
            .with_deck(PlayerId::SECOND, second_deck);

        for player in PlayerId::both() {
            ZoneManager::shuffle_deck(&mut state, player);
        }
        let opening = self.config.starting_hand_size as u32;
        let bonus = self.config.second_player_bonus_cards as u32;
        ZoneManager::draw_many(&mut state, PlayerId::FIRST, opening, &ctx);
        ZoneManager::draw_many(&mut state, PlayerId::SECOND, opening + bonus, &ctx);

        info!("new game with seed {}", seed);
        Self::begin_turn(&mut state, PlayerId::FIRST, &ctx);
        state
    }

    // === By-value entry points ===

    /// Play a card from hand. Returns the input unchanged if the play is
    /// rejected.
    #[must_use]
    pub fn play_card(
        &self,
        mut state: GameState,
        player: PlayerId,
        instance: InstanceId,
        target: Option<TargetRef>,
    ) -> GameState {
        if let Err(err) = self.try_play_card(&mut state, player, instance, target) {
            warn!("{} cannot play {}: {}", player, instance, err);
        }
        state
    }

    /// Attack with a minion or an armed hero.
    #[must_use]
    pub fn attack(
        &self,
        mut state: GameState,
        player: PlayerId,
        attacker: TargetRef,
        defender: TargetRef,
    ) -> GameState {
        if let Err(err) = self.try_attack(&mut state, player, attacker, defender) {
            warn!("{} cannot attack: {}", player, err);
        }
        state
    }

    #[must_use]
    pub fn end_turn(&self, mut state: GameState, player: PlayerId) -> GameState {
        if let Err(err) = self.try_end_turn(&mut state, player) {
            warn!("{} cannot end the turn: {}", player, err);
        }
        state
    }

    /// Answer the pending Discover. `None` declines.
    #[must_use]
    pub fn resume_discovery(
        &self,
        mut state: GameState,
        player: PlayerId,
        choice: Option<CardId>,
    ) -> GameState {
        if let Err(err) = self.try_resume_discovery(&mut state, player, choice) {
            warn!("{} cannot resolve the Discover: {}", player, err);
        }
        state
    }

    // === Checked entry points ===

    /// Apply any action, reporting why it was rejected.
    pub fn apply_action(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<(), RulesError> {
        match action {
            Action::PlayCard { instance, target } => {
                self.try_play_card(state, player, *instance, *target)
            }
            Action::Attack { attacker, defender } => {
                self.try_attack(state, player, *attacker, *defender)
            }
            Action::Discover { choice } => self.try_resume_discovery(state, player, *choice),
            Action::EndTurn => self.try_end_turn(state, player),
        }
    }

    pub fn try_play_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        instance: InstanceId,
        target: Option<TargetRef>,
    ) -> Result<(), RulesError> {
        let ctx = self.context();
        Self::ensure_can_act(state, player)?;

        let Some(index) = state.players[player].position(Zone::Hand, instance) else {
            return Err(RulesError::CardNotInHand { instance, player });
        };
        let card = state.players[player].hand[index].clone();
        let def = ctx
            .definition(card.card_id)
            .ok_or(RulesError::MissingDefinition { card: card.card_id })?;

        let cost = self.cost_of(state, player, &card, &def);
        let have = state.players[player].mana;
        if cost > have {
            return Err(RulesError::NotEnoughMana { need: cost, have });
        }
        if def.is_minion() && !ZoneManager::board_has_room(state, player, &ctx) {
            return Err(RulesError::CapacityExceeded { zone: Zone::Battlefield, player });
        }
        let target = self.check_target(state, player, &def, target)?;

        // Validated: from here on the play happens.
        self.pay(state, player, cost, &def);
        state.players[player].hand.remove(index);

        let text = format!("{} plays {}", player, def.name);
        debug!("{} for {} mana", text, cost);
        let event = ctx
            .event(state, LogEventKind::CardPlayed, player, text.clone())
            .with_card(def.id)
            .with_value(cost);
        state.log.push(event);
        ctx.sink.log_activity(ActivityKind::CardPlayed, player, &text);

        let ectx = EffectContext::new(player)
            .with_source(card.id, def.id)
            .with_optional_target(target);
        match def.card_type {
            CardType::Minion => self.play_minion(state, player, card, &def, &ectx, &ctx),
            CardType::Spell => self.cast_spell(state, player, card, &def, &ectx, &ctx),
            CardType::Weapon => {
                state.players[player].graveyard.push_back(card);
                let equip = EffectDescriptor::new(EffectKind::EquipWeapon { card: def.id });
                EffectDispatcher::apply(state, &equip, &ectx, &ctx);
                self.battlecry(state, &def, &ectx, &ctx);
            }
            CardType::Hero => {
                state.players[player].graveyard.push_back(card);
                CombatResolver::gain_armor(state, player, def.armor, &ctx);
                self.battlecry(state, &def, &ectx, &ctx);
            }
        }

        state.players[player].cards_played_this_turn += 1;
        Ok(())
    }

    pub fn try_attack(
        &self,
        state: &mut GameState,
        player: PlayerId,
        attacker: TargetRef,
        defender: TargetRef,
    ) -> Result<(), RulesError> {
        Self::ensure_can_act(state, player)?;
        CombatResolver::attack(state, player, attacker, defender, &self.context())
    }

    /// End `player`'s turn and start the next one.
    ///
    /// A pending extra turn for `player` is consumed and they go again.
    pub fn try_end_turn(&self, state: &mut GameState, player: PlayerId) -> Result<(), RulesError> {
        let ctx = self.context();
        Self::ensure_can_act(state, player)?;

        TurnCycleProcessor::end_of_turn(state, &ctx);
        if state.is_game_over() {
            return Ok(());
        }

        let next = match state.extra_turns.iter().position(|p| *p == player) {
            Some(i) => {
                state.extra_turns.remove(i);
                info!("{} takes an extra turn", player);
                player
            }
            None => player.opponent(),
        };
        state.turn_number += 1;
        Self::begin_turn(state, next, &ctx);
        Ok(())
    }

    pub fn try_resume_discovery(
        &self,
        state: &mut GameState,
        player: PlayerId,
        choice: Option<CardId>,
    ) -> Result<(), RulesError> {
        if state.is_game_over() {
            return Err(RulesError::GameOver);
        }
        if !state.discovery.active {
            return Err(RulesError::NoDiscoveryPending);
        }
        if state.discovery.player != player {
            return Err(RulesError::NotYourTurn { player });
        }
        Discovery::resume(state, choice, &self.context())
    }

    // === Queries ===

    /// `Some` once the game has ended.
    #[must_use]
    pub fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if state.phase != Phase::GameOver {
            return None;
        }
        Some(match state.winner {
            Some(p) => GameResult::Winner(p),
            None => GameResult::Draw,
        })
    }

    /// Mana a card in `player`'s hand would cost right now.
    #[must_use]
    pub fn effective_cost(&self, state: &GameState, player: PlayerId, instance: InstanceId) -> Option<i32> {
        let card = state.players[player].hand.iter().find(|c| c.id == instance)?;
        let def = self.catalog.by_id(card.card_id)?;
        Some(self.cost_of(state, player, card, def))
    }

    /// Targets the player may pick for a card in hand. Empty when the
    /// card's effect does not take a target.
    #[must_use]
    pub fn valid_targets(&self, state: &GameState, player: PlayerId, instance: InstanceId) -> Vec<TargetRef> {
        let Some(card) = state.players[player].hand.iter().find(|c| c.id == instance) else {
            return Vec::new();
        };
        let Some(def) = self.catalog.by_id(card.card_id) else {
            return Vec::new();
        };
        match Self::played_effect(def) {
            Some(effect) if effect.kind.needs_target() => {
                TargetResolver::valid_targets(state, player, &effect.target_spec(), self.catalog)
            }
            _ => Vec::new(),
        }
    }

    // === Internals ===

    fn ensure_can_act(state: &GameState, player: PlayerId) -> Result<(), RulesError> {
        if state.is_game_over() {
            return Err(RulesError::GameOver);
        }
        if state.turn_owner != player {
            return Err(RulesError::NotYourTurn { player });
        }
        if state.discovery.active {
            return Err(RulesError::DiscoveryPending);
        }
        Ok(())
    }

    fn begin_turn(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) {
        state.turn_owner = player;
        TurnCycleProcessor::refresh(state, player, ctx);
        ZoneManager::draw(state, player, ctx);
        if !state.is_game_over() {
            TurnCycleProcessor::start_of_turn(state, ctx);
        }
    }

    /// The effect that resolves when `def` is played.
    fn played_effect(def: &CardDefinition) -> Option<&EffectDescriptor> {
        match def.card_type {
            CardType::Spell => def.spell_effect.as_ref(),
            CardType::Minion | CardType::Weapon | CardType::Hero => def.battlecry.as_ref(),
        }
    }

    /// Validate the chosen target against the played effect.
    ///
    /// A spell that needs a target must get a valid one. A battlecry with
    /// no target supplied simply does not fire; the card still plays.
    fn check_target(
        &self,
        state: &GameState,
        player: PlayerId,
        def: &CardDefinition,
        target: Option<TargetRef>,
    ) -> Result<Option<TargetRef>, RulesError> {
        let Some(effect) = Self::played_effect(def) else {
            return Ok(None);
        };
        if !effect.kind.needs_target() {
            return Ok(target);
        }
        match target {
            Some(chosen) => {
                let spec = effect.target_spec();
                if TargetResolver::is_valid_target(state, player, &spec, chosen, self.catalog) {
                    Ok(Some(chosen))
                } else {
                    Err(RulesError::InvalidTarget { target: chosen })
                }
            }
            None if def.is_spell() => Err(RulesError::MissingTarget),
            None => Ok(None),
        }
    }

    fn cost_of(&self, state: &GameState, player: PlayerId, card: &CardInstance, def: &CardDefinition) -> i32 {
        let discount: i32 = state.players[player]
            .cost_modifiers
            .iter()
            .filter(|m| !m.spells_only || def.is_spell())
            .map(|m| m.amount)
            .sum();
        (def.mana_cost + card.cost_modifier - discount).max(0)
    }

    /// Spend mana and consume next-card reductions that applied.
    fn pay(&self, state: &mut GameState, player: PlayerId, cost: i32, def: &CardDefinition) {
        let seat = &mut state.players[player];
        seat.mana -= cost;
        seat.cost_modifiers
            .retain(|m| m.scope != CostScope::NextCard || (m.spells_only && !def.is_spell()));
    }

    fn play_minion(
        &self,
        state: &mut GameState,
        player: PlayerId,
        card: CardInstance,
        def: &CardDefinition,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) {
        ZoneManager::place_on_battlefield(state, player, card, def, ZonePosition::Bottom);
        ctx.sink
            .queue_animation(AnimationKind::Summon, AnimationPayload::card(def.id));
        self.battlecry(state, def, ectx, ctx);
    }

    fn battlecry(
        &self,
        state: &mut GameState,
        def: &CardDefinition,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) {
        let Some(effect) = def.battlecry.as_ref() else {
            return;
        };
        if effect.kind.needs_target() && ectx.target.is_none() {
            debug!("{} battlecry has no target and does not fire", def.name);
            return;
        }
        EffectDispatcher::apply(state, effect, ectx, ctx);
    }

    fn cast_spell(
        &self,
        state: &mut GameState,
        player: PlayerId,
        card: CardInstance,
        def: &CardDefinition,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) {
        state.players[player].graveyard.push_back(card);
        let event = ctx
            .event(state, LogEventKind::SpellCast, player, format!("{} casts {}", player, def.name))
            .with_card(def.id);
        state.log.push(event);
        let mut payload = AnimationPayload::card(def.id);
        payload.target = ectx.target;
        ctx.sink.queue_animation(AnimationKind::SpellCast, payload);
        ctx.sink
            .log_activity(ActivityKind::SpellCast, player, &format!("{} casts {}", player, def.name));

        if let Some(effect) = def.spell_effect.as_ref() {
            EffectDispatcher::apply(state, effect, ectx, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Keyword;
    use crate::core::{CostModifier, RecordingSink};
    use crate::effects::{CardPool, Selector};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    const WISP: CardId = CardId::new(1);
    const BOLT: CardId = CardId::new(2);
    const OGRE: CardId = CardId::new(3);
    const BLADE: CardId = CardId::new(4);
    const ORACLE: CardId = CardId::new(5);
    const SCHOLAR: CardId = CardId::new(6);
    const HASTE: CardId = CardId::new(7);

    fn catalog() -> CardCatalog {
        [
            CardDefinition::minion(WISP, "Wisp", 0, 1, 1),
            CardDefinition::spell(BOLT, "Bolt", 1, EffectDescriptor::damage(3)),
            CardDefinition::minion(OGRE, "Ogre", 6, 6, 7),
            CardDefinition::weapon(BLADE, "Blade", 2, 3, 2),
            CardDefinition::minion(ORACLE, "Oracle", 2, 2, 2)
                .with_battlecry(EffectDescriptor::buff(1, 1, Selector::Chosen)),
            CardDefinition::minion(SCHOLAR, "Scholar", 1, 1, 1)
                .with_battlecry(EffectDescriptor::discover(CardPool::minions()).then(EffectDescriptor::draw(1))),
            CardDefinition::spell(HASTE, "Haste", 0, EffectDescriptor::new(EffectKind::ReduceCost {
                amount: 2,
                scope: CostScope::NextCard,
                spells_only: false,
            })),
        ]
        .into_iter()
        .collect()
    }

    /// A game on turn 1 with `hand` dealt to the first player and plenty of mana.
    fn setup<'a>(catalog: &'a CardCatalog, hand: &[CardId]) -> (RulesEngine<'a>, GameState) {
        let engine = RulesEngine::new(catalog, RulesConfig::default().with_opening_hand(0, 0));
        let mut state = engine.new_game(5, vec![WISP; 5], vec![WISP; 5]);
        let ctx = engine.context();
        state.players[P0].hand.clear();
        for card in hand {
            let def = ctx.definition(*card).unwrap();
            ZoneManager::add_to_hand(&mut state, P0, &def, &ctx);
        }
        state.players[P0].mana = 10;
        state.players[P0].max_mana = 10;
        (engine, state)
    }

    fn hand_id(state: &GameState, card: CardId) -> InstanceId {
        state.player(P0).hand.iter().find(|c| c.card_id == card).unwrap().id
    }

    #[test]
    fn test_new_game_deals_hands() {
        let catalog = catalog();
        let engine = RulesEngine::new(&catalog, RulesConfig::default());
        let state = engine.new_game(1, vec![WISP; 10], vec![WISP; 10]);

        assert_eq!(state.player(P0).hand.len(), 4);
        assert_eq!(state.player(P1).hand.len(), 4);
        assert_eq!(state.player(P0).deck.len(), 6);
        assert_eq!((state.player(P0).mana, state.player(P0).max_mana), (1, 1));
        assert_eq!(state.player(P1).max_mana, 0);
        assert_eq!(state.log.count(LogEventKind::TurnStart), 1);
    }

    #[test]
    fn test_play_minion_spends_mana() {
        let catalog = catalog();
        let (engine, state) = setup(&catalog, &[OGRE]);
        let ogre = hand_id(&state, OGRE);

        let state = engine.play_card(state, P0, ogre, None);
        assert_eq!(state.player(P0).mana, 4);
        assert!(state.player(P0).hand.is_empty());
        assert_eq!(state.player(P0).battlefield[0].id, ogre);
        assert!(state.player(P0).battlefield[0].flags.summoning_sick);
        assert_eq!(state.player(P0).cards_played_this_turn, 1);
        assert_eq!(state.log.count(LogEventKind::CardPlayed), 1);
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[OGRE]);
        let ogre = hand_id(&state, OGRE);
        state.players[P0].mana = 5;
        let log_len = state.log.len();

        let err = engine.try_play_card(&mut state, P0, ogre, None);
        assert_eq!(err, Err(RulesError::NotEnoughMana { need: 6, have: 5 }));
        let err = engine.try_play_card(&mut state, P1, ogre, None);
        assert_eq!(err, Err(RulesError::NotYourTurn { player: P1 }));
        let err = engine.try_play_card(&mut state, P0, InstanceId::new(999), None);
        assert_eq!(err, Err(RulesError::CardNotInHand { instance: InstanceId::new(999), player: P0 }));

        let after = engine.play_card(state.clone(), P0, ogre, None);
        assert_eq!(after.player(P0).hand.len(), 1);
        assert_eq!(after.log.len(), log_len);
    }

    #[test]
    fn test_spell_needs_valid_target() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[BOLT]);
        let bolt = hand_id(&state, BOLT);

        assert_eq!(engine.try_play_card(&mut state, P0, bolt, None), Err(RulesError::MissingTarget));
        engine
            .try_play_card(&mut state, P0, bolt, Some(TargetRef::Hero(P1)))
            .unwrap();
        assert_eq!(state.player(P1).hero_health, 27);
        assert_eq!(state.player(P0).graveyard[0].card_id, BOLT);
        assert_eq!(state.log.count(LogEventKind::SpellCast), 1);
    }

    #[test]
    fn test_battlecry_without_target_still_plays() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[ORACLE, WISP, ORACLE]);
        let wisp = hand_id(&state, WISP);
        let first = hand_id(&state, ORACLE);

        engine.try_play_card(&mut state, P0, first, None).unwrap();
        assert_eq!(state.minion(first).unwrap().attack, 2);

        engine.try_play_card(&mut state, P0, wisp, None).unwrap();
        let second = hand_id(&state, ORACLE);
        engine
            .try_play_card(&mut state, P0, second, Some(TargetRef::Minion(wisp)))
            .unwrap();
        assert_eq!(state.minion(wisp).unwrap().attack, 2);
        assert_eq!(state.minion(wisp).unwrap().health, 2);
    }

    #[test]
    fn test_weapon_equip_and_hero_attack() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[BLADE]);
        let blade = hand_id(&state, BLADE);

        engine.try_play_card(&mut state, P0, blade, None).unwrap();
        assert_eq!(state.player(P0).weapon.as_ref().unwrap().attack, 3);
        engine
            .try_attack(&mut state, P0, TargetRef::Hero(P0), TargetRef::Hero(P1))
            .unwrap();
        assert_eq!(state.player(P1).hero_health, 27);
        assert_eq!(state.player(P0).weapon.as_ref().unwrap().durability, 1);
    }

    #[test]
    fn test_next_card_discount_is_consumed() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[HASTE, OGRE]);
        let haste = hand_id(&state, HASTE);
        let ogre = hand_id(&state, OGRE);

        engine.try_play_card(&mut state, P0, haste, None).unwrap();
        assert_eq!(engine.effective_cost(&state, P0, ogre), Some(4));
        engine.try_play_card(&mut state, P0, ogre, None).unwrap();
        assert_eq!(state.player(P0).mana, 6);
        assert!(state.player(P0).cost_modifiers.is_empty());
    }

    #[test]
    fn test_spell_only_discount_skips_minions() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[OGRE, BOLT]);
        state.players[P0].cost_modifiers.push(CostModifier {
            amount: 1,
            scope: CostScope::NextCard,
            spells_only: true,
        });
        let ogre = hand_id(&state, OGRE);
        let bolt = hand_id(&state, BOLT);

        assert_eq!(engine.effective_cost(&state, P0, ogre), Some(6));
        assert_eq!(engine.effective_cost(&state, P0, bolt), Some(0));
        engine.try_play_card(&mut state, P0, ogre, None).unwrap();
        assert_eq!(state.player(P0).cost_modifiers.len(), 1);
    }

    #[test]
    fn test_discover_blocks_actions_until_resumed() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[SCHOLAR, WISP]);
        let scholar = hand_id(&state, SCHOLAR);
        let wisp = hand_id(&state, WISP);
        let deck_before = state.player(P0).deck.len();

        engine.try_play_card(&mut state, P0, scholar, None).unwrap();
        assert!(state.discovery.active);
        assert_eq!(engine.try_play_card(&mut state, P0, wisp, None), Err(RulesError::DiscoveryPending));
        assert_eq!(engine.try_end_turn(&mut state, P0), Err(RulesError::DiscoveryPending));
        assert_eq!(
            engine.try_resume_discovery(&mut state, P1, None),
            Err(RulesError::NotYourTurn { player: P1 })
        );

        let pick = state.discovery.options[0];
        let state = engine.resume_discovery(state, P0, Some(pick));
        assert!(!state.discovery.active);
        assert!(state.player(P0).hand.iter().any(|c| c.card_id == pick));
        assert_eq!(state.player(P0).deck.len(), deck_before - 1);
    }

    #[test]
    fn test_end_turn_passes_to_opponent() {
        let catalog = catalog();
        let (engine, state) = setup(&catalog, &[]);

        let state = engine.end_turn(state, P0);
        assert_eq!(state.turn_owner, P1);
        assert_eq!(state.turn_number, 2);
        assert_eq!(state.player(P1).mana, 1);
        assert_eq!(state.player(P1).hand.len(), 1);

        let state = engine.end_turn(state, P0);
        assert_eq!(state.turn_owner, P1);
    }

    #[test]
    fn test_extra_turn() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[]);
        state.extra_turns.push_back(P0);

        engine.try_end_turn(&mut state, P0).unwrap();
        assert_eq!(state.turn_owner, P0);
        assert!(state.extra_turns.is_empty());
        assert_eq!(state.player(P0).max_mana, 10);
    }

    #[test]
    fn test_minions_wake_on_their_next_turn() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[WISP]);
        let wisp = hand_id(&state, WISP);
        engine.try_play_card(&mut state, P0, wisp, None).unwrap();
        let attack = Action::attack(TargetRef::Minion(wisp), TargetRef::Hero(P1));
        assert!(engine.apply_action(&mut state, P0, &attack).is_err());

        engine.apply_action(&mut state, P0, &Action::EndTurn).unwrap();
        engine.apply_action(&mut state, P1, &Action::EndTurn).unwrap();
        engine.apply_action(&mut state, P0, &attack).unwrap();
        assert_eq!(state.player(P1).hero_health, 29);
    }

    #[test]
    fn test_terminal_and_game_over_rejection() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[BOLT]);
        assert_eq!(engine.is_terminal(&state), None);
        state.players[P1].hero_health = 3;
        let bolt = hand_id(&state, BOLT);

        engine
            .try_play_card(&mut state, P0, bolt, Some(TargetRef::Hero(P1)))
            .unwrap();
        assert_eq!(engine.is_terminal(&state), Some(GameResult::Winner(P0)));
        assert!(GameResult::Winner(P0).is_winner(P0));
        assert_eq!(engine.try_end_turn(&mut state, P0), Err(RulesError::GameOver));
    }

    #[test]
    fn test_sink_receives_play_events() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let (engine, mut state) = setup(&catalog, &[BOLT]);
        let engine = engine.with_sink(&sink);
        let bolt = hand_id(&state, BOLT);

        engine
            .try_play_card(&mut state, P0, bolt, Some(TargetRef::Hero(P1)))
            .unwrap();
        assert!(sink.animations().iter().any(|(kind, _)| *kind == AnimationKind::SpellCast));
        assert!(sink.activities().iter().any(|(kind, _, _)| *kind == ActivityKind::SpellCast));
    }

    #[test]
    fn test_valid_targets_for_card_in_hand() {
        let catalog = catalog();
        let (engine, mut state) = setup(&catalog, &[BOLT, WISP]);
        let ctx = engine.context();
        let def = ctx.definition(OGRE).unwrap();
        let mut ogre = CardInstance::new(state.alloc_instance(), &def, P1);
        ogre.granted.insert(Keyword::Stealth);
        ogre.flags.stealth = true;
        state.players[P1].battlefield.push_back(ogre);

        let bolt = hand_id(&state, BOLT);
        let wisp = hand_id(&state, WISP);
        assert_eq!(
            engine.valid_targets(&state, P0, bolt),
            vec![TargetRef::Hero(P0), TargetRef::Hero(P1)]
        );
        assert!(engine.valid_targets(&state, P0, wisp).is_empty());
    }
}
