//! The game aggregate and its turn/interrupt state machine.
//!
//! `GameState` is mutated only through `draw`, `discard`, `decide` and
//! `advance`. Each command validates first and mutates second, so a rejected
//! command leaves the state exactly as it was. After every accepted command
//! the tile conservation invariant is re-checked; a failure poisons the game.

use rand::Rng;
use tracing::{debug, error, info, instrument, warn};

pub mod automation;
pub mod legal_actions;
pub mod player;
pub mod wall;

use crate::action::{Capability, Choice, DecisionContext, Phase, TurnState};
use crate::errors::{EngineError, EngineResult, ProtocolViolation};
use crate::event::GameEvent;
use crate::observation::Observation;
use crate::rule::GameRule;
use crate::score::{score_win, WinRecord};
use crate::tile::{Tile, COPIES_PER_TILE, NUM_TILES};
use crate::types::SeatKind;
use automation::{best_capability, choose_discard};
use legal_actions::{claim_capabilities, seats_after, self_turn_capabilities};
use player::PlayerState;
use wall::Wall;

pub const NUM_PLAYERS: usize = 4;

/// Concealed tiles dealt to every seat.
pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    wall: Wall,
    players: [PlayerState; NUM_PLAYERS],
    current_player: u8,
    last_discarded: Option<(u8, Tile)>,
    last_drawn: Option<Tile>,
    pending_actions: [Vec<Capability>; NUM_PLAYERS],
    turn: TurnState,
    /// The current seat's last draw replaced a kong.
    after_kong: bool,
    rule: GameRule,
    win: Option<WinRecord>,
    events: Vec<GameEvent>,
    poisoned: Option<String>,
}

fn awaits_discard(turn: &TurnState, seat: u8) -> bool {
    match *turn {
        TurnState::AwaitingDiscard(s) => s == seat,
        // Discarding at a self-turn decision declines the offered actions.
        TurnState::AwaitingInterruptDecision {
            seat: s,
            context: DecisionContext::SelfTurn,
            ..
        } => s == seat,
        _ => false,
    }
}

impl GameState {
    /// Shuffles a fresh wall with `rng` and deals.
    pub fn new<R: Rng + ?Sized>(rule: GameRule, seats: [SeatKind; NUM_PLAYERS], rng: &mut R) -> Self {
        Self::deal(rule, seats, Wall::shuffled(rng))
    }

    /// Deals from a prepared wall, e.g. one built with [`Wall::stacked`].
    pub fn from_wall(
        rule: GameRule,
        seats: [SeatKind; NUM_PLAYERS],
        wall: Wall,
    ) -> EngineResult<Self> {
        let counts = wall.counts();
        if wall.remaining() != NUM_TILES
            || Tile::all().any(|t| counts.count(t) as usize != COPIES_PER_TILE)
        {
            return Err(EngineError::config(format!(
                "wall must hold {COPIES_PER_TILE} copies of every tile, got {} tiles",
                wall.remaining()
            )));
        }
        Ok(Self::deal(rule, seats, wall))
    }

    fn deal(rule: GameRule, seats: [SeatKind; NUM_PLAYERS], mut wall: Wall) -> Self {
        let mut players =
            [0u8, 1, 2, 3].map(|s| PlayerState::new(s, seats[s as usize], rule.starting_score));
        for player in &mut players {
            for tile in (0..HAND_SIZE).map_while(|_| wall.draw()) {
                player.receive(tile);
            }
        }
        let wall_remaining = wall.remaining();
        debug!(wall_remaining, ?seats, "dealt");
        Self {
            wall,
            players,
            current_player: 0,
            last_discarded: None,
            last_drawn: None,
            pending_actions: Default::default(),
            turn: TurnState::AwaitingDraw(0),
            after_kong: false,
            rule,
            win: None,
            events: vec![GameEvent::Deal { wall_remaining }],
            poisoned: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    pub fn is_over(&self) -> bool {
        self.turn.is_terminal()
    }

    pub fn players(&self) -> &[PlayerState; NUM_PLAYERS] {
        &self.players
    }

    pub fn player(&self, seat: u8) -> Option<&PlayerState> {
        self.players.get(seat as usize)
    }

    pub fn scores(&self) -> [i32; NUM_PLAYERS] {
        self.players.each_ref().map(|p| p.score)
    }

    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    pub fn last_discarded(&self) -> Option<(u8, Tile)> {
        self.last_discarded
    }

    pub fn last_drawn(&self) -> Option<Tile> {
        self.last_drawn
    }

    /// Capabilities still outstanding for `seat`; empty when none.
    pub fn pending_actions(&self, seat: u8) -> &[Capability] {
        self.pending_actions
            .get(seat as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn wall_remaining(&self) -> usize {
        self.wall.remaining()
    }

    pub fn after_kong(&self) -> bool {
        self.after_kong
    }

    pub fn rule(&self) -> &GameRule {
        &self.rule
    }

    pub fn win(&self) -> Option<&WinRecord> {
        self.win.as_ref()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Every tile accounted for: wall, hands, melds and discards.
    pub fn tile_total(&self) -> usize {
        self.wall.remaining() + self.players.iter().map(PlayerState::tile_total).sum::<usize>()
    }

    /// Snapshot of the game as `seat` is allowed to see it.
    pub fn observe(&self, seat: u8) -> EngineResult<Observation> {
        if seat as usize >= NUM_PLAYERS {
            return Err(ProtocolViolation::InvalidSeat(seat).into());
        }
        Ok(Observation::for_seat(self, seat))
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    #[instrument(skip(self), fields(state = %self.turn))]
    pub fn draw(&mut self, seat: u8) -> EngineResult<TurnState> {
        self.ensure_turn(seat, |turn| *turn == TurnState::AwaitingDraw(seat))?;
        let result = self.perform_draw(seat, false);
        self.commit(result)
    }

    #[instrument(skip(self), fields(state = %self.turn))]
    pub fn discard(&mut self, seat: u8, tile: Tile) -> EngineResult<TurnState> {
        self.ensure_turn(seat, |turn| awaits_discard(turn, seat))?;
        if self.players[seat as usize].count(tile) == 0 {
            return Err(self.reject(ProtocolViolation::tile_not_in_hand(seat, tile)));
        }
        if matches!(self.turn, TurnState::AwaitingInterruptDecision { .. }) {
            self.events.push(GameEvent::Pass { seat });
        }
        let result = self.perform_discard(seat, tile);
        self.commit(result)
    }

    /// Discards by position in the seat's sorted hand.
    pub fn discard_at(&mut self, seat: u8, index: usize) -> EngineResult<TurnState> {
        match self.player(seat).and_then(|p| p.hand.get(index).copied()) {
            Some(tile) => self.discard(seat, tile),
            None => {
                self.ensure_turn(seat, |turn| awaits_discard(turn, seat))?;
                Err(self.reject(ProtocolViolation::TileNotInHand {
                    seat,
                    tile: format!("index {index}"),
                }))
            }
        }
    }

    #[instrument(skip(self), fields(state = %self.turn))]
    pub fn decide(&mut self, seat: u8, choice: Choice) -> EngineResult<TurnState> {
        self.ensure_turn(seat, |turn| {
            matches!(*turn, TurnState::AwaitingInterruptDecision { seat: s, .. } if s == seat)
        })?;
        let TurnState::AwaitingInterruptDecision {
            capabilities,
            context,
            ..
        } = &self.turn
        else {
            return Err(EngineError::invariant("decision state vanished"));
        };
        if let Choice::Take(cap) = choice {
            if !capabilities.contains(&cap) {
                return Err(self.reject(ProtocolViolation::NotOffered {
                    seat,
                    choice: choice.to_string(),
                }));
            }
        }
        let context = *context;

        let result = match (choice, context) {
            (Choice::Pass, DecisionContext::Claim { discarder, tile }) => {
                self.pending_actions[seat as usize].clear();
                self.events.push(GameEvent::Pass { seat });
                self.arbitrate_claims(discarder, tile)
            }
            (Choice::Pass, DecisionContext::SelfTurn) => {
                self.clear_pending();
                self.events.push(GameEvent::Pass { seat });
                self.turn = TurnState::AwaitingDiscard(seat);
                Ok(())
            }
            (Choice::Take(cap), DecisionContext::Claim { discarder, tile }) => {
                self.execute_claim(seat, discarder, tile, cap)
            }
            (Choice::Take(cap), DecisionContext::SelfTurn) => self.execute_self(seat, cap),
        };
        self.commit(result)
    }

    /// Plays automated seats until a human seat must act or the game ends.
    #[instrument(skip(self), fields(state = %self.turn))]
    pub fn advance(&mut self) -> EngineResult<TurnState> {
        self.ensure_live()?;
        loop {
            let step = match self.turn {
                TurnState::AwaitingDraw(s) if !self.players[s as usize].is_human() => {
                    self.perform_draw(s, false)
                }
                TurnState::AwaitingDiscard(s) if !self.players[s as usize].is_human() => {
                    self.automated_discard(s)
                }
                _ => return Ok(self.turn.clone()),
            };
            self.commit(step)?;
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    fn ensure_live(&self) -> EngineResult<()> {
        match &self.poisoned {
            Some(message) => Err(EngineError::invariant(message.clone())),
            None => Ok(()),
        }
    }

    fn ensure_turn(&self, seat: u8, on_turn: impl FnOnce(&TurnState) -> bool) -> EngineResult<()> {
        self.ensure_live()?;
        let violation = if seat as usize >= NUM_PLAYERS {
            ProtocolViolation::InvalidSeat(seat)
        } else if self.turn.is_terminal() {
            ProtocolViolation::GameOver
        } else if !on_turn(&self.turn) {
            ProtocolViolation::OutOfTurn {
                seat,
                expected: self.turn.to_string(),
            }
        } else {
            return Ok(());
        };
        Err(self.reject(violation))
    }

    fn reject(&self, violation: ProtocolViolation) -> EngineError {
        warn!(%violation, "command rejected");
        violation.into()
    }

    /// Finishes a command: verifies conservation and poisons the game on any
    /// invariant violation.
    fn commit(&mut self, result: EngineResult<()>) -> EngineResult<TurnState> {
        match result.and_then(|()| self.check_conservation()) {
            Ok(()) => {
                debug!(state = %self.turn, "transition");
                Ok(self.turn.clone())
            }
            Err(err) => {
                if let EngineError::InvariantViolation { message } = &err {
                    error!(%message, "invariant violated, game poisoned");
                    self.poisoned = Some(message.clone());
                }
                Err(err)
            }
        }
    }

    /// Seat that should hold an extra tile in the current state.
    fn holding_seat(&self) -> Option<u8> {
        match self.turn {
            TurnState::AwaitingDiscard(s) | TurnState::Won(s) => Some(s),
            TurnState::AwaitingInterruptDecision {
                seat,
                context: DecisionContext::SelfTurn,
                ..
            } => Some(seat),
            _ => None,
        }
    }

    fn check_conservation(&self) -> EngineResult<()> {
        let total = self.tile_total();
        if total != NUM_TILES {
            return Err(EngineError::invariant(format!(
                "tile total {total} != {NUM_TILES}"
            )));
        }
        let holder = self.holding_seat();
        for player in &self.players {
            let expected = if holder == Some(player.seat) {
                HAND_SIZE + 1
            } else {
                HAND_SIZE
            };
            let len = player.effective_hand_len();
            if len != expected {
                return Err(EngineError::invariant(format!(
                    "seat {} hand length {len}, expected {expected}",
                    player.seat
                )));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn clear_pending(&mut self) {
        self.pending_actions.iter_mut().for_each(Vec::clear);
    }

    fn perform_draw(&mut self, seat: u8, replacement: bool) -> EngineResult<()> {
        let Some(tile) = self.wall.draw() else {
            self.clear_pending();
            self.last_drawn = None;
            self.turn = TurnState::Drawn;
            self.events.push(GameEvent::ExhaustiveDraw);
            info!(seat, "wall exhausted, game drawn");
            return Ok(());
        };
        self.current_player = seat;
        self.players[seat as usize].receive(tile);
        self.last_drawn = Some(tile);
        self.after_kong = replacement;
        self.events.push(GameEvent::Draw {
            seat,
            tile,
            replacement,
        });
        debug!(seat, %tile, replacement, remaining = self.wall.remaining(), "draw");
        self.enter_self_turn(seat)
    }

    /// Offers the drawing seat its own actions. Automated seats take the best
    /// one on the spot, which can chain through further replacement draws.
    fn enter_self_turn(&mut self, seat: u8) -> EngineResult<()> {
        let player = &self.players[seat as usize];
        let caps = self_turn_capabilities(player);
        if caps.is_empty() {
            self.turn = TurnState::AwaitingDiscard(seat);
            return Ok(());
        }
        if player.is_human() {
            self.pending_actions[seat as usize] = caps.clone();
            self.turn = TurnState::AwaitingInterruptDecision {
                seat,
                capabilities: caps,
                context: DecisionContext::SelfTurn,
            };
            return Ok(());
        }
        match best_capability(&caps) {
            Some(cap) => {
                debug!(seat, %cap, "automated self-turn action");
                self.execute_self(seat, cap)
            }
            None => {
                self.turn = TurnState::AwaitingDiscard(seat);
                Ok(())
            }
        }
    }

    fn execute_self(&mut self, seat: u8, cap: Capability) -> EngineResult<()> {
        self.clear_pending();
        match cap {
            Capability::SelfWin => {
                let tile = self.last_drawn.ok_or_else(|| {
                    EngineError::invariant(format!("seat {seat} self-win without a drawn tile"))
                })?;
                self.finish_win(seat, None, tile);
                Ok(())
            }
            Capability::ConcealedKong(tile) => {
                self.players[seat as usize].form_quad_concealed(tile)?;
                self.events.push(GameEvent::ConcealedKong { seat, tile });
                self.perform_draw(seat, true)
            }
            Capability::UpgradeKong(tile) => {
                self.players[seat as usize].upgrade_triplet_to_quad(tile)?;
                self.events.push(GameEvent::UpgradeKong { seat, tile });
                self.perform_draw(seat, true)
            }
            other => Err(EngineError::invariant(format!(
                "{other} is not a self-turn action"
            ))),
        }
    }

    fn automated_discard(&mut self, seat: u8) -> EngineResult<()> {
        let tile = choose_discard(&self.players[seat as usize].hand).ok_or_else(|| {
            EngineError::invariant(format!("seat {seat} has nothing to discard"))
        })?;
        debug!(seat, %tile, "automated discard");
        self.perform_discard(seat, tile)
    }

    fn perform_discard(&mut self, seat: u8, tile: Tile) -> EngineResult<()> {
        let player = &mut self.players[seat as usize];
        if !player.remove_tile(tile) {
            return Err(EngineError::invariant(format!(
                "seat {seat} discarded {tile} it does not hold"
            )));
        }
        player.discards.push(tile);
        self.clear_pending();
        self.last_drawn = None;
        self.after_kong = false;
        self.last_discarded = Some((seat, tile));
        self.events.push(GameEvent::Discard { seat, tile });
        debug!(seat, %tile, "discard");
        self.open_claims(seat, tile)
    }

    fn open_claims(&mut self, discarder: u8, tile: Tile) -> EngineResult<()> {
        for seat in seats_after(discarder) {
            self.pending_actions[seat as usize] =
                claim_capabilities(&self.players[seat as usize], tile);
        }
        self.arbitrate_claims(discarder, tile)
    }

    /// Resolves outstanding claims on the last discard. The first human seat
    /// in turn order with options pauses the game; otherwise the strongest
    /// automated claim is taken; otherwise play moves on.
    fn arbitrate_claims(&mut self, discarder: u8, tile: Tile) -> EngineResult<()> {
        let human = seats_after(discarder).find(|&s| {
            self.players[s as usize].is_human() && !self.pending_actions[s as usize].is_empty()
        });
        if let Some(seat) = human {
            debug!(seat, %tile, "waiting on claim decision");
            self.turn = TurnState::AwaitingInterruptDecision {
                seat,
                capabilities: self.pending_actions[seat as usize].clone(),
                context: DecisionContext::Claim { discarder, tile },
            };
            return Ok(());
        }

        let mut best: Option<(u8, Capability)> = None;
        for seat in seats_after(discarder) {
            if let Some(cap) = best_capability(&self.pending_actions[seat as usize]) {
                if best.map_or(true, |(_, b)| cap.priority() > b.priority()) {
                    best = Some((seat, cap));
                }
            }
        }
        match best {
            Some((seat, cap)) => {
                debug!(seat, %cap, %tile, "automated claim");
                self.execute_claim(seat, discarder, tile, cap)
            }
            None => {
                self.clear_pending();
                self.turn = TurnState::AwaitingDraw((discarder + 1) % NUM_PLAYERS as u8);
                Ok(())
            }
        }
    }

    /// Moves the claimed discard out of the discarder's pile.
    fn take_discard(&mut self, discarder: u8, tile: Tile) -> EngineResult<()> {
        let pile = &mut self.players[discarder as usize].discards;
        match pile.last() {
            Some(&last) if last == tile => {
                pile.pop();
                Ok(())
            }
            _ => Err(EngineError::invariant(format!(
                "seat {discarder} has no {tile} on top of its discards"
            ))),
        }
    }

    fn execute_claim(
        &mut self,
        seat: u8,
        discarder: u8,
        tile: Tile,
        cap: Capability,
    ) -> EngineResult<()> {
        if !cap.is_claim() {
            return Err(EngineError::invariant(format!("{cap} is not a claim")));
        }
        self.clear_pending();
        self.take_discard(discarder, tile)?;
        self.last_discarded = None;
        self.last_drawn = None;
        self.current_player = seat;
        let player = &mut self.players[seat as usize];
        match cap {
            Capability::Win => {
                player.receive(tile);
                self.finish_win(seat, Some(discarder), tile);
                Ok(())
            }
            Capability::Kong => {
                player.claim_quad_exposed(tile, discarder)?;
                self.events.push(GameEvent::ExposedKong {
                    seat,
                    from: discarder,
                    tile,
                });
                self.perform_draw(seat, true)
            }
            _ => {
                player.claim_triplet(tile, discarder)?;
                self.events.push(GameEvent::Pong {
                    seat,
                    from: discarder,
                    tile,
                });
                self.turn = TurnState::AwaitingDiscard(seat);
                Ok(())
            }
        }
    }

    fn finish_win(&mut self, seat: u8, discarder: Option<u8>, tile: Tile) {
        let after_kong = discarder.is_none() && self.after_kong;
        let delta = score_win(&self.rule, seat, discarder, after_kong);
        for (player, d) in self.players.iter_mut().zip(delta.deltas) {
            player.score += d;
        }
        self.win = Some(WinRecord {
            winner: seat,
            discarder,
            tile,
            after_kong,
            amount: delta.amount,
        });
        self.events.push(GameEvent::Win {
            seat,
            from: discarder,
            tile,
            amount: delta.amount,
        });
        self.clear_pending();
        self.turn = TurnState::Won(seat);
        info!(seat, ?discarder, %tile, amount = delta.amount, "game won");
    }
}
