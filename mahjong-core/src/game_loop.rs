//! Game loop runner for seats that need outside decisions.
//!
//! `GameRunner` lets the engine play automated seats on its own and asks a
//! `DecisionProvider` whenever a human seat must act. The optional pacing
//! hook runs between steps and is the only place a cosmetic delay belongs.

use anyhow::{bail, Context};
use mahjong_engine::state::automation::{best_capability, choose_discard};
use mahjong_engine::{
    Capability, Choice, DecisionContext, GameState, Observation, TurnState,
};
use tracing::debug;

/// What the engine is waiting for from a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Draw,
    Discard,
    Decide {
        capabilities: Vec<Capability>,
        context: DecisionContext,
    },
}

impl Prompt {
    /// The prompt for `turn`, with the seat it is addressed to.
    pub fn from_turn(turn: &TurnState) -> Option<(u8, Prompt)> {
        match turn {
            TurnState::AwaitingDraw(s) => Some((*s, Prompt::Draw)),
            TurnState::AwaitingDiscard(s) => Some((*s, Prompt::Discard)),
            TurnState::AwaitingInterruptDecision {
                seat,
                capabilities,
                context,
            } => Some((
                *seat,
                Prompt::Decide {
                    capabilities: capabilities.clone(),
                    context: *context,
                },
            )),
            TurnState::Won(_) | TurnState::Drawn => None,
        }
    }
}

/// A seat's answer to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Draw,
    /// Index into the seat's sorted concealed hand.
    Discard(usize),
    Take(Capability),
    Pass,
}

/// Trait for decision policies for human seats.
/// Implemented by UIs, scripted tests, agents, etc.
pub trait DecisionProvider {
    fn decide(&mut self, seat: u8, observation: &Observation, prompt: &Prompt) -> Decision;
}

/// Index of the just-drawn tile in the hand, or the first tile.
fn drawn_index(observation: &Observation) -> usize {
    observation
        .last_drawn
        .and_then(|t| observation.hand.iter().position(|&h| h == t))
        .unwrap_or(0)
}

/// Takes the first capability offered and throws the drawn tile.
pub struct FirstChoiceProvider;

impl DecisionProvider for FirstChoiceProvider {
    fn decide(&mut self, _seat: u8, observation: &Observation, prompt: &Prompt) -> Decision {
        match prompt {
            Prompt::Draw => Decision::Draw,
            Prompt::Discard => Decision::Discard(drawn_index(observation)),
            Prompt::Decide { capabilities, .. } => capabilities
                .first()
                .map_or(Decision::Pass, |&c| Decision::Take(c)),
        }
    }
}

/// Never claims or declares anything; throws the drawn tile.
pub struct PassiveProvider;

impl DecisionProvider for PassiveProvider {
    fn decide(&mut self, _seat: u8, observation: &Observation, prompt: &Prompt) -> Decision {
        match prompt {
            Prompt::Draw => Decision::Draw,
            Prompt::Discard => Decision::Discard(drawn_index(observation)),
            Prompt::Decide { .. } => Decision::Pass,
        }
    }
}

/// Plays a human seat the way the engine plays automated ones.
pub struct HeuristicProvider;

impl DecisionProvider for HeuristicProvider {
    fn decide(&mut self, _seat: u8, observation: &Observation, prompt: &Prompt) -> Decision {
        match prompt {
            Prompt::Draw => Decision::Draw,
            Prompt::Discard => choose_discard(&observation.hand)
                .and_then(|t| observation.hand.iter().position(|&h| h == t))
                .map_or(Decision::Discard(0), Decision::Discard),
            Prompt::Decide { capabilities, .. } => {
                best_capability(capabilities).map_or(Decision::Pass, Decision::Take)
            }
        }
    }
}

/// Safety limit against a provider that never lets the game end.
pub const MAX_STEPS: u32 = 10_000;

type PacingHook = Box<dyn FnMut(&GameState)>;

/// Runs one game against a decision provider.
pub struct GameRunner {
    state: GameState,
    steps: u32,
    pacing: Option<PacingHook>,
}

impl GameRunner {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            steps: 0,
            pacing: None,
        }
    }

    /// Installs a hook called after every step, e.g. to sleep or redraw.
    pub fn with_pacing(mut self, hook: impl FnMut(&GameState) + 'static) -> Self {
        self.pacing = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_done(&self) -> bool {
        self.state.is_over()
    }

    pub fn scores(&self) -> [i32; 4] {
        self.state.scores()
    }

    /// Advances automated seats, then applies one human decision if one is
    /// needed. Returns false once the game is over.
    pub fn step_once(&mut self, provider: &mut dyn DecisionProvider) -> anyhow::Result<bool> {
        if self.state.is_over() {
            return Ok(false);
        }
        if self.steps >= MAX_STEPS {
            bail!("game still running after {MAX_STEPS} steps");
        }

        let turn = self.state.advance().context("advancing automated seats")?;
        if let Some((seat, prompt)) = Prompt::from_turn(&turn) {
            let observation = self.state.observe(seat)?;
            let decision = provider.decide(seat, &observation, &prompt);
            debug!(seat, ?prompt, ?decision, "provider decision");
            self.apply(seat, decision)
                .with_context(|| format!("seat {seat} answered {prompt:?} with {decision:?}"))?;
        }
        self.steps += 1;
        if let Some(hook) = self.pacing.as_mut() {
            hook(&self.state);
        }
        Ok(!self.state.is_over())
    }

    fn apply(&mut self, seat: u8, decision: Decision) -> anyhow::Result<TurnState> {
        let turn = match decision {
            Decision::Draw => self.state.draw(seat)?,
            Decision::Discard(index) => self.state.discard_at(seat, index)?,
            Decision::Take(cap) => self.state.decide(seat, Choice::Take(cap))?,
            Decision::Pass => self.state.decide(seat, Choice::Pass)?,
        };
        Ok(turn)
    }

    /// Runs the game to completion.
    pub fn run_to_completion(&mut self, provider: &mut dyn DecisionProvider) -> anyhow::Result<()> {
        while self.step_once(provider)? {}
        Ok(())
    }
}
