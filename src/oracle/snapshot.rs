use super::OracleRequest;
use crate::cards::{cards_from_codes, Card};
use crate::game::{Actor, Stage};
use crate::hand::{validate_table, Board, HandError, HoleCards};
use crate::solver::info_key;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("bad card code in {field}: {reason}")]
    Card { field: &'static str, reason: String },
    #[error("expected hole cards for 2 seats, got {0}")]
    SeatCount(usize),
    #[error("invalid cards: {0}")]
    Cards(#[from] HandError),
    #[error("seat {0} is not 0 or 1")]
    Seat(u8),
    #[error("stage {0} is out of range")]
    Stage(u8),
    #[error("board has {got} cards but stage {stage:?} shows {want}")]
    BoardSize { stage: Stage, got: usize, want: usize },
    #[error("hand is already over")]
    Terminal,
    #[error("pot {pot} plus to_call {to_call} overflows")]
    ChipOverflow { pot: u64, to_call: u64 },
}

/// A request that passed validation, with cards decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub actor: Actor,
    pub dealer: Actor,
    pub stage: Stage,
    pub hole: HoleCards,
    pub board: Board,
    pub pot: u64,
    pub to_call: u64,
    /// Actor's stack when the client sent one.
    pub stack: Option<u64>,
    pub history: String,
}

impl TryFrom<&OracleRequest> for Snapshot {
    type Error = SnapshotError;

    fn try_from(req: &OracleRequest) -> Result<Self, Self::Error> {
        if req.terminal {
            return Err(SnapshotError::Terminal);
        }
        let actor = Actor::from_seat(req.player).ok_or(SnapshotError::Seat(req.player))?;
        let dealer = Actor::from_seat(req.dealer).ok_or(SnapshotError::Seat(req.dealer))?;
        let stage = Stage::from_index(req.stage).ok_or(SnapshotError::Stage(req.stage))?;
        if stage == Stage::Showdown {
            return Err(SnapshotError::Terminal);
        }
        if req.pot.checked_add(req.to_call).is_none() {
            return Err(SnapshotError::ChipOverflow { pot: req.pot, to_call: req.to_call });
        }
        if req.hole_cards.len() != 2 {
            return Err(SnapshotError::SeatCount(req.hole_cards.len()));
        }
        let holes = [
            HoleCards::from_slice(&decode("hole_cards", &req.hole_cards[0])?)?,
            HoleCards::from_slice(&decode("hole_cards", &req.hole_cards[1])?)?,
        ];
        let board = Board::try_new(decode("board", &req.board)?)?;
        let want = shown_at(stage);
        if board.len() != want {
            return Err(SnapshotError::BoardSize { stage, got: board.len(), want });
        }
        validate_table(&holes, &board)?;
        let deck = decode("deck", &req.deck)?;
        let dealt = holes.iter().flat_map(|h| h.as_array()).chain(board.as_slice().iter().copied());
        let mut seen = [false; 52];
        for card in deck.iter().copied().chain(dealt) {
            let slot = &mut seen[card.code() as usize];
            if *slot {
                return Err(SnapshotError::Cards(HandError::Overlap(card)));
            }
            *slot = true;
        }
        Ok(Self {
            actor,
            dealer,
            stage,
            hole: holes[actor.seat() as usize],
            board,
            pot: req.pot,
            to_call: req.to_call,
            stack: req.stacks.map(|s| s[actor.seat() as usize]),
            history: req.history.clone(),
        })
    }
}

impl Snapshot {
    /// Info-set key for strategy lookups.
    pub fn info_key(&self) -> String {
        info_key(&self.hole.as_array(), self.board.as_slice(), &self.history, self.pot, self.to_call)
    }
}

fn decode(field: &'static str, codes: &[u8]) -> Result<Vec<Card>, SnapshotError> {
    cards_from_codes(codes).map_err(|e| SnapshotError::Card { field, reason: e.to_string() })
}

fn shown_at(stage: Stage) -> usize {
    match stage {
        Stage::Preflop => 0,
        Stage::Flop => 3,
        Stage::Turn => 4,
        Stage::River | Stage::Showdown => 5,
    }
}
