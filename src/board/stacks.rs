//! Stack ownership and composition rules.
//!
//! A stack is a carrier piece plus up to three carried pieces on one
//! square. The carrier is the piece visible to movement and attack
//! targeting; the manager tracks which squares hold stacks and keeps the
//! carrier-occupancy bitboard in sync.

use std::collections::HashMap;

use super::error::StackError;
use super::types::{Bitboard, Piece, PieceType, Square};

/// Upper bound on carrier plus cargo.
pub const MAX_STACK_SIZE: usize = 4;

/// Crew-style pieces a vehicle can take aboard.
const PERSONNEL: &[PieceType] = &[
    PieceType::Commander,
    PieceType::Infantry,
    PieceType::Militia,
    PieceType::Engineer,
    PieceType::Headquarter,
];

/// Towed heavy weapons.
const HEAVY: &[PieceType] = &[PieceType::Artillery, PieceType::AntiAir, PieceType::Missile];

/// Cargo slots a carrier kind offers. Each slot takes one piece whose
/// kind is in the slot's set; a composition is valid when every carried
/// piece can be assigned to a distinct slot.
fn carrier_slots(kind: PieceType) -> &'static [&'static [PieceType]] {
    const AIR_FORCE_SLOT: &[PieceType] = &[PieceType::AirForce];
    const TANK_SLOT: &[PieceType] = &[PieceType::Tank];
    match kind {
        PieceType::Navy => &[AIR_FORCE_SLOT, TANK_SLOT, PERSONNEL],
        PieceType::Tank | PieceType::AirForce => &[PERSONNEL],
        PieceType::Engineer => &[HEAVY],
        _ => &[],
    }
}

/// Try to assign every cargo piece to a distinct slot (backtracking over
/// at most 3x3 choices).
fn assign_slots(cargo: &[PieceType], slots: &[&[PieceType]], used: &mut [bool]) -> bool {
    let Some((first, rest)) = cargo.split_first() else {
        return true;
    };
    for (i, slot) in slots.iter().enumerate() {
        if !used[i] && slot.contains(first) {
            used[i] = true;
            if assign_slots(rest, slots, used) {
                return true;
            }
            used[i] = false;
        }
    }
    false
}

/// Validate a carrier/cargo composition. Empty cargo is always fine.
pub fn validate_composition(carrier: &Piece, carried: &[Piece]) -> Result<(), StackError> {
    if carried.is_empty() {
        return Ok(());
    }
    let size = 1 + carried.len();
    if size > MAX_STACK_SIZE {
        return Err(StackError::TooLarge { size });
    }
    if carried.iter().any(|p| p.color != carrier.color) {
        return Err(StackError::MixedColors);
    }
    if carried.iter().any(|p| !p.carrying.is_empty()) {
        return Err(StackError::NestedCarrier);
    }

    let commanders = carried
        .iter()
        .chain(std::iter::once(carrier))
        .filter(|p| p.kind == PieceType::Commander)
        .count();
    if commanders > 1 {
        return Err(StackError::DuplicateCommander);
    }
    let headquarters = carried
        .iter()
        .chain(std::iter::once(carrier))
        .filter(|p| p.kind == PieceType::Headquarter)
        .count();
    if headquarters > 1 {
        return Err(StackError::DuplicateHeadquarter);
    }

    let cargo: Vec<PieceType> = carried.iter().map(|p| p.kind).collect();
    let slots = carrier_slots(carrier.kind);
    let mut used = vec![false; slots.len()];
    if assign_slots(&cargo, slots, &mut used) {
        Ok(())
    } else {
        Err(StackError::InvalidComposition {
            carrier: carrier.kind,
            cargo,
        })
    }
}

/// Work out the carrier/cargo split when `mover` lands on `occupant`.
/// The occupant keeps its role as carrier when it can take the mover
/// (plus any cargo the occupant already holds); otherwise the mover
/// becomes the carrier. Returns the validated (carrier, carried) pair.
pub fn combine(occupant: &Piece, mover: &Piece) -> Option<(Piece, Vec<Piece>)> {
    // occupant stays carrier, mover (and its cargo) joins
    let mut cargo = occupant.carrying.clone();
    cargo.push(mover.without_cargo());
    cargo.extend(mover.carrying.iter().cloned());
    if validate_composition(&occupant.without_cargo(), &cargo).is_ok() {
        return Some((occupant.without_cargo(), cargo));
    }

    // mover becomes carrier of the occupant (and everyone's cargo)
    let mut cargo = mover.carrying.clone();
    cargo.push(occupant.without_cargo());
    cargo.extend(occupant.carrying.iter().cloned());
    if validate_composition(&mover.without_cargo(), &cargo).is_ok() {
        return Some((mover.without_cargo(), cargo));
    }

    None
}

/// Carrier plus cargo stored for one square. The carrier is kept
/// cargo-free; `carried` is the authoritative cargo list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackData {
    pub carrier: Piece,
    pub carried: Vec<Piece>,
}

impl StackData {
    /// The carrier with its cargo attached, as exposed by queries
    #[must_use]
    pub fn to_piece(&self) -> Piece {
        self.carrier.clone().carrying(self.carried.clone())
    }

    /// Carrier followed by cargo, the deploy-session order
    #[must_use]
    pub fn pieces(&self) -> Vec<Piece> {
        let mut all = vec![self.carrier.clone()];
        all.extend(self.carried.iter().cloned());
        all
    }
}

/// Owns every stack on the board and the carrier-occupancy bitboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackManager {
    stacks: HashMap<Square, StackData>,
    carriers: Bitboard,
}

impl StackManager {
    #[must_use]
    pub fn new() -> Self {
        StackManager::default()
    }

    /// Squares holding a stack
    #[inline]
    #[must_use]
    pub fn carriers(&self) -> Bitboard {
        self.carriers
    }

    #[inline]
    #[must_use]
    pub fn is_carrier(&self, sq: Square) -> bool {
        self.carriers.contains(sq)
    }

    #[must_use]
    pub fn get(&self, sq: Square) -> Option<&StackData> {
        self.stacks.get(&sq)
    }

    pub(crate) fn get_mut(&mut self, sq: Square) -> Option<&mut StackData> {
        self.stacks.get_mut(&sq)
    }

    /// Store a new stack. Inputs are copied; the carrier bit is set.
    pub fn create_stack(
        &mut self,
        carrier: &Piece,
        carried: &[Piece],
        sq: Square,
    ) -> Result<(), StackError> {
        if self.stacks.contains_key(&sq) {
            return Err(StackError::AlreadyExists { square: sq });
        }
        self.stacks.insert(
            sq,
            StackData {
                carrier: carrier.without_cargo(),
                carried: carried.iter().map(Piece::without_cargo).collect(),
            },
        );
        self.carriers = self.carriers.with(sq);
        Ok(())
    }

    /// Append a copy of the piece to an existing stack's cargo.
    pub fn add_to_stack(&mut self, piece: &Piece, sq: Square) -> Result<(), StackError> {
        let stack = self
            .stacks
            .get_mut(&sq)
            .ok_or(StackError::NoStack { square: sq })?;
        stack.carried.push(piece.without_cargo());
        Ok(())
    }

    /// Remove and return the first carried piece of the given kind. The
    /// carrier itself is never removed by this operation.
    pub fn remove_from_stack(&mut self, kind: PieceType, sq: Square) -> Option<Piece> {
        let stack = self.stacks.get_mut(&sq)?;
        let idx = stack.carried.iter().position(|p| p.kind == kind)?;
        Some(stack.carried.remove(idx))
    }

    /// Remove and return the whole stack, clearing the carrier bit.
    pub fn destroy_stack(&mut self, sq: Square) -> Option<StackData> {
        let stack = self.stacks.remove(&sq)?;
        self.carriers = self.carriers.without(sq);
        Some(stack)
    }

    /// Validate adding a piece to the stack currently on the square.
    pub fn validate_add(&self, piece: &Piece, sq: Square) -> Result<(), StackError> {
        let stack = self.get(sq).ok_or(StackError::NoStack { square: sq })?;
        let mut cargo = stack.carried.clone();
        cargo.push(piece.without_cargo());
        validate_composition(&stack.carrier, &cargo)
    }

    /// Iterate all stacks (unspecified order)
    pub fn iter(&self) -> impl Iterator<Item = (&Square, &StackData)> {
        self.stacks.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
