use crate::connect6::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    PlayerOne,
    PlayerTwo,
    Spectator,
}

impl Seat {
    /// Wire value: `1`, `2`, or `-1` for spectators.
    pub fn number(self) -> i8 {
        match self {
            Seat::PlayerOne => 1,
            Seat::PlayerTwo => 2,
            Seat::Spectator => -1,
        }
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Seat::PlayerOne => Some(Player::One),
            Seat::PlayerTwo => Some(Player::Two),
            Seat::Spectator => None,
        }
    }

    fn from_index(index: usize) -> Self {
        if index == 0 {
            Seat::PlayerOne
        } else {
            Seat::PlayerTwo
        }
    }
}

/// The two player seats, each bound to at most one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatTable {
    seats: [Option<String>; 2],
}

impl SeatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seat_of(&self, identity: &str) -> Seat {
        self.seats
            .iter()
            .position(|s| s.as_deref() == Some(identity))
            .map(Seat::from_index)
            .unwrap_or(Seat::Spectator)
    }

    /// An identity already seated keeps its seat; otherwise it takes the first
    /// free seat, or becomes a spectator when both are taken.
    pub fn assign(&mut self, identity: &str) -> Seat {
        let seat = self.seat_of(identity);
        if seat != Seat::Spectator {
            return seat;
        }
        match self.seats.iter().position(Option::is_none) {
            Some(index) => {
                self.seats[index] = Some(identity.to_string());
                Seat::from_index(index)
            }
            None => Seat::Spectator,
        }
    }

    /// Frees whatever seat `identity` holds and returns it.
    pub fn release(&mut self, identity: &str) -> Option<Seat> {
        let index = self
            .seats
            .iter()
            .position(|s| s.as_deref() == Some(identity))?;
        self.seats[index] = None;
        Some(Seat::from_index(index))
    }

    pub fn bound(&self) -> [Option<String>; 2] {
        self.seats.clone()
    }
}
