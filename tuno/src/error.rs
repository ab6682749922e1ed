use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Not enough players")]
    NotEnoughPlayers,
    #[error("Too many players")]
    TooManyPlayers,
    #[error("Not enough cards to draw {requested} ({available} left after recycling)")]
    InsufficientCards { requested: usize, available: usize },
    #[error("The discard pile is empty")]
    EmptyDiscardPile,
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
