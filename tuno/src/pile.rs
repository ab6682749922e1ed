use crate::card::{Card, CardColor};
use crate::error::{GameError, Result};

/// The face-up pile. The last card is the top of the pile and decides which
/// cards may be played next. Once the game has seeded it, it never empties:
/// recycling always leaves the top card behind.
#[derive(Debug, Default)]
pub struct DiscardPile(pub(crate) Vec<Card>);

impl DiscardPile {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, card: Card) {
        self.0.push(card);
    }

    pub fn top(&self) -> Result<&Card> {
        self.0.last().ok_or(GameError::EmptyDiscardPile)
    }

    pub fn cards_count(&self) -> usize {
        self.0.len()
    }

    /// Assigns the chosen color to the wild card on top of the pile.
    pub(crate) fn assign_top_color(&mut self, color: CardColor) -> Result<()> {
        let top = self.0.last_mut().ok_or(GameError::EmptyDiscardPile)?;
        top.assign_color(color);
        Ok(())
    }

    /// Takes every card below the top out of the pile. The top card stays
    /// behind as the entire pile.
    pub(crate) fn recycle(&mut self) -> Result<Vec<Card>> {
        let top = self.0.pop().ok_or(GameError::EmptyDiscardPile)?;
        let rest = std::mem::replace(&mut self.0, vec![top]);
        Ok(rest)
    }
}
