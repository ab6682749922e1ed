use strum::IntoEnumIterator;

use crate::{
    card::{Card, CardColor, ColoredCard},
    constants::*,
    error::{GameError, Result},
    pile::DiscardPile,
    rng::RngState,
};

#[derive(Debug)]
pub struct Deck(pub(crate) Vec<Card>);

impl Deck {
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(TOTAL_CARDS_IN_DECK.into());

        // Colored Cards
        for color in CardColor::iter() {
            // Number Cards
            for number in NUMBER_CARDS_PER_COLOR {
                cards.push(Card::Colored(color, ColoredCard::Number(*number)));
            }

            // Skip Cards
            for _ in 0..SKIP_CARDS_PER_COLOR {
                cards.push(Card::Colored(color, ColoredCard::Skip));
            }

            // Reverse Cards
            for _ in 0..REVERSE_CARDS_PER_COLOR {
                cards.push(Card::Colored(color, ColoredCard::Reverse));
            }

            // Draw Cards
            for _ in 0..DRAW_CARDS_PER_COLOR {
                cards.push(Card::Colored(color, ColoredCard::Draw));
            }
        }

        for _ in 0..WILD_CARDS_IN_DECK {
            cards.push(Card::Wild(None));
        }

        for _ in 0..WILD_DRAW_CARDS_IN_DECK {
            cards.push(Card::WildDraw(None));
        }

        Self(cards)
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.0);
    }

    /// Draws `count` cards from the front of the deck.
    ///
    /// When the deck cannot cover the request, the discard pile below its top
    /// card is shuffled into a replacement deck and the old deck is thrown
    /// away; the pile keeps only its top card. Fails with
    /// [`GameError::InsufficientCards`] when even the replacement cannot
    /// cover the request, and with [`GameError::EmptyDiscardPile`] when there
    /// is nothing to recycle.
    pub fn draw(
        &mut self,
        pile: &mut DiscardPile,
        count: usize,
        rng: &mut RngState,
    ) -> Result<Vec<Card>> {
        if self.0.len() < count {
            let mut recycled = pile.recycle()?;
            rng.shuffle(&mut recycled);
            tracing::info!(
                replenished = recycled.len(),
                "not enough cards in the deck, recycling the discard pile"
            );
            self.0 = recycled;

            if self.0.len() < count {
                return Err(GameError::InsufficientCards {
                    requested: count,
                    available: self.0.len(),
                });
            }
        }

        Ok(self.0.drain(0..count).collect())
    }

    pub fn cards_count(&self) -> usize {
        self.0.len()
    }
}
