use core::fmt;
use std::fmt::Display;

use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

#[derive(Clone, Copy, Debug, Display, EnumString, EnumCountMacro, EnumIter, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum CardColor {
    Red,
    Green,
    Blue,
    Yellow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColoredCard {
    Number(u8),
    Skip,
    Reverse,
    Draw,
}

/// A single card. Wild cards carry no color until they are played; the color
/// chosen at play time is stored in the variant and governs later matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Card {
    Colored(CardColor, ColoredCard),
    Wild(Option<CardColor>),
    WildDraw(Option<CardColor>),
}

impl Card {
    pub fn color(&self) -> Option<CardColor> {
        match self {
            Card::Colored(color, _) => Some(*color),
            Card::Wild(color) | Card::WildDraw(color) => *color,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild(_) | Card::WildDraw(_))
    }

    pub(crate) fn assign_color(&mut self, color: CardColor) {
        match self {
            Card::Wild(slot) | Card::WildDraw(slot) => *slot = Some(color),
            Card::Colored(_, _) => {}
        }
    }
}

/// Whether `card` may be played on top of `top_card`.
///
/// Wild cards are always playable. Two colored action cards match on color or
/// on the action itself. Everything else matches on color, or on the number
/// when both cards are number cards. An unassigned wild on top of the pile
/// has no color, so nothing but another wild matches it.
pub fn valid_move(card: &Card, top_card: &Card) -> bool {
    if card.is_wild() {
        return true;
    }

    let same_color = match (card.color(), top_card.color()) {
        (Some(color), Some(top_color)) => color == top_color,
        _ => false,
    };

    match (card, top_card) {
        (Card::Colored(_, ColoredCard::Number(number)), Card::Colored(_, ColoredCard::Number(top_number))) => {
            same_color || number == top_number
        }
        (Card::Colored(_, action), Card::Colored(_, top_action))
            if !matches!(action, ColoredCard::Number(_))
                && !matches!(top_action, ColoredCard::Number(_)) =>
        {
            same_color || action == top_action
        }
        _ => same_color,
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Colored(color, card) => {
                write!(f, "{} {}", color, {
                    match card {
                        ColoredCard::Number(number) => number.to_string(),
                        ColoredCard::Skip => "Skip".to_string(),
                        ColoredCard::Reverse => "Reverse".to_string(),
                        ColoredCard::Draw => "Draw".to_string(),
                    }
                })
            }
            Card::Wild(None) => write!(f, "Wild"),
            Card::Wild(Some(color)) => write!(f, "Wild ({})", color),
            Card::WildDraw(None) => write!(f, "Wild Draw"),
            Card::WildDraw(Some(color)) => write!(f, "Wild Draw ({})", color),
        }
    }
}
