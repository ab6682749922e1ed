use std::collections::BTreeMap;

use crate::card::{valid_move, Card, CardColor, ColoredCard};
use crate::constants::INITIAL_HAND_SIZE;
use crate::deck::Deck;
use crate::error::{GameError, Result};
use crate::pile::DiscardPile;
use crate::player::Player;
use crate::rng::RngState;
use crate::turn::{PlayTurnResult, TurnActionResult, TurnInput, TurnOrder, TurnOutput};

/// Playable positions in `hand` against `top_card`, in hand order.
pub fn valid_play_indices(hand: &[Card], top_card: &Card) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| valid_move(card, top_card))
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug)]
pub struct Game {
    deck: Deck,
    pile: DiscardPile,
    players: BTreeMap<u64, Player>,
    turn_order: TurnOrder,
    rng: RngState,
}

impl Game {
    pub fn new(player_names: Vec<String>) -> Result<Self> {
        Self::new_with_ids(Self::sequential_ids(player_names), RngState::from_entropy())
    }

    pub fn new_with_seed(player_names: Vec<String>, seed: u64) -> Result<Self> {
        Self::new_with_ids(Self::sequential_ids(player_names), RngState::from_seed(seed))
    }

    pub fn new_with_ids(players_info: BTreeMap<u64, String>, mut rng: RngState) -> Result<Self> {
        if players_info.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        if players_info.len() > 10 {
            return Err(GameError::TooManyPlayers);
        }

        let mut deck = Deck::new();
        deck.shuffle(&mut rng);

        let mut pile = DiscardPile::new();
        let mut players = BTreeMap::new();

        for (player_id, player_name) in players_info {
            let cards = deck.draw(&mut pile, INITIAL_HAND_SIZE, &mut rng)?;
            players.insert(player_id, Player::new(player_id, player_name, cards));
        }

        let seed_card = deck.draw(&mut pile, 1, &mut rng)?.remove(0);
        pile.push(seed_card);

        let turn_order = TurnOrder::new(players.keys().copied().collect());

        tracing::debug!(seed = rng.seed(), players = players.len(), "game initialized");

        Ok(Self {
            deck,
            pile,
            players,
            turn_order,
            rng,
        })
    }

    fn sequential_ids(player_names: Vec<String>) -> BTreeMap<u64, String> {
        player_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (index as u64, name))
            .collect()
    }

    /// Runs one full turn for the player at the front of the turn order.
    ///
    /// The caller still rotates the turn order once afterwards; Skip and
    /// Reverse adjust the order here, on top of that rotation.
    pub fn play_turn(
        &mut self,
        input: &mut dyn TurnInput,
        output: &mut dyn TurnOutput,
    ) -> Result<PlayTurnResult> {
        let current_id = self.turn_order.current();
        let top_card = self.pile.top()?.clone();

        let (player_name, valid_indices) = {
            let player = self
                .players
                .get(&current_id)
                .expect("The player with the current turn must always exist.");
            output.line(&format!("\n{}'s Turn!", player.name()));
            output.line(&format!("Top card on the discard pile: {}", top_card));
            output.line(&format!(
                "{}'s hand: {}",
                player.name(),
                format_hand(&player.hand)
            ));
            (
                player.name().to_string(),
                valid_play_indices(&player.hand, &top_card),
            )
        };

        let turn_action_result = if valid_indices.is_empty() {
            output.line("No valid cards to play. Drawing a card...");
            let drawn = self.deck.draw(&mut self.pile, 1, &mut self.rng)?;
            output.line(&format!("{} drew a card: {}", player_name, drawn[0]));
            let player = self
                .players
                .get_mut(&current_id)
                .expect("The player with the current turn must always exist.");
            for card in drawn {
                player.add_card(card);
            }
            TurnActionResult::SelfDraw
        } else {
            output.line("You have the following valid cards to play:");
            {
                let player = self
                    .players
                    .get(&current_id)
                    .expect("The player with the current turn must always exist.");
                for (position, hand_index) in valid_indices.iter().enumerate() {
                    output.line(&format!("{}: {}", position + 1, player.hand[*hand_index]));
                }
            }

            let choice = input.card_choice(valid_indices.len());
            if choice == 0 || choice > valid_indices.len() {
                output.line(&format!("{} skipped their turn.", player_name));
                TurnActionResult::Passed
            } else {
                let hand_index = valid_indices[choice - 1];
                let is_wild = self
                    .players
                    .get(&current_id)
                    .expect("The player with the current turn must always exist.")
                    .hand[hand_index]
                    .is_wild();
                // Collect the color before any state changes so the
                // application itself needs no input source.
                let chosen_color = if is_wild {
                    Some(prompt_color(input))
                } else {
                    None
                };
                self.apply_play(current_id, hand_index, chosen_color, output)?
            }
        };

        let player = self
            .players
            .get(&current_id)
            .expect("The player with the current turn must always exist.");
        if player.cards_count() == 1 {
            tracing::info!(player = %player_name, "down to one card");
            output.line(&format!("{} has only one card left! UNO!", player_name));
        }

        Ok(PlayTurnResult {
            turn_action_result,
            won: player.cards_count() == 0,
        })
    }

    /// Moves the chosen card from the hand onto the pile and resolves its
    /// effect. Every decision has already been made by this point.
    fn apply_play(
        &mut self,
        player_id: u64,
        hand_index: usize,
        chosen_color: Option<CardColor>,
        output: &mut dyn TurnOutput,
    ) -> Result<TurnActionResult> {
        let (card, player_name) = {
            let player = self
                .players
                .get_mut(&player_id)
                .expect("The player with the current turn must always exist.");
            (player.remove_card(hand_index), player.name().to_string())
        };

        output.line(&format!("{} played: {}", player_name, card));
        // The card joins the pile before any penalty draw, so a draw that
        // recycles the pile sees it.
        self.pile.push(card.clone());

        let turn_action_result = match card {
            Card::Wild(_) => {
                let color = chosen_color.expect("A wild play always carries a chosen color.");
                self.pile.assign_top_color(color)?;
                output.line(&format!("{} changed the color to {}!", player_name, color));
                TurnActionResult::Wild
            }
            Card::WildDraw(_) => {
                let color = chosen_color.expect("A wild play always carries a chosen color.");
                self.pile.assign_top_color(color)?;
                output.line(&format!("{} changed the color to {}!", player_name, color));
                self.draw_cards_to_player(self.turn_order.next(), 4, output)?;
                TurnActionResult::WildDraw
            }
            Card::Colored(_, ColoredCard::Skip) => {
                output.line("Next player's turn is skipped!");
                self.turn_order.rotate();
                TurnActionResult::Skip
            }
            Card::Colored(_, ColoredCard::Reverse) => {
                output.line("Turn order is reversed!");
                self.turn_order.reverse();
                TurnActionResult::Reverse
            }
            Card::Colored(_, ColoredCard::Draw) => {
                output.line("Next player draws two cards!");
                self.draw_cards_to_player(self.turn_order.next(), 2, output)?;
                TurnActionResult::Draw
            }
            Card::Colored(_, ColoredCard::Number(_)) => TurnActionResult::Neutral,
        };

        Ok(turn_action_result)
    }

    fn draw_cards_to_player(
        &mut self,
        player_id: u64,
        count: usize,
        output: &mut dyn TurnOutput,
    ) -> Result<()> {
        let drawn = self.deck.draw(&mut self.pile, count, &mut self.rng)?;

        let player = self
            .players
            .get_mut(&player_id)
            .expect("Player has disappeared...");
        output.line(&format!("{} drew {} cards.", player.name(), drawn.len()));
        for card in drawn {
            player.add_card(card);
        }

        Ok(())
    }

    /// Plays turns until a hand empties, returning the winner's id.
    ///
    /// A turn that fails because the cards ran out is forfeited and the game
    /// moves on; an empty discard pile is an invariant violation and fatal.
    pub fn run(&mut self, input: &mut dyn TurnInput, output: &mut dyn TurnOutput) -> Result<u64> {
        loop {
            let current_id = self.turn_order.current();

            match self.play_turn(input, output) {
                Ok(result) if result.won => return Ok(current_id),
                Ok(_) => {}
                Err(GameError::EmptyDiscardPile) => return Err(GameError::EmptyDiscardPile),
                Err(error) => {
                    tracing::warn!(%error, "turn aborted");
                    output.line(&format!("{} - turn forfeited.", error));
                }
            }

            if let Some(winner) = self.winner() {
                return Ok(winner);
            }

            self.turn_order.rotate();
        }
    }

    /// The game loop's unconditional end-of-turn rotation. Callers driving
    /// their own loop instead of [`Game::run`] apply it after every turn,
    /// on top of whatever Skip or Reverse already did to the order.
    pub fn rotate_turn_order(&mut self) {
        self.turn_order.rotate();
    }

    pub fn winner(&self) -> Option<u64> {
        self.players
            .values()
            .find(|player| player.cards_count() == 0)
            .map(|player| player.id)
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn get_player_ids(&self) -> Vec<u64> {
        self.players.keys().copied().collect()
    }

    pub fn get_player(&self, player_id: &u64) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn get_player_mut(&mut self, player_id: &u64) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub fn get_current_turn_player_id(&self) -> u64 {
        self.turn_order.current()
    }

    pub fn get_next_turn_player_id(&self) -> u64 {
        self.turn_order.next()
    }

    pub fn get_top_card(&self) -> Result<&Card> {
        self.pile.top()
    }

    pub fn deck_cards_count(&self) -> usize {
        self.deck.cards_count()
    }

    pub fn discard_cards_count(&self) -> usize {
        self.pile.cards_count()
    }
}

fn prompt_color(input: &mut dyn TurnInput) -> CardColor {
    loop {
        if let Ok(color) = input.color_choice().trim().parse() {
            return color;
        }
    }
}

fn format_hand(hand: &[Card]) -> String {
    hand.iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct ScriptedInput {
        choices: VecDeque<usize>,
        colors: VecDeque<String>,
    }

    impl TurnInput for ScriptedInput {
        fn card_choice(&mut self, _count: usize) -> usize {
            self.choices.pop_front().expect("Script ran out of card choices.")
        }

        fn color_choice(&mut self) -> String {
            self.colors.pop_front().expect("Script ran out of colors.")
        }
    }

    fn scripted(choices: &[usize], colors: &[&str]) -> ScriptedInput {
        ScriptedInput {
            choices: choices.iter().copied().collect(),
            colors: colors.iter().map(|color| color.to_string()).collect(),
        }
    }

    #[derive(Default)]
    struct CollectedOutput(Vec<String>);

    impl TurnOutput for CollectedOutput {
        fn line(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }

    fn create_players_info(count: usize) -> BTreeMap<u64, String> {
        let mut players_info = BTreeMap::new();
        for i in 0..count {
            players_info.insert(i as u64, format!("Player {}", i + 1));
        }
        players_info
    }

    fn seeded_game(player_count: usize) -> Game {
        Game::new_with_ids(create_players_info(player_count), RngState::from_seed(1)).unwrap()
    }

    fn number_card(color: CardColor, number: u8) -> Card {
        Card::Colored(color, ColoredCard::Number(number))
    }

    #[test]
    fn return_ok_if_enough_players() {
        assert!(Game::new_with_ids(create_players_info(2), RngState::from_seed(0)).is_ok());
    }

    #[test]
    fn return_err_if_not_enough_players() {
        let error = Game::new_with_ids(create_players_info(1), RngState::from_seed(0)).unwrap_err();
        assert!(matches!(error, GameError::NotEnoughPlayers));
    }

    #[test]
    fn return_err_if_too_many_players() {
        let error =
            Game::new_with_ids(create_players_info(11), RngState::from_seed(0)).unwrap_err();
        assert!(matches!(error, GameError::TooManyPlayers));
    }

    #[test]
    fn initialization_deals_five_cards_each_and_seeds_the_pile() {
        let game = seeded_game(2);

        for player_id in game.get_player_ids() {
            assert_eq!(game.get_player(&player_id).unwrap().cards_count(), 5);
        }
        assert_eq!(game.discard_cards_count(), 1);
        assert_eq!(game.deck_cards_count(), 45);
    }

    #[test]
    fn same_seed_deals_identical_games() {
        let first = seeded_game(2);
        let second = seeded_game(2);

        assert_eq!(
            first.get_player(&0).unwrap().hand,
            second.get_player(&0).unwrap().hand
        );
        assert_eq!(first.get_top_card().unwrap(), second.get_top_card().unwrap());
    }

    #[test]
    fn valid_play_indices_preserve_hand_order() {
        let hand = vec![
            number_card(CardColor::Red, 1),
            number_card(CardColor::Blue, 5),
            Card::Colored(CardColor::Red, ColoredCard::Skip),
            Card::Wild(None),
        ];
        let top = number_card(CardColor::Red, 9);

        assert_eq!(valid_play_indices(&hand, &top), vec![0, 2, 3]);
    }

    #[test]
    fn skip_gives_the_same_player_another_turn_with_two_players() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![
            Card::Colored(CardColor::Red, ColoredCard::Skip),
            number_card(CardColor::Red, 1),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        let result = game
            .play_turn(&mut scripted(&[1], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Skip);

        // The game loop rotates unconditionally on top of the effect.
        game.turn_order.rotate();
        assert_eq!(game.get_current_turn_player_id(), first);
    }

    #[test]
    fn reverse_gives_the_same_player_another_turn_with_two_players() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![
            Card::Colored(CardColor::Red, ColoredCard::Reverse),
            number_card(CardColor::Red, 1),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        let result = game
            .play_turn(&mut scripted(&[1], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Reverse);

        game.turn_order.rotate();
        assert_eq!(game.get_current_turn_player_id(), first);
    }

    #[test]
    fn skip_bypasses_exactly_one_player_with_four_players() {
        let mut game = seeded_game(4);
        assert_eq!(game.turn_order.as_slice(), &[0, 1, 2, 3]);
        game.get_player_mut(&0).unwrap().hand = vec![
            Card::Colored(CardColor::Red, ColoredCard::Skip),
            number_card(CardColor::Red, 1),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        game.play_turn(&mut scripted(&[1], &[]), &mut CollectedOutput::default())
            .unwrap();

        game.turn_order.rotate();
        assert_eq!(game.get_current_turn_player_id(), 2);
    }

    #[test]
    fn draw_two_feeds_the_next_player_who_still_plays_next() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        let second = game.get_next_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![
            Card::Colored(CardColor::Red, ColoredCard::Draw),
            number_card(CardColor::Red, 1),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        let result = game
            .play_turn(&mut scripted(&[1], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Draw);
        assert_eq!(game.get_player(&second).unwrap().cards_count(), 7);

        // Unlike Skip, the penalty does not cost the victim their turn.
        game.turn_order.rotate();
        assert_eq!(game.get_current_turn_player_id(), second);
    }

    #[test]
    fn wild_assigns_the_chosen_color_case_insensitively() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand =
            vec![Card::Wild(None), number_card(CardColor::Red, 1)];

        let result = game
            .play_turn(
                &mut scripted(&[1], &["yellow"]),
                &mut CollectedOutput::default(),
            )
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Wild);
        assert_eq!(
            game.get_top_card().unwrap(),
            &Card::Wild(Some(CardColor::Yellow))
        );
    }

    #[test]
    fn junk_color_input_is_asked_again() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand =
            vec![Card::Wild(None), number_card(CardColor::Red, 1)];

        game.play_turn(
            &mut scripted(&[1], &["purple", " Blue "]),
            &mut CollectedOutput::default(),
        )
        .unwrap();

        assert_eq!(
            game.get_top_card().unwrap(),
            &Card::Wild(Some(CardColor::Blue))
        );
    }

    #[test]
    fn wild_draw_four_feeds_the_next_player() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        let second = game.get_next_turn_player_id();
        game.get_player_mut(&first).unwrap().hand =
            vec![Card::WildDraw(None), number_card(CardColor::Red, 1)];

        let result = game
            .play_turn(
                &mut scripted(&[1], &["Green"]),
                &mut CollectedOutput::default(),
            )
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::WildDraw);
        assert_eq!(
            game.get_top_card().unwrap(),
            &Card::WildDraw(Some(CardColor::Green))
        );
        assert_eq!(game.get_player(&second).unwrap().cards_count(), 9);
    }

    #[test]
    fn choice_zero_passes_and_leaves_the_state_untouched() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![
            number_card(CardColor::Red, 1),
            number_card(CardColor::Red, 2),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        let deck_before = game.deck_cards_count();
        let pile_before = game.discard_cards_count();

        let result = game
            .play_turn(&mut scripted(&[0], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Passed);
        assert_eq!(game.get_player(&first).unwrap().cards_count(), 2);
        assert_eq!(game.deck_cards_count(), deck_before);
        assert_eq!(game.discard_cards_count(), pile_before);
    }

    #[test]
    fn out_of_range_choice_passes() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![
            number_card(CardColor::Red, 1),
            number_card(CardColor::Red, 2),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        let result = game
            .play_turn(&mut scripted(&[99], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Passed);
        assert_eq!(game.get_player(&first).unwrap().cards_count(), 2);
    }

    #[test]
    fn no_valid_cards_draws_exactly_one() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![number_card(CardColor::Red, 1)];
        game.pile.push(number_card(CardColor::Blue, 5));

        let deck_before = game.deck_cards_count();

        let result = game
            .play_turn(&mut scripted(&[], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::SelfDraw);
        assert_eq!(game.get_player(&first).unwrap().cards_count(), 2);
        assert_eq!(game.deck_cards_count(), deck_before - 1);
    }

    #[test]
    fn uno_notice_is_emitted_at_one_card() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![
            number_card(CardColor::Red, 1),
            number_card(CardColor::Red, 2),
        ];
        game.pile.push(number_card(CardColor::Red, 3));

        let mut output = CollectedOutput::default();
        game.play_turn(&mut scripted(&[1], &[]), &mut output).unwrap();

        assert!(output.0.iter().any(|line| line.contains("UNO!")));
    }

    #[test]
    fn winning_play_reports_won() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![number_card(CardColor::Red, 1)];
        game.pile.push(number_card(CardColor::Red, 3));

        let result = game
            .play_turn(&mut scripted(&[1], &[]), &mut CollectedOutput::default())
            .unwrap();

        assert_eq!(result.turn_action_result, TurnActionResult::Neutral);
        assert!(result.won);
        assert_eq!(game.winner(), Some(first));
    }

    #[test]
    fn draw_failure_aborts_the_turn() {
        let mut game = seeded_game(2);
        let first = game.get_current_turn_player_id();
        game.get_player_mut(&first).unwrap().hand = vec![number_card(CardColor::Red, 1)];
        game.deck.0.clear();
        game.pile.0 = vec![number_card(CardColor::Blue, 5)];

        let error = game
            .play_turn(&mut scripted(&[], &[]), &mut CollectedOutput::default())
            .unwrap_err();

        assert!(matches!(
            error,
            GameError::InsufficientCards {
                requested: 1,
                available: 0
            }
        ));
        // The aborted turn did not touch the hand.
        assert_eq!(game.get_player(&first).unwrap().cards_count(), 1);
    }
}
