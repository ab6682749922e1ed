use std::io::{self, Write};

use tracing::info;
use tuno::game::Game;
use tuno::turn::{TurnInput, TurnOutput};

/// Reads the active player's choices from stdin, printing its own prompts.
struct ConsoleInput;

impl TurnInput for ConsoleInput {
    fn card_choice(&mut self, count: usize) -> usize {
        let raw = prompt(&format!(
            "Choose a card to play (1 to {count}), or enter 0 to skip: "
        ));
        // Anything unreadable counts as a pass.
        raw.trim().parse().unwrap_or(0)
    }

    fn color_choice(&mut self) -> String {
        prompt("Choose a color (Red, Blue, Green, Yellow): ")
    }
}

struct ConsoleOutput;

impl TurnOutput for ConsoleOutput {
    fn line(&mut self, text: &str) {
        println!("{text}");
    }
}

fn prompt(text: &str) -> String {
    print!("{text}");
    let _ = io::stdout().flush();

    let mut buffer = String::new();
    if io::stdin().read_line(&mut buffer).is_err() {
        buffer.clear();
    }
    buffer
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let mut game = Game::new(vec!["Player 1".to_string(), "Player 2".to_string()])?;
    info!(seed = game.seed(), "game created");

    println!("\nGame Initialized!");
    println!("Player Hands:");
    for player_id in game.get_player_ids() {
        let player = game.get_player(&player_id).expect("Every dealt player exists.");
        let hand = player
            .hand
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}: {}", player.name(), hand);
    }
    println!("Discard Pile: {}", game.get_top_card()?);
    println!("Remaining cards in the deck: {}", game.deck_cards_count());

    let winner = game.run(&mut ConsoleInput, &mut ConsoleOutput)?;
    let winner_name = game
        .get_player(&winner)
        .map(|player| player.name().to_string())
        .unwrap_or_else(|| winner.to_string());
    println!("\n{winner_name} has won the game!");

    Ok(())
}
