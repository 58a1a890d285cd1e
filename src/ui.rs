//! Overlay and HUD model
//!
//! Derives the text the page shows from the game state. The wasm driver
//! copies it into the DOM; nothing here touches the browser.

use crate::sim::{GamePhase, GameState};

/// What the overlay button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Start a run or launch the next ball
    Start,
    /// Leave pause
    Resume,
}

/// Modal overlay content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: &'static str,
    pub message: String,
    pub button: &'static str,
    pub action: OverlayAction,
}

impl Overlay {
    /// Overlay for the current phase, `None` while playing
    pub fn for_state(state: &GameState) -> Option<Self> {
        let overlay = match state.phase {
            GamePhase::Playing => return None,
            GamePhase::Idle => Self {
                title: "ARGENOID",
                message: "Rompé todos los ladrillos y llevá la copa a casa".to_string(),
                button: "JUGAR",
                action: OverlayAction::Start,
            },
            GamePhase::Paused => Self {
                title: "PAUSA",
                message: "El partido está detenido".to_string(),
                button: "SEGUIR",
                action: OverlayAction::Resume,
            },
            GamePhase::BallLost => Self {
                title: "¡PREPARATE!",
                message: "Toca para lanzar la bola".to_string(),
                button: "LANZAR",
                action: OverlayAction::Start,
            },
            GamePhase::GameOver => Self {
                title: "FINAL DEL PARTIDO",
                message: final_message("Te quedaste sin vidas. ¿Otro?", state.score),
                button: "VOLVER A INTENTAR",
                action: OverlayAction::Start,
            },
            GamePhase::Won => Self {
                title: "¡Dale Campeón!",
                message: final_message(
                    "¡Has ganado el Argenoid y traído la copa a casa!",
                    state.score,
                ),
                button: "VOLVER A INTENTAR",
                action: OverlayAction::Start,
            },
        };
        Some(overlay)
    }
}

fn final_message(message: &str, score: u32) -> String {
    format!("{} | Puntos: {}", message, score)
}

/// Score and lives counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub lives: u8,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
        }
    }
}
