//! Menu screens as an explicit stack, driven by the same frame loop as the
//! game. Each screen only consumes input and reports what the player asked
//! for; the caller applies it to the match.

use crossterm::event::KeyCode;

use crate::display::Rect;
use crate::entities::Difficulty;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Instructions,
    Difficulty,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Start,
        MenuItem::Instructions,
        MenuItem::Difficulty,
        MenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "Start Game",
            MenuItem::Instructions => "Instructions",
            MenuItem::Difficulty => "Difficulty",
            MenuItem::Quit => "Quit",
        }
    }
}

const ITEM_X: f32 = 320.0;
const ITEM_Y: f32 = 220.0;
const ITEM_SPACING: f32 = 50.0;
const ITEM_W: f32 = 200.0;
const ITEM_H: f32 = 36.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Main,
    DifficultySelect,
    Instructions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Start,
    SetDifficulty(Difficulty),
    Quit,
}

#[derive(Debug, Clone)]
pub struct Menu {
    stack: Vec<Screen>,
    /// Highlighted entry of `MenuItem::ALL`.
    pub selected: usize,
    /// Highlighted entry of `Difficulty::ALL` on the select screen.
    pub difficulty_selected: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

/// Clickable area of a main-menu entry.
pub fn item_rect(index: usize) -> Rect {
    Rect::new(ITEM_X, ITEM_Y + index as f32 * ITEM_SPACING, ITEM_W, ITEM_H)
}

fn wrap_up(i: usize, len: usize) -> usize {
    (i + len - 1) % len
}

fn wrap_down(i: usize, len: usize) -> usize {
    (i + 1) % len
}

impl Menu {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Main],
            selected: 0,
            difficulty_selected: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Main)
    }

    /// Back to the top-level screen, e.g. after a match ends.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
    }

    fn push(&mut self, screen: Screen) {
        self.stack.push(screen);
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, current: Difficulty) -> MenuAction {
        match self.screen() {
            Screen::Main => match code {
                KeyCode::Up => {
                    self.selected = wrap_up(self.selected, MenuItem::ALL.len());
                    MenuAction::None
                }
                KeyCode::Down => {
                    self.selected = wrap_down(self.selected, MenuItem::ALL.len());
                    MenuAction::None
                }
                KeyCode::Enter => self.activate(self.selected, current),
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => MenuAction::Quit,
                _ => MenuAction::None,
            },
            Screen::DifficultySelect => match code {
                KeyCode::Up => {
                    self.difficulty_selected = wrap_up(self.difficulty_selected, Difficulty::ALL.len());
                    MenuAction::None
                }
                KeyCode::Down => {
                    self.difficulty_selected =
                        wrap_down(self.difficulty_selected, Difficulty::ALL.len());
                    MenuAction::None
                }
                KeyCode::Enter => {
                    self.pop();
                    MenuAction::SetDifficulty(Difficulty::ALL[self.difficulty_selected])
                }
                KeyCode::Esc => {
                    self.pop();
                    MenuAction::None
                }
                _ => MenuAction::None,
            },
            Screen::Instructions => {
                self.pop();
                MenuAction::None
            }
        }
    }

    /// Left click at logical coordinates.
    pub fn handle_click(&mut self, x: f32, y: f32, current: Difficulty) -> MenuAction {
        match self.screen() {
            Screen::Main => {
                let Some(index) = (0..MenuItem::ALL.len()).find(|&i| item_rect(i).contains(x, y)) else {
                    return MenuAction::None;
                };
                self.selected = index;
                // A click on Difficulty cycles in place instead of opening the sub-screen.
                if MenuItem::ALL[index] == MenuItem::Difficulty {
                    return MenuAction::SetDifficulty(current.cycle());
                }
                self.activate(index, current)
            }
            Screen::Instructions => {
                self.pop();
                MenuAction::None
            }
            Screen::DifficultySelect => MenuAction::None,
        }
    }

    fn activate(&mut self, index: usize, current: Difficulty) -> MenuAction {
        match MenuItem::ALL[index] {
            MenuItem::Start => MenuAction::Start,
            MenuItem::Instructions => {
                self.push(Screen::Instructions);
                MenuAction::None
            }
            MenuItem::Difficulty => {
                self.difficulty_selected = Difficulty::ALL
                    .iter()
                    .position(|d| *d == current)
                    .unwrap_or(0);
                self.push(Screen::DifficultySelect);
                MenuAction::None
            }
            MenuItem::Quit => MenuAction::Quit,
        }
    }
}
