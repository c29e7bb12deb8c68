//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `MatchState` (and, where needed, an RNG handle) and returns a brand-new
//! `MatchState`. Side effects are limited to the injected RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{
    AlienSprite, Boss, Bullet, Difficulty, Enemy, Explosion, GameEvent, MatchState, Phase, Player,
    BOSS_HEIGHT, BOSS_WIDTH, ENEMY_HEIGHT, ENEMY_WIDTH, MAX_HP, PLAYER_HEIGHT, PLAYER_WIDTH,
    SCREEN_HEIGHT, SCREEN_WIDTH, START_LIVES,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

const PLAYER_STEP: f32 = 6.0;
/// Bullets leave from just right of the ship's nose.
const MUZZLE_OFFSET: f32 = 28.0;
const BULLET_SPEED: f32 = 9.0;

const ENEMY_BASE_SPEEDS: [f32; 3] = [2.0, 3.0, 4.0];
const ENEMY_SPAWN_Y_MIN: i32 = 60;
const ENEMY_SPAWN_Y_MAX: i32 = 160;
/// Vertical step applied each time an enemy bounces off a side wall.
const ENEMY_DROP: f32 = 40.0;
/// An enemy whose top edge passes this line escapes and costs a life.
pub const ENEMY_ESCAPE_Y: f32 = SCREEN_HEIGHT - 120.0;

const BOSS_SPAWN_Y: f32 = 60.0;
const BOSS_BASE_SPEED: f32 = 3.0;
pub const BOSS_INTERVAL: u32 = 20;
pub const BOSS_BOUNTY: u32 = 10;

pub const ENEMY_DAMAGE: u32 = 30;
pub const BOSS_DAMAGE: u32 = 40;

// Hit radii, tuned per sprite size.
const ENEMY_BULLET_RANGE: f32 = 32.0;
const ENEMY_PLAYER_RANGE: f32 = 40.0;
const BOSS_BULLET_RANGE: f32 = 70.0;
const BOSS_PLAYER_RANGE: f32 = 80.0;

/// Last animation frame of an explosion; it is dropped once older.
pub const EXPLOSION_LIFETIME: u32 = 8;

/// Controls sampled for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

fn fresh_player() -> Player {
    Player {
        x: (SCREEN_WIDTH - PLAYER_WIDTH) / 2.0,
        y: SCREEN_HEIGHT - 70.0,
        hp: MAX_HP,
        lives: START_LIVES,
    }
}

/// Build the idle state shown behind the main menu.
pub fn init_state(difficulty: Difficulty) -> MatchState {
    MatchState {
        player: fresh_player(),
        bullets: Vec::new(),
        enemies: Vec::new(),
        boss: None,
        explosions: Vec::new(),
        score: 0,
        next_boss_score: BOSS_INTERVAL,
        difficulty,
        phase: Phase::Menu,
        events: Vec::new(),
        frame: 0,
    }
}

/// Menu → Playing: a completely fresh match at the selected difficulty.
pub fn start_match(state: &MatchState, rng: &mut impl Rng) -> MatchState {
    let difficulty = state.difficulty;
    tracing::info!(difficulty = difficulty.name(), "match started");
    MatchState {
        enemies: create_enemies(difficulty.profile().enemy_count, difficulty, rng),
        phase: Phase::Playing,
        ..init_state(difficulty)
    }
}

/// Change difficulty. Only honoured from the menu.
pub fn select_difficulty(state: &MatchState, difficulty: Difficulty) -> MatchState {
    if state.phase != Phase::Menu {
        return state.clone();
    }
    MatchState {
        difficulty,
        ..state.clone()
    }
}

/// GameOver → Menu. The finished match's score stays readable until the
/// next `start_match`.
pub fn return_to_menu(state: &MatchState) -> MatchState {
    if state.phase != Phase::GameOver {
        return state.clone();
    }
    MatchState {
        phase: Phase::Menu,
        events: Vec::new(),
        ..state.clone()
    }
}

// ── Spawner ──────────────────────────────────────────────────────────────────

fn random_spawn_point(rng: &mut impl Rng) -> (f32, f32) {
    let x = rng.gen_range(0..=(SCREEN_WIDTH - ENEMY_WIDTH) as i32);
    let y = rng.gen_range(ENEMY_SPAWN_Y_MIN..=ENEMY_SPAWN_Y_MAX);
    (x as f32, y as f32)
}

fn random_sprite(rng: &mut impl Rng) -> AlienSprite {
    *AlienSprite::ALL.choose(rng).unwrap_or(&AlienSprite::Alien1)
}

fn random_enemy(difficulty: Difficulty, rng: &mut impl Rng) -> Enemy {
    let sprite = random_sprite(rng);
    let (x, y) = random_spawn_point(rng);
    let base = *ENEMY_BASE_SPEEDS.choose(rng).unwrap_or(&ENEMY_BASE_SPEEDS[0]);
    Enemy {
        x,
        y,
        speed: base * difficulty.profile().speed_mul,
        sprite,
    }
}

/// A fresh wave of `count` enemies near the top of the screen.
pub fn create_enemies(count: usize, difficulty: Difficulty, rng: &mut impl Rng) -> Vec<Enemy> {
    (0..count).map(|_| random_enemy(difficulty, rng)).collect()
}

/// A boss centred horizontally, scaled to the difficulty.
pub fn spawn_boss(difficulty: Difficulty, rng: &mut impl Rng) -> Boss {
    let profile = difficulty.profile();
    Boss {
        x: (SCREEN_WIDTH - BOSS_WIDTH) / 2.0,
        y: BOSS_SPAWN_Y,
        speed: BOSS_BASE_SPEED * profile.speed_mul,
        hp: profile.boss_hp,
        max_hp: profile.boss_hp,
        sprite: random_sprite(rng),
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Two points collide when they are closer than `threshold`.
pub fn is_collision(x1: f32, y1: f32, x2: f32, y2: f32, threshold: f32) -> bool {
    (x1 - x2).hypot(y1 - y2) < threshold
}

fn player_centre(player: &Player) -> (f32, f32) {
    (player.x + PLAYER_WIDTH / 2.0, player.y + PLAYER_HEIGHT / 2.0)
}

fn boss_centre(boss: &Boss) -> (f32, f32) {
    (boss.x + BOSS_WIDTH / 2.0, boss.y + BOSS_HEIGHT / 2.0)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &MatchState) -> MatchState {
    let mut next = state.clone();
    next.player.x = (state.player.x - PLAYER_STEP).max(0.0);
    next
}

pub fn move_player_right(state: &MatchState) -> MatchState {
    let mut next = state.clone();
    next.player.x = (state.player.x + PLAYER_STEP).min(SCREEN_WIDTH - PLAYER_WIDTH);
    next
}

/// Fire a bullet from the player, capped at the difficulty's bullet limit.
pub fn player_shoot(state: &MatchState) -> MatchState {
    if state.bullets.len() >= state.difficulty.profile().bullet_limit {
        return state.clone();
    }
    let mut next = state.clone();
    next.bullets.push(Bullet {
        x: state.player.x + MUZZLE_OFFSET,
        y: state.player.y,
    });
    next.events.push(GameEvent::Shot);
    next
}

// ── Per-frame tick (nearly pure; RNG is injected) ───────────────────────────

/// Advance the simulation by one frame. All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(state: &MatchState, input: &FrameInput, rng: &mut impl Rng) -> MatchState {
    let mut next = MatchState {
        events: Vec::new(),
        frame: state.frame + 1,
        ..state.clone()
    };
    age_explosions(&mut next);

    let phase = next.phase;
    match phase {
        Phase::Playing => step_playing(next, input, rng),
        Phase::Boss => step_boss(next, input, rng),
        Phase::Menu | Phase::GameOver => next,
    }
}

fn step_playing(state: MatchState, input: &FrameInput, rng: &mut impl Rng) -> MatchState {
    let mut s = apply_input(state, input);
    advance_bullets(&mut s);

    if s.boss.is_none() && s.score > 0 && s.score >= s.next_boss_score {
        let boss = spawn_boss(s.difficulty, rng);
        tracing::info!(score = s.score, hp = boss.hp, "boss spawned");
        s.events.push(GameEvent::BossSpawned { hp: boss.hp });
        s.boss = Some(boss);
        s.phase = Phase::Boss;
    }

    resolve_wave(&mut s, rng);

    // Never let the wave starve.
    if s.phase != Phase::GameOver && s.enemies.is_empty() {
        tracing::debug!("wave exhausted, refilling");
        s.enemies = create_enemies(s.difficulty.profile().enemy_count, s.difficulty, rng);
    }
    s
}

fn step_boss(state: MatchState, input: &FrameInput, rng: &mut impl Rng) -> MatchState {
    let mut s = state;
    if s.boss.is_none() {
        s.boss = Some(spawn_boss(s.difficulty, rng));
    }
    if let Some(boss) = s.boss.as_mut() {
        boss.x += boss.speed;
        if boss.x <= 0.0 || boss.x >= SCREEN_WIDTH - BOSS_WIDTH {
            boss.speed = -boss.speed;
        }
    }

    let mut s = apply_input(s, input);
    advance_bullets(&mut s);
    resolve_boss_hits(&mut s, rng);
    resolve_boss_contact(&mut s, rng);
    s
}

fn apply_input(state: MatchState, input: &FrameInput) -> MatchState {
    let mut s = state;
    if input.left {
        s = move_player_left(&s);
    }
    if input.right {
        s = move_player_right(&s);
    }
    if input.fire {
        s = player_shoot(&s);
    }
    s
}

fn advance_bullets(s: &mut MatchState) {
    s.bullets = s
        .bullets
        .iter()
        .map(|b| Bullet {
            y: b.y - BULLET_SPEED,
            ..b.clone()
        })
        .filter(|b| b.y >= 0.0)
        .collect();
}

fn age_explosions(s: &mut MatchState) {
    s.explosions = s
        .explosions
        .iter()
        .map(|e| Explosion {
            age: e.age + 1,
            ..e.clone()
        })
        .filter(|e| e.age <= EXPLOSION_LIFETIME)
        .collect();
}

fn push_explosion(explosions: &mut Vec<Explosion>, events: &mut Vec<GameEvent>, x: f32, y: f32) {
    explosions.push(Explosion { x, y, age: 0 });
    events.push(GameEvent::Explosion { x, y });
}

// ── Damage & lives ───────────────────────────────────────────────────────────

/// Subtract `damage` from the player's HP. Returns `true` when that costs a
/// life, in which case HP is already refilled.
fn damage_player(player: &mut Player, damage: u32) -> bool {
    if damage >= player.hp {
        player.hp = MAX_HP;
        true
    } else {
        player.hp -= damage;
        false
    }
}

fn lose_life(s: &mut MatchState) {
    s.player.lives = s.player.lives.saturating_sub(1);
    s.events.push(GameEvent::LifeLost);
    if s.player.lives == 0 {
        s.phase = Phase::GameOver;
        s.boss = None;
        s.events.push(GameEvent::GameOver);
        tracing::info!(score = s.score, "game over");
    }
}

// ── Collision resolution ─────────────────────────────────────────────────────

/// Move every enemy and resolve its hits in encounter order. Consumed
/// bullets and escaped enemies are marked during the pass and dropped after.
fn resolve_wave(s: &mut MatchState, rng: &mut impl Rng) {
    let mut spent = vec![false; s.bullets.len()];
    let mut escaped: Vec<usize> = Vec::new();

    for ei in 0..s.enemies.len() {
        if s.phase == Phase::GameOver {
            break;
        }

        let enemy = &mut s.enemies[ei];
        enemy.x += enemy.speed;
        if enemy.x <= 0.0 || enemy.x >= SCREEN_WIDTH - ENEMY_WIDTH {
            enemy.speed = -enemy.speed;
            enemy.y += ENEMY_DROP;
        }

        if enemy.y > ENEMY_ESCAPE_Y {
            let (x, y) = (enemy.x, enemy.y);
            escaped.push(ei);
            push_explosion(&mut s.explosions, &mut s.events, x, y);
            lose_life(s);
            continue;
        }

        // Bullet hits respawn the enemy in place; later bullets are tested
        // against its new position.
        for (bi, bullet) in s.bullets.iter().enumerate() {
            let enemy = &mut s.enemies[ei];
            if spent[bi] || !is_collision(enemy.x, enemy.y, bullet.x, bullet.y, ENEMY_BULLET_RANGE) {
                continue;
            }
            spent[bi] = true;
            push_explosion(&mut s.explosions, &mut s.events, enemy.x, enemy.y);
            *enemy = random_enemy(s.difficulty, rng);
            s.score += 1;
        }

        let (px, py) = player_centre(&s.player);
        let enemy = &mut s.enemies[ei];
        if is_collision(
            enemy.x + ENEMY_WIDTH / 2.0,
            enemy.y + ENEMY_HEIGHT / 2.0,
            px,
            py,
            ENEMY_PLAYER_RANGE,
        ) {
            push_explosion(&mut s.explosions, &mut s.events, enemy.x, enemy.y);
            // Rammers are only repositioned; they keep speed and sprite.
            let (x, y) = random_spawn_point(rng);
            enemy.x = x;
            enemy.y = y;
            if damage_player(&mut s.player, ENEMY_DAMAGE) {
                lose_life(s);
            }
        }
    }

    s.bullets = s
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !spent[*i])
        .map(|(_, b)| b.clone())
        .collect();

    s.enemies = s
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !escaped.contains(i))
        .map(|(_, e)| e.clone())
        .collect();
}

fn resolve_boss_hits(s: &mut MatchState, rng: &mut impl Rng) {
    let mut spent = vec![false; s.bullets.len()];
    let mut defeated = false;

    for (bi, bullet) in s.bullets.iter().enumerate() {
        let Some(boss) = s.boss.as_mut() else {
            break;
        };
        let (cx, cy) = boss_centre(boss);
        if !is_collision(cx, cy, bullet.x, bullet.y, BOSS_BULLET_RANGE) {
            continue;
        }
        spent[bi] = true;
        push_explosion(&mut s.explosions, &mut s.events, boss.x, boss.y);
        boss.hp = boss.hp.saturating_sub(1);
        if boss.hp == 0 {
            defeated = true;
            break;
        }
    }

    s.bullets = s
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !spent[*i])
        .map(|(_, b)| b.clone())
        .collect();

    if defeated {
        defeat_boss(s, rng);
    }
}

fn defeat_boss(s: &mut MatchState, rng: &mut impl Rng) {
    if let Some(boss) = s.boss.take() {
        push_explosion(&mut s.explosions, &mut s.events, boss.x, boss.y);
    }
    s.score += BOSS_BOUNTY;
    s.next_boss_score += BOSS_INTERVAL;
    s.enemies = create_enemies(s.difficulty.profile().enemy_count, s.difficulty, rng);
    s.phase = Phase::Playing;
    s.events.push(GameEvent::BossDefeated);
    tracing::info!(
        score = s.score,
        next_boss_score = s.next_boss_score,
        "boss defeated"
    );
}

fn resolve_boss_contact(s: &mut MatchState, rng: &mut impl Rng) {
    let Some(boss) = s.boss.as_ref() else {
        return;
    };
    let (cx, cy) = boss_centre(boss);
    let (bx, by) = (boss.x, boss.y);
    let (px, py) = player_centre(&s.player);
    if !is_collision(cx, cy, px, py, BOSS_PLAYER_RANGE) {
        return;
    }

    push_explosion(&mut s.explosions, &mut s.events, bx, by);
    if !damage_player(&mut s.player, BOSS_DAMAGE) {
        return;
    }
    lose_life(s);
    if s.phase != Phase::GameOver {
        // The boss withdraws without paying out its bounty.
        tracing::info!(lives = s.player.lives, "boss withdrew after life loss");
        s.boss = None;
        s.enemies = create_enemies(s.difficulty.profile().enemy_count, s.difficulty, rng);
        s.phase = Phase::Playing;
    }
}
