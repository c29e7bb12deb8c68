use space_invader::compute::*;
use space_invader::entities::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_state(difficulty: Difficulty) -> MatchState {
    MatchState {
        player: Player { x: 370.0, y: 530.0, hp: 100, lives: 3 },
        bullets: Vec::new(),
        enemies: Vec::new(),
        boss: None,
        explosions: Vec::new(),
        score: 0,
        next_boss_score: 20,
        difficulty,
        phase: Phase::Playing,
        events: Vec::new(),
        frame: 0,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn still_enemy(x: f32, y: f32) -> Enemy {
    Enemy { x, y, speed: 0.0, sprite: AlienSprite::Alien1 }
}

fn boss_at(x: f32, y: f32, speed: f32, hp: u32) -> Boss {
    Boss { x, y, speed, hp, max_hp: 10, sprite: AlienSprite::Alien2 }
}

const IDLE: FrameInput = FrameInput { left: false, right: false, fire: false };
const FIRE: FrameInput = FrameInput { left: false, right: false, fire: true };

// ── init / start / menu transitions ──────────────────────────────────────────

#[test]
fn init_state_is_an_idle_menu() {
    let s = init_state(Difficulty::Hard);
    assert_eq!(s.phase, Phase::Menu);
    assert_eq!(s.difficulty, Difficulty::Hard);
    assert_eq!(s.player.hp, MAX_HP);
    assert_eq!(s.player.lives, 3);
    assert_eq!(s.next_boss_score, 20);
    assert!(s.enemies.is_empty() && s.bullets.is_empty() && s.boss.is_none());
}

#[test]
fn start_match_resets_everything() {
    let mut used = make_state(Difficulty::Medium);
    used.phase = Phase::Menu;
    used.score = 57;
    used.next_boss_score = 60;
    used.player.lives = 1;
    used.player.hp = 10;
    used.boss = Some(boss_at(330.0, 60.0, 3.0, 4));
    used.bullets.push(Bullet { x: 10.0, y: 10.0 });

    let s = start_match(&used, &mut seeded_rng());
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.score, 0);
    assert_eq!(s.next_boss_score, 20);
    assert_eq!(s.player.lives, 3);
    assert_eq!(s.player.hp, 100);
    assert!(s.boss.is_none());
    assert!(s.bullets.is_empty());
    assert_eq!(s.enemies.len(), 8);
}

#[test]
fn spawned_enemies_respect_ranges() {
    for difficulty in Difficulty::ALL {
        let mul = difficulty.profile().speed_mul;
        let enemies = create_enemies(200, difficulty, &mut seeded_rng());
        for e in &enemies {
            assert!((0.0..=752.0).contains(&e.x));
            assert!((60.0..=160.0).contains(&e.y));
            assert!([2.0, 3.0, 4.0].iter().any(|b| (b * mul - e.speed).abs() < 1e-5));
        }
    }
}

#[test]
fn spawn_boss_is_centred_and_scaled() {
    let boss = spawn_boss(Difficulty::Hard, &mut seeded_rng());
    assert_eq!(boss.x, 330.0);
    assert_eq!(boss.y, 60.0);
    assert!((boss.speed - 3.0 * 1.4).abs() < 1e-5);
    assert_eq!(boss.hp, 16);
    assert_eq!(boss.max_hp, 16);
}

#[test]
fn select_difficulty_only_from_menu() {
    let menu = init_state(Difficulty::Medium);
    assert_eq!(select_difficulty(&menu, Difficulty::Easy).difficulty, Difficulty::Easy);

    let playing = make_state(Difficulty::Medium);
    assert_eq!(select_difficulty(&playing, Difficulty::Easy).difficulty, Difficulty::Medium);
}

#[test]
fn return_to_menu_only_from_game_over() {
    let mut s = make_state(Difficulty::Easy);
    assert_eq!(return_to_menu(&s).phase, Phase::Playing);
    s.phase = Phase::GameOver;
    s.score = 12;
    let back = return_to_menu(&s);
    assert_eq!(back.phase, Phase::Menu);
    assert_eq!(back.score, 12);
}

#[test]
fn tick_outside_a_match_changes_nothing() {
    let mut rng = seeded_rng();
    for phase in [Phase::Menu, Phase::GameOver] {
        let mut s = make_state(Difficulty::Easy);
        s.phase = phase;
        let s2 = tick(&s, &FIRE, &mut rng);
        assert_eq!(s2.phase, phase);
        assert!(s2.bullets.is_empty());
        assert_eq!(s2.frame, 1);
    }
}

// ── movement & firing ────────────────────────────────────────────────────────

#[test]
fn move_left_clamps_at_zero() {
    let mut s = make_state(Difficulty::Easy);
    assert_eq!(move_player_left(&s).player.x, 364.0);
    s.player.x = 2.0;
    assert_eq!(move_player_left(&s).player.x, 0.0);
}

#[test]
fn move_right_clamps_at_screen_edge() {
    let mut s = make_state(Difficulty::Easy);
    assert_eq!(move_player_right(&s).player.x, 376.0);
    s.player.x = 738.0;
    assert_eq!(move_player_right(&s).player.x, 740.0);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state(Difficulty::Easy);
    let _ = move_player_left(&s);
    let _ = move_player_right(&s);
    assert_eq!(s.player.x, 370.0);
}

#[test]
fn shoot_spawns_bullet_at_the_muzzle() {
    let s = player_shoot(&make_state(Difficulty::Easy));
    assert_eq!(s.bullets, vec![Bullet { x: 398.0, y: 530.0 }]);
    assert_eq!(s.events, vec![GameEvent::Shot]);
}

#[test]
fn easy_first_shot_gives_one_bullet() {
    let s = tick(&make_state(Difficulty::Easy), &FIRE, &mut seeded_rng());
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn bullets_cap_at_the_difficulty_limit() {
    for difficulty in Difficulty::ALL {
        let limit = difficulty.profile().bullet_limit;
        let mut rng = seeded_rng();
        let mut s = make_state(difficulty);
        for _ in 0..12 {
            s = tick(&s, &FIRE, &mut rng);
            assert!(s.bullets.len() <= limit);
        }
        assert_eq!(s.bullets.len(), limit);
    }
}

#[test]
fn full_magazine_fires_nothing() {
    let mut s = make_state(Difficulty::Easy);
    for _ in 0..7 {
        s = player_shoot(&s);
    }
    let s2 = player_shoot(&s);
    assert_eq!(s2.bullets.len(), 7);
    assert!(s2.events.iter().filter(|e| **e == GameEvent::Shot).count() == 7);
}

#[test]
fn bullets_rise_and_leave_through_the_top() {
    let mut s = make_state(Difficulty::Easy);
    s.bullets.push(Bullet { x: 100.0, y: 9.0 });
    s.bullets.push(Bullet { x: 200.0, y: 5.0 });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.bullets, vec![Bullet { x: 100.0, y: 0.0 }]);
}

// ── enemies ──────────────────────────────────────────────────────────────────

#[test]
fn enemy_bounces_and_steps_down_at_a_wall() {
    let mut s = make_state(Difficulty::Easy);
    s.enemies.push(Enemy { x: 1.0, y: 100.0, speed: -2.0, sprite: AlienSprite::Alien3 });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    let e = &s2.enemies[0];
    assert_eq!(e.speed, 2.0);
    assert_eq!(e.y, 140.0);
}

#[test]
fn bullet_hit_respawns_enemy_and_scores() {
    let mut s = make_state(Difficulty::Easy);
    s.enemies.push(still_enemy(300.0, 300.0));
    s.bullets.push(Bullet { x: 300.0, y: 309.0 }); // moves to y=300 first
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.score, 1);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.enemies.len(), 1);
    assert!(s2.enemies[0].y <= 160.0);
    assert_eq!(s2.explosions.len(), 1);
    assert!(s2.events.contains(&GameEvent::Explosion { x: 300.0, y: 300.0 }));
}

#[test]
fn one_bullet_only_kills_the_first_enemy_it_meets() {
    let mut s = make_state(Difficulty::Easy);
    s.enemies.push(still_enemy(300.0, 300.0));
    s.enemies.push(still_enemy(300.0, 300.0));
    s.bullets.push(Bullet { x: 300.0, y: 309.0 });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.score, 1);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.enemies.len(), 2);
    assert_eq!(s2.enemies[1], still_enemy(300.0, 300.0));
}

#[test]
fn bullet_just_out_of_range_misses() {
    let mut s = make_state(Difficulty::Easy);
    s.enemies.push(still_enemy(300.0, 300.0));
    s.bullets.push(Bullet { x: 332.0, y: 309.0 }); // exactly 32 away
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.score, 0);
    assert_eq!(s2.bullets.len(), 1);
}

#[test]
fn escaped_enemy_is_removed_and_costs_a_life() {
    let mut s = make_state(Difficulty::Easy);
    s.enemies.push(still_enemy(300.0, 481.0));
    s.enemies.push(still_enemy(500.0, 100.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.lives, 2);
    assert_eq!(s2.player.hp, 100);
    assert_eq!(s2.enemies, vec![still_enemy(500.0, 100.0)]);
    assert!(s2.events.contains(&GameEvent::LifeLost));
    assert_eq!(s2.phase, Phase::Playing);
}

#[test]
fn exhausted_wave_is_refilled() {
    let mut s = make_state(Difficulty::Hard);
    s.enemies.push(still_enemy(300.0, 481.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.player.lives, 2);
    assert_eq!(s2.enemies.len(), 10);
}

#[test]
fn last_life_escape_ends_the_game() {
    let mut s = make_state(Difficulty::Easy);
    s.player.lives = 1;
    s.enemies.push(still_enemy(300.0, 481.0));
    s.enemies.push(still_enemy(400.0, 481.0));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.player.lives, 0);
    assert_eq!(s2.phase, Phase::GameOver);
    assert!(s2.events.contains(&GameEvent::GameOver));
}

/// Enemy placed so its centre sits on the player's centre.
fn rammer_for(player: &Player) -> Enemy {
    still_enemy(player.x + 30.0 - 24.0, player.y + 20.0 - 18.0)
}

#[test]
fn enemy_contact_damages_player() {
    let mut s = make_state(Difficulty::Easy);
    s.player.y = 300.0;
    s.enemies.push(rammer_for(&s.player));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.hp, 70);
    assert_eq!(s2.player.lives, 3);
    // Repositioned but keeps its speed and sprite.
    assert!(s2.enemies[0].y <= 160.0);
    assert_eq!(s2.enemies[0].speed, 0.0);
    assert_eq!(s2.enemies[0].sprite, AlienSprite::Alien1);
}

#[test]
fn low_hp_enemy_contact_costs_a_life_and_refills_hp() {
    let mut s = make_state(Difficulty::Easy);
    s.player.y = 300.0;
    s.player.hp = 10;
    s.enemies.push(rammer_for(&s.player));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.lives, 2);
    assert_eq!(s2.player.hp, 100);
    assert_eq!(s2.phase, Phase::Playing);
}

#[test]
fn low_hp_enemy_contact_on_last_life_is_game_over() {
    let mut s = make_state(Difficulty::Easy);
    s.player.y = 300.0;
    s.player.hp = 10;
    s.player.lives = 1;
    s.enemies.push(rammer_for(&s.player));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.lives, 0);
    assert_eq!(s2.phase, Phase::GameOver);
    assert!(s2.boss.is_none());
}

// ── boss ─────────────────────────────────────────────────────────────────────

#[test]
fn reaching_the_threshold_summons_a_boss() {
    for (difficulty, hp) in [(Difficulty::Easy, 10), (Difficulty::Medium, 12), (Difficulty::Hard, 16)] {
        let mut s = make_state(difficulty);
        s.score = 20;
        let s2 = tick(&s, &IDLE, &mut seeded_rng());
        assert_eq!(s2.phase, Phase::Boss);
        assert_eq!(s2.boss.as_ref().map(|b| b.hp), Some(hp));
        assert!(s2.events.contains(&GameEvent::BossSpawned { hp }));
    }
}

#[test]
fn no_boss_below_threshold() {
    let mut s = make_state(Difficulty::Easy);
    s.score = 19;
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.phase, Phase::Playing);
    assert!(s2.boss.is_none());
}

#[test]
fn boss_bounces_without_stepping_down() {
    let mut s = make_state(Difficulty::Easy);
    s.phase = Phase::Boss;
    s.boss = Some(boss_at(659.0, 60.0, 3.0, 10));
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    let boss = s2.boss.unwrap();
    assert_eq!(boss.x, 662.0);
    assert_eq!(boss.speed, -3.0);
    assert_eq!(boss.y, 60.0);
}

#[test]
fn bullet_chips_boss_hp() {
    let mut s = make_state(Difficulty::Easy);
    s.phase = Phase::Boss;
    s.boss = Some(boss_at(330.0, 60.0, 0.0, 5));
    s.bullets.push(Bullet { x: 400.0, y: 119.0 });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.boss.as_ref().map(|b| b.hp), Some(4));
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.phase, Phase::Boss);
    assert_eq!(s2.explosions.len(), 1);
}

#[test]
fn final_bullet_defeats_boss() {
    let mut s = make_state(Difficulty::Easy);
    s.phase = Phase::Boss;
    s.score = 25;
    s.next_boss_score = 40;
    s.boss = Some(boss_at(330.0, 60.0, 2.25, 1));
    s.bullets.push(Bullet { x: 400.0, y: 119.0 });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert!(s2.boss.is_none());
    assert_eq!(s2.phase, Phase::Playing);
    assert_eq!(s2.score, 35);
    assert_eq!(s2.next_boss_score, 60);
    assert_eq!(s2.enemies.len(), 6);
    assert!(s2.events.contains(&GameEvent::BossDefeated));
}

#[test]
fn bullets_after_the_killing_blow_survive() {
    let mut s = make_state(Difficulty::Easy);
    s.phase = Phase::Boss;
    s.boss = Some(boss_at(330.0, 60.0, 0.0, 1));
    s.bullets.push(Bullet { x: 400.0, y: 119.0 });
    s.bullets.push(Bullet { x: 410.0, y: 119.0 });
    let s2 = tick(&s, &IDLE, &mut seeded_rng());
    assert_eq!(s2.bullets, vec![Bullet { x: 410.0, y: 110.0 }]);
}

/// Put the player's centre on the boss centre.
fn player_under(boss: &Boss) -> Player {
    Player { x: boss.x + 70.0 - 30.0, y: boss.y + 50.0 - 20.0, hp: 100, lives: 3 }
}

#[test]
fn boss_contact_damages_player() {
    let mut s = make_state(Difficulty::Easy);
    let boss = boss_at(330.0, 60.0, 0.0, 10);
    s.player = player_under(&boss);
    s.phase = Phase::Boss;
    s.boss = Some(boss);
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.hp, 60);
    assert_eq!(s2.phase, Phase::Boss);
    assert!(s2.boss.is_some());
}

#[test]
fn losing_a_life_to_the_boss_sends_it_away_unpaid() {
    let mut s = make_state(Difficulty::Medium);
    let boss = boss_at(330.0, 60.0, 0.0, 10);
    s.player = Player { hp: 40, ..player_under(&boss) };
    s.phase = Phase::Boss;
    s.score = 23;
    s.boss = Some(boss);
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.lives, 2);
    assert_eq!(s2.player.hp, 100);
    assert!(s2.boss.is_none());
    assert_eq!(s2.phase, Phase::Playing);
    assert_eq!(s2.score, 23);
    assert_eq!(s2.next_boss_score, 20);
    assert_eq!(s2.enemies.len(), 8);
    assert!(!s2.events.contains(&GameEvent::BossDefeated));
}

#[test]
fn losing_the_last_life_to_the_boss_is_game_over() {
    let mut s = make_state(Difficulty::Easy);
    let boss = boss_at(330.0, 60.0, 0.0, 10);
    s.player = Player { hp: 40, lives: 1, ..player_under(&boss) };
    s.phase = Phase::Boss;
    s.boss = Some(boss);
    let s2 = tick(&s, &IDLE, &mut seeded_rng());

    assert_eq!(s2.player.lives, 0);
    assert_eq!(s2.phase, Phase::GameOver);
    assert!(s2.boss.is_none());
}

// ── whole-match invariants ───────────────────────────────────────────────────

#[test]
fn invariants_hold_through_random_play() {
    for (seed, difficulty) in [(1, Difficulty::Easy), (2, Difficulty::Medium), (3, Difficulty::Hard)] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pad = StdRng::seed_from_u64(seed + 100);
        let profile = difficulty.profile();
        let mut s = start_match(&init_state(difficulty), &mut rng);
        let mut best_score = 0;

        for _ in 0..5_000 {
            let input = FrameInput {
                left: pad.gen_bool(0.3),
                right: pad.gen_bool(0.3),
                fire: pad.gen_bool(0.5),
            };
            let prev_threshold = s.next_boss_score;
            let prev_score = s.score;
            s = tick(&s, &input, &mut rng);

            assert!(s.player.hp <= MAX_HP);
            assert!(s.player.lives <= 3);
            assert!(s.bullets.len() <= profile.bullet_limit);
            assert_eq!(s.phase == Phase::Boss, s.boss.is_some());
            assert_eq!(s.phase == Phase::GameOver, s.player.lives == 0);
            assert!(s.score >= prev_score);
            if s.events.contains(&GameEvent::BossDefeated) {
                assert_eq!(s.next_boss_score, prev_threshold + 20);
            } else {
                assert_eq!(s.next_boss_score, prev_threshold);
            }
            if s.phase == Phase::Playing {
                assert!(s.enemies.len() <= profile.enemy_count);
            }
            best_score = best_score.max(s.score);
            if s.phase == Phase::GameOver {
                break;
            }
        }
        assert_eq!(best_score, s.score);
    }
}
