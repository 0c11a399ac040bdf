use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use triathlon_core::{AudioState, Command, Event, FirePattern, RunConfig, Stage};
use triathlon_system_amp_invaders::{
    compute_enemy_drop_delta, enemy_invasion_floor_y, plan_boss_projectiles, resolve_enemy_bullet,
    spread_offsets, step_auto_fire, BossDirector, CollisionConfig, CollisionOutcome,
    EnemyFireDirector, FireInput, PlanInput, PlayfieldBounds, Shield, SpecialMotion,
    SpecialsDirector, SpecialsInput, WaveDirectorV2, SHIELD_COUNT,
};
use triathlon_system_moshpit::{
    active_mosher_count, compute_active_layers, guard_release_delay_ms, guard_step_ms,
    player_step_ms, ZoneStatus, ZoneTracker,
};
use triathlon_system_scoring::{
    compute_boss_entry_bonus, compute_boss_phase_break_bonus, compute_enemy_defeat_score,
    compute_final_score, compute_snake_food_score, compute_snake_sustain_bonus,
    compute_stage_score, compute_wave_clear_bonus, EnemyType, FinalScore, BOSS_DEFEAT_BONUS,
};
use triathlon_system_snake_audio::{AudioSample, SnakeAudioDirector, BOUNDARY_STEPS};
use triathlon_world::{self as world, query, FlowState};

use crate::tuning::Tuning;

/// One sixteenth step at 120 BPM.
const FRAME_MS: u64 = 125;
const SNAKE_STAGE_LIMIT_MS: u64 = 75_000;
const MOSHPIT_STAGE_LIMIT_MS: u64 = 90_000;
const AMP_STAGE_LIMIT_MS: u64 = 150_000;

const SNAKE_BASE_LENGTH: u32 = 3;
const SNAKE_BEATS_PER_PHRASE: f64 = 32.0;
const SNAKE_RETRY_BEFORE_MS: u64 = 30_000;

const MOSHPIT_TILES: [u32; 4] = [24, 30, 36, 28];
const MOSHPIT_LEVEL: u32 = 1;
const FRIGHT_MS: f64 = 6_000.0;

const AUTO_FIRE_INTERVAL_MS: f64 = 180.0;
const PLAYER_LIVES: u32 = 3;
const WAVES_BEFORE_BOSS: u32 = 4;
const SHIELD_DURABILITY: u32 = 60;
const FORMATION_START_Y: f32 = 160.0;
const FORMATION_DROP_PER_FRAME: f32 = 4.0;
const BOSS_DAMAGE_PER_HIT: u32 = 4;

/// What happened in one banked stage.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StageSummary {
    stage: Stage,
    banked: u64,
    elapsed: Duration,
    detail: String,
}

/// Outcome of a complete run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunReport {
    pub(crate) banner: &'static str,
    pub(crate) stages: Vec<StageSummary>,
    pub(crate) final_score: FinalScore,
    pub(crate) boss_defeated: bool,
    pub(crate) completed: bool,
    pub(crate) events: usize,
}

impl RunReport {
    /// One line per banked stage.
    pub(crate) fn stage_lines(&self) -> Vec<String> {
        self.stages
            .iter()
            .map(|summary| {
                format!(
                    "{:?}: {} pts in {:.1}s ({})",
                    summary.stage,
                    summary.banked,
                    summary.elapsed.as_secs_f64(),
                    summary.detail
                )
            })
            .collect()
    }

    /// Final score breakdown.
    pub(crate) fn score_line(&self) -> String {
        let score = &self.final_score;
        format!(
            "total {} = stages {} + time {} + skill {}",
            score.total, score.stage_total, score.time_bonus, score.high_skill_bonus
        )
    }
}

/// Seeded synthetic player driving every stage system through one run.
pub(crate) struct Simulation {
    tuning: Tuning,
    config: RunConfig,
    rng: ChaCha8Rng,
    flow: FlowState,
    events: Vec<Event>,
    event_count: usize,
    boss_defeated: bool,
    stages: Vec<StageSummary>,
}

impl Simulation {
    pub(crate) fn new(config: RunConfig, tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            flow: FlowState::new(&config),
            events: Vec::new(),
            event_count: 0,
            boss_defeated: false,
            stages: Vec::new(),
        }
    }

    /// Plays all three stages in order and computes the final score.
    pub(crate) fn run(&mut self) -> RunReport {
        self.play_rhythm_serpent();
        self.play_moshpit();
        self.play_amp_invaders();

        let input = query::final_score_input(&self.flow, self.boss_defeated);
        let final_score = compute_final_score(&input);
        info!(
            total = final_score.total,
            completed = input.completed_all_stages,
            events = self.event_count,
            "run finished"
        );

        RunReport {
            banner: query::welcome_banner(&self.flow),
            stages: self.stages.clone(),
            final_score,
            boss_defeated: self.boss_defeated,
            completed: query::is_completed(&self.flow),
            events: self.event_count,
        }
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.flow, command, &mut self.events);
        for event in self.events.drain(..) {
            match event {
                Event::CommitUnlocked { stage } => debug!(?stage, "commit available"),
                Event::RunEnded => info!("run clock ran out"),
                _ => {}
            }
            self.event_count += 1;
        }
    }

    fn frame(&mut self) {
        self.apply(Command::Tick {
            dt: Duration::from_millis(FRAME_MS),
        });
    }

    fn award(&mut self, points: u32) {
        self.apply(Command::AddStageScore {
            points: f64::from(points),
        });
    }

    fn absorb(&mut self, events: &mut Vec<Event>) {
        self.event_count += events.len();
        events.clear();
    }

    fn is_running(&self) -> bool {
        !query::is_run_over(&self.flow) && !query::is_completed(&self.flow)
    }

    fn stage_elapsed_ms(&self) -> u64 {
        u64::try_from(query::elapsed_in_stage(&self.flow).as_millis()).unwrap_or(u64::MAX)
    }

    /// Ends the attempt if needed and banks the current stage.
    fn bank(&mut self, detail: String) {
        if !self.is_running() {
            return;
        }
        if !query::can_commit_now(&self.flow) {
            self.apply(Command::EndStage);
        }

        let stage = query::current_stage(&self.flow);
        let banked = compute_stage_score(query::stage_raw(&self.flow));
        let elapsed = query::elapsed_in_stage(&self.flow);
        info!(?stage, banked, %detail, "stage banked");
        self.stages.push(StageSummary {
            stage,
            banked,
            elapsed,
            detail,
        });
        self.apply(Command::AdvanceStage { tri_points: banked });
    }

    fn play_rhythm_serpent(&mut self) {
        if !self.is_running() {
            return;
        }
        let mut director =
            SnakeAudioDirector::new(self.tuning.audio, self.config.snake_audio_mode);
        let mut events = Vec::new();
        let mut combo = 0_u32;
        let mut extra_segments = 0_u32;
        let mut score = 0.0_f64;
        let mut phrase_points = 0.0_f64;
        let mut last_phrase_points = 0.0_f64;
        let mut phrase_pickups = 0_u32;
        let mut peak = AudioState::Intro;
        let mut retried = false;
        let mut step16 = 0_u64;
        let phrase_seconds = BOUNDARY_STEPS as f64 * FRAME_MS as f64 / 1_000.0;

        while self.is_running() && self.stage_elapsed_ms() < SNAKE_STAGE_LIMIT_MS {
            let seconds = self.stage_elapsed_ms() as f64 / 1_000.0;

            if self.rng.gen_bool(0.18) {
                combo += 1;
                extra_segments += 1;
                phrase_pickups += 1;
                let points = compute_snake_food_score(combo, extra_segments);
                phrase_points += f64::from(points);
                score += f64::from(points);
                self.award(points);
            } else if self.rng.gen_bool(0.02) {
                combo = 0;
                director.note_danger(seconds);
            }

            if step16 % BOUNDARY_STEPS == 0 && step16 > 0 {
                let bonus = compute_snake_sustain_bonus(combo, extra_segments);
                score += f64::from(bonus);
                self.award(bonus);
            }

            let sample = AudioSample {
                combo,
                score_rate: last_phrase_points / phrase_seconds,
                length: SNAKE_BASE_LENGTH + extra_segments,
                pickup_density: (f64::from(phrase_pickups) / SNAKE_BEATS_PER_PHRASE).min(1.0),
                score,
                elapsed_seconds: seconds,
                danger: 0.0,
                combo_milestone_recent: combo >= 8,
                has_positive_momentum: phrase_points > last_phrase_points,
            };
            if let Some(state) = director.on_step(step16, &sample, &mut events) {
                peak = peak.max(state);
            }
            self.absorb(&mut events);

            if step16 % BOUNDARY_STEPS == 0 {
                last_phrase_points = phrase_points;
                phrase_points = 0.0;
                phrase_pickups = 0;
            }

            if self.rng.gen_bool(0.004) {
                debug!(seconds, combo, "serpent crashed");
                self.apply(Command::EndStage);
                if retried || self.stage_elapsed_ms() >= SNAKE_RETRY_BEFORE_MS {
                    break;
                }
                retried = true;
                self.apply(Command::RetryStage);
                director.reset();
                combo = 0;
                extra_segments = 0;
                score = 0.0;
                phrase_points = 0.0;
                last_phrase_points = 0.0;
                phrase_pickups = 0;
                step16 = 0;
                continue;
            }

            self.frame();
            step16 += 1;
        }

        let detail = format!(
            "music reached {:?}, drop {}",
            peak,
            if director.drop_triggered() { "played" } else { "missed" }
        );
        self.bank(detail);
    }

    fn play_moshpit(&mut self) {
        if !self.is_running() {
            return;
        }
        let pacing = self.tuning.pacing;
        let music = self.tuning.music;
        let mut tracker = ZoneTracker::new(&MOSHPIT_TILES, self.tuning.zones);
        let mut events = Vec::new();
        let mut now_ms = 0.0_f64;
        let mut step_budget_ms = 0.0_f64;
        let mut zone = 0_u32;
        let mut fright_until_ms = 0.0_f64;
        let mut objective_reported = false;
        let mut stingers = 0_u32;
        let mut peak_layers = 0_u8;

        while self.is_running() && self.stage_elapsed_ms() < MOSHPIT_STAGE_LIMIT_MS {
            let completions = tracker.total_completions();
            let frightened = now_ms < fright_until_ms;

            step_budget_ms += FRAME_MS as f64;
            let step_ms = player_step_ms(MOSHPIT_LEVEL, completions, &pacing);
            while step_budget_ms >= step_ms {
                step_budget_ms -= step_ms;
                let Some(target) = next_active_zone(&tracker, zone) else {
                    break;
                };
                zone = target;
                if !self.rng.gen_bool(0.85) {
                    continue;
                }
                if let Some(bonus) = tracker.collect(zone, now_ms, &mut events) {
                    self.award(bonus);
                }
            }

            stingers += tracker.update(now_ms, &mut events);
            self.absorb(&mut events);

            if !objective_reported && tracker.all_zones_completed() {
                objective_reported = true;
                self.apply(Command::CompleteObjective);
            }

            peak_layers = peak_layers.max(compute_active_layers(
                tracker.average_completion(),
                frightened,
                &music,
            ));

            if !frightened && self.rng.gen_bool(0.004) {
                fright_until_ms = now_ms + FRIGHT_MS;
            }

            let moshers = active_mosher_count(completions, &pacing);
            let released = (0..moshers)
                .filter(|guard| {
                    now_ms >= guard_release_delay_ms(*guard, MOSHPIT_LEVEL, completions, &pacing)
                })
                .count();
            let guard_pace = pacing.guard_base_step_ms
                / guard_step_ms(MOSHPIT_LEVEL, completions, frightened, &pacing);
            let catch_chance = if frightened {
                0.0
            } else {
                (0.0004 * released as f64 * guard_pace).clamp(0.0, 1.0)
            };
            if self.rng.gen_bool(catch_chance) {
                debug!(now_ms, released, "caught by the moshers");
                self.apply(Command::EndStage);
                break;
            }

            self.frame();
            now_ms += FRAME_MS as f64;
        }

        let detail = format!(
            "{} zone clears, {} stingers, up to {} layers",
            tracker.total_completions(),
            stingers,
            peak_layers
        );
        self.bank(detail);
    }

    fn play_amp_invaders(&mut self) {
        if !self.is_running() {
            return;
        }
        let bounds = PlayfieldBounds::default();
        let collision = self.tuning.collision;
        let mut waves = WaveDirectorV2::new(self.tuning.spread, self.tuning.waves.clone());
        let fire = EnemyFireDirector::new(self.tuning.fire, self.tuning.waves.clone());
        let mut specials = SpecialsDirector::new(self.tuning.specials);
        let mut boss = BossDirector::new(self.tuning.boss);
        let mut shields = [Shield {
            durability: SHIELD_DURABILITY,
        }; SHIELD_COUNT];
        let player = Vec2::new(bounds.width / 2.0, bounds.height - 40.0);
        let boss_position = Vec2::new(bounds.width / 2.0, 120.0);
        let floor_y = enemy_invasion_floor_y(bounds.height);

        let mut events = Vec::new();
        let mut now_ms = 0.0_f64;
        let mut wave_elapsed_ms = 0.0_f64;
        let mut fire_timer_ms = 0.0_f64;
        let mut auto_fire_ms = 0.0_f64;
        let mut formation_y = FORMATION_START_Y;
        let mut alive = waves.wave_spec().enemy_count();
        let mut lives = PLAYER_LIVES;
        let mut waves_cleared = 0_u32;
        let dt = FRAME_MS as f64;

        while self.is_running()
            && self.stage_elapsed_ms() < AMP_STAGE_LIMIT_MS
            && lives > 0
            && !boss.state().defeated
        {
            now_ms += dt;
            wave_elapsed_ms += dt;
            let wave = waves.state().wave;

            let volley = step_auto_fire(auto_fire_ms, dt, AUTO_FIRE_INTERVAL_MS);
            auto_fire_ms = volley.cooldown_ms;
            let bullets = volley.shots as usize * spread_offsets(waves.state().spread_tier).len();
            let hits = (0..bullets).filter(|_| self.rng.gen_bool(0.3)).count() as u32;

            if boss.state().active {
                boss.apply_damage(hits * BOSS_DAMAGE_PER_HIT, &mut events);
                if let Some(pattern) = boss.update(dt, &mut events) {
                    let projectiles = plan_boss_projectiles(&PlanInput {
                        pattern,
                        phase: boss.state().phase,
                        boss: boss_position,
                        player,
                        bounds,
                    });
                    for projectile in projectiles {
                        if projectile.velocity.y <= 0.0 {
                            continue;
                        }
                        let x_at = |y: f32| {
                            projectile.position.x
                                + projectile.velocity.x * (y - projectile.position.y) / projectile.velocity.y
                        };
                        if self.enemy_shot(x_at, &mut shields, player, bounds, &collision, 0.5) {
                            lives = lives.saturating_sub(projectile.damage);
                        }
                    }
                }
            } else {
                let spec = waves.wave_spec();
                for _ in 0..hits.min(alive) {
                    let row = self.rng.gen_range(0..spec.rows.max(1));
                    let enemy = if row < spec.elite_rows {
                        EnemyType::Elite
                    } else if row < spec.elite_rows + spec.armored_rows {
                        EnemyType::Armored
                    } else {
                        EnemyType::Basic
                    };
                    self.award(compute_enemy_defeat_score(enemy, wave));
                }
                alive = alive.saturating_sub(hits);

                let intended = FORMATION_DROP_PER_FRAME * spec.speed_scale * (dt as f32 / 1_000.0);
                formation_y += compute_enemy_drop_delta(formation_y, intended, floor_y);
                if formation_y >= floor_y {
                    debug!(wave, "formation reached the floor");
                    lives = lives.saturating_sub(1);
                    formation_y = FORMATION_START_Y;
                }

                fire_timer_ms -= dt;
                if fire_timer_ms <= 0.0 && alive > 0 {
                    let plan = fire.compute_fire_plan(FireInput {
                        elapsed_ms: wave_elapsed_ms,
                        wave,
                        alive_enemies: alive,
                    });
                    fire_timer_ms = plan.cooldown_ms;
                    let shots = match plan.pattern {
                        FirePattern::Single => 1,
                        FirePattern::Dual => 2,
                        FirePattern::Burst => 3,
                    };
                    for _ in 0..shots {
                        let x = self.rng.gen_range(0.0..bounds.width);
                        if self.enemy_shot(|_| x, &mut shields, player, bounds, &collision, 0.6) {
                            lives = lives.saturating_sub(1);
                        }
                    }
                }

                specials.update(
                    SpecialsInput {
                        now_ms,
                        dt_ms: dt,
                        wave,
                        boss_active: false,
                        bounds,
                    },
                    &mut events,
                );
                let diving: Vec<u32> = specials
                    .entities()
                    .iter()
                    .filter(|entity| entity.motion == SpecialMotion::Diving)
                    .map(|entity| entity.id)
                    .collect();
                for id in diving {
                    if self.rng.gen_bool(0.08) && specials.consume(id) {
                        self.award(compute_enemy_defeat_score(EnemyType::Elite, wave));
                    }
                }

                if alive == 0 {
                    waves_cleared += 1;
                    let boss_next = waves_cleared >= WAVES_BEFORE_BOSS;
                    self.award(wave_clear_points(wave, boss_next));
                    waves.advance_on_wave_clear(&mut events);
                    wave_elapsed_ms = 0.0;
                    fire_timer_ms = 0.0;
                    formation_y = FORMATION_START_Y;
                    if boss_next {
                        specials.reset();
                        boss.enter(&mut events);
                    } else {
                        alive = waves.wave_spec().enemy_count();
                    }
                }
            }

            for event in events.drain(..) {
                match event {
                    Event::BossPhaseChanged { to, .. } => {
                        self.award(compute_boss_phase_break_bonus(to));
                    }
                    Event::BossDefeated => {
                        self.award(BOSS_DEFEAT_BONUS);
                        self.boss_defeated = true;
                        self.apply(Command::CompleteObjective);
                    }
                    _ => {}
                }
                self.event_count += 1;
            }

            self.frame();
        }

        if lives == 0 {
            self.apply(Command::EndStage);
        }
        let detail = format!(
            "{} waves cleared, boss {}, {} lives left",
            waves_cleared,
            if boss.state().defeated { "defeated" } else { "standing" },
            lives
        );
        self.bank(detail);
    }

    /// Resolves one enemy projectile against the shields and then the player.
    /// Returns whether the player was hit.
    fn enemy_shot(
        &mut self,
        x_at: impl Fn(f32) -> f32,
        shields: &mut [Shield; SHIELD_COUNT],
        player: Vec2,
        bounds: PlayfieldBounds,
        collision: &CollisionConfig,
        dodge_chance: f64,
    ) -> bool {
        let shield_y = bounds.height - collision.shield_offset_from_bottom;
        let at_shield = Vec2::new(x_at(shield_y), shield_y);
        if let CollisionOutcome::Shield { index, remaining } =
            resolve_enemy_bullet(at_shield, shields, player, bounds, collision)
        {
            debug!(index, remaining, "shield absorbed a shot");
            return false;
        }
        if self.rng.gen_bool(dodge_chance) {
            return false;
        }
        let at_player = Vec2::new(x_at(player.y), player.y);
        resolve_enemy_bullet(at_player, shields, player, bounds, collision) == CollisionOutcome::Player
    }
}

/// Clear bonus for `cleared_wave`, plus the boss entry bonus for the same wave
/// when the boss follows it.
fn wave_clear_points(cleared_wave: u32, boss_next: bool) -> u32 {
    let entry = if boss_next {
        compute_boss_entry_bonus(cleared_wave)
    } else {
        0
    };
    compute_wave_clear_bonus(cleared_wave) + entry
}

fn next_active_zone(tracker: &ZoneTracker, from: u32) -> Option<u32> {
    let zones = tracker.zones();
    let count = u32::try_from(zones.len()).ok()?;
    (0..count)
        .map(|offset| (from + offset) % count)
        .find(|&zone| {
            zones
                .get(zone as usize)
                .is_some_and(|snapshot| snapshot.status == ZoneStatus::Active)
        })
}
