//! Wave lifecycle and the per-tick combat simulation.
//!
//! The simulation runs as one synchronous pipeline per tick in a fixed order:
//! spawning, enemy descent, ground units, turrets, barracks, drone factories,
//! projectile motion, collision resolution, purge, and finally the wave state
//! machine. All randomness flows through the world's seeded generator, so two
//! worlds fed identical commands stay bit-identical.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skyshield_core::{
    column_at_x, column_center_x, level_scale, BuildingId, BuildingKind, CellCoord, DroneId,
    EnemyId, Event, ProjectileSource, TargetRef, Team, UnitId, WorldPoint, GROUND_Y,
    SHIELD_BAND_HEIGHT, SHIELD_Y,
};
use skyshield_system_ballistics::{
    circle_hits_aabb, circles_overlap, homing_velocity, vertical_sweep_hit, Aabb,
};
use skyshield_system_waves::{base_reward, WavePlan, CLEAR_GRACE, SPAWN_INTERVAL};

use crate::economy::Economy;
use crate::grid::{Casualty, CityGrid};
use skyshield_core::{DestructionCause, WaveRewards};

/// Collision radius of every ground unit.
const GROUND_UNIT_RADIUS: f32 = 10.0;

const INVADER_BASE_HP: f32 = 60.0;
const INVADER_HP_PER_WAVE: f32 = 5.0;
const INVADER_SPEED: f32 = 70.0;
const INVADER_SPAWN_JITTER: f32 = 12.0;

const DEFENDER_BASE_HP: f32 = 60.0;
const DEFENDER_SPEED: f32 = 60.0;
const DEFENDER_ATTACK_COOLDOWN: f32 = 1.0;
const DEFENDER_COST: u32 = 1;

const DRONE_HP: f32 = 40.0;
const DRONE_SPEED: f32 = 180.0;
const DRONE_HOVER_OFFSET: f32 = 60.0;
const DRONE_PRODUCTION_INTERVAL: f32 = 5.0;

const PROJECTILE_RADIUS: f32 = 5.0;
const ENEMY_SPAWN_Y: f32 = -40.0;

/// Credits granted for shooting down one enemy.
const KILL_REWARD: u32 = 10;

/// Seconds of barracks production per level-1 defender.
const BARRACKS_PRODUCTION_BASE: f32 = 10.0;

/// Descending aerial attacker. Detonates on contact, never shoots.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) hp: f32,
    pub(crate) damage: f32,
    pub(crate) radius: f32,
    pub(crate) descent_speed: f32,
    pub(crate) blast_radius: f32,
    pub(crate) boss: bool,
    pub(crate) alive: bool,
}

/// Walker pinned to the ground line. Movement is one-dimensional.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct GroundUnit {
    pub(crate) id: UnitId,
    pub(crate) team: Team,
    pub(crate) x: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) damage: f32,
    pub(crate) speed: f32,
    pub(crate) attack_timer: f32,
    pub(crate) target: Option<TargetRef>,
    pub(crate) alive: bool,
}

/// Autonomous flyer tethered to a hover point above its factory.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct Drone {
    pub(crate) id: DroneId,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) hp: f32,
    pub(crate) damage: f32,
    pub(crate) range: f32,
    pub(crate) speed: f32,
    pub(crate) ammo_range: f32,
    pub(crate) projectile_speed: f32,
    pub(crate) fire_interval: f32,
    pub(crate) home_x: f32,
    pub(crate) home_y: f32,
    pub(crate) cooldown: f32,
    pub(crate) target: Option<EnemyId>,
    pub(crate) alive: bool,
}

/// In-flight shot with a travel budget.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct Projectile {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) damage: f32,
    pub(crate) radius: f32,
    pub(crate) source: ProjectileSource,
    pub(crate) target: Option<TargetRef>,
    pub(crate) max_range: f32,
    pub(crate) traveled: f32,
    pub(crate) alive: bool,
}

/// Wave lifecycle states. Clearing re-arms back to Active when a straggler
/// invader is still walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum WaveState {
    Idle,
    Spawning,
    Active,
    Clearing,
}

/// Bookkeeping for the wave currently in flight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct ActiveWave {
    pub(crate) number: u32,
    pub(crate) remaining: u32,
}

/// Borrowed slice of the world the combat pipeline is allowed to mutate.
pub(crate) struct Ctx<'a> {
    pub(crate) grid: &'a mut CityGrid,
    pub(crate) economy: &'a mut Economy,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) events: &'a mut Vec<Event>,
    pub(crate) credits: &'a mut u32,
    pub(crate) log: &'a mut Vec<String>,
}

/// All transient combat entities plus the wave state machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CombatState {
    pub(crate) wave: Option<ActiveWave>,
    pub(crate) state: WaveState,
    pub(crate) spawn_timer: f32,
    pub(crate) clear_timer: f32,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) units: Vec<GroundUnit>,
    pub(crate) drones: Vec<Drone>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) next_enemy_id: u32,
    pub(crate) next_unit_id: u32,
    pub(crate) next_drone_id: u32,
    pub(crate) damage_taken: bool,
}

impl CombatState {
    pub(crate) fn new() -> Self {
        Self {
            wave: None,
            state: WaveState::Idle,
            spawn_timer: 0.0,
            clear_timer: 0.0,
            enemies: Vec::new(),
            units: Vec::new(),
            drones: Vec::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            next_unit_id: 0,
            next_drone_id: 0,
            damage_taken: false,
        }
    }

    pub(crate) fn wave_in_progress(&self) -> bool {
        self.state != WaveState::Idle
    }

    /// Arms the state machine for the provided wave, wiping every entity
    /// collection left over from the previous wave.
    pub(crate) fn start_wave(&mut self, wave_number: u32) {
        self.enemies.clear();
        self.units.clear();
        self.drones.clear();
        self.projectiles.clear();
        self.next_enemy_id = 0;
        self.next_unit_id = 0;
        self.next_drone_id = 0;
        self.damage_taken = false;
        self.spawn_timer = 0.0;
        self.clear_timer = 0.0;
        self.wave = Some(ActiveWave {
            number: wave_number,
            remaining: WavePlan::for_wave(wave_number).spawn_count(),
        });
        self.state = WaveState::Spawning;
    }

    /// Runs one tick of the combat pipeline. Returns the reward breakdown
    /// when this tick completed the wave.
    pub(crate) fn advance(&mut self, ctx: &mut Ctx<'_>, dt: f32) -> Option<(u32, WaveRewards)> {
        if self.state == WaveState::Idle {
            return None;
        }

        self.run_spawning(ctx, dt);
        self.move_enemies(ctx, dt);
        self.update_ground_units(ctx, dt);
        self.fire_turrets(ctx, dt);
        self.run_barracks(ctx, dt);
        self.run_drone_factories(ctx, dt);
        self.move_projectiles(dt);
        self.resolve_projectile_hits(ctx);
        self.resolve_enemy_building_contact(ctx);
        self.purge_dead();
        self.step_state_machine(ctx, dt)
    }

    fn run_spawning(&mut self, ctx: &mut Ctx<'_>, dt: f32) {
        if self.state != WaveState::Spawning {
            return;
        }
        let Some(wave) = self.wave else {
            return;
        };
        let plan = WavePlan::for_wave(wave.number);

        self.spawn_timer -= dt;
        while self.spawn_timer <= 0.0 {
            let Some(active) = self.wave.as_mut() else {
                break;
            };
            if active.remaining == 0 {
                break;
            }
            let slot = plan.spawn_count() - active.remaining;
            active.remaining -= 1;
            let archetype = plan.archetype(slot);

            let window = ctx.grid.window();
            let column = ctx.rng.gen_range(window.start..window.end);
            let jitter = ctx.rng.gen_range(-20.0..20.0);
            let id = EnemyId::new(self.next_enemy_id);
            self.next_enemy_id += 1;
            self.enemies.push(Enemy {
                id,
                x: column_center_x(column) + jitter,
                y: ENEMY_SPAWN_Y,
                hp: archetype.hp,
                damage: archetype.damage,
                radius: archetype.radius,
                descent_speed: archetype.descent_speed,
                blast_radius: archetype.blast_radius,
                boss: archetype.boss,
                alive: true,
            });
            ctx.events.push(Event::EnemySpawned {
                enemy: id,
                boss: archetype.boss,
            });
            if archetype.boss {
                ctx.log.push(format!("Wave {} boss inbound", wave.number));
            }

            self.spawn_timer += SPAWN_INTERVAL.as_secs_f32();
        }
    }

    fn move_enemies(&mut self, ctx: &mut Ctx<'_>, dt: f32) {
        let mut detonations: Vec<(f32, f32, f32, f32)> = Vec::new();
        let mut invader_spawns: Vec<f32> = Vec::new();

        for enemy in &mut self.enemies {
            if !enemy.alive {
                continue;
            }
            let y_start = enemy.y;
            let y_end = enemy.y + enemy.descent_speed * dt;

            // Shield interception happens strictly above the city, so it is
            // checked before any building sweep.
            if ctx.economy.shield.active
                && y_start < SHIELD_Y + SHIELD_BAND_HEIGHT
                && y_end >= SHIELD_Y
            {
                enemy.alive = false;
                let dropped = ctx.economy.shield.absorb(enemy.damage);
                ctx.events.push(Event::ShieldHit {
                    enemy: enemy.id,
                    remaining: ctx.economy.shield.current,
                });
                if dropped {
                    ctx.events.push(Event::ShieldDown);
                    ctx.log.push(String::from("Shield down"));
                }
                continue;
            }

            // Raycast the travel segment against every building so fast
            // movers cannot tunnel through a rooftop in one step.
            let mut impact: Option<f32> = None;
            for building in ctx.grid.iter().filter(|building| building.is_alive()) {
                let aabb = Aabb::from_cell_rect(&building.region());
                if let Some(hit_y) =
                    vertical_sweep_hit(&aabb, enemy.x, enemy.radius, y_start, y_end)
                {
                    impact = Some(match impact {
                        Some(current) => current.min(hit_y),
                        None => hit_y,
                    });
                }
            }

            if let Some(hit_y) = impact {
                enemy.alive = false;
                detonations.push((enemy.x, hit_y, enemy.damage, enemy.blast_radius));
                continue;
            }

            if y_end >= GROUND_Y - enemy.radius {
                enemy.alive = false;
                detonations.push((enemy.x, GROUND_Y, enemy.damage, enemy.blast_radius));
                let column_occupied = column_at_x(enemy.x)
                    .and_then(|column| ctx.grid.building_at(CellCoord::new(column, 0)))
                    .is_some();
                if !column_occupied {
                    invader_spawns.push(enemy.x);
                }
                continue;
            }

            enemy.y = y_end;
        }

        for (x, y, damage, blast_radius) in detonations {
            if detonate(ctx, x, y, damage, blast_radius) {
                self.damage_taken = true;
            }
        }

        let wave_number = self.wave.map_or(0, |wave| wave.number);
        for x in invader_spawns {
            for _ in 0..2 {
                let jitter = ctx.rng.gen_range(-INVADER_SPAWN_JITTER..INVADER_SPAWN_JITTER);
                let hp = INVADER_BASE_HP + wave_number as f32 * INVADER_HP_PER_WAVE;
                let id = UnitId::new(self.next_unit_id);
                self.next_unit_id += 1;
                self.units.push(GroundUnit {
                    id,
                    team: Team::Invader,
                    x: x + jitter,
                    hp,
                    max_hp: hp,
                    damage: hp,
                    speed: INVADER_SPEED,
                    attack_timer: 0.0,
                    target: None,
                    alive: true,
                });
            }
            ctx.log.push(String::from("Invaders touched down"));
        }
    }

    fn update_ground_units(&mut self, ctx: &mut Ctx<'_>, dt: f32) {
        // Invaders first: pick targets, walk, and resolve kamikaze contact.
        let defender_positions: Vec<(usize, f32, UnitId)> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.alive && unit.team == Team::Defender)
            .map(|(index, unit)| (index, unit.x, unit.id))
            .collect();

        let mut defender_hits: Vec<(usize, f32)> = Vec::new();
        let mut building_hits: Vec<(BuildingId, f32)> = Vec::new();

        for index in 0..self.units.len() {
            let unit = self.units[index];
            if !unit.alive || unit.team != Team::Invader {
                continue;
            }

            // Nearest of every building (by centre x) and every defender.
            let building_target = ctx
                .grid
                .iter()
                .filter(|building| building.is_alive())
                .map(|building| (building.id, building.region().world_center().x()))
                .min_by(|a, b| distance_order(unit.x, a.1, b.1));
            let defender_target = defender_positions
                .iter()
                .min_by(|a, b| distance_order(unit.x, a.1, b.1))
                .copied();

            let choice = match (building_target, defender_target) {
                (Some((id, bx)), Some((_, dx, d_id))) => {
                    if (bx - unit.x).abs() <= (dx - unit.x).abs() {
                        Some((TargetRef::Building(id), bx))
                    } else {
                        Some((TargetRef::Unit(d_id), dx))
                    }
                }
                (Some((id, bx)), None) => Some((TargetRef::Building(id), bx)),
                (None, Some((_, dx, d_id))) => Some((TargetRef::Unit(d_id), dx)),
                (None, None) => None,
            };

            let Some((target, tx)) = choice else {
                // Nothing left to siege; the unit stands down.
                self.units[index].target = None;
                self.units[index].alive = false;
                continue;
            };
            self.units[index].target = Some(target);

            let step = unit.speed * dt;
            let next_x = if tx > unit.x {
                unit.x + step.min(tx - unit.x)
            } else if tx < unit.x {
                unit.x - step.min(unit.x - tx)
            } else {
                unit.x
            };

            // Contact against ground-row buildings is checked at both the
            // current and the stepped position, so one step can never carry
            // an invader through a footprint.
            let contact = ground_row_contact(ctx.grid, unit.x)
                .or_else(|| ground_row_contact(ctx.grid, next_x));
            if let Some(building) = contact {
                building_hits.push((building, unit.hp));
                self.units[index].alive = false;
                continue;
            }

            if let Some((d_index, dx, _)) = defender_target {
                if (dx - next_x).abs() <= GROUND_UNIT_RADIUS * 2.0 {
                    defender_hits.push((d_index, unit.hp));
                    self.units[index].alive = false;
                    continue;
                }
            }

            self.units[index].x = next_x;
        }

        for (building, damage) in building_hits {
            if apply_building_damage(ctx, building, damage) {
                self.damage_taken = true;
            }
        }
        for (index, damage) in defender_hits {
            self.units[index].hp -= damage;
            if self.units[index].hp <= 0.0 {
                self.units[index].alive = false;
            }
        }

        // Defenders: chase the nearest invader and swing on a fixed cooldown.
        let invader_positions: Vec<(usize, f32, UnitId)> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.alive && unit.team == Team::Invader)
            .map(|(index, unit)| (index, unit.x, unit.id))
            .collect();

        let mut invader_hits: Vec<(usize, f32)> = Vec::new();
        for index in 0..self.units.len() {
            let unit = self.units[index];
            if !unit.alive || unit.team != Team::Defender {
                continue;
            }
            self.units[index].attack_timer = (unit.attack_timer - dt).max(0.0);

            let Some((t_index, tx, t_id)) = invader_positions
                .iter()
                .min_by(|a, b| distance_order(unit.x, a.1, b.1))
                .copied()
            else {
                self.units[index].target = None;
                continue;
            };
            self.units[index].target = Some(TargetRef::Unit(t_id));

            if (tx - unit.x).abs() <= GROUND_UNIT_RADIUS * 2.0 {
                if self.units[index].attack_timer <= 0.0 {
                    invader_hits.push((t_index, unit.damage));
                    self.units[index].attack_timer = DEFENDER_ATTACK_COOLDOWN;
                }
            } else {
                let step = unit.speed * dt;
                let next_x = if tx > unit.x {
                    unit.x + step.min(tx - unit.x)
                } else {
                    unit.x - step.min(unit.x - tx)
                };
                self.units[index].x = next_x;
            }
        }

        for (index, damage) in invader_hits {
            self.units[index].hp -= damage;
            if self.units[index].hp <= 0.0 {
                self.units[index].alive = false;
            }
        }
    }

    fn fire_turrets(&mut self, ctx: &mut Ctx<'_>, dt: f32) {
        let mut shots: Vec<Projectile> = Vec::new();
        for building in ctx.grid.iter_mut() {
            if !building.is_alive() || building.template.kind != BuildingKind::Turret {
                continue;
            }
            building.cooldown = (building.cooldown - dt).max(0.0);
            if building.cooldown > 0.0 {
                continue;
            }

            let muzzle = building.region().world_center();
            let Some(target) = nearest_enemy(&self.enemies, muzzle, building.template.range)
            else {
                continue;
            };
            let Some(velocity) = homing_velocity(
                muzzle,
                WorldPoint::new(target.1, target.2),
                building.template.projectile_speed,
            ) else {
                continue;
            };

            shots.push(Projectile {
                x: muzzle.x(),
                y: muzzle.y(),
                vx: velocity.x(),
                vy: velocity.y(),
                damage: building.template.damage,
                radius: PROJECTILE_RADIUS,
                source: ProjectileSource::Turret,
                target: Some(TargetRef::Enemy(target.0)),
                max_range: building.template.ammo_range,
                traveled: 0.0,
                alive: true,
            });
            building.cooldown = building.template.cooldown;
        }
        self.projectiles.extend(shots);
    }

    fn run_barracks(&mut self, ctx: &mut Ctx<'_>, dt: f32) {
        // Global pool: the cap is recomputed from the live barracks every
        // tick, so destroying a producer mid-wave shrinks it immediately.
        let pool_cap: u32 = ctx
            .grid
            .iter()
            .filter(|building| {
                building.is_alive() && building.template.kind == BuildingKind::Barracks
            })
            .map(|building| building.template.capacity)
            .sum();
        let mut active: u32 = self
            .units
            .iter()
            .filter(|unit| unit.alive && unit.team == Team::Defender)
            .count() as u32;

        let mut spawns: Vec<(f32, u8)> = Vec::new();
        for building in ctx.grid.iter_mut() {
            if !building.is_alive() || building.template.kind != BuildingKind::Barracks {
                continue;
            }
            if active >= pool_cap || ctx.economy.surplus() < 0 || *ctx.credits < DEFENDER_COST {
                continue;
            }
            building.spawn_timer += dt;
            let interval = BARRACKS_PRODUCTION_BASE / f32::from(building.template.level);
            if building.spawn_timer < interval {
                continue;
            }
            building.spawn_timer -= interval;
            *ctx.credits -= DEFENDER_COST;
            active += 1;
            spawns.push((
                building.region().world_center().x(),
                building.template.level,
            ));
        }

        for (x, level) in spawns {
            let scale = level_scale(level);
            let id = UnitId::new(self.next_unit_id);
            self.next_unit_id += 1;
            self.units.push(GroundUnit {
                id,
                team: Team::Defender,
                x,
                hp: DEFENDER_BASE_HP * scale,
                max_hp: DEFENDER_BASE_HP * scale,
                damage: 15.0 * scale,
                speed: DEFENDER_SPEED,
                attack_timer: 0.0,
                target: None,
                alive: true,
            });
        }
    }

    fn run_drone_factories(&mut self, ctx: &mut Ctx<'_>, dt: f32) {
        let pool_cap: u32 = ctx
            .grid
            .iter()
            .filter(|building| {
                building.is_alive() && building.template.kind == BuildingKind::DroneFactory
            })
            .map(|building| building.template.capacity)
            .sum();
        let mut active: u32 = self.drones.iter().filter(|drone| drone.alive).count() as u32;

        let mut spawns: Vec<Drone> = Vec::new();
        for building in ctx.grid.iter_mut() {
            if !building.is_alive() || building.template.kind != BuildingKind::DroneFactory {
                continue;
            }
            if active >= pool_cap {
                continue;
            }
            building.spawn_timer += dt;
            if building.spawn_timer < DRONE_PRODUCTION_INTERVAL {
                continue;
            }
            building.spawn_timer -= DRONE_PRODUCTION_INTERVAL;
            active += 1;

            let center = building.region().world_center();
            let id = DroneId::new(self.next_drone_id);
            self.next_drone_id += 1;
            spawns.push(Drone {
                id,
                x: center.x(),
                y: center.y(),
                hp: DRONE_HP,
                damage: building.template.damage,
                range: building.template.range,
                speed: DRONE_SPEED,
                ammo_range: building.template.ammo_range,
                projectile_speed: building.template.projectile_speed,
                fire_interval: building.template.cooldown,
                home_x: center.x(),
                home_y: building.region().world_min().y() - DRONE_HOVER_OFFSET,
                cooldown: 0.0,
                target: None,
                alive: true,
            });
        }
        self.drones.extend(spawns);

        // Drone AI: seek to 80% of weapon range, back off below 50%, fire
        // whenever in range and off cooldown, otherwise drift home.
        let mut shots: Vec<Projectile> = Vec::new();
        for drone in &mut self.drones {
            if !drone.alive {
                continue;
            }
            drone.cooldown = (drone.cooldown - dt).max(0.0);
            let position = WorldPoint::new(drone.x, drone.y);

            let target = nearest_enemy(&self.enemies, position, f32::INFINITY);
            drone.target = target.map(|(id, _, _)| id);

            let Some((target_id, tx, ty)) = target else {
                steer(drone, drone.home_x, drone.home_y, dt);
                continue;
            };
            let target_point = WorldPoint::new(tx, ty);
            let distance = position.distance(target_point);

            if distance > drone.range * 0.8 {
                steer(drone, tx, ty, dt);
            } else if distance < drone.range * 0.5 {
                let away_x = drone.x + (drone.x - tx);
                let away_y = drone.y + (drone.y - ty);
                steer(drone, away_x, away_y, dt);
            }

            if distance <= drone.range && drone.cooldown <= 0.0 {
                if let Some(velocity) =
                    homing_velocity(position, target_point, drone.projectile_speed)
                {
                    shots.push(Projectile {
                        x: drone.x,
                        y: drone.y,
                        vx: velocity.x(),
                        vy: velocity.y(),
                        damage: drone.damage,
                        radius: PROJECTILE_RADIUS,
                        source: ProjectileSource::Drone,
                        target: Some(TargetRef::Enemy(target_id)),
                        max_range: drone.ammo_range,
                        traveled: 0.0,
                        alive: true,
                    });
                    drone.cooldown = drone.fire_interval;
                }
            }
        }
        self.projectiles.extend(shots);
    }

    fn move_projectiles(&mut self, dt: f32) {
        for projectile in &mut self.projectiles {
            if !projectile.alive {
                continue;
            }
            let step_x = projectile.vx * dt;
            let step_y = projectile.vy * dt;
            projectile.x += step_x;
            projectile.y += step_y;
            projectile.traveled += (step_x * step_x + step_y * step_y).sqrt();

            let position = WorldPoint::new(projectile.x, projectile.y);
            if projectile.traveled > projectile.max_range || !position.in_playfield() {
                projectile.alive = false;
            }
        }
    }

    fn resolve_projectile_hits(&mut self, ctx: &mut Ctx<'_>) {
        for projectile in &mut self.projectiles {
            if !projectile.alive {
                continue;
            }
            if !matches!(
                projectile.source,
                ProjectileSource::Turret | ProjectileSource::Drone
            ) {
                continue;
            }
            let position = WorldPoint::new(projectile.x, projectile.y);
            let hit = self.enemies.iter_mut().find(|enemy| {
                enemy.alive
                    && circles_overlap(
                        position,
                        projectile.radius,
                        WorldPoint::new(enemy.x, enemy.y),
                        enemy.radius,
                    )
            });
            let Some(enemy) = hit else {
                continue;
            };

            projectile.alive = false;
            enemy.hp -= projectile.damage;
            if enemy.hp <= 0.0 {
                enemy.alive = false;
                *ctx.credits += KILL_REWARD;
                ctx.events.push(Event::EnemyDestroyed {
                    enemy: enemy.id,
                    reward: KILL_REWARD,
                });
            }
        }
    }

    fn resolve_enemy_building_contact(&mut self, ctx: &mut Ctx<'_>) {
        let mut detonations: Vec<(f32, f32, f32, f32)> = Vec::new();
        for enemy in &mut self.enemies {
            if !enemy.alive {
                continue;
            }
            let position = WorldPoint::new(enemy.x, enemy.y);
            let touching = ctx.grid.iter().any(|building| {
                building.is_alive()
                    && circle_hits_aabb(
                        &Aabb::from_cell_rect(&building.region()),
                        position,
                        enemy.radius,
                    )
            });
            if touching {
                enemy.alive = false;
                detonations.push((enemy.x, enemy.y, enemy.damage, enemy.blast_radius));
            }
        }
        for (x, y, damage, blast_radius) in detonations {
            if detonate(ctx, x, y, damage, blast_radius) {
                self.damage_taken = true;
            }
        }
    }

    fn purge_dead(&mut self) {
        self.enemies.retain(|enemy| enemy.alive);
        self.units.retain(|unit| unit.alive);
        self.drones.retain(|drone| drone.alive);
        self.projectiles.retain(|projectile| projectile.alive);
    }

    fn step_state_machine(&mut self, ctx: &mut Ctx<'_>, dt: f32) -> Option<(u32, WaveRewards)> {
        let live_threat = self.enemies.iter().any(|enemy| enemy.alive)
            || self
                .units
                .iter()
                .any(|unit| unit.alive && unit.team == Team::Invader);

        match self.state {
            WaveState::Idle => None,
            WaveState::Spawning => {
                if self.wave.is_some_and(|wave| wave.remaining == 0) {
                    self.state = WaveState::Active;
                }
                None
            }
            WaveState::Active => {
                if !live_threat {
                    self.state = WaveState::Clearing;
                    self.clear_timer = CLEAR_GRACE.as_secs_f32();
                }
                None
            }
            WaveState::Clearing => {
                if live_threat {
                    self.state = WaveState::Active;
                    return None;
                }
                self.clear_timer -= dt;
                if self.clear_timer > 0.0 {
                    return None;
                }

                let wave = self.wave.take()?;
                self.state = WaveState::Idle;
                let base = base_reward(wave.number);
                let perfect_bonus = if self.damage_taken { 0 } else { base / 2 };
                let surplus = ctx.economy.surplus();
                let energy_bonus = u32::try_from(surplus.max(0)).unwrap_or(u32::MAX);
                Some((wave.number, WaveRewards::new(base, perfect_bonus, energy_bonus)))
            }
        }
    }
}

/// Applies blast damage to every building within range of the impact point.
/// Returns true when at least one building was damaged.
fn detonate(ctx: &mut Ctx<'_>, x: f32, y: f32, damage: f32, blast_radius: f32) -> bool {
    let impact = WorldPoint::new(x, y);
    let hit: Vec<BuildingId> = ctx
        .grid
        .iter()
        .filter(|building| {
            building.is_alive()
                && circle_hits_aabb(&Aabb::from_cell_rect(&building.region()), impact, blast_radius)
        })
        .map(|building| building.id)
        .collect();

    let mut any = false;
    for id in hit {
        if apply_building_damage(ctx, id, damage) {
            any = true;
        }
    }
    any
}

/// Deals damage to one building, destroying it (cascade included) when its
/// hit points run out. Returns true when the building actually took damage.
fn apply_building_damage(ctx: &mut Ctx<'_>, id: BuildingId, damage: f32) -> bool {
    let hp_left = match ctx.grid.get_mut(id) {
        Some(building) if building.is_alive() => {
            building.hp -= damage;
            building.hp
        }
        _ => return false,
    };
    if hp_left <= 0.0 {
        let casualties = ctx.grid.destroy(id, DestructionCause::Destroyed);
        report_casualties(ctx, casualties);
    }
    true
}

/// Emits destruction events and rebalances the economy after a cascade.
fn report_casualties(ctx: &mut Ctx<'_>, casualties: Vec<Casualty>) {
    if casualties.is_empty() {
        return;
    }
    for casualty in &casualties {
        ctx.events.push(Event::BuildingDestroyed {
            building: casualty.building.id,
            kind: casualty.building.template.kind,
            cause: casualty.cause,
            refund: 0,
        });
        ctx.log.push(format!(
            "{} lost ({})",
            casualty.building.template.kind.name(),
            casualty.cause_name()
        ));
    }
    ctx.economy.recompute(ctx.grid);
}

impl Casualty {
    fn cause_name(&self) -> &'static str {
        match self.cause {
            DestructionCause::Destroyed => "destroyed",
            DestructionCause::Collapse => "collapsed",
            DestructionCause::Debris => "crushed by debris",
            DestructionCause::Demolished => "demolished",
        }
    }
}

/// Nearest alive enemy within range of the provided point, with its position.
fn nearest_enemy(enemies: &[Enemy], from: WorldPoint, range: f32) -> Option<(EnemyId, f32, f32)> {
    enemies
        .iter()
        .filter(|enemy| enemy.alive)
        .map(|enemy| {
            let distance = from.distance(WorldPoint::new(enemy.x, enemy.y));
            (enemy, distance)
        })
        .filter(|(_, distance)| *distance <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(enemy, _)| (enemy.id, enemy.x, enemy.y))
}

/// Moves a drone toward the provided point at its speed, stopping on arrival.
fn steer(drone: &mut Drone, tx: f32, ty: f32, dt: f32) {
    let from = WorldPoint::new(drone.x, drone.y);
    let to = WorldPoint::new(tx, ty);
    let Some(velocity) = homing_velocity(from, to, drone.speed) else {
        return;
    };
    let step = drone.speed * dt;
    if from.distance(to) <= step {
        drone.x = tx;
        drone.y = ty;
    } else {
        drone.x += velocity.x() * dt;
        drone.y += velocity.y() * dt;
    }
}

/// Ground-row building whose footprint (widened by the unit radius) contains
/// the provided x position.
fn ground_row_contact(grid: &CityGrid, x: f32) -> Option<BuildingId> {
    grid.iter()
        .filter(|building| building.is_alive() && building.row == 0)
        .find(|building| {
            let aabb = Aabb::from_cell_rect(&building.region());
            x >= aabb.min().x() - GROUND_UNIT_RADIUS && x <= aabb.max().x() + GROUND_UNIT_RADIUS
        })
        .map(|building| building.id)
}

/// Orders two candidate x positions by distance from a reference point.
fn distance_order(from: f32, a: f32, b: f32) -> std::cmp::Ordering {
    (a - from).abs().total_cmp(&(b - from).abs())
}
