//! Viral infection and conversion
//!
//! Healthy -> Infected(cumulative damage) -> Converted. Conversion is
//! terminal: the victim keeps its handle but joins the viral faction.

use crate::core::config::InfectionConfig;
use crate::core::types::{ControlMode, EntityId, Faction, Vec2};
use crate::ecs::world::World;
use crate::entity::cell::InfectionState;
use crate::simulation::growth;
use crate::simulation::tick::SimulationEvent;
use ahash::AHashSet;
use ordered_float::OrderedFloat;

/// A viral agent touching a victim this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfectionContact {
    pub agent: EntityId,
    pub victim: EntityId,
}

/// Whether an agent's infection cooldown has elapsed at `now`
pub fn infection_ready(last: Option<f32>, now: f32, cooldown: f32) -> bool {
    last.map_or(true, |t| now - t >= cooldown)
}

/// Whether an agent may reproduce at `now`
pub fn reproduction_ready(last: Option<f32>, now: f32, cooldown: f32) -> bool {
    last.map_or(true, |t| now - t > cooldown)
}

/// Agent/victim pairs that were touching at the end of the last detection
///
/// Infection only fires when a pair starts touching, so staying in contact
/// never deals repeated damage.
#[derive(Debug, Clone, Default)]
pub struct ContactMemory {
    touching: AHashSet<(EntityId, EntityId)>,
}

impl ContactMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_touching(&self, agent: EntityId, victim: EntityId) -> bool {
        self.touching.contains(&(agent, victim))
    }

    pub fn is_empty(&self) -> bool {
        self.touching.is_empty()
    }
}

/// Find at most one newly touching victim per ready viral agent
///
/// Contact means the victim's visual circle comes within the agent's
/// infection radius. Pairs already touching on the previous detection are
/// skipped, and among new pairs the closest victim wins. Agents are visited
/// in registry order. `memory` is replaced with every pair touching now,
/// whether or not the agent was ready.
pub fn detect_infections(
    world: &World,
    rules: &InfectionConfig,
    now: f32,
    memory: &mut ContactMemory,
) -> Vec<InfectionContact> {
    let largest_victim = world
        .cells()
        .filter(|(_, c)| !c.is_viral())
        .map(|(_, c)| c.visual_radius())
        .fold(0.0_f32, f32::max);

    let mut touching = AHashSet::new();
    let mut contacts = Vec::new();

    for (agent_id, agent) in world.cells().filter(|(_, c)| c.is_viral()) {
        let ready = infection_ready(agent.last_infection_time, now, rules.cooldown);
        let mut closest: Option<(EntityId, OrderedFloat<f32>)> = None;

        for victim_id in world.cells_within(agent.position, rules.infection_radius + largest_victim) {
            if world.cell(victim_id).map_or(true, |v| v.is_viral()) {
                continue;
            }
            if world.overlaps(agent_id, rules.infection_radius, victim_id) != Some(true) {
                continue;
            }
            let Some(d) = world.distance(agent_id, victim_id) else {
                continue;
            };
            touching.insert((agent_id, victim_id));
            if ready
                && !memory.is_touching(agent_id, victim_id)
                && closest.map_or(true, |(_, best)| OrderedFloat(d) < best)
            {
                closest = Some((victim_id, OrderedFloat(d)));
            }
        }

        if let Some((victim, _)) = closest {
            contacts.push(InfectionContact { agent: agent_id, victim });
        }
    }

    memory.touching = touching;
    contacts
}

/// Apply infection contacts in order
///
/// Returns the handles converted this tick so selection sets can drop them.
pub fn resolve_infections(
    world: &mut World,
    contacts: &[InfectionContact],
    rules: &InfectionConfig,
    now: f32,
    events: &mut Vec<SimulationEvent>,
) -> Vec<EntityId> {
    let mut converted = Vec::new();

    for contact in contacts {
        if !world.is_active_cell(contact.agent) || !world.is_active_cell(contact.victim) {
            continue;
        }
        let agent_ready = world
            .cell(contact.agent)
            .is_some_and(|a| a.is_viral() && infection_ready(a.last_infection_time, now, rules.cooldown));
        // An earlier contact this tick may already have converted the victim
        let victim_healthy = world.cell(contact.victim).is_some_and(|v| !v.is_viral());
        if !agent_ready || !victim_healthy {
            continue;
        }

        let Some(victim) = world.cell_mut(contact.victim) else {
            continue;
        };
        let former_faction = victim.faction;
        let remaining = victim.size - rules.damage;

        if remaining <= rules.conversion_threshold {
            victim.faction = Faction::Viral;
            victim.control_mode = ControlMode::Autonomous;
            victim.infection = InfectionState::Converted;
            victim.selected = false;
            victim.move_target = None;
            victim.velocity = Vec2::ZERO;
            victim.last_infection_time = None;
            victim.last_reproduction_time = None;
            victim.set_size(1.0);
            converted.push(contact.victim);

            tracing::debug!(victim = ?contact.victim, ?former_faction, "Cell converted to viral");
            events.push(SimulationEvent::CellConverted {
                victim: contact.victim,
                former_faction,
            });
        } else {
            let damage_taken = match victim.infection {
                InfectionState::Infected { damage_taken } => damage_taken + rules.damage,
                _ => rules.damage,
            };
            victim.infection = InfectionState::Infected { damage_taken };
            victim.set_size(remaining);

            events.push(SimulationEvent::CellInfected {
                agent: contact.agent,
                victim: contact.victim,
                remaining_size: remaining,
            });
        }

        if let Some(agent) = world.cell_mut(contact.agent) {
            agent.last_infection_time = Some(now);
            let outcome = growth::apply_growth(
                agent.size,
                rules.damage * rules.growth_fraction,
                agent.min_size,
                agent.max_size,
            );
            // Viral growth never triggers division
            agent.set_size(outcome.new_size);
        }
    }

    converted
}

/// Split viral agents that reached reproduction size
///
/// The agent resets to size 1 and a size 1 clone appears beside it. Runs
/// outside any detection pass, so clones are inserted directly.
pub fn viral_reproduction(
    world: &mut World,
    rules: &InfectionConfig,
    now: f32,
    events: &mut Vec<SimulationEvent>,
) {
    let ready: Vec<EntityId> = world
        .cells()
        .filter(|(_, c)| {
            c.is_viral()
                && c.size >= rules.reproduction_size
                && reproduction_ready(c.last_reproduction_time, now, rules.reproduction_cooldown)
        })
        .map(|(id, _)| id)
        .collect();

    for parent_id in ready {
        let Some(parent) = world.cell_mut(parent_id) else {
            continue;
        };
        parent.set_size(1.0);
        parent.last_reproduction_time = Some(now);

        let mut child = parent.clone();
        child.position = parent.position + Vec2::new(rules.clone_offset, 0.0);
        child.velocity = Vec2::ZERO;
        child.move_target = None;
        child.last_infection_time = None;
        child.last_reproduction_time = None;
        let child_id = world.spawn_cell(child);

        tracing::debug!(parent = ?parent_id, child = ?child_id, "Viral agent reproduced");
        events.push(SimulationEvent::Reproduced {
            parent: parent_id,
            child: child_id,
            faction: Faction::Viral,
        });
    }
}
