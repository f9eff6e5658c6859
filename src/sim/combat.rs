//! Attack resolution against anything that can take damage
//!
//! The resolver is stateless: callers gate attacks with a [`Cooldown`] and hand
//! in the candidate targets. Death is reported through [`DamageOutcome::Killed`]
//! exactly once per target because every [`Damageable`] refuses damage after it
//! has died.
//!
//! [`Cooldown`]: super::clock::Cooldown

use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// Result of applying damage to one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Target already dead, or the amount was not positive
    Ignored,
    /// Target survived with this much health
    Hurt { remaining: i32 },
    /// This hit brought the target to zero
    Killed,
}

impl DamageOutcome {
    pub fn landed(&self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }
}

/// Capability: mutable health plus a damage entry point
pub trait Damageable {
    fn entity_id(&self) -> EntityId;
    /// Position along the ground axis (used for reach checks)
    fn ground_x(&self) -> f32;
    fn health(&self) -> i32;
    fn is_alive(&self) -> bool;
    /// Apply damage. Must return `Ignored` once the target is dead.
    fn take_damage(&mut self, amount: i32) -> DamageOutcome;
}

/// How a single-target swing picks among several candidates in reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetSelection {
    /// First live candidate in traversal order
    FirstFound,
    /// Closest live candidate; ties go to traversal order
    #[default]
    Nearest,
}

/// Player attack shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttackMode {
    /// One target per swing
    #[default]
    Melee,
    /// Every target within reach
    Sweep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: EntityId,
    pub outcome: DamageOutcome,
}

/// Everything one attack did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackReport {
    pub hits: Vec<Hit>,
}

impl AttackReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Targets this attack killed
    pub fn killed(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.hits
            .iter()
            .filter(|h| h.outcome == DamageOutcome::Killed)
            .map(|h| h.target)
    }
}

#[inline]
fn in_reach<T: Damageable + ?Sized>(target: &T, origin: f32, reach: f32) -> bool {
    target.is_alive() && (target.ground_x() - origin).abs() <= reach
}

/// Damage exactly one live target within `reach` of `origin`
pub fn resolve_melee<'a, T, I>(
    origin: f32,
    reach: f32,
    targets: I,
    power: i32,
    selection: TargetSelection,
) -> AttackReport
where
    T: Damageable + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let mut chosen: Option<(&'a mut T, f32)> = None;
    for target in targets {
        if !in_reach(&*target, origin, reach) {
            continue;
        }
        let dist = (target.ground_x() - origin).abs();
        match selection {
            TargetSelection::FirstFound => {
                chosen = Some((target, dist));
                break;
            }
            TargetSelection::Nearest => {
                let closer = chosen.as_ref().is_none_or(|(_, best)| dist < *best);
                if closer {
                    chosen = Some((target, dist));
                }
            }
        }
    }

    let mut report = AttackReport::default();
    if let Some((target, _)) = chosen {
        let outcome = target.take_damage(power);
        report.hits.push(Hit {
            target: target.entity_id(),
            outcome,
        });
    }
    report
}

/// Damage every live target within `reach` of `origin`
pub fn resolve_area<'a, T, I>(origin: f32, reach: f32, targets: I, power: i32) -> AttackReport
where
    T: Damageable + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let mut report = AttackReport::default();
    for target in targets {
        if !in_reach(&*target, origin, reach) {
            continue;
        }
        let outcome = target.take_damage(power);
        report.hits.push(Hit {
            target: target.entity_id(),
            outcome,
        });
    }
    report
}
