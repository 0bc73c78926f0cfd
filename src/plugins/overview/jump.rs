//! Time-sliced camera jump toward a selected entity.
//!
//! `CameraRig` stands in for the host's 3D camera anchor; the console only
//! drives its position and look-at point.

use bevy::prelude::*;

use crate::network::EntityRef;
use crate::plugins::core::EventLog;

use super::commands::JumpToEntity;

pub const NODE_JUMP_SECONDS: f32 = 0.5;
pub const HAZARD_JUMP_SECONDS: f32 = 1.5;
pub const NODE_CAMERA_OFFSET: Vec3 = Vec3::new(15.0, 5.0, 15.0);
pub const HAZARD_CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 2.0, -5.0);

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 120.0, -160.0),
            look_at: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpTween {
    pub entity: EntityRef,
    from: CameraRig,
    to: CameraRig,
    elapsed: f32,
    duration: f32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JumpProgress {
    Idle,
    Running,
    Finished(EntityRef),
}

/// At most one jump runs; a new request replaces it.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct JumpAnimation {
    active: Option<JumpTween>,
}

pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Where the rig ends up for an entity, and how long it takes to get there.
pub fn jump_goal(entity: EntityRef, position: Vec3) -> (CameraRig, f32) {
    let (offset, duration) = match entity {
        EntityRef::Node(_) => (NODE_CAMERA_OFFSET, NODE_JUMP_SECONDS),
        EntityRef::Hazard(_) => (HAZARD_CAMERA_OFFSET, HAZARD_JUMP_SECONDS),
    };
    (
        CameraRig {
            position: position + offset,
            look_at: position,
        },
        duration,
    )
}

impl JumpAnimation {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&JumpTween> {
        self.active.as_ref()
    }

    /// Starts from wherever the rig is now, so an interrupted jump continues smoothly.
    pub fn start(&mut self, rig: &CameraRig, entity: EntityRef, position: Vec3) {
        let (to, duration) = jump_goal(entity, position);
        self.active = Some(JumpTween {
            entity,
            from: *rig,
            to,
            elapsed: 0.0,
            duration,
        });
    }

    pub fn advance(&mut self, rig: &mut CameraRig, delta: f32) -> JumpProgress {
        let Some(tween) = self.active.as_mut() else {
            return JumpProgress::Idle;
        };

        tween.elapsed += delta.max(0.0);
        let t = if tween.duration > 0.0 {
            smoothstep(tween.elapsed / tween.duration)
        } else {
            1.0
        };
        rig.position = tween.from.position.lerp(tween.to.position, t);
        rig.look_at = tween.from.look_at.lerp(tween.to.look_at, t);

        if tween.elapsed >= tween.duration {
            let entity = tween.entity;
            *rig = tween.to;
            self.active = None;
            JumpProgress::Finished(entity)
        } else {
            JumpProgress::Running
        }
    }
}

// =============================================================================
// Systems
// =============================================================================

pub fn start_jumps(
    mut jumps: MessageReader<JumpToEntity>,
    rig: Res<CameraRig>,
    mut animation: ResMut<JumpAnimation>,
) {
    if let Some(jump) = jumps.read().last() {
        animation.start(&rig, jump.entity, jump.position);
    }
}

pub fn animate_jump(
    time: Res<Time>,
    mut animation: ResMut<JumpAnimation>,
    mut rig: ResMut<CameraRig>,
    mut log: ResMut<EventLog>,
) {
    if !animation.is_running() {
        return;
    }

    if let JumpProgress::Finished(entity) = animation.advance(&mut rig, time.delta_secs()) {
        info!("Camera arrived at {:?}", entity);
        log.push(format!(
            "Camera at ({:.0}, {:.0}, {:.0})",
            rig.look_at.x, rig.look_at.y, rig.look_at.z
        ));
    }
}
