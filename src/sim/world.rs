//! Rigid-body world
//!
//! The control layer only talks to physics through the [`Physics`] trait:
//! create bodies, overwrite position/velocity, apply forces at points, step,
//! and read back the contact pairs that began during the step.
//!
//! [`World`] is the built-in implementation. It integrates one dynamic body
//! class (circles, i.e. the ball) against static shapes and hinged capsules
//! (paddles). Velocities are px/tick; one `step` is one tick, sub-stepped by
//! speed so a fast ball cannot skip through a wall. Applied forces use
//! mass·px/ms² and are scaled by `FORCE_SCALE` into per-tick units.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    ball_capsule_collision, ball_circle_collision, ball_polygon_collision, resolve_contact,
};
use super::geometry::Shape;
use super::state::Tag;
use crate::consts::*;
use crate::settings::Bounds;

/// Penetration left in place so a resting contact stays a contact
const CONTACT_SLOP: f32 = 0.05;

/// Stable identifier of a body in a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// How a body moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves
    Static,
    /// Gravity, forces and collisions
    Dynamic,
    /// Rotates about its position within `[min_angle, max_angle]`; torque from
    /// applied forces, no gravity
    Hinged {
        min_angle: f32,
        max_angle: f32,
        inertia: f32,
    },
}

/// Body creation parameters
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub tag: Tag,
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
    pub kind: BodyKind,
    pub restitution: f32,
    pub mass: f32,
    /// Same non-zero group: positive always collides, negative never does
    pub group: i32,
    pub fill: u32,
    pub visible: bool,
}

impl BodyDesc {
    pub fn fixed(tag: Tag, shape: Shape, position: Vec2) -> Self {
        Self {
            tag,
            shape,
            position,
            angle: 0.0,
            kind: BodyKind::Static,
            restitution: 0.0,
            mass: 1.0,
            group: 0,
            fill: crate::colors::OUTER,
            visible: true,
        }
    }

    pub fn dynamic(tag: Tag, shape: Shape, position: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            ..Self::fixed(tag, shape, position)
        }
    }

    pub fn hinged(
        tag: Tag,
        shape: Shape,
        pivot: Vec2,
        angle: f32,
        limits: (f32, f32),
        inertia: f32,
    ) -> Self {
        Self {
            angle,
            kind: BodyKind::Hinged {
                min_angle: limits.0.min(limits.1),
                max_angle: limits.0.max(limits.1),
                inertia,
            },
            ..Self::fixed(tag, shape, pivot)
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }

    pub fn with_fill(mut self, fill: u32) -> Self {
        self.fill = fill;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A body in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    pub tag: Tag,
    pub shape: Shape,
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub restitution: f32,
    pub mass: f32,
    pub group: i32,
    /// Render fill (0xRRGGBB)
    pub fill: u32,
    pub visible: bool,
    /// Accumulated this tick, cleared by `step`
    force: Vec2,
    torque: f32,
}

impl Body {
    fn from_desc(handle: BodyHandle, desc: BodyDesc) -> Self {
        Self {
            handle,
            tag: desc.tag,
            shape: desc.shape,
            kind: desc.kind,
            position: desc.position,
            angle: desc.angle,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            restitution: desc.restitution,
            mass: desc.mass,
            group: desc.group,
            fill: desc.fill,
            visible: desc.visible,
            force: Vec2::ZERO,
            torque: 0.0,
        }
    }

    /// World-space spine of a capsule body
    pub fn capsule_ends(&self) -> Option<(Vec2, Vec2)> {
        match self.shape {
            Shape::Capsule { length, .. } => Some((
                self.position,
                self.position + Vec2::from_angle(self.angle) * length,
            )),
            _ => None,
        }
    }

    /// Midpoint of a capsule's spine; the body position for anything else
    pub fn companion_point(&self) -> Vec2 {
        match self.capsule_ends() {
            Some((a, b)) => (a + b) * 0.5,
            None => self.position,
        }
    }

    /// Velocity of the body's material at a world point
    pub fn surface_velocity(&self, point: Vec2) -> Vec2 {
        match self.kind {
            BodyKind::Static => Vec2::ZERO,
            BodyKind::Dynamic => self.velocity,
            BodyKind::Hinged { .. } => (point - self.position).perp() * self.angular_velocity,
        }
    }

    /// World-space outline of a polygon body
    pub fn world_vertices(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Polygon { vertices } => {
                let rot = Vec2::from_angle(self.angle);
                vertices.iter().map(|v| self.position + rot.rotate(*v)).collect()
            }
            _ => Vec::new(),
        }
    }

    fn speed_bound(&self) -> f32 {
        match self.kind {
            BodyKind::Static => 0.0,
            BodyKind::Dynamic => self.velocity.length(),
            BodyKind::Hinged { .. } => self.angular_velocity.abs() * self.shape.bounding_radius(),
        }
    }
}

/// A contact pair that began during a step (handles in ascending order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollisionStart {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl CollisionStart {
    /// The member of the pair that is not `handle`, if `handle` is in it
    pub fn other(&self, handle: BodyHandle) -> Option<BodyHandle> {
        if self.a == handle {
            Some(self.b)
        } else if self.b == handle {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Group filter: bodies sharing a non-zero group collide only if it is positive
#[inline]
pub fn groups_collide(a: i32, b: i32) -> bool {
    if a == b && a != 0 { a > 0 } else { true }
}

/// Capabilities the table needs from a physics engine
pub trait Physics {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn body(&self, handle: BodyHandle) -> Option<&Body>;

    /// Allocate a fresh collision group; `non_colliding` groups never collide internally
    fn next_group(&mut self, non_colliding: bool) -> i32;

    fn tag(&self, handle: BodyHandle) -> Option<Tag> {
        self.body(handle).map(|b| b.tag)
    }
    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|b| b.position)
    }
    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|b| b.velocity)
    }

    /// Authoritative overwrites; unknown handles are ignored
    fn set_position(&mut self, handle: BodyHandle, position: Vec2);
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);
    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32);

    /// Accumulate a force at a world point, consumed by the next `step`
    fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2);

    /// Advance one tick; returns pairs whose contact began this tick
    fn step(&mut self) -> Vec<CollisionStart>;

    fn bounds(&self) -> Bounds;
    fn gravity(&self) -> Vec2;
}

/// Built-in physics world
#[derive(Debug, Clone)]
pub struct World {
    bodies: Vec<Body>,
    bounds: Bounds,
    gravity: Vec2,
    /// Pairs touching at the end of the previous step
    contacts: BTreeSet<(BodyHandle, BodyHandle)>,
    last_group: i32,
}

impl World {
    /// `gravity` is in px/tick²
    pub fn new(bounds: Bounds, gravity: Vec2) -> Self {
        Self {
            bodies: Vec::new(),
            bounds,
            gravity,
            contacts: BTreeSet::new(),
            last_group: 0,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize)
    }

    pub fn set_fill(&mut self, handle: BodyHandle, fill: u32) {
        if let Some(body) = self.body_mut(handle) {
            body.fill = fill;
        }
    }

    /// Number of substeps needed so nothing moves more than half a ball radius
    fn substeps(&self) -> u32 {
        let fastest = self
            .bodies
            .iter()
            .map(Body::speed_bound)
            .fold(0.0, f32::max);
        let n = (fastest / (BALL_RADIUS * 0.5)).ceil() as u32;
        n.clamp(1, MAX_SUBSTEPS)
    }

    fn apply_forces(&mut self) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            match body.kind {
                BodyKind::Static => {}
                BodyKind::Dynamic => {
                    body.velocity += gravity + body.force * FORCE_SCALE / body.mass;
                }
                BodyKind::Hinged { inertia, .. } => {
                    body.angular_velocity += body.torque * FORCE_SCALE / inertia;
                }
            }
            body.force = Vec2::ZERO;
            body.torque = 0.0;
        }
    }

    fn integrate(&mut self, h: f32) {
        for body in &mut self.bodies {
            match body.kind {
                BodyKind::Static => {}
                BodyKind::Dynamic => {
                    body.position += body.velocity * h;
                    body.angle += body.angular_velocity * h;
                }
                BodyKind::Hinged {
                    min_angle,
                    max_angle,
                    ..
                } => {
                    body.angle += body.angular_velocity * h;
                    // Stoppers absorb the swing at either limit
                    if body.angle < min_angle {
                        body.angle = min_angle;
                        body.angular_velocity = body.angular_velocity.max(0.0);
                    } else if body.angle > max_angle {
                        body.angle = max_angle;
                        body.angular_velocity = body.angular_velocity.min(0.0);
                    }
                }
            }
        }
    }

    fn collide_all(&mut self, touching: &mut BTreeSet<(BodyHandle, BodyHandle)>) {
        for i in 0..self.bodies.len() {
            if self.bodies[i].kind != BodyKind::Dynamic {
                continue;
            }
            for j in 0..self.bodies.len() {
                if i == j || self.bodies[j].kind == BodyKind::Dynamic {
                    continue;
                }
                let (ball, other) = pair_mut(&mut self.bodies, i, j);
                if collide(ball, other) {
                    let key = if ball.handle < other.handle {
                        (ball.handle, other.handle)
                    } else {
                        (other.handle, ball.handle)
                    };
                    touching.insert(key);
                }
            }
        }
    }
}

impl Physics for World {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body::from_desc(handle, desc));
        handle
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize)
    }

    fn next_group(&mut self, non_colliding: bool) -> i32 {
        self.last_group += 1;
        if non_colliding {
            -self.last_group
        } else {
            self.last_group
        }
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.position = position;
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        if let Some(body) = self.body_mut(handle) {
            body.angular_velocity = angular_velocity;
        }
    }

    fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.force += force;
            body.torque += (point - body.position).perp_dot(force);
        }
    }

    fn step(&mut self) -> Vec<CollisionStart> {
        self.apply_forces();

        let substeps = self.substeps();
        let h = 1.0 / substeps as f32;
        let mut touching = BTreeSet::new();
        for _ in 0..substeps {
            self.integrate(h);
            self.collide_all(&mut touching);
        }

        let started = touching
            .difference(&self.contacts)
            .map(|&(a, b)| CollisionStart { a, b })
            .collect();
        self.contacts = touching;
        started
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Resolve a dynamic circle against a non-dynamic body; true if they touch
fn collide(ball: &mut Body, other: &mut Body) -> bool {
    let Shape::Circle { radius } = ball.shape else {
        return false;
    };
    if !groups_collide(ball.group, other.group) {
        return false;
    }
    let reach = radius + other.shape.bounding_radius();
    if ball.position.distance_squared(other.position) > reach * reach {
        return false;
    }

    let result = match &other.shape {
        Shape::Circle { radius: r } => {
            ball_circle_collision(ball.position, radius, other.position, *r)
        }
        Shape::Polygon { .. } => {
            ball_polygon_collision(ball.position, radius, &other.world_vertices())
        }
        Shape::Capsule {
            radius: thickness, ..
        } => match other.capsule_ends() {
            Some((a, b)) => ball_capsule_collision(ball.position, radius, a, b, *thickness),
            None => return false,
        },
    };
    if !result.hit {
        return false;
    }

    let surface_vel = other.surface_velocity(result.point);
    let restitution = ball.restitution.max(other.restitution);
    let (velocity, impulse) = resolve_contact(
        ball.velocity,
        result.normal,
        surface_vel,
        restitution,
        BALL_FRICTION,
    );
    ball.velocity = velocity;
    ball.position += result.normal * (result.penetration - CONTACT_SLOP).max(0.0);

    // Roll along the surface
    let tangent_speed = (ball.velocity - surface_vel).dot(result.normal.perp());
    ball.angular_velocity = tangent_speed / radius;

    if let BodyKind::Hinged { inertia, .. } = other.kind {
        let lever = result.point - other.position;
        other.angular_velocity += lever.perp_dot(-result.normal * impulse * ball.mass) / inertia;
    }
    true
}
