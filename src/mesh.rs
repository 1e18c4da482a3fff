//! CPU assembly of the per-frame GPU payload.
//!
//! Each frame the field's state is flattened into two instance lists:
//! circles (trails, particle bodies, glow cores) and line quads (the
//! connective web between nearby particles). The GPU layer uploads these
//! verbatim; everything visual is decided here on the CPU, which keeps the
//! rendering contract testable without a window.
//!
//! Connection assembly is the dominant cost: every unordered pair of live
//! particles is tested against `connection_distance`, so it is quadratic
//! in the live count. The particle caps in [`FieldConfig`] bound this.
//!
//! [`FieldConfig`]: crate::FieldConfig

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::field::ParticleField;
use crate::particle::Particle;
use crate::visuals::VisualConfig;

/// One filled circle, rendered as a radial gradient quad.
///
/// The fragment shader blends `inner_color` to `outer_color` over the
/// first 40% of the radius, then `outer_color` to transparent.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub inner_color: [f32; 4],
    pub outer_color: [f32; 4],
}

impl CircleInstance {
    fn new(center: Vec2, radius: f32, inner: Vec3, outer: Vec3, opacity: f32) -> Self {
        Self {
            center: center.to_array(),
            radius,
            _pad: 0.0,
            inner_color: [inner.x, inner.y, inner.z, opacity],
            outer_color: [outer.x, outer.y, outer.z, opacity],
        }
    }

    /// Uniform-color circle (trail points, glow cores).
    fn flat(center: Vec2, radius: f32, color: Vec3, opacity: f32) -> Self {
        Self::new(center, radius, color, color, opacity)
    }
}

/// One connective line segment, expanded to a quad in the vertex shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub width: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Default)]
pub struct FrameMesh {
    pub circles: Vec<CircleInstance>,
    pub lines: Vec<LineInstance>,
}

impl FrameMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.circles.clear();
        self.lines.clear();
    }

    /// Rebuild the mesh from the current field state. Buffers are reused
    /// across frames.
    pub fn build(&mut self, field: &ParticleField, visuals: &VisualConfig) {
        self.clear();
        for (_, particle) in field.particles().iter() {
            self.push_particle(particle, visuals);
        }
        self.push_connections(field, visuals);
    }

    fn push_particle(&mut self, p: &Particle, visuals: &VisualConfig) {
        let state = visuals.interaction_state(p.magnetic_force, p.repulsion_force);
        let (inner, outer) = visuals.gradient_stops(p.hue, state);

        // Trail, oldest first so newer points draw on top.
        let len = p.trail.len();
        let trail_color = crate::visuals::hsl_to_rgb(p.hue, 0.7, 0.6);
        for (i, point) in p.trail.iter().enumerate() {
            let opacity = point.opacity * (i as f32 / len as f32) * 0.3;
            if opacity > 0.01 {
                self.circles.push(CircleInstance::flat(
                    point.position,
                    p.resting_radius * 0.5,
                    trail_color,
                    opacity,
                ));
            }
        }

        // Body: gradient out to twice the current radius.
        self.circles.push(CircleInstance::new(
            p.position,
            p.radius * 2.0,
            inner,
            outer,
            p.opacity,
        ));

        // High-energy particles get a soft halo plus a small bright core.
        if visuals.has_glow(p.magnetic_force, p.repulsion_force) {
            self.circles.push(CircleInstance::flat(
                p.position,
                p.radius * 3.0,
                inner,
                p.opacity * 0.25,
            ));
            self.circles
                .push(CircleInstance::flat(p.position, p.radius * 0.3, inner, p.opacity));
        }
    }

    fn push_connections(&mut self, field: &ParticleField, visuals: &VisualConfig) {
        let max_distance = field.config().connection_distance;
        let particles: Vec<(&Particle, Vec2)> = field
            .particles()
            .iter()
            .map(|(_, p)| (p, p.position))
            .collect();

        for (i, (pa, pos_a)) in particles.iter().enumerate() {
            for (pb, pos_b) in particles.iter().skip(i + 1) {
                let Some(strength) = connection_strength(*pos_a, *pos_b, max_distance) else {
                    continue;
                };
                let color = visuals.connection_color(pa.hue, pb.hue);
                let opacity = strength * 0.4;
                let width = strength * 2.0;

                if strength > visuals.connection_glow_threshold {
                    // Halo pass under the line itself.
                    self.lines.push(LineInstance {
                        a: pos_a.to_array(),
                        b: pos_b.to_array(),
                        width: width * 3.0,
                        _pad: 0.0,
                        color: [color.x, color.y, color.z, opacity * 0.3],
                    });
                }
                self.lines.push(LineInstance {
                    a: pos_a.to_array(),
                    b: pos_b.to_array(),
                    width,
                    _pad: 0.0,
                    color: [color.x, color.y, color.z, opacity],
                });
            }
        }
    }
}

/// Connection strength for a pair of positions: `(max - d) / max` inside
/// the threshold, `None` beyond it. Symmetric in its two inputs.
pub fn connection_strength(a: Vec2, b: Vec2, max_distance: f32) -> Option<f32> {
    let distance = a.distance(b);
    if distance < max_distance {
        Some((max_distance - distance) / max_distance)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::pointer::PointerFrame;
    use std::time::Duration;

    fn seeded_field(width: f32, height: f32) -> ParticleField {
        ParticleField::new(FieldConfig::default().with_seed(11), width, height)
    }

    #[test]
    fn test_connection_strength_symmetric() {
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(70.0, 95.0);
        assert_eq!(
            connection_strength(a, b, 120.0),
            connection_strength(b, a, 120.0)
        );
    }

    #[test]
    fn test_connection_strength_cutoff() {
        let a = Vec2::ZERO;
        assert!(connection_strength(a, Vec2::new(120.0, 0.0), 120.0).is_none());
        assert!(connection_strength(a, Vec2::new(119.0, 0.0), 120.0).is_some());
        let touching = connection_strength(a, Vec2::ZERO, 120.0).unwrap();
        assert!((touching - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mesh_has_body_per_particle() {
        let field = seeded_field(800.0, 600.0);
        let mut mesh = FrameMesh::new();
        mesh.build(&field, &VisualConfig::default());
        // No trails yet (no steps taken), no glow at rest: one body each.
        assert_eq!(mesh.circles.len(), field.particles().len());
    }

    #[test]
    fn test_mesh_trails_appear_after_steps() {
        let mut field = seeded_field(800.0, 600.0);
        for _ in 0..4 {
            field.step(&PointerFrame::default(), Duration::ZERO);
        }
        let mut mesh = FrameMesh::new();
        mesh.build(&field, &VisualConfig::default());
        assert!(mesh.circles.len() > field.particles().len());
    }

    #[test]
    fn test_connection_pair_count_matches_metric() {
        let field = seeded_field(800.0, 600.0);
        let visuals = VisualConfig::default();
        let max = field.config().connection_distance;

        let positions: Vec<Vec2> = field.particles().iter().map(|(_, p)| p.position).collect();
        let mut expected = 0usize;
        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                if let Some(strength) = connection_strength(*a, *b, max) {
                    expected += 1;
                    if strength > visuals.connection_glow_threshold {
                        expected += 1; // halo pass
                    }
                }
            }
        }

        let mut mesh = FrameMesh::new();
        mesh.build(&field, &visuals);
        assert_eq!(mesh.lines.len(), expected);
        assert!(expected > 0, "seeded field should have close pairs");
    }
}
