//! Assembles the threaded body and its nut out of engine primitives.

use crate::config::BuildConfig;
use crate::edge::{EdgeProfile, EdgeTreatment};
use crate::errors::{GeometryError, MountError};
use crate::float_types::{OVERLAP, Real};
use crate::keystone::{KeystoneSlotMetrics, keystone_slot};
use crate::mount::latch::{OrientedBox, circle_y, latch_cutout_box, latch_space_width};
use crate::mount::{
    FACE_THICKNESS, LEAD_IN_ALLOWANCE, MODULE_BODY_WIDTH, MountSpec, NUT_CORNER_RADIUS,
    NUT_FLANGE_THICKNESS, NUT_LEAD_IN_FACTOR, NUT_THICKNESS, STACK_SPACING, THREAD_DEPTH,
    THREAD_START_ROTATION, WALL_THICKNESS,
};
use crate::thread::{screw, threaded_hole};
use crate::traits::GeometryEngine;
use nalgebra::{Point2, Vector2, Vector3};

/// A finished solid and the name it is exported under.
#[derive(Debug, Clone)]
pub struct NamedModel<S> {
    pub name: String,
    pub solid: S,
}

/// Builds mounts against one engine and one configuration.
///
/// Holds no mutable state; a single builder may be shared across threads
/// when the engine allows it.
#[derive(Debug, Clone)]
pub struct MountBuilder<'a, E: GeometryEngine> {
    engine: &'a E,
    config: &'a BuildConfig,
    metrics: KeystoneSlotMetrics,
}

impl<'a, E: GeometryEngine> MountBuilder<'a, E> {
    /// Uses nominal keystone metrics widened by the configured tolerance.
    pub fn new(engine: &'a E, config: &'a BuildConfig) -> Self {
        MountBuilder {
            engine,
            config,
            metrics: KeystoneSlotMetrics::new(config.tolerance),
        }
    }

    /// Replaces the keystone metrics, e.g. for a module of a different brand.
    pub fn with_metrics(self, metrics: KeystoneSlotMetrics) -> Self {
        MountBuilder { metrics, ..self }
    }

    pub fn engine(&self) -> &'a E {
        self.engine
    }

    pub fn config(&self) -> &'a BuildConfig {
        self.config
    }

    pub fn metrics(&self) -> &KeystoneSlotMetrics {
        &self.metrics
    }

    /// Circle the latch cutouts are anchored on.
    pub fn minor_circle_diameter(&self, spec: &MountSpec) -> Real {
        spec.thread().minor_diameter - self.config.tolerance
    }

    /// Circle the side cutouts are anchored on.
    pub fn major_circle_diameter(&self, spec: &MountSpec) -> Real {
        spec.outer_diameter() - self.config.tolerance
    }

    /// Width of the row of modules, with clearance.
    pub fn body_width_full(&self, spec: &MountSpec) -> Real {
        MODULE_BODY_WIDTH * spec.slot_count() as Real + self.config.tolerance
    }

    fn check(&self, spec: &MountSpec) -> Result<(), MountError> {
        spec.validate()?;
        self.config.validate()?;
        self.metrics
            .validate()
            .map_err(|err| MountError::invalid("keystone_metrics", err.to_string()))
    }

    fn engine_error(spec: &MountSpec) -> impl Fn(GeometryError) -> MountError + '_ {
        move |source| MountError::GeometryEngine {
            context: format!("{} {spec:?}", spec.name()),
            source,
        }
    }

    /// One clearance box per slot, left to right.
    pub fn latch_cutouts(&self, spec: &MountSpec) -> Result<Vec<OrientedBox>, MountError> {
        let width = latch_space_width(self.metrics.latch_space_size.x, spec.slot_count());
        let minor = self.minor_circle_diameter(spec);
        (0..spec.slot_count())
            .map(|i| latch_cutout_box(i, width, minor, &self.metrics))
            .collect()
    }

    /// Cross-section of the inner bore, before extrusion.
    ///
    /// A plain circle inside the thread wall, widened with side cutouts when
    /// the module cannot pass through the circle alone.
    pub fn bore_profile(&self, spec: &MountSpec) -> Result<E::Profile, MountError> {
        self.check(spec)?;
        self.bore(spec)
    }

    fn bore(&self, spec: &MountSpec) -> Result<E::Profile, MountError> {
        let e = self.engine;
        let wrap = Self::engine_error(spec);
        let d = spec.outer_diameter();

        let mut profile = e
            .circle(spec.thread().minor_diameter - 2.0 * WALL_THICKNESS)
            .map_err(&wrap)?;

        if spec.has_cutout() {
            let body_width = self.body_width_full(spec);
            let slot = e.rectangle(Vector2::new(body_width, d)).map_err(&wrap)?;
            let slot = e.translate_2d(&slot, Vector2::new(-body_width / 2.0, -d / 2.0));

            let y = circle_y(self.major_circle_diameter(spec), body_width / 2.0).ok_or_else(|| {
                MountError::invalid(
                    "slot_count",
                    format!(
                        "{} slot(s) ({body_width} wide) do not fit inside the thread of {d}",
                        spec.slot_count()
                    ),
                )
            })?;
            let side = e.rectangle(Vector2::new(d, d)).map_err(&wrap)?;
            let side = e.mirror_y_2d(&e.translate_2d(&side, Vector2::new(-d / 2.0, y)));

            profile = e.union_2d(&e.union_2d(&profile, &slot), &side);
        }

        e.round_inside_corners(&profile, WALL_THICKNESS).map_err(&wrap)
    }

    /// The threaded body: face flange at z = 0, thread running to `full_length`.
    pub fn build_main(&self, spec: &MountSpec) -> Result<E::Solid, MountError> {
        self.check(spec)?;
        let latches = self.latch_cutouts(spec)?;
        let bore = self.bore(spec)?;

        let e = self.engine;
        let wrap = Self::engine_error(spec);
        let metrics = &self.metrics;
        let res = &self.config.resolution;
        let thread = spec.thread();
        let length = spec.full_length();

        let body = screw(e, &thread, length, res).map_err(&wrap)?;
        let body = e.rotate(&body, 0.0, 0.0, THREAD_START_ROTATION);

        let face = e.circle(spec.face_diameter()).map_err(&wrap)?;
        let face = e
            .extrude(
                &face,
                FACE_THICKNESS,
                EdgeProfile::bottom(EdgeTreatment::Chamfer {
                    depth: FACE_THICKNESS,
                }),
            )
            .map_err(&wrap)?;
        let body = e.union(&body, &face);

        // rear lead-in: everything outside a 45° line through the thread's
        // outer edge, revolved and moved to the back
        let chamfer = THREAD_DEPTH + LEAD_IN_ALLOWANCE;
        let r = spec.outer_diameter() / 2.0;
        let lead_in = e
            .polygon(&[
                Point2::new(r - chamfer - OVERLAP, OVERLAP),
                Point2::new(r + OVERLAP, -chamfer - OVERLAP),
                Point2::new(r + OVERLAP, OVERLAP),
            ])
            .map_err(&wrap)?;
        let lead_in = e.revolve(&lead_in).map_err(&wrap)?;
        let lead_in = e.translate(&lead_in, Vector3::new(0.0, 0.0, length));

        let slot = keystone_slot(e, metrics).map_err(&wrap)?;
        let slot = e.rotate(&slot, 0.0, 180.0, 0.0);
        let slot = e.translate(&slot, Vector3::new(0.0, spec.y_offset(), metrics.base_size.z));
        let count = spec.slot_count();
        let slots = e.repeat_linear(&slot, Vector3::new(MODULE_BODY_WIDTH, 0.0, 0.0), count);
        let slots = e.translate(
            &slots,
            Vector3::new(-MODULE_BODY_WIDTH * (count - 1) as Real / 2.0, 0.0, 0.0),
        );

        let mut cutters = vec![lead_in, slots];
        for latch in &latches {
            let block = e.cuboid(latch.size).map_err(&wrap)?;
            cutters.push(e.transform(&block, &latch.placement()));
        }

        let bore = e.extrude(&bore, length, EdgeProfile::SHARP).map_err(&wrap)?;
        cutters.push(e.translate(&bore, Vector3::new(0.0, 0.0, metrics.base_size.z)));

        Ok(e.subtract_all(&body, cutters))
    }

    /// The hex nut, flange down, threaded through.
    pub fn build_nut(&self, spec: &MountSpec) -> Result<E::Solid, MountError> {
        self.check(spec)?;
        let e = self.engine;
        let wrap = Self::engine_error(spec);
        let outer = spec.nut_outer_diameter();
        let rounded_top = EdgeProfile::top(EdgeTreatment::Fillet {
            radius: NUT_CORNER_RADIUS,
        });

        let flange = e.circle(outer).map_err(&wrap)?;
        let flange = e
            .extrude(&flange, NUT_FLANGE_THICKNESS, rounded_top)
            .map_err(&wrap)?;
        let hex = e.regular_polygon(6, outer / 2.0).map_err(&wrap)?;
        let hex = e.extrude(&hex, NUT_THICKNESS, rounded_top).map_err(&wrap)?;

        let hole = threaded_hole(
            e,
            &spec.thread(),
            NUT_THICKNESS,
            THREAD_DEPTH * NUT_LEAD_IN_FACTOR,
            self.config.tolerance,
            &self.config.resolution,
        )
        .map_err(&wrap)?;

        Ok(e.subtract(&e.union(&flange, &hex), &hole))
    }

    /// Body and nut side by side along x, both centered on y, under the mount's name.
    pub fn assemble(&self, spec: &MountSpec) -> Result<NamedModel<E::Solid>, MountError> {
        let main = self.build_main(spec)?;
        let nut = self.build_nut(spec)?;
        let e = self.engine;

        // both parts are round about the origin, so their extents along x
        // are their widest diameters
        let main_width = spec.face_diameter();
        let nut_width = spec.nut_outer_diameter();
        let main = e.translate(&main, Vector3::new(main_width / 2.0, 0.0, 0.0));
        let nut = e.translate(
            &nut,
            Vector3::new(main_width + STACK_SPACING + nut_width / 2.0, 0.0, 0.0),
        );

        Ok(NamedModel {
            name: spec.name(),
            solid: e.union(&main, &nut),
        })
    }
}
