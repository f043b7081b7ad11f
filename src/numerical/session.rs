//! Editing state of one curve or surface.
//!
//! A session owns the unmodified base, the last committed expression and the marker list;
//! the deformer, clamp, synthesizer and fitter it calls hold no state of their own, so
//! independent sessions never interfere.
//!
//! Curves commit locally: every release synthesizes `base + Δ(all markers)` as new text.
//! Surfaces commit globally: every release refits a polynomial sheet to all markers.
use crate::errors::SculptError;
use crate::numerical::deformation::displacement_clamp::DisplacementClamp;
use crate::numerical::deformation::expression_synth::{ExpressionSynthesizer, ParametricCurveText};
use crate::numerical::deformation::kernel_deformer::{
    DeformationField, KernelDeformer, ParametricCurve,
};
use crate::numerical::geometry::{Marker, MarkerId, Point3};
use crate::numerical::optimization::surface_fitting::{PolynomialFitter2D, SurfaceFit};
use crate::symbolic::expression::{Expression, ExpressionCompiler, FailureValue};
use crate::Utils::config::SculptConfig;
use log::{debug, info, warn};
use strum_macros::Display;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum CommitOutcome {
    /// new text of the curve
    Committed(ParametricCurveText),
    /// fewer than two markers carry a parameter, nothing to synthesize
    Unchanged,
}

pub struct CurveEditSession {
    base: ParametricCurve,
    current: ParametricCurve,
    markers: Vec<Marker>,
    next_id: usize,
    deformer: KernelDeformer,
    clamp: DisplacementClamp,
    synthesizer: ExpressionSynthesizer,
}

impl CurveEditSession {
    pub fn new(base: ParametricCurve, deformer: KernelDeformer, clamp: DisplacementClamp) -> Self {
        let base = base.recompiled(FailureValue::Zero);
        let current = base.recompiled(FailureValue::Undefined);
        CurveEditSession {
            base,
            current,
            markers: Vec::new(),
            next_id: 0,
            synthesizer: ExpressionSynthesizer::from(&deformer),
            deformer,
            clamp,
        }
    }

    pub fn from_config(base: ParametricCurve, config: &SculptConfig) -> Result<Self, SculptError> {
        Ok(CurveEditSession::new(base, config.deformer()?, config.clamp()?))
    }

    pub fn base(&self) -> &ParametricCurve {
        &self.base
    }

    /// last committed curve, NaN where it cannot be evaluated
    pub fn current(&self) -> &ParametricCurve {
        &self.current
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Places a marker on the curve as it is currently shown.
    pub fn add_marker(&mut self, t: f64) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        let position = self.preview_point(t);
        self.markers.push(Marker::new(id, position, Some(t)));
        debug!("marker {:?} added at t = {}", id, t);
        id
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() < before
    }

    /// Moves a marker towards `proposed`, at most `max_delta` away from the base curve at
    /// the marker's parameter. Returns the accepted position, `None` for an unknown marker.
    pub fn move_marker(&mut self, id: MarkerId, proposed: Point3) -> Option<Point3> {
        let base = &self.base;
        let clamp = &self.clamp;
        let marker = self.markers.iter_mut().find(|m| m.id == id)?;
        let accepted = match marker.parameter() {
            Some(t) => clamp.clamp(base.eval(t), proposed),
            None => proposed,
        };
        marker.position = accepted;
        Some(accepted)
    }

    /// live field of the current markers, `None` when fewer than two carry a parameter
    pub fn field(&self) -> Option<DeformationField> {
        self.deformer.build_field(&self.base, &self.markers)
    }

    pub fn preview_point(&self, t: f64) -> Point3 {
        match self.field() {
            Some(field) => field.deformed(&self.base, t),
            None => self.current.eval(t),
        }
    }

    /// End of a drag: writes the deformation out as new curve text.
    pub fn release(&mut self) -> CommitOutcome {
        let Some(field) = self.field() else {
            debug!("release with an inactive field, nothing committed");
            return CommitOutcome::Unchanged;
        };
        let text = self.synthesizer.synthesize_curve(&self.base, &field);
        self.current = text.compile(FailureValue::Undefined);
        info!("curve committed with {} markers", self.markers.len());
        CommitOutcome::Committed(text)
    }

    /// drops every marker and goes back to the base curve
    pub fn reset(&mut self) {
        self.markers.clear();
        self.current = self.base.recompiled(FailureValue::Undefined);
    }
}

/// marker with the base point it was created on
#[derive(Debug, Clone, Copy)]
struct SurfaceHandle {
    marker: Marker,
    anchor: Point3,
}

pub struct SurfaceEditSession {
    base: Expression,
    current: Expression,
    handles: Vec<SurfaceHandle>,
    next_id: usize,
    fitter: PolynomialFitter2D,
    clamp: DisplacementClamp,
}

impl SurfaceEditSession {
    /// `base` is `z = f(x, y)` text
    pub fn new(base: &str, fitter: PolynomialFitter2D, clamp: DisplacementClamp) -> Self {
        SurfaceEditSession {
            base: ExpressionCompiler::new(&["x", "y"], FailureValue::Zero).compile(base),
            current: ExpressionCompiler::new(&["x", "y"], FailureValue::Undefined).compile(base),
            handles: Vec::new(),
            next_id: 0,
            fitter,
            clamp,
        }
    }

    pub fn from_config(base: &str, config: &SculptConfig) -> Result<Self, SculptError> {
        Ok(SurfaceEditSession::new(base, config.surface_fitter(), config.clamp()?))
    }

    pub fn base(&self) -> &Expression {
        &self.base
    }

    pub fn current(&self) -> &Expression {
        &self.current
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.handles.iter().map(|h| h.marker).collect()
    }

    /// Places a marker on the surface as it is currently shown.
    pub fn add_marker(&mut self, x: f64, y: f64) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        let position = Point3::new(x, y, self.current.eval(&[x, y]));
        let anchor = Point3::new(x, y, self.base.eval(&[x, y]));
        self.handles.push(SurfaceHandle {
            marker: Marker::new(id, position, None),
            anchor,
        });
        id
    }

    /// Moves a marker, at most `max_delta` away from the base surface point it was created on.
    pub fn move_marker(&mut self, id: MarkerId, proposed: Point3) -> Option<Point3> {
        let clamp = &self.clamp;
        let handle = self.handles.iter_mut().find(|h| h.marker.id == id)?;
        let accepted = clamp.clamp(handle.anchor, proposed);
        handle.marker.position = accepted;
        Some(accepted)
    }

    pub fn preview_point(&self, x: f64, y: f64) -> f64 {
        self.current.eval(&[x, y])
    }

    /// End of a drag: refits the surface to every marker. On failure the current surface is
    /// kept and the reason returned.
    pub fn release(&mut self) -> Result<SurfaceFit, SculptError> {
        let points: Vec<Point3> = self.handles.iter().map(|h| h.marker.position).collect();
        match self.fitter.fit(&points) {
            Ok(fit) => {
                let text = fit.to_exact_expression_string();
                self.current = ExpressionCompiler::new(&["x", "y"], FailureValue::Undefined)
                    .compile(&text);
                info!("surface committed: z = {}", text);
                Ok(fit)
            }
            Err(error) => {
                warn!("surface refit rejected, keeping '{}': {}", self.current.source(), error);
                Err(error)
            }
        }
    }

    pub fn reset(&mut self) {
        self.handles.clear();
        self.current = self.base.with_failure(FailureValue::Undefined);
    }
}
