/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the staged modelling pipeline that turns constraints into an evaluated field.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # modeling
//!
//! The [`GrbfModel`] pipeline.
//!
//! A model runs five ordered stages:
//!
//! 1. [`GrbfModel::process_input_data`]
//! 2. [`GrbfModel::get_method_parameters`]
//! 3. [`GrbfModel::setup_basis_functions`]
//! 4. [`GrbfModel::setup_system_solver`]
//! 5. [`GrbfModel::evaluate_scalar_interpolant`]
//!
//! Each stage checks its prerequisites before touching any state and returns a
//! [`ModelingError`] naming itself on failure. The first failure aborts the run.

use crate::{
    assembly::{self, RowOrigin, RowTarget},
    basic_input::{BasicInput, ConstraintKind},
    basic_parameters::BasicParameters,
    basis::{BasisFunction, ModifiedKernel, create_rbf_kernel},
    config::Params,
    error::{ErrorKind, ModelingError, ModelingResult, Stage},
    greedy::GreedyReport,
    interpolant::Interpolant,
    model_config::ModelParameters,
    polynomials::PolynomialBasis,
    progress::{ProgressMsg, ProgressSink, report},
    solver::{ActiveSetSolver, SystemProblem, SystemSolver, row_value},
};
use faer::Mat;
use rayon::prelude::*;
use std::sync::Arc;
use surfe_rbf_utils::{KernelParams, KernelType};

/// Outcome of [`GrbfModel::update_interface_iso_values`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoValueUpdate {
    /// The model has no interface test points.
    NotApplicable,
    /// This many iso values were overwritten.
    Updated(usize),
}

/// A generalized RBF implicit model.
#[derive(Debug)]
pub struct GrbfModel {
    /// Constraint data and evaluation points.
    pub input: BasicInput,

    /// Modelling options.
    pub parameters: ModelParameters,

    /// Greedy selection and solver tuning.
    pub params: Params,

    basic_parameters: Option<BasicParameters>,
    basis: Option<BasisFunction>,
    interpolant: Option<Interpolant>,

    solver: Arc<dyn SystemSolver>,

    /// Optional callback for reporting progress.
    pub(crate) progress_callback: Option<Arc<dyn ProgressSink>>,
}

/// Builder for [`GrbfModel`].
#[derive(Debug)]
pub struct GrbfModelBuilder {
    input: BasicInput,
    parameters: ModelParameters,
    params: Params,
    solver: Option<Arc<dyn SystemSolver>>,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl GrbfModelBuilder {
    /// Sets greedy selection and solver tuning.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Replaces the default [`ActiveSetSolver`].
    pub fn solver(mut self, solver: Arc<dyn SystemSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Sets a sink that receives [`ProgressMsg`] updates.
    pub fn progress_callback(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(sink);
        self
    }

    pub fn build(self) -> GrbfModel {
        let solver = self
            .solver
            .unwrap_or_else(|| Arc::new(ActiveSetSolver::new(self.params.solver_params)));
        GrbfModel {
            input: self.input,
            parameters: self.parameters,
            params: self.params,
            basic_parameters: None,
            basis: None,
            interpolant: None,
            solver,
            progress_callback: self.progress_callback,
        }
    }
}

impl GrbfModel {
    /// Creates a new [`GrbfModelBuilder`] for the given data and options.
    pub fn builder(input: BasicInput, parameters: ModelParameters) -> GrbfModelBuilder {
        GrbfModelBuilder {
            input,
            parameters,
            params: Params::default(),
            solver: None,
            progress_callback: None,
        }
    }

    /// A model with default tuning and the [`ActiveSetSolver`].
    pub fn new(input: BasicInput, parameters: ModelParameters) -> Self {
        Self::builder(input, parameters).build()
    }

    /// Replaces the system solver.
    pub fn with_solver(mut self, solver: Arc<dyn SystemSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn basic_parameters(&self) -> Option<&BasicParameters> {
        self.basic_parameters.as_ref()
    }

    pub fn basis(&self) -> Option<&BasisFunction> {
        self.basis.as_ref()
    }

    pub fn interpolant(&self) -> Option<&Interpolant> {
        self.interpolant.as_ref()
    }

    pub fn solver(&self) -> &Arc<dyn SystemSolver> {
        &self.solver
    }

    /// A model with the same options, tuning, solver and progress sink, but no data.
    pub fn clone_configuration(&self) -> GrbfModel {
        GrbfModel {
            input: BasicInput::new(),
            parameters: self.parameters,
            params: self.params,
            basic_parameters: None,
            basis: None,
            interpolant: None,
            solver: Arc::clone(&self.solver),
            progress_callback: self.progress_callback.clone(),
        }
    }

    /// Takes over the solved state of `other`.
    pub(crate) fn adopt_solution(&mut self, other: GrbfModel) {
        self.basic_parameters = other.basic_parameters;
        self.basis = other.basis;
        self.interpolant = other.interpolant;
    }

    fn completed(&self, stage: Stage) {
        report(&self.progress_callback, ProgressMsg::StageCompleted { stage });
    }

    /// Validates the input, groups interfaces, sets uncertainty bounds and
    /// computes average nearest-neighbour distances.
    pub fn process_input_data(&mut self) -> ModelingResult<()> {
        let stage = Stage::ProcessInputData;
        let fail = |kind| ModelingError::new(stage, kind);
        let p = &self.parameters;

        if self.input.n_constraint_points() == 0 {
            return Err(fail(ErrorKind::NoInputData));
        }
        self.input.check_input_data().map_err(fail)?;

        if p.model_type.uses_point_values() && (!p.use_interface_data || self.input.interface.is_empty()) {
            return Err(fail(ErrorKind::MissingData {
                what: "interface points",
            }));
        }
        if !p.model_type.uses_point_values() && (!p.use_planar_data || self.input.planar.is_empty()) {
            return Err(fail(ErrorKind::MissingData {
                what: "planar points",
            }));
        }

        // Groups copy the interfaces, so bounds are set first.
        self.input
            .set_uncertainty_bounds(p.interface_uncertainty, p.angular_uncertainty);
        self.input.get_interface_data();
        self.input.compute_avg_nn_distances();

        self.basic_parameters = None;
        self.basis = None;
        self.interpolant = None;

        self.completed(stage);
        Ok(())
    }

    /// Recomputes the [`BasicParameters`].
    pub fn get_method_parameters(&mut self) -> ModelingResult<()> {
        let stage = Stage::GetMethodParameters;
        let basic_parameters = BasicParameters::derive(&self.input, &self.parameters)
            .map_err(|kind| ModelingError::new(stage, kind))?;
        self.basic_parameters = Some(basic_parameters);
        self.completed(stage);
        Ok(())
    }

    /// Selects the kernel and wraps it in the modified kernel for increment formulations.
    pub fn setup_basis_functions(&mut self) -> ModelingResult<()> {
        let stage = Stage::SetupBasisFunctions;
        let fail = |kind| ModelingError::new(stage, kind);
        let p = &self.parameters;

        let basic_parameters = self.basic_parameters.ok_or(fail(ErrorKind::MissingPrerequisite {
            what: "method parameters",
        }))?;

        let kernel = create_rbf_kernel(
            p.basis_type,
            p.model_global_anisotropy,
            p.shape_parameter,
            &self.input.planar,
        )
        .ok_or_else(|| {
            let shape_ok = KernelParams::from(*p).is_valid();
            fail(ErrorKind::InvalidKernel {
                reason: match shape_ok {
                    true => "global anisotropy needs planar orientation data",
                    false => "shape parameter must be finite and positive",
                },
            })
        })?;

        let basis = match basic_parameters.modified_basis {
            true => BasisFunction::Modified(
                ModifiedKernel::new(kernel, &self.input.interface_point_lists).map_err(fail)?,
            ),
            false => BasisFunction::Standard(kernel),
        };

        self.basis = Some(basis);
        self.completed(stage);
        Ok(())
    }

    /// Assembles and solves the interpolation system and stores the interpolant.
    pub fn setup_system_solver(&mut self) -> ModelingResult<()> {
        let stage = Stage::SetupSystemSolver;
        let fail = |kind| ModelingError::new(stage, kind);

        let basic_parameters = self.basic_parameters.ok_or(fail(ErrorKind::MissingPrerequisite {
            what: "method parameters",
        }))?;
        let basis = self.basis.as_ref().ok_or(fail(ErrorKind::MissingPrerequisite {
            what: "basis functions",
        }))?;

        if basic_parameters.n_constraints == 0 {
            return Err(fail(ErrorKind::NoConstraints));
        }

        let rows = assembly::assemble_constraints(&self.input, &self.parameters, &basic_parameters, basis)
            .map_err(fail)?;

        let poly = match basic_parameters.poly_term {
            true => {
                let locations: Vec<[f64; 3]> = [
                    ConstraintKind::Interface,
                    ConstraintKind::Planar,
                    ConstraintKind::Tangent,
                    ConstraintKind::Inequality,
                ]
                .iter()
                .flat_map(|kind| self.input.locations_of(*kind))
                .collect();
                PolynomialBasis::new(
                    basic_parameters.polynomial_degree,
                    basic_parameters.include_constant,
                    &locations,
                )
            }
            false => PolynomialBasis::none(),
        };

        let interpolation_matrix = assembly::build_interpolation_matrix(&rows, basis, &poly);
        let mut equality_matrix = Mat::<f64>::zeros(basic_parameters.n_equality, interpolation_matrix.ncols());

        // With every row bounded there is nothing to partition.
        if basic_parameters.n_equality > 0 {
            assembly::get_equality_matrix(
                interpolation_matrix.as_ref(),
                &mut equality_matrix,
                basic_parameters.n_inequality,
            )
            .map_err(|e| fail(ErrorKind::Partition(e)))?;
        }

        let problem = SystemProblem {
            interpolation_matrix,
            equality_matrix,
            equality_values: assembly::equality_values(&rows),
            inequality_bounds: assembly::inequality_bounds(&rows),
            n_poly: poly.n_terms(),
            progress: self.progress_callback.clone(),
        };

        let weights = self
            .solver
            .solve(&problem)
            .map_err(|e| fail(ErrorKind::Solver(e)))?;
        if weights.is_empty() {
            return Err(fail(ErrorKind::EmptyWeights));
        }
        if weights.len() != rows.len() + poly.n_terms() {
            return Err(fail(ErrorKind::CountMismatch {
                what: "solved weights",
                expected: rows.len() + poly.n_terms(),
                found: weights.len(),
            }));
        }

        let tolerance = self.params.solver_params.feasibility_tolerance;
        for (r, row) in rows.iter().enumerate() {
            if let (RowOrigin::Inequality(i), RowTarget::Bounded { lower, upper }) = (row.origin, row.target) {
                let value = row_value(&problem.interpolation_matrix, r, &weights);
                self.input.inequality[i].residual = value < lower - tolerance || value > upper + tolerance;
            }
        }

        self.interpolant = Some(Interpolant {
            basis: basis.clone(),
            functionals: rows.iter().map(|r| r.functional).collect(),
            weights,
            poly,
        });

        self.completed(stage);
        Ok(())
    }

    fn solved_interpolant(&self, stage: Stage) -> ModelingResult<&Interpolant> {
        let interpolant = self.interpolant.as_ref().ok_or(ModelingError::new(
            stage,
            ErrorKind::MissingPrerequisite { what: "interpolant" },
        ))?;
        if interpolant.is_empty() {
            return Err(ModelingError::new(stage, ErrorKind::EmptyWeights));
        }
        Ok(interpolant)
    }

    /// Evaluates the field value and gradient at every evaluation point.
    pub fn evaluate_scalar_interpolant(&mut self) -> ModelingResult<()> {
        let stage = Stage::EvaluateScalarInterpolant;
        let interpolant = self.solved_interpolant(stage)?;

        let fields: Vec<(f64, [f64; 3])> = self
            .input
            .evaluation_pts
            .par_iter()
            .map(|p| interpolant.evaluate_with_gradient(&p.coords()))
            .collect();

        self.input
            .evaluation_pts
            .par_iter_mut()
            .zip(fields)
            .for_each(|(p, (value, gradient))| p.set_field(value, gradient));

        self.completed(stage);
        Ok(())
    }

    /// Field value and gradient at a single location.
    pub fn evaluate_at(&self, location: &[f64; 3]) -> ModelingResult<(f64, [f64; 3])> {
        let interpolant = self.solved_interpolant(Stage::EvaluateScalarInterpolant)?;
        Ok(interpolant.evaluate_with_gradient(location))
    }

    /// Replaces each interface iso value by the field value at its group's test
    /// point, and stores the evaluated field on the test point itself.
    ///
    /// All values are computed before any is written.
    pub fn update_interface_iso_values(&mut self) -> ModelingResult<IsoValueUpdate> {
        let stage = Stage::UpdateInterfaceIsoValues;

        if self.input.interface_test_points.is_empty() {
            return Ok(IsoValueUpdate::NotApplicable);
        }
        let interpolant = self.solved_interpolant(stage)?;

        let expected = self.input.interface_test_points.len();
        let found = self.input.interface_iso_values.len();
        if expected != found {
            return Err(ModelingError::new(
                stage,
                ErrorKind::CountMismatch {
                    what: "interface iso values",
                    expected,
                    found,
                },
            ));
        }

        let fields: Vec<(f64, [f64; 3])> = self
            .input
            .interface_test_points
            .iter()
            .map(|t| interpolant.evaluate_with_gradient(&t.point.coords()))
            .collect();

        for ((iso, test_point), (value, gradient)) in self
            .input
            .interface_iso_values
            .iter_mut()
            .zip(self.input.interface_test_points.iter_mut())
            .zip(fields)
        {
            *iso = value;
            test_point.point.set_field(value, gradient);
        }

        report(&self.progress_callback, ProgressMsg::IsoValuesUpdated { count: expected });
        Ok(IsoValueUpdate::Updated(expected))
    }

    /// Runs the five stages, then resolves iso values for increment formulations.
    pub fn run_algorithm(&mut self) -> ModelingResult<()> {
        self.process_input_data()?;
        self.get_method_parameters()?;
        self.setup_basis_functions()?;
        self.setup_system_solver()?;
        self.evaluate_scalar_interpolant()?;

        if self.parameters.model_type.uses_increments() {
            self.update_interface_iso_values()?;
        }
        Ok(())
    }

    /// Runs the model, using greedy refinement when enabled.
    ///
    /// Returns the refinement report when greedy refinement ran.
    pub fn run(&mut self) -> ModelingResult<Option<GreedyReport>> {
        match self.parameters.use_greedy {
            true => self.run_greedy_algorithm().map(Some),
            false => self.run_algorithm().map(|_| None),
        }
    }

    /// Kernel family in use, once the basis is set up.
    pub fn kernel_type(&self) -> Option<KernelType> {
        self.basis.as_ref().map(|b| b.kernel().kernel_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ErrorCategory, SolverError},
        model_config::{ModelType, RbfKernelType},
        points::{EvaluationPoint, Inequality, Interface, Planar},
    };
    use equator::assert;

    fn plane_input() -> BasicInput {
        let mut input = BasicInput::new();
        input.interface = vec![
            Interface::new(-1.0, -1.0, 0.0, 0.0),
            Interface::new(1.0, -1.0, 0.0, 0.0),
            Interface::new(0.0, 1.0, 0.0, 0.0),
        ];
        input.planar = vec![Planar::new(0.0, 0.0, 0.0, [0.0, 0.0, 1.0])];
        input.evaluation_pts = vec![
            EvaluationPoint::new(0.0, 0.0, 0.0),
            EvaluationPoint::new(0.3, 0.2, 0.5),
        ];
        input
    }

    fn two_horizon_input() -> BasicInput {
        let mut input = BasicInput::new();
        for z in [0.0, 1.0] {
            input.interface.push(Interface::new(0.0, 0.0, z, z));
            input.interface.push(Interface::new(1.0, 0.0, z, z));
            input.interface.push(Interface::new(0.0, 1.0, z, z));
        }
        input.planar = vec![Planar::new(0.5, 0.5, 0.5, [0.0, 0.0, 1.0])];
        input.evaluation_pts = vec![EvaluationPoint::new(0.5, 0.5, 0.25)];
        input
    }

    #[test]
    fn plane_is_reproduced() {
        let params = ModelParameters::builder(ModelType::SingleSurface)
            .basis_type(RbfKernelType::Cubic)
            .build();
        let mut model = GrbfModel::new(plane_input(), params);
        model.run_algorithm().unwrap();

        let origin = model.input.evaluation_pts[0];
        assert!(origin.scalar_field.unwrap().abs() < 1e-8);
        let g = origin.vector_field.unwrap();
        assert!(g[0].abs() < 1e-8);
        assert!(g[1].abs() < 1e-8);
        assert!((g[2] - 1.0).abs() < 1e-8);

        let above = model.input.evaluation_pts[1];
        assert!((above.scalar_field.unwrap() - 0.5).abs() < 1e-8);
    }

    #[test]
    fn violated_inequality_is_enforced() {
        let mut input = plane_input();
        input.inequality = vec![Inequality::new(0.0, 0.0, 1.0, 2.0)];
        let params = ModelParameters::builder(ModelType::SingleSurface)
            .use_data(true, true, false, true)
            .build();
        let mut model = GrbfModel::new(input, params);
        model.run_algorithm().unwrap();

        let (value, _) = model.evaluate_at(&[0.0, 0.0, 1.0]).unwrap();
        assert!(value >= 2.0 - 1e-6);
        assert!(!model.input.inequality[0].residual);
    }

    #[test]
    fn lajaunie_iso_values_follow_the_solved_field() {
        let params = ModelParameters::builder(ModelType::LajaunieIncrement).build();
        let mut model = GrbfModel::new(two_horizon_input(), params);
        model.run_algorithm().unwrap();

        let iso = model.input.interface_iso_values.clone();
        assert!(iso.len() == 2);
        assert!(((iso[1] - iso[0]) - 1.0).abs() < 1e-8);

        for (test_point, value) in model.input.interface_test_points.iter().zip(&iso) {
            assert!(test_point.point.scalar_field == Some(*value));
            assert!(test_point.point.vector_field.is_some());
        }

        assert!(model.update_interface_iso_values().unwrap() == IsoValueUpdate::Updated(2));
        assert!(model.input.interface_iso_values == iso);
    }

    // Fitted interface values within `level ± u` and gradients within the normal bounds.
    fn assert_within_uncertainty(model: &GrbfModel, interface_uncertainty: f64) {
        let tolerance = 1e-8;
        for i in &model.input.interface {
            let (value, _) = model.evaluate_at(&i.point.coords()).unwrap();
            assert!((value - i.level).abs() <= interface_uncertainty + tolerance);
        }
        for p in &model.input.planar {
            let (_, gradient) = model.evaluate_at(&p.point.coords()).unwrap();
            for axis in 0..3 {
                let [lower, upper] = p.normal_bounds[axis];
                assert!(gradient[axis] >= lower - tolerance);
                assert!(gradient[axis] <= upper + tolerance);
            }
        }
    }

    fn run_plane_with_uncertainty(interface: f64, angular: f64) -> GrbfModel {
        let params = ModelParameters::builder(ModelType::SingleSurface)
            .basis_type(RbfKernelType::Cubic)
            .uncertainty(interface, angular)
            .build();
        let mut model = GrbfModel::new(plane_input(), params);
        model.run_algorithm().unwrap();
        model
    }

    #[test]
    fn interface_uncertainty_is_honoured() {
        // Only the planar rows are equalities, so they cannot fix the constant drift.
        let model = run_plane_with_uncertainty(0.1, 0.0);
        assert!(model.basic_parameters.unwrap().n_inequality == 3);
        assert_within_uncertainty(&model, 0.1);
        assert!(model.input.evaluation_pts.iter().all(|p| p.scalar_field.unwrap().is_finite()));
    }

    #[test]
    fn angular_uncertainty_is_honoured() {
        // Coplanar interfaces leave the vertical drift to the bounded gradient rows.
        let model = run_plane_with_uncertainty(0.0, 5.0);
        assert!(model.basic_parameters.unwrap().n_inequality == 3);
        let [lower, upper] = model.input.planar[0].normal_bounds[2];
        assert!(lower < upper);
        assert_within_uncertainty(&model, 0.0);
    }

    #[test]
    fn fully_bounded_system_is_solved() {
        let model = run_plane_with_uncertainty(0.1, 5.0);
        let basic_parameters = model.basic_parameters.unwrap();
        assert!(basic_parameters.n_equality == 0);
        assert!(basic_parameters.n_inequality == 6);
        assert_within_uncertainty(&model, 0.1);
        let above = model.input.evaluation_pts[1].scalar_field.unwrap();
        assert!(above > 0.0);
    }

    #[test]
    fn iso_values_need_test_points() {
        let mut input = BasicInput::new();
        input.planar = vec![Planar::new(0.0, 0.0, 0.0, [0.0, 0.0, 1.0])];
        let params = ModelParameters::builder(ModelType::VectorField).build();
        let mut model = GrbfModel::new(input, params);
        model.run_algorithm().unwrap();
        assert!(model.update_interface_iso_values().unwrap() == IsoValueUpdate::NotApplicable);
    }

    #[test]
    fn iso_value_count_mismatch_writes_nothing() {
        let params = ModelParameters::builder(ModelType::LajaunieIncrement).build();
        let mut model = GrbfModel::new(two_horizon_input(), params);
        model.run_algorithm().unwrap();

        model.input.interface_iso_values.push(42.0);
        let before = model.input.interface_iso_values.clone();
        let err = model.update_interface_iso_values().unwrap_err();
        assert!(err.stage == Stage::UpdateInterfaceIsoValues);
        assert!(err.category() == ErrorCategory::Structural);
        assert!(model.input.interface_iso_values == before);
    }

    #[derive(Debug)]
    struct FailingSolver;

    impl SystemSolver for FailingSolver {
        fn solve(&self, _problem: &SystemProblem) -> Result<Vec<f64>, SolverError> {
            Err(SolverError::Singular)
        }
    }

    #[test]
    fn solver_failure_stops_the_pipeline() {
        let mut model = GrbfModel::new(plane_input(), ModelParameters::default())
            .with_solver(Arc::new(FailingSolver));
        let err = model.run_algorithm().unwrap_err();
        assert!(err.stage == Stage::SetupSystemSolver);
        assert!(err.kind == ErrorKind::Solver(SolverError::Singular));
        assert!(model.interpolant().is_none());
        assert!(model.input.evaluation_pts.iter().all(|p| p.scalar_field.is_none()));
    }

    #[test]
    fn stages_check_prerequisites() {
        let mut model = GrbfModel::new(plane_input(), ModelParameters::default());
        let err = model.evaluate_scalar_interpolant().unwrap_err();
        assert!(err.stage == Stage::EvaluateScalarInterpolant);
        assert!(err.kind == ErrorKind::MissingPrerequisite { what: "interpolant" });

        let err = model.setup_basis_functions().unwrap_err();
        assert!(err.stage == Stage::SetupBasisFunctions);
    }

    #[test]
    fn increment_models_need_planar_data() {
        let mut input = two_horizon_input();
        input.planar.clear();
        let params = ModelParameters::builder(ModelType::StratigraphicHorizons).build();
        let err = GrbfModel::new(input, params).run_algorithm().unwrap_err();
        assert!(err.stage == Stage::ProcessInputData);
        assert!(err.kind == ErrorKind::MissingData { what: "planar points" });
    }

    #[test]
    fn modified_basis_without_interfaces_is_a_configuration_error() {
        let mut input = BasicInput::new();
        input.planar = vec![Planar::new(0.0, 0.0, 0.0, [0.0, 0.0, 1.0])];
        let params = ModelParameters::builder(ModelType::LajaunieIncrement).build();
        let err = GrbfModel::new(input, params).run_algorithm().unwrap_err();
        assert!(err.stage == Stage::SetupBasisFunctions);
        assert!(err.kind == ErrorKind::ModifiedBasisWithoutInterfaces);
        assert!(err.category() == ErrorCategory::Configuration);
    }

    #[test]
    fn anisotropy_without_planar_data_is_rejected() {
        let mut input = plane_input();
        input.planar.clear();
        let params = ModelParameters::builder(ModelType::SingleSurface)
            .model_global_anisotropy(true)
            .build();
        let err = GrbfModel::new(input, params).run_algorithm().unwrap_err();
        assert!(err.stage == Stage::SetupBasisFunctions);
        assert!(matches!(err.kind, ErrorKind::InvalidKernel { .. }));
    }
}
