/////////////////////////////////////////////////////////////////////////////////////////////
//
// Example increment model of two parallel dipping horizons with greedy refinement, reporting
// the recovered iso values and the field along a vertical profile.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use rand::{Rng, SeedableRng, rngs::StdRng};
use surfe_rbf::{
    BasicInput, GrbfModel, Interface, ModelParameters, ModelType, Planar, Polarity, RbfKernelType,
    create_evaluation_grid, generate_random_points,
    progress::{ProgressMsg, ProgressSink, closure_sink},
};
use std::sync::Arc;

const DIP: f64 = 20.0;
const STRIKE: f64 = 90.0;

/// Height of the dipping horizon raised `offset` above the origin.
fn horizon_z(x: f64, y: f64, offset: f64) -> f64 {
    let n = surfe_rbf::points::normal_from_dip_strike(DIP, STRIKE, Polarity::Upright);
    offset - (n[0] * x + n[1] * y) / n[2]
}

/// Generates a callback closure_sink
fn get_callback_sink() -> Arc<dyn ProgressSink> {
    let (sink, _listener) = closure_sink(256, |msg| match msg {
        ProgressMsg::StageCompleted { stage } => {
            println!("Completed: {}", stage);
        }
        ProgressMsg::ActiveSetPass { pass, promoted } => {
            println!("Active set pass {:>3}    promoted {:>4}", pass, promoted);
        }
        ProgressMsg::GreedyIteration {
            iteration,
            active_constraints,
            added,
        } => {
            println!(
                "Greedy iteration {:>3}    active {:>5}    added {:>4}",
                iteration, active_constraints, added
            );
        }
        ProgressMsg::IsoValuesUpdated { count } => {
            println!("Updated {} iso values", count);
        }
        ProgressMsg::Message { message } => {
            println!("{message}");
        }
    });

    sink
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut input = BasicInput::new();

    // Two horizons one unit apart, sampled with a little vertical noise.
    for (level, offset) in [(10.0, 0.0), (20.0, 1.0)] {
        for [x, y, _] in generate_random_points(60, Some(level as u64)) {
            let (x, y) = (4.0 * x, 4.0 * y);
            let z = horizon_z(x, y, offset) + rng.random_range(-0.005..0.005);
            input.interface.push(Interface::new(x, y, z, level));
        }
    }

    for [x, y, _] in generate_random_points(8, Some(7)) {
        let (x, y) = (4.0 * x, 4.0 * y);
        input.planar.push(Planar::from_dip_strike(
            x,
            y,
            horizon_z(x, y, 0.5),
            DIP,
            STRIKE,
            Polarity::Upright,
        ));
    }

    input.evaluation_pts = create_evaluation_grid([(2.0, 2.0), (2.0, 2.0), (-2.0, 3.0)], [1, 1, 11]);

    let parameters = ModelParameters::builder(ModelType::LajaunieIncrement)
        .basis_type(RbfKernelType::Cubic)
        .polynomial_order(1)
        .greedy(0.01, 5.0)
        .build();

    let mut model = GrbfModel::builder(input, parameters)
        .progress_callback(get_callback_sink())
        .build();

    let report = model.run()?;

    if let Some(report) = report {
        println!(
            "Greedy refinement finished after {} iterations: {:?}",
            report.iterations, report.active_counts
        );
    }

    for (i, iso) in model.input.interface_iso_values.iter().enumerate() {
        println!("Horizon {}    iso value {:>10.5}", i, iso);
    }

    for (p, value) in model
        .input
        .evaluation_pts
        .iter()
        .zip(model.input.evaluation_values())
    {
        println!("z = {:>6.2}    s = {:>10.5}", p.z, value);
    }

    Ok(())
}
