//! # Fan controller walk-through
//!
//! Builds a two-input fan controller (temperature and humidity), sweeps the
//! temperature through a day and prints the output set heights each tick.
//! Halfway through, an editor mistake wires a rule into a loop; the link is
//! refused and the controller keeps running.
//!
//! ```bash
//! RUST_LOG=fls_core=debug cargo run --example thermostat
//! ```

use fls_core::{FuzzyError, FuzzyLogic, Id, InputSide, Operator, TrapezoidShape};
use tracing_subscriber::EnvFilter;

// ── Graph ────────────────────────────────────────────────────────────────────

struct FanController {
    logic: FuzzyLogic,
    temperature: Id,
    humidity: Id,
    stuffy: Id,
    idle: Id,
    fast: Id,
}

fn add_set(logic: &mut FuzzyLogic, variable: &Id, name: &str, shape: TrapezoidShape) -> Result<Id, FuzzyError> {
    let id = logic.add_membership_set(variable)?;
    let set = logic.membership_set_mut(&id)?;
    set.name = Some(name.into());
    set.shape = shape;
    Ok(id)
}

fn build() -> Result<FanController, FuzzyError> {
    let mut logic = FuzzyLogic::new();
    logic.initialize();

    let temperature = logic.fuzzification(0)?.id().clone();
    logic.fuzzification_mut(&temperature)?.name = Some("Temperature".into());
    let cool = add_set(&mut logic, &temperature, "Cool", TrapezoidShape::new(0.0, 0.0, 18.0, 22.0))?;
    let hot = add_set(&mut logic, &temperature, "Hot", TrapezoidShape::new(20.0, 26.0, 40.0, 40.0))?;

    let humidity = logic.add_fuzzification()?;
    logic.fuzzification_mut(&humidity)?.name = Some("Humidity".into());
    let humid = add_set(&mut logic, &humidity, "Humid", TrapezoidShape::new(50.0, 70.0, 100.0, 100.0))?;

    let fan = logic.defuzzification()?.id().clone();
    let idle = add_set(&mut logic, &fan, "Idle", TrapezoidShape::triangle(0.0, 0.0, 0.5))?;
    let fast = add_set(&mut logic, &fan, "Fast", TrapezoidShape::triangle(0.5, 1.0, 1.0))?;

    // idle while cool
    let rest = logic.add_inference()?;
    logic.inference_mut(&rest)?.name = Some("rest".into());
    logic.set_operator(&rest, Operator::Passthrough)?;
    logic.link_input(&rest, InputSide::Left, &cool)?;
    logic.set_output(&rest, Some(idle.clone()))?;

    // fast when hot and humid
    let stuffy = logic.add_inference()?;
    logic.inference_mut(&stuffy)?.name = Some("stuffy".into());
    logic.link_input(&stuffy, InputSide::Left, &hot)?;
    logic.link_input(&stuffy, InputSide::Right, &humid)?;
    logic.set_output(&stuffy, Some(fast.clone()))?;

    logic.set_evaluation_enabled(true);
    Ok(FanController {
        logic,
        temperature,
        humidity,
        stuffy,
        idle,
        fast,
    })
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<(), FuzzyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut fan = build()?;
    fan.logic.set_input_value(&fan.humidity, 80.0)?;

    println!("hour  temp   idle   fast");
    for hour in 0..24u8 {
        let temperature = 14.0 + 14.0 * (f32::from(hour) / 24.0 * core::f32::consts::PI).sin();
        fan.logic.set_input_value(&fan.temperature, temperature)?;
        let report = fan.logic.run_update()?;

        println!(
            "{hour:>4}  {temperature:>5.1}  {:>5.2}  {:>5.2}   ({} written)",
            fan.logic.height(&fan.idle)?,
            fan.logic.height(&fan.fast)?,
            report.written,
        );

        if hour == 12 {
            // an editor mistake: feeding the rule its own output
            match fan.logic.link_input(&fan.stuffy, InputSide::Right, &fan.stuffy) {
                Err(FuzzyError::CycleDetected(node)) => println!("      link refused: cycle through {node}"),
                other => println!("      unexpected: {other:?}"),
            }
        }
    }

    println!("\nevaluation disabled:");
    fan.logic.set_evaluation_enabled(false);
    fan.logic.run_update()?;
    for (set, height) in fan.logic.output_heights()? {
        let label = fan.logic.membership_set(&set)?.name.clone().unwrap_or_default();
        println!("  {label:<5} {height:.2}");
    }
    Ok(())
}
