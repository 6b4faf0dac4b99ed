//! Escape-velocity curve of an interpolated Milky-Way-like model.
//!
//! A Hernquist bulge and a Plummer halo are summed, interpolated on a geometric
//! and a linear grid, and the escape and circular velocities printed in km/s
//! together with the relative force error of each grid.
//!
//! Run with: `RUST_LOG=debug cargo run --example escape_curve`

use interpot::analytic::{Hernquist, Plummer};
use interpot::{
    Combined, GridSpacing, InterpConfig, InterpSphericalPotential, RadialForceField, RadialGrid,
    ScaleFactors, SphericalPotential,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scale = ScaleFactors::new(8.0, 220.0);
    let bulge = Hernquist::new(0.2, 0.1).with_scale_factors(scale);
    let halo = Plummer::new(1.5, 2.0).with_scale_factors(scale);
    let galaxy = Combined::new(bulge, halo)?;

    let geometric = InterpSphericalPotential::from_field(&galaxy, InterpConfig::default())?;
    let linear = InterpSphericalPotential::from_field(
        &galaxy,
        InterpConfig::default().with_grid(RadialGrid::from_spacing(
            GridSpacing::Linear,
            0.01,
            20.0,
            101,
        )?),
    )?;

    // internal velocities to km/s
    let v_unit = geometric.scale_factors().velocity();
    let r_unit = geometric.scale_factors().length();

    println!();
    println!(
        "{:>10} {:>12} {:>12} {:>14} {:>14}",
        "r (kpc)", "v_esc", "v_circ", "err geometric", "err linear"
    );
    for r in [0.02, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 19.0, 30.0] {
        let exact = galaxy.radial_force(r, 0.0)?;
        let relative_error =
            |model: &InterpSphericalPotential| ((model.radial_force(r, 0.0) - exact) / exact).abs();
        println!(
            "{:>10.3} {:>12.2} {:>12.2} {:>14.2e} {:>14.2e}",
            r * r_unit,
            geometric.escape_velocity(r) * v_unit,
            geometric.circular_velocity(r) * v_unit,
            relative_error(&geometric),
            relative_error(&linear),
        );
    }
    println!();
    println!(
        "total mass inside {:.1} kpc: {:.4} (internal units)",
        geometric.r_max() * r_unit,
        geometric.total_mass()
    );
    println!(
        "potential at infinity: {:.1} (km/s)^2",
        geometric.potential_at_infinity() * geometric.scale_factors().potential_unit()
    );

    for grid in [geometric, linear] {
        let validation = grid.validate(&galaxy, 10)?;
        println!(
            "max potential error {:.2e} at r = {:.3}, max force error {:.2e} at r = {:.3}",
            validation.max_potential_error,
            validation.worst_r_potential,
            validation.max_force_error,
            validation.worst_r_force
        );
    }
    Ok(())
}
