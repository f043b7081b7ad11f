/// dense solve of the normal equations with singularity detection
pub mod Lx_eq_b;
/// condition number and sanity checks of linear systems
pub mod linear_sys_diagnostics;
