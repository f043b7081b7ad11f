pub mod kernel_deformer;
pub mod displacement_clamp;
pub mod expression_synth;
