/// least-squares polynomial fitting of curves and surfaces
pub mod optimization;
/// Gaussian kernel deformation of parametric curves, clamping of drags and synthesis of the result as text
pub mod deformation;
/// points and markers
pub mod geometry;
/// sampling of expressions for plotting and refits
pub mod sampling;
/// per-session editing state of a curve or a surface
pub mod session;
