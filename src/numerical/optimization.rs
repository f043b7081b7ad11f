/// y = f(x) polynomial fit and polynomial pretty-printing
pub mod poly_fitting;
/// z = f(x, y) polynomial fit
pub mod surface_fitting;
/// R^2, RMSE and fit report tables
pub mod fit_quality;
