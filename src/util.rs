/// Checked numeric conversions.
///
/// Index positions and factorial arguments arrive as `f64` scalars and must
/// be integral to be usable. These helpers perform the conversions without
/// silent truncation.
pub mod num;
